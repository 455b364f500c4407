use crate::{
	config::TriggerConfig,
	error::{report, TriggerError},
	query::{self, Transport},
	settings::Settings,
	source, target,
};
use std::rc::Rc;
use tracing::{debug, instrument, level_filters::STATIC_MAX_LEVEL, Level};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};

/// Event → request → DOM update, shared by all bindings of one registry.
pub struct Pipeline {
	document: Document,
	settings: Settings,
	transport: Rc<dyn Transport>,
}

impl Pipeline {
	#[must_use]
	pub fn new(document: Document, settings: Settings, transport: Rc<dyn Transport>) -> Self {
		Self { document, settings, transport }
	}

	#[must_use]
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Reads the question synchronously, then finishes the exchange in the background.
	///
	/// Never fails: every error ends in [`report`].
	pub fn spawn(self: &Rc<Self>, trigger: &Element, config: Rc<TriggerConfig>) {
		let question = match self.question(trigger, &config) {
			Ok(question) => question,
			Err(error) => return report(&error),
		};
		let pipeline = Rc::clone(self);
		spawn_local(async move {
			if let Err(error) = pipeline.answer(&config, question).await {
				report(&error);
			}
		});
	}

	/// Runs the whole pipeline for one fired event and returns how many targets were updated.
	///
	/// # Errors
	///
	/// Whatever stopped the update. No target is changed in that case.
	pub async fn run(&self, trigger: &Element, config: &TriggerConfig) -> Result<usize, TriggerError> {
		let question = self.question(trigger, config)?;
		self.answer(config, question).await
	}

	fn question(&self, trigger: &Element, config: &TriggerConfig) -> Result<String, TriggerError> {
		let question = source::extract_value(&self.document, config.source.as_ref(), trigger)?;
		if cfg!(feature = "dangerous-logging") {
			debug!(chatflow_id = %config.chatflow_id, %question, "Extracted question.");
		} else {
			debug!(chatflow_id = %config.chatflow_id, question_len = question.len(), "Extracted question.");
		}
		Ok(question)
	}

	#[instrument(skip(self, config, question), fields(chatflow_id = %config.chatflow_id))]
	async fn answer(&self, config: &TriggerConfig, question: String) -> Result<usize, TriggerError> {
		let result = query::exchange(&*self.transport, &self.settings.endpoint(&config.chatflow_id), question).await?;
		let content = result.content();
		if STATIC_MAX_LEVEL >= Level::DEBUG {
			if cfg!(feature = "dangerous-logging") {
				debug!(%content, "Applying result.");
			} else {
				debug!(content_len = content.len(), "Applying result.");
			}
		}

		let targets = target::resolve(&self.document, config.targets.as_ref());
		target::apply(&targets, config.style.as_deref(), config.action, &content)
	}
}
