//! Per-binding configuration and the two ways of discovering it.
//!
//! Declarative markup configures bindings through `data-tupp-*` attributes ([`DataAttributes`]),
//! while component-style callers pass parameters directly ([`ComponentParams`]).
//! Both produce the same [`TriggerConfig`], which is all the pipeline ever sees.

use crate::{error::TriggerError, event::ElementKind, settings::Settings, target::TargetAction};
use tracing::warn;
use web_sys::Element;

pub const ATTR_CHATFLOW_ID: &str = "data-tupp-chatflow-id";
pub const ATTR_SOURCE_ID: &str = "data-tupp-source-id";
pub const ATTR_SOURCE_CLASS: &str = "data-tupp-source-class";
pub const ATTR_TARGET_ID: &str = "data-tupp-target-id";
pub const ATTR_TARGET_CLASS: &str = "data-tupp-target-class";
pub const ATTR_TARGET_ACTION: &str = "data-tupp-target-action";
pub const ATTR_TARGET_STYLE: &str = "data-tupp-target-style";
pub const ATTR_DEBOUNCE_DELAY: &str = "data-tupp-debounce-delay";

/// A reference to zero or more elements in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementRef {
	Id(String),
	/// As source: the first element with the class. As target: all of them.
	Class(String),
	/// First match of a CSS selector.
	Selector(String),
}

/// Immutable configuration of one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConfig {
	pub chatflow_id: String,
	/// [`None`] reads the triggering element's own value.
	pub source: Option<ElementRef>,
	/// [`None`] sends the request but updates nothing.
	pub targets: Option<ElementRef>,
	pub action: TargetAction,
	/// CSS text appended to each target's inline style before its content is written.
	pub style: Option<String>,
	/// Milliseconds. Always 0 for immediate elements.
	pub debounce_delay: u32,
}

/// Resolves the [`TriggerConfig`] for an element that is about to be bound.
pub trait ConfigSource {
	/// # Errors
	///
	/// [`TriggerError::ConfigurationMissing`] if no chatflow id is available.
	fn resolve(&self, element: &Element, kind: ElementKind, settings: &Settings) -> Result<TriggerConfig, TriggerError>;
}

/// Reads `data-tupp-*` attributes from the triggering element.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataAttributes;

impl ConfigSource for DataAttributes {
	fn resolve(&self, element: &Element, kind: ElementKind, settings: &Settings) -> Result<TriggerConfig, TriggerError> {
		TriggerConfig::from_attributes(|name| element.get_attribute(name), kind, settings)
	}
}

impl TriggerConfig {
	/// Builds a configuration from attribute lookups. Empty attributes count as absent.
	///
	/// Ids take precedence over classes. Unparsable optional attributes fall back to their defaults with a warning.
	///
	/// # Errors
	///
	/// [`TriggerError::ConfigurationMissing`] if `data-tupp-chatflow-id` is absent.
	pub fn from_attributes(get_attribute: impl Fn(&str) -> Option<String>, kind: ElementKind, settings: &Settings) -> Result<Self, TriggerError> {
		let attribute = |name: &str| get_attribute(name).map(|value| value.trim().to_owned()).filter(|value| !value.is_empty());

		let chatflow_id = attribute(ATTR_CHATFLOW_ID).ok_or_else(|| TriggerError::ConfigurationMissing(format!("`{}` is not set", ATTR_CHATFLOW_ID)))?;

		let source = attribute(ATTR_SOURCE_ID).map(ElementRef::Id).or_else(|| attribute(ATTR_SOURCE_CLASS).map(ElementRef::Class));
		let targets = attribute(ATTR_TARGET_ID).map(ElementRef::Id).or_else(|| attribute(ATTR_TARGET_CLASS).map(ElementRef::Class));

		let action = match attribute(ATTR_TARGET_ACTION) {
			None => TargetAction::default(),
			Some(action) => action.parse::<TargetAction>().unwrap_or_else(|error: TriggerError| {
				warn!("{} Falling back to {:?}.", error, TargetAction::default());
				TargetAction::default()
			}),
		};

		let configured_delay = if kind.accepts_debounce_delay() {
			attribute(ATTR_DEBOUNCE_DELAY).and_then(|delay| match delay.parse::<u32>() {
				Ok(delay) => Some(delay),
				Err(error) => {
					warn!("Ignoring `{}={:?}` ({}). Using {} ms.", ATTR_DEBOUNCE_DELAY, delay, error, settings.debounce_delay);
					None
				}
			})
		} else {
			None
		};

		Ok(Self {
			chatflow_id,
			source,
			targets,
			action,
			style: get_attribute(ATTR_TARGET_STYLE).filter(|style| !style.trim().is_empty()),
			debounce_delay: effective_delay(kind, configured_delay, settings),
		})
	}
}

/// Component-style configuration, passed as parameters instead of read from markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentParams {
	pub chatflow_id: String,
	pub source_selector: Option<String>,
	pub target_selector: Option<String>,
	pub target_action: TargetAction,
	/// [`None`] uses [`Settings::debounce_delay`].
	pub debounce_delay: Option<u32>,
}

impl ComponentParams {
	#[must_use]
	pub fn new(chatflow_id: impl Into<String>) -> Self {
		Self {
			chatflow_id: chatflow_id.into(),
			source_selector: None,
			target_selector: None,
			target_action: TargetAction::default(),
			debounce_delay: None,
		}
	}

	#[must_use]
	pub fn source(mut self, selector: impl Into<String>) -> Self {
		self.source_selector = Some(selector.into());
		self
	}

	#[must_use]
	pub fn target(mut self, selector: impl Into<String>) -> Self {
		self.target_selector = Some(selector.into());
		self
	}

	#[must_use]
	pub fn action(mut self, action: TargetAction) -> Self {
		self.target_action = action;
		self
	}

	#[must_use]
	pub fn debounce_delay(mut self, debounce_delay_ms: u32) -> Self {
		self.debounce_delay = Some(debounce_delay_ms);
		self
	}

	/// # Errors
	///
	/// [`TriggerError::ConfigurationMissing`] if the chatflow id is blank.
	pub fn to_config(&self, kind: ElementKind, settings: &Settings) -> Result<TriggerConfig, TriggerError> {
		let selector = |selector: &Option<String>| selector.as_deref().map(str::trim).filter(|selector| !selector.is_empty()).map(|selector| ElementRef::Selector(selector.to_owned()));

		let chatflow_id = self.chatflow_id.trim();
		if chatflow_id.is_empty() {
			return Err(TriggerError::ConfigurationMissing("chatflow id is blank".to_owned()));
		}

		Ok(TriggerConfig {
			chatflow_id: chatflow_id.to_owned(),
			source: selector(&self.source_selector),
			targets: selector(&self.target_selector),
			action: self.target_action,
			style: None,
			debounce_delay: effective_delay(kind, self.debounce_delay, settings),
		})
	}
}

impl ConfigSource for ComponentParams {
	fn resolve(&self, _: &Element, kind: ElementKind, settings: &Settings) -> Result<TriggerConfig, TriggerError> {
		self.to_config(kind, settings)
	}
}

fn effective_delay(kind: ElementKind, configured: Option<u32>, settings: &Settings) -> u32 {
	if kind.is_immediate() {
		0
	} else {
		configured.unwrap_or(settings.debounce_delay)
	}
}
