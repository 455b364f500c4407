//! The JavaScript surface: a `TuppTrigger` class with static methods, backed by one instance per thread.
//!
//! ```js
//! import init, { TuppTrigger } from "./pkg/tupp_trigger.js";
//!
//! await init();
//! document.addEventListener("DOMContentLoaded", () => TuppTrigger.init());
//! ```

use crate::{config::ComponentParams, error::TriggerError, registry, settings::Settings, target::TargetAction};
use core::convert::TryInto;
use std::cell::RefCell;
use tracing::warn;
use wasm_bindgen::{prelude::wasm_bindgen, JsValue, UnwrapThrowExt};
use web_sys::Element;

thread_local! {
	static INSTANCE: RefCell<Option<registry::TuppTrigger>> = RefCell::new(None);
}

fn with_instance<R>(settings: impl FnOnce() -> Result<Settings, TriggerError>, f: impl FnOnce(&mut registry::TuppTrigger) -> R) -> Result<R, TriggerError> {
	INSTANCE.with(|instance| {
		let mut instance = instance.borrow_mut();
		if instance.is_none() {
			install_logging();
			*instance = Some(registry::TuppTrigger::new(settings()?)?);
		}
		Ok(f(instance.as_mut().unwrap_throw()))
	})
}

#[cfg(feature = "console-log")]
fn install_logging() {
	if tracing_wasm::try_set_as_global_default().is_err() {
		warn!("A global tracing subscriber is already installed. Not installing `tracing-wasm`.");
	}
}

#[cfg(not(feature = "console-log"))]
fn install_logging() {}

fn count(n: usize) -> u32 {
	n.try_into().unwrap_or(u32::MAX)
}

/// Static entry points. Never instantiated.
#[wasm_bindgen(js_name = TuppTrigger)]
pub struct GlobalTrigger {
	_private: (),
}

#[wasm_bindgen(js_class = TuppTrigger)]
impl GlobalTrigger {
	/// Binds all marker-class elements of the current document with default settings.
	/// Returns the number of new bindings.
	#[wasm_bindgen(js_name = init)]
	pub fn init() -> Result<u32, JsValue> {
		Ok(count(with_instance(|| Ok(Settings::default()), registry::TuppTrigger::init)?))
	}

	/// Like `init`, with settings given as JSON.
	///
	/// Settings only take effect on the first call. Later calls keep the existing instance.
	#[wasm_bindgen(js_name = initWithSettings)]
	pub fn init_with_settings(settings_json: &str) -> Result<u32, JsValue> {
		let settings = Settings::from_json(settings_json)?;
		let bound = with_instance(
			|| Ok(settings.clone()),
			|trigger| {
				if trigger.settings() != &settings {
					warn!("Already initialized with different settings. Keeping them.");
				}
				trigger.init()
			},
		)?;
		Ok(count(bound))
	}

	/// Binds one element with explicit parameters. Returns `false` if it was already bound.
	#[wasm_bindgen(js_name = bindComponent)]
	pub fn bind_component(
		element: &Element,
		chatflow_id: String,
		source_selector: Option<String>,
		target_selector: Option<String>,
		target_action: Option<String>,
		debounce_delay: Option<u32>,
	) -> Result<bool, JsValue> {
		let params = ComponentParams {
			chatflow_id,
			source_selector,
			target_selector,
			target_action: match target_action {
				Some(action) => action.parse::<TargetAction>()?,
				None => TargetAction::default(),
			},
			debounce_delay,
		};
		Ok(with_instance(|| Ok(Settings::default()), |trigger| trigger.bind_component(element, &params))??)
	}

	/// Returns `false` if `element` wasn't bound.
	#[wasm_bindgen(js_name = unbind)]
	pub fn unbind(element: &Element) -> bool {
		INSTANCE.with(|instance| instance.borrow_mut().as_mut().map_or(false, |trigger| trigger.unbind(element)))
	}

	/// Returns the number of removed bindings.
	#[wasm_bindgen(js_name = unbindAll)]
	pub fn unbind_all() -> u32 {
		INSTANCE.with(|instance| instance.borrow_mut().as_mut().map_or(0, |trigger| count(trigger.unbind_all())))
	}
}
