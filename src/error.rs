use tracing::{debug, error};
use wasm_bindgen::JsValue;

/// Everything that can stop a single trigger event from updating its targets.
///
/// None of these are ever thrown into the host page while handling events.
/// They end in [`report`] instead, which leaves the targets untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
	/// No chatflow id, or a source that doesn't resolve to an element with a value.
	#[error("Configuration missing: {0}")]
	ConfigurationMissing(String),

	/// The request didn't complete, or the response body wasn't valid JSON.
	#[error("API call failed: {0}")]
	TransportFailure(String),

	/// The endpoint answered with a non-2xx status.
	#[error("Error {status}: {status_text}")]
	ServerRejected { status: u16, status_text: String },

	/// Settings or component parameters that can't be interpreted.
	#[error("Invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// A DOM API threw.
	#[error("DOM error: {0}")]
	Dom(String),
}

impl TriggerError {
	pub(crate) fn dom(context: &str, error: &JsValue) -> Self {
		Self::Dom(format!("{}: {:?}", context, error))
	}

	pub(crate) fn transport(context: &str, error: &JsValue) -> Self {
		Self::TransportFailure(format!("{}: {:?}", context, error))
	}

	#[must_use]
	pub fn is_client_error(&self) -> bool {
		matches!(self, Self::ServerRejected { status: 400..=499, .. })
	}

	#[must_use]
	pub fn is_server_error(&self) -> bool {
		matches!(self, Self::ServerRejected { status: 500..=599, .. })
	}
}

impl From<TriggerError> for JsValue {
	fn from(error: TriggerError) -> Self {
		JsValue::from_str(&error.to_string())
	}
}

/// The diagnostic sink: logs exactly one event per failed trigger.
///
/// Missing configuration is an expected, silent abort and only shows up at `debug` level.
pub fn report(error: &TriggerError) {
	match error {
		TriggerError::ConfigurationMissing(_) => debug!("Trigger aborted. {}", error),
		TriggerError::ServerRejected { .. } if error.is_client_error() => error!(client_error = true, "{}", error),
		TriggerError::ServerRejected { .. } if error.is_server_error() => error!(server_error = true, "{}", error),
		_ => error!("{}", error),
	}
}
