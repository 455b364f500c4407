use crate::error::TriggerError;
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://tupp.io/api/v1/prediction/";
pub const DEFAULT_MARKER_CLASS: &str = "tupp-trigger";
pub const DEFAULT_DEBOUNCE_DELAY_MS: u32 = 500;

/// Library-wide settings shared by all bindings of one [`TuppTrigger`](`crate::TuppTrigger`).
///
/// From JavaScript, these are passed to `initWithSettings` as JSON with camelCase keys.
/// Missing keys keep their defaults:
///
/// ```json
/// { "apiBase": "https://example.com/api/v1/prediction/", "markerClass": "tupp-trigger", "debounceDelay": 500 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
	/// Prefix the chatflow id is appended to.
	pub api_base: String,
	/// Class that opts elements into [`TuppTrigger::init`](`crate::TuppTrigger::init`).
	pub marker_class: String,
	/// Debounce delay in milliseconds for bindings that don't specify one.
	pub debounce_delay: u32,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.to_owned(),
			marker_class: DEFAULT_MARKER_CLASS.to_owned(),
			debounce_delay: DEFAULT_DEBOUNCE_DELAY_MS,
		}
	}
}

impl Settings {
	/// Parses settings from a JSON object.
	///
	/// # Errors
	///
	/// Iff `json` isn't an object with the fields above.
	pub fn from_json(json: &str) -> Result<Self, TriggerError> {
		let settings: Self = serde_json::from_str(json).map_err(|error| TriggerError::InvalidConfiguration(error.to_string()))?;
		if settings.marker_class.trim().is_empty() {
			return Err(TriggerError::InvalidConfiguration("`markerClass` must not be empty".to_owned()));
		}
		Ok(settings)
	}

	#[must_use]
	pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
		self.api_base = api_base.into();
		self
	}

	#[must_use]
	pub fn with_marker_class(mut self, marker_class: impl Into<String>) -> Self {
		self.marker_class = marker_class.into();
		self
	}

	#[must_use]
	pub fn with_debounce_delay(mut self, debounce_delay_ms: u32) -> Self {
		self.debounce_delay = debounce_delay_ms;
		self
	}

	/// The URL requests for `chatflow_id` are sent to.
	#[must_use]
	pub fn endpoint(&self, chatflow_id: &str) -> String {
		format!("{}{}", self.api_base, chatflow_id)
	}
}
