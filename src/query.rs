//! The request/response exchange with the prediction endpoint.

use crate::error::TriggerError;
use futures_util::future::{FutureExt, LocalBoxFuture};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

/// The only request body shape: `{"question": "…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPayload {
	pub question: String,
}

/// What a successful response resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
	Text(String),
	Json(Value),
}

impl QueryResult {
	/// Picks the body's `text` field if it's set, otherwise keeps the whole body.
	///
	/// "Set" means truthy: an empty string, `0`, `false` or `null` count as absent.
	#[must_use]
	pub fn from_body(body: Value) -> Self {
		match body.get("text") {
			Some(Value::String(text)) if !text.is_empty() => return Self::Text(text.clone()),
			Some(text) if is_truthy(text) => return Self::Json(text.clone()),
			_ => (),
		}
		match body {
			Value::String(text) => Self::Text(text),
			body => Self::Json(body),
		}
	}

	/// The markup written into targets. Structured values are serialized as compact JSON.
	#[must_use]
	pub fn content(&self) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::Json(value) => value.to_string(),
		}
	}
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(value) => *value,
		Value::Number(number) => number.as_f64().map_or(true, |number| number != 0.0 && !number.is_nan()),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Coarse status classes. Only used to decide success and for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
	Success,
	ClientError,
	ServerError,
	Other,
}

impl ResponseClass {
	#[must_use]
	pub fn of(status: u16) -> Self {
		match status {
			200..=299 => Self::Success,
			400..=499 => Self::ClientError,
			500..=599 => Self::ServerError,
			_ => Self::Other,
		}
	}
}

/// A completed HTTP exchange. `body` is only read for successful responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub status_text: String,
	pub body: String,
}

/// Sends a JSON `POST`.
pub trait Transport {
	/// Resolves to [`TriggerError::TransportFailure`] if no response arrives.
	fn post_json(&self, url: &str, body: String) -> LocalBoxFuture<'static, Result<HttpResponse, TriggerError>>;
}

/// [***fetch***](https://developer.mozilla.org/en-US/docs/Web/API/fetch) through a [`Window`].
#[derive(Debug, Clone)]
pub struct FetchTransport {
	window: Window,
}

impl FetchTransport {
	#[must_use]
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

impl Transport for FetchTransport {
	fn post_json(&self, url: &str, body: String) -> LocalBoxFuture<'static, Result<HttpResponse, TriggerError>> {
		let window = self.window.clone();
		let url = url.to_owned();
		async move {
			let headers = Headers::new().map_err(|error| TriggerError::transport("Could not create headers", &error))?;
			headers
				.set("Content-Type", "application/json")
				.map_err(|error| TriggerError::transport("Could not set Content-Type", &error))?;

			let init = RequestInit::new();
			init.set_method("POST");
			init.set_headers(&headers);
			init.set_body(&JsValue::from_str(&body));
			let request = Request::new_with_str_and_init(&url, &init).map_err(|error| TriggerError::transport("Could not create request", &error))?;

			let response: Response = JsFuture::from(window.fetch_with_request(&request))
				.await
				.map_err(|error| TriggerError::transport("Request failed", &error))?
				.dyn_into()
				.map_err(|error| TriggerError::transport("`fetch` didn't resolve to a Response", &error))?;

			let body = if response.ok() {
				let text = response.text().map_err(|error| TriggerError::transport("Could not read response body", &error))?;
				JsFuture::from(text)
					.await
					.map_err(|error| TriggerError::transport("Could not read response body", &error))?
					.as_string()
					.unwrap_or_default()
			} else {
				String::new()
			};

			Ok(HttpResponse {
				status: response.status(),
				status_text: response.status_text(),
				body,
			})
		}
		.boxed_local()
	}
}

/// One round-trip: `POST {"question": question}` to `url`, then interpret the response.
///
/// Any 2xx status counts as success.
///
/// # Errors
///
/// - [`TriggerError::ServerRejected`] for any other status,
/// - [`TriggerError::TransportFailure`] if the request fails or the success body isn't JSON (or is `null`).
#[instrument(skip(transport, question), fields(question_len = question.len()))]
pub async fn exchange(transport: &dyn Transport, url: &str, question: String) -> Result<QueryResult, TriggerError> {
	let body = serde_json::to_string(&QueryPayload { question }).map_err(|error| TriggerError::TransportFailure(error.to_string()))?;
	let response = transport.post_json(url, body).await?;
	debug!(status = response.status, "Received response.");

	match ResponseClass::of(response.status) {
		ResponseClass::Success => {
			let body: Value = serde_json::from_str(&response.body).map_err(|error| TriggerError::TransportFailure(format!("Malformed response body: {}", error)))?;
			if body.is_null() {
				return Err(TriggerError::TransportFailure("Response body is `null`".to_owned()));
			}
			Ok(QueryResult::from_body(body))
		}
		ResponseClass::ClientError | ResponseClass::ServerError | ResponseClass::Other => Err(TriggerError::ServerRejected {
			status: response.status,
			status_text: response.status_text,
		}),
	}
}
