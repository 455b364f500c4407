//! Wires HTML elements to a remote prediction API.
//!
//! On `input`, `change` or `click`, a bound element's value (or that of a configured source element) is `POST`ed
//! as `{"question": …}` to `<apiBase><chatflowId>`, and the answer is written into the configured target elements.
//!
//! Bindings are configured either declaratively through `data-tupp-*` attributes on elements with the marker class
//! ([`TuppTrigger::init`]), or with explicit [`ComponentParams`] ([`TuppTrigger::bind_component`]).
//! Both feed the same [`Pipeline`](`pipeline::Pipeline`).
//!
//! Responses are written as **unsanitized markup**. See [`TargetAction`].

#![doc(html_root_url = "https://docs.rs/tupp-trigger/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod config;
pub mod debounce;
pub mod error;
pub mod event;
pub mod js;
pub mod pipeline;
pub mod query;
pub mod settings;
pub mod source;
pub mod target;

mod binding;
mod registry;

pub use binding::Binding;
pub use config::{ComponentParams, ConfigSource, DataAttributes, ElementRef, TriggerConfig};
pub use error::TriggerError;
pub use event::{ElementKind, TriggerEvent};
pub use query::{FetchTransport, HttpResponse, QueryResult, Transport};
pub use registry::TuppTrigger;
pub use settings::Settings;
pub use target::TargetAction;
