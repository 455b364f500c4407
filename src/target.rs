use crate::{config::ElementRef, error::TriggerError};
use core::str::FromStr;
use tracing::{instrument, trace, warn};
use web_sys::{Document, Element};

/// How a result is written into a target's [***innerHTML***](https://developer.mozilla.org/en-US/docs/Web/API/Element/innerHTML).
///
/// # Trust boundary
///
/// All modes write **markup**. Content is not sanitized, so whoever controls the prediction endpoint
/// can inject arbitrary HTML (including scripts) into the page. Only point bindings at endpoints you trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetAction {
	Append,
	Prepend,
	#[default]
	Replace,
}

impl FromStr for TargetAction {
	type Err = TriggerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			action if action.eq_ignore_ascii_case("append") => Ok(Self::Append),
			action if action.eq_ignore_ascii_case("prepend") => Ok(Self::Prepend),
			action if action.eq_ignore_ascii_case("replace") => Ok(Self::Replace),
			other => Err(TriggerError::InvalidConfiguration(format!("Unknown target action {:?}. Expected append, prepend or replace.", other))),
		}
	}
}

impl TargetAction {
	/// The markup a target ends up with.
	#[must_use]
	pub fn compose(self, existing: &str, content: &str) -> String {
		match self {
			Self::Append => [existing, content].concat(),
			Self::Prepend => [content, existing].concat(),
			Self::Replace => content.to_owned(),
		}
	}
}

/// Appends `extra` to an inline style, separated by `;` where needed.
#[must_use]
pub fn merge_style(existing: Option<&str>, extra: &str) -> String {
	match existing.map(str::trim_end) {
		None | Some("") => extra.to_owned(),
		Some(existing) if existing.ends_with(';') => [existing, extra].concat(),
		Some(existing) => [existing, ";", extra].concat(),
	}
}

/// Resolves targets before anything is written, so a live class collection can't shift under the update.
#[must_use]
pub fn resolve(document: &Document, targets: Option<&ElementRef>) -> Vec<Element> {
	match targets {
		None => Vec::new(),
		Some(ElementRef::Id(id)) => document.get_element_by_id(id).into_iter().collect(),
		Some(ElementRef::Class(class)) => {
			let collection = document.get_elements_by_class_name(class);
			(0..collection.length()).filter_map(|i| collection.item(i)).collect()
		}
		Some(ElementRef::Selector(selector)) => match document.query_selector(selector) {
			Ok(element) => element.into_iter().collect(),
			Err(error) => {
				warn!("Invalid target selector {:?}: {:?}", selector, error);
				Vec::new()
			}
		},
	}
}

/// Applies `style` (if any) and then `content` to each target.
///
/// # Errors
///
/// Iff the `style` attribute can't be written. Targets before the failing one stay updated.
#[instrument(skip(targets, content), fields(target_count = targets.len()))]
pub fn apply(targets: &[Element], style: Option<&str>, action: TargetAction, content: &str) -> Result<usize, TriggerError> {
	for target in targets {
		if let Some(style) = style {
			let merged = merge_style(target.get_attribute("style").as_deref(), style);
			target.set_attribute("style", &merged).map_err(|error| TriggerError::dom("Could not set target style", &error))?;
		}
		target.set_inner_html(&action.compose(&target.inner_html(), content));
		trace!(id = %target.id(), "Updated target.");
	}
	Ok(targets.len())
}
