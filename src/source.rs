use crate::{config::ElementRef, error::TriggerError};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

/// Determines the question to send: the configured source's current value, or else the triggering element's.
///
/// # Errors
///
/// [`TriggerError::ConfigurationMissing`] if the source doesn't resolve or has no `value`,
/// in which case no request must be sent.
pub fn extract_value(document: &Document, source: Option<&ElementRef>, trigger: &Element) -> Result<String, TriggerError> {
	let element = match source {
		None => trigger.clone(),
		Some(source) => resolve_source(document, source)?.ok_or_else(|| TriggerError::ConfigurationMissing(format!("Source {:?} not found", source)))?,
	};
	value_of(&element).ok_or_else(|| TriggerError::ConfigurationMissing(format!("<{}> has no value", element.tag_name().to_ascii_lowercase())))
}

fn resolve_source(document: &Document, source: &ElementRef) -> Result<Option<Element>, TriggerError> {
	Ok(match source {
		ElementRef::Id(id) => document.get_element_by_id(id),
		ElementRef::Class(class) => document.get_elements_by_class_name(class).item(0),
		ElementRef::Selector(selector) => document
			.query_selector(selector)
			.map_err(|_| TriggerError::ConfigurationMissing(format!("Invalid source selector {:?}", selector)))?,
	})
}

/// The current `value` of form controls. Other elements don't have one.
#[must_use]
pub fn value_of(element: &Element) -> Option<String> {
	if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
		Some(input.value())
	} else if let Some(text_area) = element.dyn_ref::<HtmlTextAreaElement>() {
		Some(text_area.value())
	} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
		Some(select.value())
	} else {
		element.dyn_ref::<HtmlButtonElement>().map(HtmlButtonElement::value)
	}
}
