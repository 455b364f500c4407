//! Which DOM event a trigger element listens to.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

/// The element kinds that can trigger a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
	Select,
	Button,
	SubmitInput,
	/// Any `<input>` that isn't `type="submit"`.
	Input,
	TextArea,
}

/// The DOM event type a binding listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerEvent {
	Change,
	Click,
	Input,
}

impl ElementKind {
	/// Classifies an element by its tag name and, for `<input>`, its `type`.
	///
	/// Returns [`None`] for element kinds that aren't supported.
	#[must_use]
	pub fn classify(tag_name: &str, input_type: Option<&str>) -> Option<Self> {
		if tag_name.eq_ignore_ascii_case("select") {
			Some(Self::Select)
		} else if tag_name.eq_ignore_ascii_case("button") {
			Some(Self::Button)
		} else if tag_name.eq_ignore_ascii_case("input") {
			match input_type {
				Some(input_type) if input_type.eq_ignore_ascii_case("submit") => Some(Self::SubmitInput),
				_ => Some(Self::Input),
			}
		} else if tag_name.eq_ignore_ascii_case("textarea") {
			Some(Self::TextArea)
		} else {
			None
		}
	}

	#[must_use]
	pub fn of(element: &Element) -> Option<Self> {
		let input_type = element.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::type_);
		Self::classify(&element.tag_name(), input_type.as_deref())
	}

	#[must_use]
	pub fn trigger_event(self) -> TriggerEvent {
		match self {
			Self::Select => TriggerEvent::Change,
			Self::Button | Self::SubmitInput => TriggerEvent::Click,
			Self::Input | Self::TextArea => TriggerEvent::Input,
		}
	}

	/// Immediate elements fire without debounce delay.
	#[must_use]
	pub fn is_immediate(self) -> bool {
		matches!(self, Self::Button | Self::SubmitInput)
	}

	/// Whether `data-tupp-debounce-delay` is honoured on this kind of element.
	#[must_use]
	pub fn accepts_debounce_delay(self) -> bool {
		matches!(self, Self::Input | Self::TextArea | Self::Select)
	}
}

impl TriggerEvent {
	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Self::Change => "change",
			Self::Click => "click",
			Self::Input => "input",
		}
	}
}
