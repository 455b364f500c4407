use crate::{
	binding::Binding,
	config::{ComponentParams, ConfigSource, DataAttributes},
	debounce::WindowTimers,
	error::TriggerError,
	event::ElementKind,
	pipeline::Pipeline,
	query::{FetchTransport, Transport},
	settings::Settings,
};
use hashbrown::HashMap;
use js_sys::WeakMap;
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Window};

/// Owns all bindings of one document.
///
/// Binding is idempotent: elements are tracked by identity, so scanning again (or binding an element a second time) never adds a second listener.
/// Dropping the [`TuppTrigger`] unbinds everything.
pub struct TuppTrigger {
	document: Document,
	timers: WindowTimers,
	pipeline: Rc<Pipeline>,
	keys: WeakMap,
	bindings: HashMap<u32, Binding>,
	next_key: u32,
}

impl TuppTrigger {
	/// Creates a registry for the global `window`'s document, talking to the endpoint through `fetch`.
	///
	/// # Errors
	///
	/// Iff there is no global `window` or it has no document.
	pub fn new(settings: Settings) -> Result<Self, TriggerError> {
		let window = web_sys::window().ok_or_else(|| TriggerError::Dom("No global `window`".to_owned()))?;
		let transport = Rc::new(FetchTransport::new(window.clone()));
		Self::with_transport(window, settings, transport)
	}

	/// Like [`new`](`TuppTrigger::new`), with a custom [`Transport`].
	///
	/// # Errors
	///
	/// Iff `window` has no document.
	pub fn with_transport(window: Window, settings: Settings, transport: Rc<dyn Transport>) -> Result<Self, TriggerError> {
		let document = window.document().ok_or_else(|| TriggerError::Dom("`window` has no document".to_owned()))?;
		Ok(Self {
			pipeline: Rc::new(Pipeline::new(document.clone(), settings, transport)),
			document,
			timers: WindowTimers::new(window),
			keys: WeakMap::new(),
			bindings: HashMap::new(),
			next_key: 0,
		})
	}

	#[must_use]
	pub fn settings(&self) -> &Settings {
		self.pipeline.settings()
	}

	#[must_use]
	pub fn pipeline(&self) -> &Rc<Pipeline> {
		&self.pipeline
	}

	/// Scans the document for elements with the marker class and binds those not bound yet.
	///
	/// Call this once the DOM is ready, and again after adding trigger elements.
	/// Returns the number of new bindings.
	#[instrument(skip(self), fields(marker_class = %self.settings().marker_class))]
	pub fn init(&mut self) -> usize {
		self.prune();

		let collection = self.document.get_elements_by_class_name(&self.settings().marker_class);
		let elements: Vec<Element> = (0..collection.length()).filter_map(|i| collection.item(i)).collect();

		let mut bound = 0;
		for element in &elements {
			match self.bind(element, &DataAttributes) {
				Ok(true) => bound += 1,
				Ok(false) => (),
				Err(TriggerError::InvalidConfiguration(reason)) => debug!("Skipping <{}>: {}", element.tag_name().to_ascii_lowercase(), reason),
				Err(error) => warn!("Not binding <{}> (id={:?}): {}", element.tag_name().to_ascii_lowercase(), element.id(), error),
			}
		}
		info!("Bound {} new trigger(s), {} total.", bound, self.bindings.len());
		bound
	}

	/// Binds `element` with configuration from `source`.
	///
	/// Returns `false` if the element was already bound, in which case nothing changes.
	///
	/// # Errors
	///
	/// - [`TriggerError::InvalidConfiguration`] if the element kind can't trigger requests,
	/// - [`TriggerError::ConfigurationMissing`] if `source` has no chatflow id,
	/// - [`TriggerError::Dom`] if the listener can't be attached.
	pub fn bind(&mut self, element: &Element, source: &dyn ConfigSource) -> Result<bool, TriggerError> {
		if self.is_bound(element) {
			return Ok(false);
		}

		let kind = ElementKind::of(element).ok_or_else(|| TriggerError::InvalidConfiguration(format!("<{}> elements can't trigger requests", element.tag_name().to_ascii_lowercase())))?;
		let config = source.resolve(element, kind, self.settings())?;
		let binding = Binding::new(element.clone(), kind.trigger_event(), config, Rc::clone(&self.pipeline), self.timers.clone())?;

		let key = self.next_key;
		self.next_key = self.next_key.wrapping_add(1);
		self.keys.set(element, &JsValue::from(key));
		self.bindings.insert(key, binding);
		Ok(true)
	}

	/// Component-style binding with explicit parameters.
	///
	/// # Errors
	///
	/// See [`bind`](`TuppTrigger::bind`).
	pub fn bind_component(&mut self, element: &Element, params: &ComponentParams) -> Result<bool, TriggerError> {
		self.bind(element, params)
	}

	#[must_use]
	pub fn is_bound(&self, element: &Element) -> bool {
		self.key_of(element).map_or(false, |key| self.bindings.contains_key(&key))
	}

	#[must_use]
	pub fn binding(&self, element: &Element) -> Option<&Binding> {
		self.key_of(element).and_then(|key| self.bindings.get(&key))
	}

	/// Removes the listener of `element` and cancels its pending request.
	///
	/// Returns `false` if the element wasn't bound.
	pub fn unbind(&mut self, element: &Element) -> bool {
		let binding = self.key_of(element).and_then(|key| self.bindings.remove(&key));
		self.keys.delete(element);
		binding.is_some()
	}

	/// Returns the number of removed bindings.
	pub fn unbind_all(&mut self) -> usize {
		let count = self.bindings.len();
		for (_, binding) in self.bindings.drain() {
			self.keys.delete(binding.element());
		}
		count
	}

	/// Unbinds elements that are no longer part of their document.
	pub fn prune(&mut self) -> usize {
		let stale: Vec<u32> = self.bindings.iter().filter(|(_, binding)| !binding.element().is_connected()).map(|(&key, _)| key).collect();
		for key in &stale {
			if let Some(binding) = self.bindings.remove(key) {
				self.keys.delete(binding.element());
			}
		}
		if !stale.is_empty() {
			debug!("Pruned {} disconnected trigger(s).", stale.len());
		}
		stale.len()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	fn key_of(&self, element: &Element) -> Option<u32> {
		self.keys.get(element).as_f64().map(|key| key as u32)
	}
}
