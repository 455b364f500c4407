use crate::{
	config::TriggerConfig,
	debounce::{Debouncer, WindowTimers},
	error::{report, TriggerError},
	event::TriggerEvent,
	pipeline::Pipeline,
};
use std::{cell::RefCell, rc::Rc};
use tracing::{error, instrument, trace, trace_span};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Element;

/// One element's event listener, configuration and debounce slot.
///
/// Dropping a [`Binding`] removes its listener and cancels its pending request, if any.
/// Requests that are already in flight still complete.
pub struct Binding {
	event: TriggerEvent,
	listener: Closure<dyn FnMut(web_sys::Event)>,
	state: Rc<BindingState>,
}

struct BindingState {
	element: Element,
	config: Rc<TriggerConfig>,
	pipeline: Rc<Pipeline>,
	debouncer: RefCell<Debouncer<WindowTimers>>,
}

impl Binding {
	/// Attaches a listener for `event` to `element`.
	///
	/// # Errors
	///
	/// Iff the listener can't be added.
	#[instrument(skip(element, config, pipeline, timers), fields(tag = %element.tag_name(), chatflow_id = %config.chatflow_id))]
	pub fn new(element: Element, event: TriggerEvent, config: TriggerConfig, pipeline: Rc<Pipeline>, timers: WindowTimers) -> Result<Self, TriggerError> {
		let state = Rc::new(BindingState {
			debouncer: RefCell::new(Debouncer::new(timers, config.debounce_delay)),
			element,
			config: Rc::new(config),
			pipeline,
		});

		let weak_state = Rc::downgrade(&state);
		let listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
			let span = trace_span!("trigger_listener", event = %event.type_());
			let _enter = span.enter();
			match weak_state.upgrade() {
				Some(state) => state.on_event(),
				None => trace!("Event after unbind. Ignoring."),
			}
		}) as Box<dyn FnMut(web_sys::Event)>);

		state
			.element
			.add_event_listener_with_callback(event.name(), listener.as_ref().unchecked_ref())
			.map_err(|error| TriggerError::dom("Failed to add event listener", &error))?;
		trace!("Bound.");

		Ok(Self { event, listener, state })
	}

	#[must_use]
	pub fn element(&self) -> &Element {
		&self.state.element
	}

	#[must_use]
	pub fn event(&self) -> TriggerEvent {
		self.event
	}

	#[must_use]
	pub fn config(&self) -> &TriggerConfig {
		&self.state.config
	}
}

impl BindingState {
	fn on_event(self: &Rc<Self>) {
		let weak_state = Rc::downgrade(self);
		let fire = Box::new(move || {
			if let Some(state) = weak_state.upgrade() {
				state.pipeline.spawn(&state.element, Rc::clone(&state.config));
			}
		});

		let scheduled = match self.debouncer.try_borrow_mut() {
			Ok(mut debouncer) => debouncer.schedule(fire),
			Err(_) => Err(TriggerError::Dom("Re-entrant trigger event".to_owned())),
		};
		if let Err(error) = scheduled {
			report(&error);
		}
	}
}

impl Drop for Binding {
	fn drop(&mut self) {
		if let Err(error) = self.state.element.remove_event_listener_with_callback(self.event.name(), self.listener.as_ref().unchecked_ref()) {
			error!("Failed to remove event listener {:?}: {:?}", self.event.name(), error);
		}
		if let Ok(mut debouncer) = self.state.debouncer.try_borrow_mut() {
			debouncer.cancel();
		}
		trace!(event = self.event.name(), "Unbound.");
	}
}
