//! Trailing-edge debouncing, one scheduler per binding.

use crate::error::TriggerError;
use core::convert::TryInto;
use tracing::trace;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

/// Where debounce timers come from.
pub trait Timers {
	type Handle;

	/// # Errors
	///
	/// Iff the timer can't be scheduled.
	fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<Self::Handle, TriggerError>;

	/// Clearing a timer that already fired must be harmless.
	fn clear_timeout(&self, handle: Self::Handle);
}

/// [***setTimeout***](https://developer.mozilla.org/en-US/docs/Web/API/setTimeout) on a [`Window`].
#[derive(Debug, Clone)]
pub struct WindowTimers {
	window: Window,
}

impl WindowTimers {
	#[must_use]
	pub fn new(window: Window) -> Self {
		Self { window }
	}
}

/// Keeps the callback alive until the timer is cleared or replaced.
#[derive(Debug)]
pub struct PendingTimeout {
	id: i32,
	_closure: Closure<dyn FnMut()>,
}

impl Timers for WindowTimers {
	type Handle = PendingTimeout;

	fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<PendingTimeout, TriggerError> {
		let closure = Closure::once(move || callback());
		let id = self
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), delay_ms.try_into().unwrap_or(i32::MAX))
			.map_err(|error| TriggerError::dom("Could not schedule debounce timer", &error))?;
		Ok(PendingTimeout { id, _closure: closure })
	}

	fn clear_timeout(&self, handle: PendingTimeout) {
		self.window.clear_timeout_with_handle(handle.id);
	}
}

/// Coalesces bursts of events into one call: only the last [`schedule`](`Debouncer::schedule`) within `delay_ms` fires.
///
/// Dropping the debouncer cancels whatever is still pending.
pub struct Debouncer<T: Timers> {
	timers: T,
	delay_ms: u32,
	pending: Option<T::Handle>,
}

impl<T: Timers> Debouncer<T> {
	#[must_use]
	pub fn new(timers: T, delay_ms: u32) -> Self {
		Self { timers, delay_ms, pending: None }
	}

	#[must_use]
	pub fn delay_ms(&self) -> u32 {
		self.delay_ms
	}

	/// Cancels the pending call, if any, and schedules `callback` in its place.
	///
	/// With a delay of 0, `callback` runs right away instead.
	///
	/// # Errors
	///
	/// Iff the timer can't be scheduled. The previously pending call stays cancelled.
	pub fn schedule(&mut self, callback: Box<dyn FnOnce()>) -> Result<(), TriggerError> {
		self.cancel();
		if self.delay_ms == 0 {
			callback();
		} else {
			self.pending = Some(self.timers.set_timeout(self.delay_ms, callback)?);
			trace!(delay_ms = self.delay_ms, "Scheduled.");
		}
		Ok(())
	}

	pub fn cancel(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.timers.clear_timeout(handle);
		}
	}
}

impl<T: Timers> Drop for Debouncer<T> {
	fn drop(&mut self) {
		self.cancel();
	}
}

#[cfg(test)]
mod tests {
	use super::{Debouncer, Timers};
	use crate::error::TriggerError;
	use std::{cell::RefCell, rc::Rc};

	#[derive(Default)]
	struct Clock {
		now: u64,
		next_id: u64,
		queue: Vec<(u64, u64, Box<dyn FnOnce()>)>,
	}

	#[derive(Clone, Default)]
	struct ManualTimers(Rc<RefCell<Clock>>);

	impl Timers for ManualTimers {
		type Handle = u64;

		fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<u64, TriggerError> {
			let mut clock = self.0.borrow_mut();
			let id = clock.next_id;
			clock.next_id += 1;
			let due = clock.now + u64::from(delay_ms);
			clock.queue.push((id, due, callback));
			Ok(id)
		}

		fn clear_timeout(&self, handle: u64) {
			self.0.borrow_mut().queue.retain(|&(id, _, _)| id != handle);
		}
	}

	impl ManualTimers {
		fn advance(&self, ms: u64) {
			let until = self.0.borrow().now + ms;
			loop {
				let next = {
					let mut clock = self.0.borrow_mut();
					let due_index = clock
						.queue
						.iter()
						.enumerate()
						.filter(|(_, entry)| entry.1 <= until)
						.min_by_key(|(_, entry)| (entry.1, entry.0))
						.map(|(i, _)| i);
					match due_index {
						Some(i) => {
							let (_, due, callback) = clock.queue.remove(i);
							clock.now = due;
							Some(callback)
						}
						None => {
							clock.now = until;
							None
						}
					}
				};
				match next {
					Some(callback) => callback(),
					None => break,
				}
			}
		}

		fn pending(&self) -> usize {
			self.0.borrow().queue.len()
		}
	}

	/// Simulates an input element: each event updates the field, the fired callback reads it.
	fn fire_event(debouncer: &mut Debouncer<ManualTimers>, field: &Rc<RefCell<String>>, value: &str, sent: &Rc<RefCell<Vec<String>>>) {
		*field.borrow_mut() = value.to_owned();
		let field = Rc::clone(field);
		let sent = Rc::clone(sent);
		debouncer.schedule(Box::new(move || sent.borrow_mut().push(field.borrow().clone()))).unwrap();
	}

	#[test]
	fn burst_fires_once_with_last_value() {
		let timers = ManualTimers::default();
		let mut debouncer = Debouncer::new(timers.clone(), 500);
		let field = Rc::new(RefCell::new(String::new()));
		let sent = Rc::new(RefCell::new(Vec::new()));

		for value in ["h", "he", "hel", "hell", "hello"] {
			fire_event(&mut debouncer, &field, value, &sent);
			timers.advance(100);
		}
		assert!(sent.borrow().is_empty());
		assert_eq!(timers.pending(), 1);

		timers.advance(399);
		assert!(sent.borrow().is_empty());
		timers.advance(1);
		assert_eq!(*sent.borrow(), ["hello"]);
		assert_eq!(timers.pending(), 0);
	}

	#[test]
	fn separated_events_fire_separately() {
		let timers = ManualTimers::default();
		let mut debouncer = Debouncer::new(timers.clone(), 500);
		let field = Rc::new(RefCell::new(String::new()));
		let sent = Rc::new(RefCell::new(Vec::new()));

		fire_event(&mut debouncer, &field, "first", &sent);
		timers.advance(501);
		fire_event(&mut debouncer, &field, "second", &sent);
		timers.advance(501);

		assert_eq!(*sent.borrow(), ["first", "second"]);
	}

	#[test]
	fn zero_delay_fires_immediately() {
		let timers = ManualTimers::default();
		let mut debouncer = Debouncer::new(timers.clone(), 0);
		let field = Rc::new(RefCell::new(String::new()));
		let sent = Rc::new(RefCell::new(Vec::new()));

		fire_event(&mut debouncer, &field, "click", &sent);
		assert_eq!(*sent.borrow(), ["click"]);
		fire_event(&mut debouncer, &field, "click again", &sent);
		assert_eq!(*sent.borrow(), ["click", "click again"]);
		assert_eq!(timers.pending(), 0);
	}

	#[test]
	fn independent_debouncers() {
		let timers = ManualTimers::default();
		let mut a = Debouncer::new(timers.clone(), 300);
		let mut b = Debouncer::new(timers.clone(), 300);
		let field_a = Rc::new(RefCell::new(String::new()));
		let field_b = Rc::new(RefCell::new(String::new()));
		let sent = Rc::new(RefCell::new(Vec::new()));

		fire_event(&mut a, &field_a, "a", &sent);
		timers.advance(100);
		fire_event(&mut b, &field_b, "b", &sent);
		timers.advance(250);
		assert_eq!(*sent.borrow(), ["a"]);
		timers.advance(50);
		assert_eq!(*sent.borrow(), ["a", "b"]);
	}

	#[test]
	fn drop_cancels_pending() {
		let timers = ManualTimers::default();
		let field = Rc::new(RefCell::new(String::new()));
		let sent = Rc::new(RefCell::new(Vec::new()));
		{
			let mut debouncer = Debouncer::new(timers.clone(), 500);
			fire_event(&mut debouncer, &field, "never sent", &sent);
			assert_eq!(timers.pending(), 1);
		}
		assert_eq!(timers.pending(), 0);
		timers.advance(1000);
		assert!(sent.borrow().is_empty());
	}
}
