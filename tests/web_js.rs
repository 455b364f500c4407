#![cfg(target_arch = "wasm32")]

use tupp_trigger::js::GlobalTrigger;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

use web_stub_::{init_logging, Fixture};

// The instance is per thread, so the whole lifecycle runs in one test.
#[wasm_bindgen_test]
fn global_lifecycle() {
	init_logging();
	let fixture = Fixture::new(
		r#"<input id="js-text-1" class="js-marker" data-tupp-chatflow-id="flow">
		<button id="js-button-1" class="js-marker" data-tupp-chatflow-id="flow">Ask</button>
		<textarea id="js-textarea-1"></textarea>
		<div id="js-answer-1"></div>"#,
	);

	// Nothing is created before the first successful initialization.
	assert!(GlobalTrigger::init_with_settings(r#"{"markerClass": ""}"#).is_err());
	assert!(GlobalTrigger::init_with_settings(r#"{"unknown": 1}"#).is_err());
	assert_eq!(GlobalTrigger::unbind_all(), 0);
	assert!(!GlobalTrigger::unbind(&fixture.get("js-text-1")));

	assert_eq!(GlobalTrigger::init_with_settings(r#"{"markerClass": "js-marker", "debounceDelay": 50}"#).unwrap(), 2);
	assert_eq!(GlobalTrigger::init().unwrap(), 0);

	// Later settings are ignored, including their marker class.
	assert_eq!(GlobalTrigger::init_with_settings(r#"{"markerClass": "other-marker"}"#).unwrap(), 0);

	let textarea = fixture.get("js-textarea-1");
	assert!(GlobalTrigger::bind_component(&textarea, "flow".to_owned(), None, Some("#js-answer-1".to_owned()), Some("insert".to_owned()), None).is_err());
	assert!(!GlobalTrigger::unbind(&textarea));

	assert!(GlobalTrigger::bind_component(&textarea, "flow".to_owned(), None, Some("#js-answer-1".to_owned()), Some("Append".to_owned()), Some(20)).unwrap());
	assert!(!GlobalTrigger::bind_component(&textarea, "flow".to_owned(), None, None, None, None).unwrap());
	assert!(GlobalTrigger::bind_component(&fixture.get("js-answer-1"), "flow".to_owned(), None, None, None, None).is_err());

	assert!(GlobalTrigger::unbind(&textarea));
	assert!(!GlobalTrigger::unbind(&textarea));

	assert_eq!(GlobalTrigger::unbind_all(), 2);
	assert_eq!(GlobalTrigger::unbind_all(), 0);

	// Scanning again binds the same elements anew.
	assert_eq!(GlobalTrigger::init().unwrap(), 2);
	assert_eq!(GlobalTrigger::unbind_all(), 2);
}
