#![cfg(target_arch = "wasm32")]

use tupp_trigger::{ElementRef, Settings, TargetAction, TriggerConfig, TriggerError};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

use web_stub_::{init_logging, trigger, Fixture, StubTransport};

fn config(source: Option<ElementRef>, targets: Option<ElementRef>, action: TargetAction, style: Option<&str>) -> TriggerConfig {
	TriggerConfig {
		chatflow_id: "flow-id".to_owned(),
		source,
		targets,
		action,
		style: style.map(str::to_owned),
		debounce_delay: 0,
	}
}

#[wasm_bindgen_test]
async fn replace_with_style() {
	init_logging();
	let fixture = Fixture::new(r#"<input id="pl-question-1" value="hi"><div id="pl-answer-1" style="font-weight: bold">old</div>"#);
	let transport = StubTransport::ok(r#"{"text":"hello"}"#);
	let trigger = trigger(Settings::default(), &transport);

	let config = config(None, Some(ElementRef::Id("pl-answer-1".to_owned())), TargetAction::Replace, Some("color:red;"));
	assert_eq!(trigger.pipeline().run(&fixture.get("pl-question-1"), &config).await, Ok(1));

	let answer = fixture.get("pl-answer-1");
	assert_eq!(answer.inner_html(), "hello");
	let style = answer.get_attribute("style").unwrap();
	assert!(style.contains("font-weight: bold"), "{}", style);
	assert!(style.contains("color:red;"), "{}", style);

	assert_eq!(
		transport.requests(),
		[("https://tupp.io/api/v1/prediction/flow-id".to_owned(), r#"{"question":"hi"}"#.to_owned())]
	);
}

#[wasm_bindgen_test]
async fn update_modes_on_class_targets() {
	init_logging();
	for (action, expected) in [(TargetAction::Append, "AB"), (TargetAction::Prepend, "BA"), (TargetAction::Replace, "B")] {
		let fixture = Fixture::new(r#"<input id="pl-question-2" value="q"><p class="pl-answer-2">A</p><p class="pl-answer-2" style="margin: 0">A</p>"#);
		let transport = StubTransport::ok(r#"{"text":"B"}"#);
		let trigger = trigger(Settings::default(), &transport);

		let config = config(None, Some(ElementRef::Class("pl-answer-2".to_owned())), action, Some("color:red;"));
		assert_eq!(trigger.pipeline().run(&fixture.get("pl-question-2"), &config).await, Ok(2));

		let answers = web_stub_::document().get_elements_by_class_name("pl-answer-2");
		assert_eq!(answers.length(), 2);
		for i in 0..answers.length() {
			let answer = answers.item(i).unwrap();
			assert_eq!(answer.inner_html(), expected, "{:?}", action);
			assert!(answer.get_attribute("style").unwrap().contains("color:red;"), "{:?}", action);
		}
		assert!(answers.item(1).unwrap().get_attribute("style").unwrap().contains("margin: 0"));
	}
}

#[wasm_bindgen_test]
async fn structured_result_is_serialized() {
	init_logging();
	let fixture = Fixture::new(r#"<textarea id="pl-question-3">q</textarea><div id="pl-answer-3"></div>"#);
	let transport = StubTransport::ok(r#"{"foo":1}"#);
	let trigger = trigger(Settings::default(), &transport);

	let config = config(None, Some(ElementRef::Id("pl-answer-3".to_owned())), TargetAction::Replace, None);
	assert_eq!(trigger.pipeline().run(&fixture.get("pl-question-3"), &config).await, Ok(1));
	assert_eq!(fixture.get("pl-answer-3").inner_html(), r#"{"foo":1}"#);
	assert_eq!(transport.questions(), ["q"]);
}

#[wasm_bindgen_test]
async fn not_found_leaves_targets_alone() {
	init_logging();
	let fixture = Fixture::new(r#"<input id="pl-question-4" value="q"><div id="pl-answer-4" style="color: blue;">unchanged</div>"#);
	let transport = StubTransport::answering(404, "Not Found", "");
	let trigger = trigger(Settings::default(), &transport);

	let config = config(None, Some(ElementRef::Id("pl-answer-4".to_owned())), TargetAction::Replace, Some("color:red;"));
	let result = trigger.pipeline().run(&fixture.get("pl-question-4"), &config).await;
	assert_eq!(
		result,
		Err(TriggerError::ServerRejected {
			status: 404,
			status_text: "Not Found".to_owned()
		})
	);

	let answer = fixture.get("pl-answer-4");
	assert_eq!(answer.inner_html(), "unchanged");
	assert_eq!(answer.get_attribute("style").as_deref(), Some("color: blue;"));
	assert_eq!(transport.requests().len(), 1);
}

#[wasm_bindgen_test]
async fn unresolvable_source_sends_nothing() {
	init_logging();
	let fixture = Fixture::new(r#"<button id="pl-trigger-5">Ask</button><div id="pl-answer-5">unchanged</div>"#);
	let transport = StubTransport::ok(r#"{"text":"never"}"#);
	let trigger = trigger(Settings::default(), &transport);

	for source in [
		ElementRef::Id("pl-missing-5".to_owned()),
		ElementRef::Class("pl-missing-5".to_owned()),
		ElementRef::Selector("#pl-missing-5".to_owned()),
		ElementRef::Id("pl-answer-5".to_owned()), // Exists, but has no value.
	] {
		let config = config(Some(source.clone()), Some(ElementRef::Id("pl-answer-5".to_owned())), TargetAction::Replace, None);
		let result = trigger.pipeline().run(&fixture.get("pl-trigger-5"), &config).await;
		assert!(matches!(result, Err(TriggerError::ConfigurationMissing(_))), "{:?}: {:?}", source, result);
	}

	assert!(transport.requests().is_empty());
	assert_eq!(fixture.get("pl-answer-5").inner_html(), "unchanged");
}

#[wasm_bindgen_test]
async fn source_by_class_and_selector() {
	init_logging();
	let fixture = Fixture::new(r#"<input class="pl-source-6" value="first"><input class="pl-source-6" value="second"><button id="pl-trigger-6">Ask</button>"#);
	let transport = StubTransport::ok(r#"{"text":"ok"}"#);
	let trigger = trigger(Settings::default(), &transport);
	let button = fixture.get("pl-trigger-6");

	let by_class = config(Some(ElementRef::Class("pl-source-6".to_owned())), None, TargetAction::Replace, None);
	assert_eq!(trigger.pipeline().run(&button, &by_class).await, Ok(0));

	let by_selector = config(Some(ElementRef::Selector(".pl-source-6:last-of-type".to_owned())), None, TargetAction::Replace, None);
	assert_eq!(trigger.pipeline().run(&button, &by_selector).await, Ok(0));

	assert_eq!(transport.questions(), ["first", "second"]);
}

#[wasm_bindgen_test]
async fn custom_api_base() {
	init_logging();
	let fixture = Fixture::new(r#"<input id="pl-question-7" value="q">"#);
	let transport = StubTransport::ok(r#"{"text":"ok"}"#);
	let trigger = trigger(Settings::default().with_api_base("http://localhost:3000/api/v1/prediction/"), &transport);

	let config = config(None, None, TargetAction::Replace, None);
	assert_eq!(trigger.pipeline().run(&fixture.get("pl-question-7"), &config).await, Ok(0));
	assert_eq!(transport.requests()[0].0, "http://localhost:3000/api/v1/prediction/flow-id");
}
