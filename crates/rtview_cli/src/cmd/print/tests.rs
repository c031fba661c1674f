use rtview::view::{Snapshot, TypeMatcher};

use super::{PrintOptions, build_node, truncate};
use crate::cmd::test_support::{fixture_path, run_rtview, run_rtview_json};

fn named_snapshot() -> Snapshot {
	Snapshot::open(fixture_path("named_linux64.json")).expect("fixture opens")
}

#[test]
fn truncate_counts_scalar_values() {
	assert_eq!(truncate("hello", 10), "hello");
	assert_eq!(truncate("hello", 3), "hel...");
	assert_eq!(truncate("h\u{e9}llo", 2), "h\u{e9}...");
	assert_eq!(truncate("", 0), "");
}

#[test]
fn sequence_node_expands_children_within_limits() {
	let snapshot = named_snapshot();
	let inspector = snapshot.inspector(snapshot.decode_options());
	let value = snapshot.root("numbers").expect("root");

	let options = PrintOptions {
		max_items: 2,
		..PrintOptions::default()
	};
	let node = build_node(&inspector, &TypeMatcher::default(), &value, options, 0);
	assert_eq!(node.kind, "sequence");
	assert_eq!(node.hint, Some("array"));
	assert_eq!(node.count, Some(3));
	assert_eq!(node.children.len(), 2);
	assert_eq!(node.children[1].label, "[1]");
	assert_eq!(node.children[1].summary.as_deref(), Some("20"));
	assert_eq!(node.more, Some(1));
}

#[test]
fn summary_preset_does_not_expand() {
	let snapshot = named_snapshot();
	let inspector = snapshot.inspector(snapshot.decode_options());
	let value = snapshot.root("words").expect("root");
	let node = build_node(&inspector, &TypeMatcher::default(), &value, PrintOptions::for_summary(), 0);
	assert!(node.children.is_empty());
	assert_eq!(node.more, Some(2));
	assert_eq!(node.summary.as_deref(), Some("Array(String*)"));
}

#[test]
fn text_node_is_quoted_and_truncated() {
	let snapshot = named_snapshot();
	let inspector = snapshot.inspector(snapshot.decode_options());
	let value = snapshot.root("greeting").expect("root");
	let options = PrintOptions {
		max_text_len: 2,
		..PrintOptions::default()
	};
	let node = build_node(&inspector, &TypeMatcher::default(), &value, options, 0);
	assert_eq!(node.kind, "text");
	assert_eq!(node.summary.as_deref(), Some("\"hi...\""));
}

#[test]
fn print_json_lists_every_root() {
	let path = fixture_path("named_linux64.json");
	let json = run_rtview_json(&["print", path.to_str().expect("utf8 path"), "--json"]);

	assert_eq!(json["fields"], "named");
	let values = json["values"].as_array().expect("values array");
	assert_eq!(values.len(), 6);
	assert_eq!(values[0]["label"], "greeting");
	assert_eq!(values[0]["summary"], "\"hi\\xFF!\"");
	assert_eq!(values[2]["children"][1]["summary"], "\"two\"");
	assert_eq!(values[5]["kind"], "unrecognized");
	assert_eq!(values[5]["summary"], "42");
}

#[test]
fn print_single_root_text_output() {
	let path = fixture_path("named_linux64.json");
	let output = run_rtview(&["print", path.to_str().expect("utf8 path"), "--root", "numbers"]);
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.starts_with("numbers: Array(Int32)* = Array(Int32) [3]"), "{stdout}");
	assert!(stdout.contains("  [2]: Int32 = 30"), "{stdout}");
}

#[test]
fn print_marks_fallbacks_without_failing() {
	let path = fixture_path("corrupt_values.json");
	let json = run_rtview_json(&["print", path.to_str().expect("utf8 path"), "--max-children", "2", "--json"]);
	let values = json["values"].as_array().expect("values array");

	assert!(values[0]["error"].as_str().is_some_and(|err| err.contains("malformed bytesize")));
	assert!(values[2]["error"].as_str().is_some_and(|err| err.contains("null pointer")));
	assert_eq!(values[3]["count"], 2);
	assert_eq!(values[3]["truncated"], true);
	assert_eq!(values[5]["summary"], "\"ok\"");
}

#[test]
fn unknown_root_exits_with_error() {
	let path = fixture_path("named_linux64.json");
	let output = run_rtview(&["print", path.to_str().expect("utf8 path"), "--root", "missing"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: root not found: missing"));
}
