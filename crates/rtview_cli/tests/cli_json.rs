#![allow(missing_docs)]

use std::process::{Command, Output};

use rtview_testkit::fixture_path;
use serde_json::Value;

#[test]
fn info_json_describes_snapshot() {
	let json = run_json(&["info", &fixture("named_linux64.json"), "--json"]);

	assert_eq!(json["compression"], "none");
	assert_eq!(json["triple"], "x86_64-unknown-linux-gnu");
	assert_eq!(json["pointer_size"], 8);
	assert_eq!(json["text_prefix"], 0);
	assert_eq!(json["fields"], "named");
	assert_eq!(json["roots"][0]["kind"], "text");
	assert_eq!(json["roots"][1]["kind"], "sequence");
	assert_eq!(json["roots"][5]["kind"], "unrecognized");
	assert!(json["types"].as_array().is_some_and(|types| types.iter().any(|name| name == "Array(String*)")));
}

#[test]
fn info_reports_msvc_prefix() {
	let json = run_json(&["info", &fixture("msvc_prefix.json"), "--json"]);
	assert_eq!(json["text_prefix"], 4);
}

#[test]
fn child_json_resolves_bracketed_and_bare_keys() {
	let path = fixture("named_linux64.json");
	let bracketed = run_json(&["child", &path, "--root", "numbers", "--key", "[1]", "--json"]);
	let bare = run_json(&["child", &path, "--root", "numbers", "--key", "1", "--json"]);

	assert_eq!(bracketed["index"], 1);
	assert_eq!(bracketed["count"], 3);
	assert_eq!(bracketed["child"]["summary"], "20");
	assert_eq!(bracketed["child"]["address"], "0x0000000000021004");
	assert_eq!(bracketed["child"], bare["child"]);
}

#[test]
fn child_rejects_bad_keys_and_ranges() {
	let path = fixture("named_linux64.json");

	let output = run(&["child", &path, "--root", "numbers", "--key", "[x]"]);
	assert!(!output.status.success());
	assert!(stderr(&output).contains("unrecognized child key: [x]"));

	let output = run(&["child", &path, "--root", "numbers", "--key", "[3]"]);
	assert!(!output.status.success());
	assert!(stderr(&output).contains("index 3 out of range (count=3)"));

	let output = run(&["child", &path, "--root", "greeting", "--key", "0"]);
	assert!(!output.status.success());
	assert!(stderr(&output).contains("is not a sequence value"));
}

#[test]
fn positional_flag_decodes_named_snapshot_by_position() {
	let json = run_json(&["print", &fixture("named_linux64.json"), "--root", "greeting", "--positional", "--json"]);
	assert_eq!(json["fields"], "positional");
	assert_eq!(json["values"][0]["summary"], "\"hi\\xFF!\"");
}

#[test]
fn patterns_lldb_json_lists_commands() {
	let json = run_json(&["patterns", "--json"]);
	assert_eq!(json["host"], "lldb");
	assert_eq!(json["category"], "rtview");
	let commands = json["commands"].as_array().expect("commands");
	assert_eq!(commands.len(), 3);
	assert_eq!(commands[2], "type category enable rtview");
	assert_eq!(json["printers"][0]["provider"], "synthetic");
}

#[test]
fn patterns_gdb_text_output() {
	let output = run(&["patterns", "--host", "gdb", "--category", "Runtime"]);
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert_eq!(
		stdout.lines().collect::<Vec<_>>(),
		vec!["enable pretty-printer global Runtime;String", "enable pretty-printer global Runtime;Array"]
	);
}

fn fixture(name: &str) -> String {
	fixture_path(name).display().to_string()
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_rtview")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(output.status.success(), "command failed: {}", stderr(&output));
	serde_json::from_slice(&output.stdout).expect("valid json")
}

fn stderr(output: &Output) -> String {
	String::from_utf8_lossy(&output.stderr).into_owned()
}
