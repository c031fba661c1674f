use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use rtview_testkit::{fixture_path as shared_fixture_path, target_dir as workspace_target_dir};

static RTVIEW_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> PathBuf {
	shared_fixture_path(name)
}

pub(crate) fn run_rtview(args: &[&str]) -> Output {
	Command::new(rtview_bin()).args(args).output().expect("rtview command executes")
}

pub(crate) fn run_rtview_json(args: &[&str]) -> serde_json::Value {
	let output = run_rtview(args);
	assert!(
		output.status.success(),
		"rtview command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn rtview_bin() -> &'static PathBuf {
	RTVIEW_BIN.get_or_init(resolve_rtview_bin)
}

fn resolve_rtview_bin() -> PathBuf {
	if let Some(path) = option_env!("CARGO_BIN_EXE_rtview") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "rtview.exe" } else { "rtview" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "rtview"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build rtview binary at {}", bin.display());

	bin
}
