use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

static INIT_GUARD: OnceLock<()> = OnceLock::new();

/// Install the stderr log subscriber. `RUST_LOG` overrides `verbose`.
pub(crate) fn init(verbose: u8) {
	if INIT_GUARD.set(()).is_err() {
		return;
	}

	let fallback = match verbose {
		0 => DEFAULT_FILTER,
		1 => "rtview=debug",
		_ => "rtview=trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

	// stdout carries command output
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.try_init();
}
