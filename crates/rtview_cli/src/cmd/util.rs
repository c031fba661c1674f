use rtview::view::{DecodeOptions, FieldMode, Result, Snapshot};
use serde::Serialize;

/// Print a JSON payload to stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload)?;
	println!("{text}");
	Ok(())
}

/// Render an address as fixed-width hex.
pub(crate) fn ptr_hex(address: u64) -> String {
	format!("0x{address:016x}")
}

/// Decode options for `snapshot`, with command-line overrides applied.
pub(crate) fn decode_options(snapshot: &Snapshot, positional: bool, max_children: Option<usize>, summary: bool) -> DecodeOptions {
	let mut options = if summary {
		DecodeOptions {
			fields: snapshot.fields(),
			..DecodeOptions::for_summary()
		}
	} else {
		snapshot.decode_options()
	};
	if positional {
		options.fields = FieldMode::Positional;
	}
	if let Some(max_children) = max_children {
		options.max_children = max_children;
	}
	options
}
