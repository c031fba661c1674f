use rtview::view::{DEFAULT_CATEGORY, HostFlavor, NIL_TYPE_NAME, PrinterRegistry, SEQUENCE_TYPE_NAME, TEXT_TYPE_NAME, TypeMatcher};

use crate::cmd::util::emit_json;

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Host {
	Lldb,
	Gdb,
}

impl From<Host> for HostFlavor {
	fn from(host: Host) -> Self {
		match host {
			Host::Lldb => Self::Lldb,
			Host::Gdb => Self::Gdb,
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	#[arg(long, value_enum, default_value = "lldb")]
	pub host: Host,
	#[arg(long, default_value = DEFAULT_CATEGORY)]
	pub category: String,
	#[arg(long = "text-type", default_value = TEXT_TYPE_NAME)]
	pub text_type: String,
	#[arg(long = "sequence-type", default_value = SEQUENCE_TYPE_NAME)]
	pub sequence_type: String,
	#[arg(long = "nil-type", default_value = NIL_TYPE_NAME)]
	pub nil_type: String,
	#[arg(long)]
	pub json: bool,
}

/// Print the host commands that register the text and sequence printers.
pub fn run(args: Args) -> rtview::view::Result<()> {
	let Args {
		host,
		category,
		text_type,
		sequence_type,
		nil_type,
		json,
	} = args;

	let matcher = TypeMatcher::new(&text_type, &sequence_type, &nil_type);
	let mut registry = PrinterRegistry::new();
	let installed = registry.install(&category, &matcher, host.into())?;

	let printers: Vec<PrinterJson> = installed
		.printers()
		.iter()
		.map(|printer| PrinterJson {
			name: printer.name().to_owned(),
			kind: printer.kind().as_str(),
			provider: printer.provider().as_str(),
			pattern: printer.pattern().to_owned(),
		})
		.collect();
	let flavor = installed.flavor().as_str();

	if json {
		return emit_json(&PatternsJson {
			host: flavor,
			category,
			printers,
			commands: registry.commands(),
		});
	}

	for line in registry.commands() {
		println!("{line}");
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct PatternsJson {
	host: &'static str,
	category: String,
	printers: Vec<PrinterJson>,
	commands: Vec<String>,
}

#[derive(serde::Serialize)]
struct PrinterJson {
	name: String,
	kind: &'static str,
	provider: &'static str,
	pattern: String,
}
