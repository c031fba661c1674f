#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;
mod logging;

#[derive(Parser)]
#[command(name = "rtview", about = "Inspect managed-runtime text and sequence values in memory snapshots")]
struct Cli {
	/// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Summarize a snapshot: target, regions, types, and roots.
	Info(cmd::info::Args),
	/// Render snapshot roots through the text and sequence decoders.
	Print(cmd::print::Args),
	/// Resolve one sequence child by display key.
	Child(cmd::child::Args),
	/// Print debugger registration commands.
	Patterns(cmd::patterns::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> rtview::view::Result<()> {
	let cli = Cli::parse();
	logging::init(cli.verbose);

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Print(args) => cmd::print::run(args),
		Commands::Child(args) => cmd::child::run(args),
		Commands::Patterns(args) => cmd::patterns::run(args),
	}
}
