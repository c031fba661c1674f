use std::path::PathBuf;

use rtview::view::{SequenceView, Snapshot, TypeMatcher, ValueKind, ViewError};
use tracing::debug;

use crate::cmd::print::{PrintOptions, ValueNode, build_node, print_node};
use crate::cmd::util::{decode_options, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub root: String,
	/// Child display key, `[N]` or `N`.
	#[arg(long)]
	pub key: String,
	#[arg(long)]
	pub positional: bool,
	#[arg(long)]
	pub json: bool,
}

/// Map a display key back to an index and render that child of a sequence root.
pub fn run(args: Args) -> rtview::view::Result<()> {
	let Args {
		path,
		root,
		key,
		positional,
		json,
	} = args;

	let snapshot = Snapshot::open(&path)?;
	let inspector = snapshot.inspector(decode_options(&snapshot, positional, None, false));
	let matcher = TypeMatcher::default();

	let value = snapshot.root(&root)?;
	if matcher.classify_type(&value.ty) != ValueKind::Sequence {
		return Err(ViewError::UnexpectedKind {
			expected: ValueKind::Sequence.as_str(),
			type_name: value.type_name().to_owned(),
		});
	}

	let view = SequenceView::new(&inspector, &value)?;
	let index = view.index_of(&key).ok_or_else(|| ViewError::UnrecognizedKey { key: key.clone() })?;
	debug!(root = %root, key = %key, index, "resolved child key");
	let child = view.child_at(index)?;
	let node = build_node(&inspector, &matcher, &child, PrintOptions::default(), 0);

	if json {
		return emit_json(&ChildJson {
			root,
			key,
			index,
			count: view.count(),
			child: node,
		});
	}

	println!("root: {root}");
	println!("key: {key}");
	println!("index: {index}");
	println!("count: {}", view.count());
	print_node(&node, 0);
	Ok(())
}

#[derive(serde::Serialize)]
struct ChildJson {
	root: String,
	key: String,
	index: usize,
	count: usize,
	child: ValueNode,
}
