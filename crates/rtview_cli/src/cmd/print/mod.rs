use std::path::PathBuf;

use rtview::view::{Inspector, Rendering, Snapshot, TypeKind, TypeMatcher, Value, ViewError, inspect};
use tracing::debug;

use crate::cmd::util::{decode_options, emit_json, ptr_hex};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub root: Option<String>,
	#[arg(long = "max-children")]
	pub max_children: Option<usize>,
	#[arg(long)]
	pub depth: Option<u32>,
	#[arg(long)]
	pub positional: bool,
	#[arg(long)]
	pub summary: bool,
	#[arg(long)]
	pub json: bool,
}

/// Output truncation limits for rendered values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of children printed per sequence.
	pub max_items: usize,
	/// Maximum number of Unicode scalar values printed for text.
	pub max_text_len: usize,
	/// Maximum nesting depth expanded below a root.
	pub max_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_items: 16,
			max_text_len: 200,
			max_depth: 4,
		}
	}
}

impl PrintOptions {
	/// Preset for one-line hover summaries: no expansion.
	pub fn for_summary() -> Self {
		Self {
			max_items: 0,
			max_text_len: 80,
			max_depth: 0,
		}
	}
}

/// Render one root (or all roots) of a snapshot.
pub fn run(args: Args) -> rtview::view::Result<()> {
	let Args {
		path,
		root,
		max_children,
		depth,
		positional,
		summary,
		json,
	} = args;

	let snapshot = Snapshot::open(&path)?;
	let inspector = snapshot.inspector(decode_options(&snapshot, positional, max_children, summary));
	let matcher = TypeMatcher::default();
	let mut options = if summary { PrintOptions::for_summary() } else { PrintOptions::default() };
	if let Some(depth) = depth {
		options.max_depth = depth;
	}

	let values = match root {
		Some(label) => vec![snapshot.root(&label)?],
		None => snapshot
			.roots()
			.iter()
			.map(|root| snapshot.root_value(root))
			.collect::<rtview::view::Result<Vec<_>>>()?,
	};

	debug!(roots = values.len(), fields = inspector.fields().mode().as_str(), "rendering roots");
	let nodes: Vec<ValueNode> = values.iter().map(|value| build_node(&inspector, &matcher, value, options, 0)).collect();

	if json {
		return emit_json(&PrintJson {
			path: path.display().to_string(),
			fields: inspector.fields().mode().as_str(),
			values: nodes,
		});
	}

	for node in &nodes {
		print_node(node, 0);
	}
	Ok(())
}

/// Rendered value tree shared by text and JSON output.
#[derive(Debug, serde::Serialize)]
pub struct ValueNode {
	/// Display label.
	pub label: String,
	/// Declared type name.
	#[serde(rename = "type")]
	pub type_name: String,
	/// Load address.
	pub address: String,
	/// Decoding strategy.
	pub kind: &'static str,
	/// Host display hint.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hint: Option<&'static str>,
	/// One-line summary.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
	/// Sequence child count.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub count: Option<usize>,
	/// Whether the child count was clamped while decoding.
	#[serde(skip_serializing_if = "std::ops::Not::not")]
	pub truncated: bool,
	/// Decoder error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Expanded children.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<ValueNode>,
	/// Children left unexpanded by print limits.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub more: Option<usize>,
}

impl ValueNode {
	fn new(value: &Value) -> Self {
		Self {
			label: value.label.to_string(),
			type_name: value.type_name().to_owned(),
			address: ptr_hex(value.address),
			kind: "unrecognized",
			hint: None,
			summary: None,
			count: None,
			truncated: false,
			error: None,
			children: Vec::new(),
			more: None,
		}
	}
}

/// Classify and decode `value`, expanding sequence children up to the print limits.
pub fn build_node(inspector: &Inspector<'_>, matcher: &TypeMatcher, value: &Value, options: PrintOptions, depth: u32) -> ValueNode {
	let mut node = ValueNode::new(value);
	let rendering = inspect(inspector, matcher, value);
	node.kind = rendering.kind().as_str();
	node.hint = rendering.hint().map(|hint| hint.as_str());

	match rendering {
		Rendering::Text(text) => {
			node.summary = Some(format!("\"{}\"", truncate(&text.text, options.max_text_len)));
		}
		Rendering::Sequence(view) => {
			node.summary = Some(view.summary().to_owned());
			node.count = Some(view.count());
			node.truncated = view.truncated();

			let shown = if depth < options.max_depth { view.count().min(options.max_items) } else { 0 };
			for index in 0..shown {
				let child = match view.child_at(index) {
					Ok(child) => build_node(inspector, matcher, &child, options, depth + 1),
					Err(err) => error_node(&format!("[{index}]"), &err),
				};
				node.children.push(child);
			}
			if view.count() > shown {
				node.more = Some(view.count() - shown);
			}
		}
		Rendering::Fallback { reason, .. } => node.error = Some(reason),
		Rendering::Unclaimed => match scalar_summary(inspector, value) {
			Ok(summary) => node.summary = summary,
			Err(err) => node.error = Some(err.to_string()),
		},
	}

	node
}

fn scalar_summary(inspector: &Inspector<'_>, value: &Value) -> rtview::view::Result<Option<String>> {
	match value.ty.kind {
		TypeKind::Scalar { .. } => Ok(Some(inspector.read_signed(value)?.to_string())),
		TypeKind::Pointer { .. } => Ok(Some(ptr_hex(inspector.read_pointer(value)?))),
		_ => Ok(None),
	}
}

fn error_node(label: &str, err: &ViewError) -> ValueNode {
	ValueNode {
		label: label.to_owned(),
		type_name: String::new(),
		address: String::new(),
		kind: "unrecognized",
		hint: None,
		summary: None,
		count: None,
		truncated: false,
		error: Some(err.to_string()),
		children: Vec::new(),
		more: None,
	}
}

/// Print one rendered value tree.
pub fn print_node(node: &ValueNode, indent: usize) {
	let pad = " ".repeat(indent);
	let rhs = match (&node.error, &node.summary) {
		(Some(err), _) => format!("<error: {err}>"),
		(None, Some(summary)) => match node.count {
			Some(count) if node.truncated => format!("{summary} [{count}+]"),
			Some(count) => format!("{summary} [{count}]"),
			None => summary.clone(),
		},
		(None, None) => format!("@{}", node.address),
	};
	if node.type_name.is_empty() {
		println!("{pad}{}: {rhs}", node.label);
	} else {
		println!("{pad}{}: {} = {rhs}", node.label, node.type_name);
	}

	for child in &node.children {
		print_node(child, indent + 2);
	}
	if let Some(more) = node.more {
		println!("{pad}  ... {more} more");
	}
}

/// Truncate to `max` Unicode scalar values, marking the cut with `...`.
pub(crate) fn truncate(text: &str, max: usize) -> String {
	match text.char_indices().nth(max) {
		Some((cut, _)) => format!("{}...", &text[..cut]),
		None => text.to_owned(),
	}
}

#[derive(serde::Serialize)]
struct PrintJson {
	path: String,
	fields: &'static str,
	values: Vec<ValueNode>,
}

#[cfg(test)]
mod tests;
