use std::path::PathBuf;

use rtview::view::{Snapshot, TypeMatcher};

use crate::cmd::util::{emit_json, ptr_hex};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print target facts, captured regions, declared types, and roots.
pub fn run(args: Args) -> rtview::view::Result<()> {
	let Args { path, json } = args;

	let snapshot = Snapshot::open(&path)?;
	let matcher = TypeMatcher::default();
	let target = snapshot.target();

	let roots: Vec<RootJson> = snapshot
		.roots()
		.iter()
		.map(|root| RootJson {
			label: root.label.to_string(),
			type_name: root.type_name.to_string(),
			address: ptr_hex(root.address),
			kind: matcher.classify(&root.type_name).as_str(),
		})
		.collect();

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			compression: snapshot.compression().as_str(),
			triple: target.triple.to_string(),
			pointer_size: target.pointer_size,
			endianness: target.endianness.as_str(),
			text_prefix: target.text_prefix_width(),
			fields: snapshot.fields().as_str(),
			regions: snapshot
				.memory()
				.regions()
				.iter()
				.map(|region| RegionJson {
					start: ptr_hex(region.start),
					end: ptr_hex(region.end()),
					len: region.bytes.len(),
				})
				.collect(),
			mapped_bytes: snapshot.memory().mapped_bytes(),
			types: snapshot.types().names().map(str::to_owned).collect(),
			roots,
		};
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("compression: {}", snapshot.compression().as_str());
	println!("triple: {}", target.triple);
	println!("pointer_size: {}", target.pointer_size);
	println!("endianness: {}", target.endianness.as_str());
	println!("text_prefix: {}", target.text_prefix_width());
	println!("fields: {}", snapshot.fields().as_str());
	println!("regions: {}", snapshot.memory().regions().len());
	println!("mapped_bytes: {}", snapshot.memory().mapped_bytes());
	println!("types: {}", snapshot.types().len());
	println!("roots: {}", roots.len());
	println!("label\ttype\taddress\tkind");
	for root in &roots {
		println!("{}\t{}\t{}\t{}", root.label, root.type_name, root.address, root.kind);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	triple: String,
	pointer_size: usize,
	endianness: &'static str,
	text_prefix: u64,
	fields: &'static str,
	regions: Vec<RegionJson>,
	mapped_bytes: usize,
	types: Vec<String>,
	roots: Vec<RootJson>,
}

#[derive(serde::Serialize)]
struct RegionJson {
	start: String,
	end: String,
	len: usize,
}

#[derive(serde::Serialize)]
struct RootJson {
	label: String,
	#[serde(rename = "type")]
	type_name: String,
	address: String,
	kind: &'static str,
}
