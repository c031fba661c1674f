use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::view::compression::{self, Compression};
use crate::view::{DecodeOptions, Endianness, FieldMode, Inspector, Region, Result, SparseMemory, Target, TypeSpec, TypeTable, Value, ViewError};

/// Named entry point into a snapshot, like a debugger variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
	/// Variable label.
	pub label: Box<str>,
	/// Declared type name.
	pub type_name: Box<str>,
	/// Address where the variable's value is stored.
	pub address: u64,
}

/// Captured inferior state: target facts, type descriptions, memory regions, and roots.
#[derive(Debug)]
pub struct Snapshot {
	compression: Compression,
	target: Target,
	fields: FieldMode,
	types: TypeTable,
	memory: SparseMemory,
	roots: Vec<Root>,
}

#[derive(Deserialize)]
struct SnapshotFile {
	target: TargetFile,
	#[serde(default)]
	fields: FieldMode,
	#[serde(default)]
	types: Vec<TypeSpec>,
	#[serde(default)]
	regions: Vec<RegionFile>,
	#[serde(default)]
	roots: Vec<RootFile>,
}

#[derive(Deserialize)]
struct TargetFile {
	triple: String,
	pointer_size: usize,
	#[serde(default = "little_endian")]
	endianness: Endianness,
}

#[derive(Deserialize)]
struct RegionFile {
	address: String,
	bytes: String,
}

#[derive(Deserialize)]
struct RootFile {
	label: String,
	#[serde(rename = "type")]
	type_name: String,
	address: String,
}

fn little_endian() -> Endianness {
	Endianness::Little
}

impl Snapshot {
	/// Read a snapshot file, inflating it first when zstd-compressed.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = std::fs::read(path)?;
		debug!(path = %path.display(), bytes = raw.len(), "read snapshot");
		Self::from_bytes(raw)
	}

	/// Parse snapshot bytes (plain or zstd-compressed JSON).
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		let (compression, json) = compression::decode_bytes(raw)?;
		let file: SnapshotFile = serde_json::from_slice(&json)?;

		let target = Target::new(&file.target.triple, file.target.pointer_size, file.target.endianness)?;
		let types = TypeTable::build(file.types)?;

		let mut regions = Vec::with_capacity(file.regions.len());
		for region in file.regions {
			regions.push(Region {
				start: parse_address(&region.address)?,
				bytes: parse_hex_bytes(&region.bytes)?,
			});
		}
		let memory = SparseMemory::new(regions)?;

		let mut roots = Vec::with_capacity(file.roots.len());
		for root in file.roots {
			roots.push(Root {
				label: root.label.into_boxed_str(),
				type_name: root.type_name.into_boxed_str(),
				address: parse_address(&root.address)?,
			});
		}

		debug!(
			compression = compression.as_str(),
			triple = %target.triple,
			types = types.len(),
			regions = memory.regions().len(),
			roots = roots.len(),
			"loaded snapshot"
		);

		Ok(Self {
			compression,
			target,
			fields: file.fields,
			types,
			memory,
			roots,
		})
	}

	/// Compression the snapshot was stored with.
	pub fn compression(&self) -> Compression {
		self.compression
	}

	/// Inferior target facts.
	pub fn target(&self) -> &Target {
		&self.target
	}

	/// Field discovery mode the capturing host supported.
	pub fn fields(&self) -> FieldMode {
		self.fields
	}

	/// Declared types.
	pub fn types(&self) -> &TypeTable {
		&self.types
	}

	/// Captured memory.
	pub fn memory(&self) -> &SparseMemory {
		&self.memory
	}

	/// Roots in file order.
	pub fn roots(&self) -> &[Root] {
		&self.roots
	}

	/// Value view for the root called `label`.
	pub fn root(&self, label: &str) -> Result<Value> {
		let root = self
			.roots
			.iter()
			.find(|root| root.label.as_ref() == label)
			.ok_or_else(|| ViewError::RootNotFound { label: label.to_owned() })?;
		self.root_value(root)
	}

	/// Value view for a root entry.
	pub fn root_value(&self, root: &Root) -> Result<Value> {
		let ty = self.types.get(&root.type_name)?;
		Ok(Value::new(&root.label, ty, root.address))
	}

	/// Default decode options for this snapshot's field mode.
	pub fn decode_options(&self) -> DecodeOptions {
		DecodeOptions {
			fields: self.fields,
			..DecodeOptions::default()
		}
	}

	/// Inspector reading this snapshot's memory.
	pub fn inspector(&self, options: DecodeOptions) -> Inspector<'_> {
		Inspector::new(&self.memory, self.target.clone(), options)
	}
}

/// Parse a `0x`-prefixed hex or decimal address literal.
pub fn parse_address(value: &str) -> Result<u64> {
	let trimmed = value.trim();
	let parsed = if let Some(stripped) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
		u64::from_str_radix(&stripped.replace('_', ""), 16)
	} else {
		trimmed.parse::<u64>()
	};

	parsed.map_err(|_| ViewError::InvalidHex { value: value.to_owned() })
}

/// Parse a hex byte string; whitespace between digits is ignored.
pub fn parse_hex_bytes(value: &str) -> Result<Vec<u8>> {
	let invalid = || ViewError::InvalidHex {
		value: value.chars().take(32).collect(),
	};

	let digits: Vec<u8> = value.bytes().filter(|byte| !byte.is_ascii_whitespace()).collect();
	if digits.len() % 2 != 0 {
		return Err(invalid());
	}

	digits
		.chunks_exact(2)
		.map(|pair| match (hex_digit(pair[0]), hex_digit(pair[1])) {
			(Some(hi), Some(lo)) => Ok((hi << 4) | lo),
			_ => Err(invalid()),
		})
		.collect()
}

fn hex_digit(byte: u8) -> Option<u8> {
	match byte {
		b'0'..=b'9' => Some(byte - b'0'),
		b'a'..=b'f' => Some(byte - b'a' + 10),
		b'A'..=b'F' => Some(byte - b'A' + 10),
		_ => None,
	}
}
