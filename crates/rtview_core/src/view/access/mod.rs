use std::sync::Arc;

use serde::Deserialize;
use tracing::trace;

use crate::view::bytes::Cursor;
use crate::view::layout::{self, FieldShape};
use crate::view::{Memory, Result, Target, TypeDescriptor, TypeKind, TypeMatcher, Value, ValueKind, ViewError};

/// Runtime field addressed by name (structured hosts) or position (raw hosts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
	/// Field name in debug info.
	pub name: &'static str,
	/// Declaration position.
	pub index: usize,
}

/// Runtime type-id header word shared by text and sequence values.
pub const TYPE_ID: FieldSlot = FieldSlot { name: "type_id", index: 0 };
/// Text byte size.
pub const TEXT_BYTESIZE: FieldSlot = FieldSlot { name: "bytesize", index: 1 };
/// Text character count.
pub const TEXT_LENGTH: FieldSlot = FieldSlot { name: "length", index: 2 };
/// First byte of inline text storage.
pub const TEXT_CHARS: FieldSlot = FieldSlot { name: "c", index: 3 };
/// Sequence element count.
pub const SEQUENCE_SIZE: FieldSlot = FieldSlot { name: "size", index: 1 };
/// Sequence allocated capacity.
pub const SEQUENCE_CAPACITY: FieldSlot = FieldSlot { name: "capacity", index: 2 };
/// Sequence offset from allocation start to first element.
pub const SEQUENCE_OFFSET: FieldSlot = FieldSlot {
	name: "offset_to_buffer",
	index: 3,
};
/// Sequence element buffer pointer.
pub const SEQUENCE_BUFFER: FieldSlot = FieldSlot { name: "buffer", index: 4 };

const TEXT_SLOTS: [FieldSlot; 4] = [TYPE_ID, TEXT_BYTESIZE, TEXT_LENGTH, TEXT_CHARS];
const SEQUENCE_SLOTS: [FieldSlot; 5] = [TYPE_ID, SEQUENCE_SIZE, SEQUENCE_CAPACITY, SEQUENCE_OFFSET, SEQUENCE_BUFFER];

/// How field locations are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
	/// The host exposes field names and offsets.
	#[default]
	Named,
	/// The host exposes no names; fields are located by declaration position.
	Positional,
}

impl FieldMode {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Named => "named",
			Self::Positional => "positional",
		}
	}
}

/// Structured field access over value views.
pub trait FieldAccess {
	/// Child value for the field called `name`.
	fn field_by_name(&self, value: &Value, name: &str) -> Result<Value>;

	/// Child value for the field at declaration position `index`.
	fn field_by_index(&self, value: &Value, index: usize) -> Result<Value>;

	/// Child value for a runtime slot, using whichever addressing this backend prefers.
	fn field(&self, value: &Value, slot: FieldSlot) -> Result<Value>;

	/// Backend label for diagnostics.
	fn mode(&self) -> FieldMode;
}

/// Field access through host-provided names and offsets.
#[derive(Debug, Clone)]
pub struct NamedFields {
	target: Target,
}

impl NamedFields {
	/// Backend for `target`.
	pub fn new(target: Target) -> Self {
		Self { target }
	}
}

impl FieldAccess for NamedFields {
	fn field_by_name(&self, value: &Value, name: &str) -> Result<Value> {
		require_fields(value)?;
		let index = value.ty.field_index(name).ok_or_else(|| ViewError::MissingField {
			type_name: value.type_name().to_owned(),
			field: name.to_owned(),
		})?;
		self.field_by_index(value, index)
	}

	fn field_by_index(&self, value: &Value, index: usize) -> Result<Value> {
		require_fields(value)?;
		let fields = value.ty.fields();
		let field = fields.get(index).ok_or_else(|| ViewError::FieldIndexOutOfRange {
			type_name: value.type_name().to_owned(),
			index,
			count: fields.len(),
		})?;
		let layout = value.ty.struct_layout(&self.target)?;
		let label = field.name.as_deref().map_or_else(|| format!("#{index}"), str::to_owned);
		child_at_offset(value, &label, Arc::clone(&field.ty), layout.offsets[index])
	}

	fn field(&self, value: &Value, slot: FieldSlot) -> Result<Value> {
		self.field_by_name(value, slot.name)
	}

	fn mode(&self) -> FieldMode {
		FieldMode::Named
	}
}

/// Field access by declaration position, for hosts that strip field names.
///
/// When the value's type carries fields, their types drive the layout and names are ignored.
/// Otherwise the runtime's fixed text or sequence header is assumed.
#[derive(Debug, Clone)]
pub struct PositionalFields {
	target: Target,
	matcher: TypeMatcher,
}

impl PositionalFields {
	/// Backend for `target`, recognizing runtime values with `matcher`.
	pub fn new(target: Target, matcher: TypeMatcher) -> Self {
		Self { target, matcher }
	}

	fn runtime_fields(&self, value: &Value) -> Result<(&'static [FieldSlot], Vec<Arc<TypeDescriptor>>)> {
		if value.ty.is_pointer() {
			return Err(ViewError::NoFieldLayout {
				type_name: value.type_name().to_owned(),
			});
		}
		let int32 = Arc::new(TypeDescriptor::scalar("Int32", 4, true));
		match self.matcher.classify_type(&value.ty) {
			ValueKind::Text => {
				let uint8 = Arc::new(TypeDescriptor::scalar("UInt8", 1, false));
				Ok((&TEXT_SLOTS, vec![Arc::clone(&int32), Arc::clone(&int32), int32, uint8]))
			}
			ValueKind::Sequence => {
				let element = value.ty.element.clone().ok_or_else(|| ViewError::MissingElementType {
					type_name: value.type_name().to_owned(),
				})?;
				let buffer = Arc::new(TypeDescriptor::pointer_to(element));
				Ok((
					&SEQUENCE_SLOTS,
					vec![Arc::clone(&int32), Arc::clone(&int32), Arc::clone(&int32), int32, buffer],
				))
			}
			ValueKind::Unrecognized => Err(ViewError::NoFieldLayout {
				type_name: value.type_name().to_owned(),
			}),
		}
	}
}

impl FieldAccess for PositionalFields {
	fn field_by_name(&self, value: &Value, name: &str) -> Result<Value> {
		if let Some(index) = value.ty.field_index(name) {
			return self.field_by_index(value, index);
		}
		let missing = || ViewError::MissingField {
			type_name: value.type_name().to_owned(),
			field: name.to_owned(),
		};
		if !value.ty.fields().is_empty() {
			return Err(missing());
		}
		let (slots, _) = self.runtime_fields(value)?;
		let slot = slots.iter().find(|slot| slot.name == name).ok_or_else(missing)?;
		self.field_by_index(value, slot.index)
	}

	fn field_by_index(&self, value: &Value, index: usize) -> Result<Value> {
		let declared = value.ty.fields();
		let types: Vec<Arc<TypeDescriptor>> = if declared.is_empty() {
			self.runtime_fields(value)?.1
		} else {
			declared.iter().map(|field| Arc::clone(&field.ty)).collect()
		};

		let Some(ty) = types.get(index) else {
			return Err(ViewError::FieldIndexOutOfRange {
				type_name: value.type_name().to_owned(),
				index,
				count: types.len(),
			});
		};

		let mut shapes = Vec::with_capacity(types.len());
		for item in &types {
			shapes.push(FieldShape {
				size: item.size(&self.target)?,
				align: item.align(&self.target)?,
				offset: None,
			});
		}
		let layout = layout::compute(&shapes)?;
		child_at_offset(value, &format!("#{index}"), Arc::clone(ty), layout.offsets[index])
	}

	fn field(&self, value: &Value, slot: FieldSlot) -> Result<Value> {
		self.field_by_index(value, slot.index)
	}

	fn mode(&self) -> FieldMode {
		FieldMode::Positional
	}
}

fn require_fields(value: &Value) -> Result<()> {
	match value.ty.kind {
		TypeKind::Struct { .. } => Ok(()),
		_ => Err(ViewError::NoFieldLayout {
			type_name: value.type_name().to_owned(),
		}),
	}
}

fn child_at_offset(parent: &Value, label: &str, ty: Arc<TypeDescriptor>, offset: u64) -> Result<Value> {
	let address = parent.address.checked_add(offset).ok_or(ViewError::AddressOverflow {
		base: parent.address,
		offset,
	})?;
	Ok(Value::new(label, ty, address))
}

/// Width override for the hidden prefix ahead of inline text storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextPrefix {
	/// Use the target's convention.
	#[default]
	Auto,
	/// Always skip this many bytes.
	Bytes(u64),
}

/// Runtime limits and behavior switches for value decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Field discovery backend.
	pub fields: FieldMode,
	/// Safety ceiling for any single memory read.
	pub max_read_bytes: usize,
	/// Largest text byte length accepted before the value is refused.
	pub max_text_bytes: usize,
	/// Largest sequence count exposed; larger counts are clamped.
	pub max_children: usize,
	/// Hidden text prefix handling.
	pub text_prefix: TextPrefix,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			fields: FieldMode::Named,
			max_read_bytes: 16 * 1024 * 1024,
			max_text_bytes: 1024 * 1024,
			max_children: 1 << 20,
			text_prefix: TextPrefix::Auto,
		}
	}
}

impl DecodeOptions {
	/// Preset tuned for one-line summaries such as hover tooltips.
	pub fn for_summary() -> Self {
		Self {
			fields: FieldMode::Named,
			max_read_bytes: 64 * 1024,
			max_text_bytes: 4096,
			max_children: 256,
			text_prefix: TextPrefix::Auto,
		}
	}
}

/// Memory access port bound to one target: raw reads, scalar reads, dereference, and field access.
pub struct Inspector<'a> {
	memory: &'a dyn Memory,
	fields: Box<dyn FieldAccess + 'a>,
	target: Target,
	options: DecodeOptions,
}

impl<'a> Inspector<'a> {
	/// Inspector using the field backend selected by `options.fields` and the default runtime type names.
	pub fn new(memory: &'a dyn Memory, target: Target, options: DecodeOptions) -> Self {
		Self::with_matcher(memory, target, options, &TypeMatcher::default())
	}

	/// Inspector whose positional backend recognizes runtime values by `matcher`'s names.
	pub fn with_matcher(memory: &'a dyn Memory, target: Target, options: DecodeOptions, matcher: &TypeMatcher) -> Self {
		let fields: Box<dyn FieldAccess + 'a> = match options.fields {
			FieldMode::Named => Box::new(NamedFields::new(target.clone())),
			FieldMode::Positional => Box::new(PositionalFields::new(target.clone(), matcher.clone())),
		};
		Self::with_fields(memory, fields, target, options)
	}

	/// Inspector with an explicit field backend.
	pub fn with_fields(memory: &'a dyn Memory, fields: Box<dyn FieldAccess + 'a>, target: Target, options: DecodeOptions) -> Self {
		Self {
			memory,
			fields,
			target,
			options,
		}
	}

	/// Target description.
	pub fn target(&self) -> &Target {
		&self.target
	}

	/// Decode options.
	pub fn options(&self) -> &DecodeOptions {
		&self.options
	}

	/// Active field backend.
	pub fn fields(&self) -> &dyn FieldAccess {
		self.fields.as_ref()
	}

	/// Read exactly `len` bytes, refusing reads above the safety ceiling.
	pub fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
		self.check_ceiling(address, len)?;
		self.memory.read_bytes(address, len)
	}

	/// Bounded C-string read, refusing windows above the safety ceiling.
	pub fn read_cstring(&self, address: u64, max_len: usize) -> Result<Vec<u8>> {
		self.check_ceiling(address, max_len)?;
		self.memory.read_cstring(address, max_len)
	}

	/// Child value for a runtime slot.
	pub fn field(&self, value: &Value, slot: FieldSlot) -> Result<Value> {
		self.fields.field(value, slot)
	}

	/// Read a scalar or pointer value zero-extended to `u64`.
	pub fn read_unsigned(&self, value: &Value) -> Result<u64> {
		let size = self.scalar_size(value)?;
		let bytes = self.read_bytes(value.address, size)?;
		Cursor::new(&bytes, value.address).read_uint(size, self.target.endianness)
	}

	/// Read a scalar value, sign-extending when its type is signed.
	pub fn read_signed(&self, value: &Value) -> Result<i64> {
		let size = self.scalar_size(value)?;
		let bytes = self.read_bytes(value.address, size)?;
		let mut cursor = Cursor::new(&bytes, value.address);
		match value.ty.kind {
			TypeKind::Scalar { signed: true, .. } => cursor.read_int(size, self.target.endianness),
			_ => Ok(cursor.read_uint(size, self.target.endianness)? as i64),
		}
	}

	/// Read the address stored in a pointer value.
	pub fn read_pointer(&self, value: &Value) -> Result<u64> {
		if !value.ty.is_pointer() {
			return Err(ViewError::NotAPointer {
				type_name: value.type_name().to_owned(),
			});
		}
		let bytes = self.read_bytes(value.address, self.target.pointer_size)?;
		Cursor::new(&bytes, value.address).read_ptr(self.target.pointer_size, self.target.endianness)
	}

	/// Follow one pointer layer.
	pub fn deref(&self, value: &Value) -> Result<Value> {
		let TypeKind::Pointer { pointee } = &value.ty.kind else {
			return Err(ViewError::NotAPointer {
				type_name: value.type_name().to_owned(),
			});
		};
		let pointee = pointee.get().ok_or_else(|| ViewError::UnknownType {
			name: pointee.name().to_owned(),
		})?;
		let address = self.read_pointer(value)?;
		if address == 0 {
			return Err(ViewError::NullPointer {
				type_name: pointee.name.to_string(),
			});
		}
		trace!(from = value.address, to = address, type_name = %pointee.name, "deref");
		Ok(Value::new(&value.label, pointee, address))
	}

	/// Dereference when `value` is a pointer, otherwise return it unchanged.
	pub fn resolve(&self, value: &Value) -> Result<Value> {
		if value.ty.is_pointer() { self.deref(value) } else { Ok(value.clone()) }
	}

	fn scalar_size(&self, value: &Value) -> Result<usize> {
		let size = match value.ty.kind {
			TypeKind::Scalar { size, .. } => size,
			TypeKind::Pointer { .. } => self.target.pointer_size,
			_ => 0,
		};
		if !matches!(size, 1 | 2 | 4 | 8) {
			return Err(ViewError::UnsupportedScalarSize {
				type_name: value.type_name().to_owned(),
				size,
			});
		}
		Ok(size)
	}

	fn check_ceiling(&self, address: u64, len: usize) -> Result<()> {
		if len > self.options.max_read_bytes {
			return Err(ViewError::ReadTooLarge {
				address,
				len,
				max: self.options.max_read_bytes,
			});
		}
		Ok(())
	}
}
