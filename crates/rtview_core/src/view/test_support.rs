use std::sync::Arc;

use crate::view::{FieldDesc, Region, SparseMemory, TypeDescriptor};

pub(crate) fn int32() -> Arc<TypeDescriptor> {
	Arc::new(TypeDescriptor::scalar("Int32", 4, true))
}

pub(crate) fn uint8() -> Arc<TypeDescriptor> {
	Arc::new(TypeDescriptor::scalar("UInt8", 1, false))
}

/// `String { type_id, bytesize, length, c }`.
pub(crate) fn string_type() -> Arc<TypeDescriptor> {
	Arc::new(TypeDescriptor::structure(
		"String",
		vec![
			FieldDesc::named("type_id", int32()),
			FieldDesc::named("bytesize", int32()),
			FieldDesc::named("length", int32()),
			FieldDesc::named("c", uint8()),
		],
	))
}

/// Older `String { type_id, length, c }` layout without a byte size.
pub(crate) fn length_only_string_type() -> Arc<TypeDescriptor> {
	Arc::new(TypeDescriptor::structure(
		"String",
		vec![
			FieldDesc::named("type_id", int32()),
			FieldDesc::named("length", int32()),
			FieldDesc::named("c", uint8()),
		],
	))
}

/// `Array(T) { type_id, size, capacity, offset_to_buffer, buffer }`.
pub(crate) fn array_type(element: Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
	let name = format!("Array({})", element.name);
	Arc::new(
		TypeDescriptor::structure(
			&name,
			vec![
				FieldDesc::named("type_id", int32()),
				FieldDesc::named("size", int32()),
				FieldDesc::named("capacity", int32()),
				FieldDesc::named("offset_to_buffer", int32()),
				FieldDesc::named("buffer", Arc::new(TypeDescriptor::pointer_to(Arc::clone(&element)))),
			],
		)
		.with_element(element),
	)
}

pub(crate) fn ptr(pointee: &Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
	Arc::new(TypeDescriptor::pointer_to(Arc::clone(pointee)))
}

/// Little-endian text object bytes followed by a terminator.
pub(crate) fn text_bytes(bytesize: i32, length: i32, body: &[u8]) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(&1_i32.to_le_bytes());
	out.extend_from_slice(&bytesize.to_le_bytes());
	out.extend_from_slice(&length.to_le_bytes());
	out.extend_from_slice(body);
	out.push(0);
	out
}

/// Little-endian 64-bit sequence header.
pub(crate) fn array_bytes(size: i32, capacity: i32, buffer: u64) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(&2_i32.to_le_bytes());
	out.extend_from_slice(&size.to_le_bytes());
	out.extend_from_slice(&capacity.to_le_bytes());
	out.extend_from_slice(&0_i32.to_le_bytes());
	out.extend_from_slice(&buffer.to_le_bytes());
	out
}

pub(crate) fn memory(regions: Vec<(u64, Vec<u8>)>) -> SparseMemory {
	SparseMemory::new(regions.into_iter().map(|(start, bytes)| Region { start, bytes }).collect()).expect("test regions are disjoint")
}
