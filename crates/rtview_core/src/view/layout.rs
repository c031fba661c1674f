use crate::view::{Result, ViewError};

/// Size, alignment, and optional host-supplied offset of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShape {
	/// Field byte size.
	pub size: usize,
	/// Required alignment in bytes (power of two, at least 1).
	pub align: usize,
	/// Offset recorded by the host, overriding sequential placement.
	pub offset: Option<u64>,
}

impl FieldShape {
	/// Naturally aligned field of `size` bytes with no recorded offset.
	pub fn natural(size: usize, max_align: usize) -> Self {
		Self {
			size,
			align: natural_align(size, max_align),
			offset: None,
		}
	}
}

/// Computed byte layout of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
	/// Byte offset of each field, in declaration order.
	pub offsets: Vec<u64>,
	/// Total size including tail padding.
	pub size: usize,
	/// Alignment of the aggregate.
	pub align: usize,
}

/// Lay out fields in declaration order using C rules.
///
/// Each field starts at the next multiple of its alignment, unless the host recorded an explicit
/// offset, in which case placement continues from there. The total size is rounded up to the
/// largest field alignment.
pub fn compute(fields: &[FieldShape]) -> Result<StructLayout> {
	let mut offsets = Vec::with_capacity(fields.len());
	let mut cursor = 0_u64;
	let mut end = 0_u64;
	let mut align = 1_usize;

	for field in fields {
		let field_align = field.align.max(1);
		align = align.max(field_align);

		let offset = match field.offset {
			Some(offset) => offset,
			None => align_up(cursor, field_align as u64)?,
		};
		offsets.push(offset);

		cursor = offset.checked_add(field.size as u64).ok_or(ViewError::AddressOverflow {
			base: offset,
			offset: field.size as u64,
		})?;
		end = end.max(cursor);
	}

	let size = align_up(end, align as u64)?;
	let size = usize::try_from(size).map_err(|_| ViewError::AddressOverflow { base: end, offset: 0 })?;
	Ok(StructLayout { offsets, size, align })
}

/// Largest power of two dividing `size`, capped at `max_align`.
pub fn natural_align(size: usize, max_align: usize) -> usize {
	if size == 0 {
		return 1;
	}
	let low_bit = 1_usize << size.trailing_zeros();
	low_bit.min(max_align.max(1))
}

fn align_up(value: u64, align: u64) -> Result<u64> {
	let mask = align - 1;
	value
		.checked_add(mask)
		.map(|item| item & !mask)
		.ok_or(ViewError::AddressOverflow { base: value, offset: mask })
}
