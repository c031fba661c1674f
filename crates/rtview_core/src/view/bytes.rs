use crate::view::{Endianness, Result, ViewError};

/// Bounded cursor over bytes captured from inferior memory starting at `base`.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	base: u64,
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0 for bytes read from `base`.
	pub fn new(bytes: &'a [u8], base: u64) -> Self {
		Self { bytes, base, pos: 0 }
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(ViewError::UnmappedMemory {
				address: self.base.wrapping_add(self.pos as u64),
				len: n,
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read an unsigned integer of `size` bytes (1, 2, 4, or 8) and widen to `u64`.
	pub fn read_uint(&mut self, size: usize, endianness: Endianness) -> Result<u64> {
		if !matches!(size, 1 | 2 | 4 | 8) {
			return Err(ViewError::UnsupportedScalarSize {
				type_name: "<scalar>".to_owned(),
				size,
			});
		}
		let raw = self.read_exact(size)?;
		let mut buf = [0_u8; 8];
		match endianness {
			Endianness::Little => {
				buf[..size].copy_from_slice(raw);
				Ok(u64::from_le_bytes(buf))
			}
			Endianness::Big => {
				buf[8 - size..].copy_from_slice(raw);
				Ok(u64::from_be_bytes(buf))
			}
		}
	}

	/// Read a signed integer of `size` bytes (1, 2, 4, or 8) and sign-extend to `i64`.
	pub fn read_int(&mut self, size: usize, endianness: Endianness) -> Result<i64> {
		let value = self.read_uint(size, endianness)?;
		Ok(match size {
			1 => i64::from(value as u8 as i8),
			2 => i64::from(value as u16 as i16),
			4 => i64::from(value as u32 as i32),
			_ => value as i64,
		})
	}

	/// Read a pointer-sized unsigned integer and widen to `u64`.
	pub fn read_ptr(&mut self, pointer_size: usize, endianness: Endianness) -> Result<u64> {
		match pointer_size {
			4 | 8 => self.read_uint(pointer_size, endianness),
			_ => Err(ViewError::UnsupportedPointerSize { size: pointer_size }),
		}
	}
}
