use std::fmt::Write as _;

use tracing::debug;

use crate::view::{DisplayHint, FieldSlot, Inspector, Result, TEXT_BYTESIZE, TEXT_CHARS, TEXT_LENGTH, TextPrefix, Value, ViewError};

/// Field that supplied a text value's byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthSource {
	/// Explicit byte size.
	ByteSize,
	/// Character count, used when the byte size is zero or absent.
	CharLength,
}

impl LengthSource {
	/// Field name the length came from.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ByteSize => TEXT_BYTESIZE.name,
			Self::CharLength => TEXT_LENGTH.name,
		}
	}
}

/// Printable rendering of one text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSummary {
	/// Decoded text, with each invalid UTF-8 byte shown as `\xNN` and `\` / `"` escaped.
	pub text: String,
	/// Byte length taken from the value's fields.
	pub byte_len: usize,
	/// Which field supplied `byte_len`.
	pub source: LengthSource,
	/// Address the character bytes were read from.
	pub address: u64,
	/// Number of bytes that were not valid UTF-8.
	pub invalid_bytes: usize,
}

impl TextSummary {
	/// Text wrapped in double quotes.
	pub fn quoted(&self) -> String {
		format!("\"{}\"", self.text)
	}

	/// Host display hint.
	pub fn hint(&self) -> DisplayHint {
		DisplayHint::String
	}
}

/// Decode a text value (or a pointer to one) into a printable summary.
///
/// The byte size field wins when present and non-zero; otherwise the character count is used.
/// Up to `len + 1` bytes are read through the bounded C-string primitive, so the text ends at the
/// runtime terminator or at the first embedded zero byte.
pub fn decode_text(inspector: &Inspector<'_>, value: &Value) -> Result<TextSummary> {
	let value = inspector.resolve(value)?;
	let max = inspector.options().max_text_bytes;

	let bytesize = read_length(inspector, &value, TEXT_BYTESIZE, max)?;
	let (byte_len, source) = match bytesize {
		Some(len) if len > 0 => (len, LengthSource::ByteSize),
		_ => match read_length(inspector, &value, TEXT_LENGTH, max)? {
			Some(len) => (len, LengthSource::CharLength),
			None if bytesize.is_some() => (0, LengthSource::ByteSize),
			None => {
				return Err(ViewError::MissingField {
					type_name: value.type_name().to_owned(),
					field: TEXT_BYTESIZE.name.to_owned(),
				});
			}
		},
	};

	let chars = inspector.field(&value, TEXT_CHARS)?;
	let prefix = match inspector.options().text_prefix {
		TextPrefix::Auto => inspector.target().text_prefix_width(),
		TextPrefix::Bytes(width) => width,
	};
	let address = chars.address.checked_add(prefix).ok_or(ViewError::AddressOverflow {
		base: chars.address,
		offset: prefix,
	})?;

	let bytes = match inspector.read_cstring(address, byte_len + 1) {
		Ok(bytes) => bytes,
		Err(ViewError::UnmappedMemory { .. }) => inspector.read_cstring(address, byte_len)?,
		Err(err) => return Err(err),
	};
	let (text, invalid_bytes) = escape_utf8(&bytes);

	debug!(
		label = %value.label,
		address,
		byte_len,
		source = source.as_str(),
		invalid_bytes,
		"decoded text value"
	);

	Ok(TextSummary {
		text,
		byte_len,
		source,
		address,
		invalid_bytes,
	})
}

/// Decode UTF-8, replacing each invalid byte with a `\xNN` escape. Returns the text and the invalid byte count.
///
/// Backslashes and double quotes in valid text are escaped too, so a `\xNN` in the output
/// always stands for an invalid byte.
pub fn escape_utf8(bytes: &[u8]) -> (String, usize) {
	let mut out = String::with_capacity(bytes.len());
	let mut invalid = 0;
	for chunk in bytes.utf8_chunks() {
		for ch in chunk.valid().chars() {
			if matches!(ch, '\\' | '"') {
				out.push('\\');
			}
			out.push(ch);
		}
		for byte in chunk.invalid() {
			let _ = write!(out, "\\x{byte:02X}");
			invalid += 1;
		}
	}
	(out, invalid)
}

fn read_length(inspector: &Inspector<'_>, value: &Value, slot: FieldSlot, max: usize) -> Result<Option<usize>> {
	let field = match inspector.field(value, slot) {
		Ok(field) => field,
		Err(err) if err.is_missing_field() => return Ok(None),
		Err(err) => return Err(err),
	};

	let raw = inspector.read_signed(&field)?;
	match usize::try_from(raw) {
		Ok(len) if len <= max => Ok(Some(len)),
		_ => Err(ViewError::MalformedLength {
			field: slot.name,
			raw,
			max: max as u64,
		}),
	}
}
