use serde::Deserialize;

use crate::view::{Result, ViewError};

/// Target triple whose runtime places a hidden length prefix ahead of inline text storage.
pub const PREFIXED_TEXT_TRIPLE: &str = "x86_64-pc-windows-msvc";
/// Width of that hidden prefix in bytes.
pub const TEXT_PREFIX_WIDTH: u64 = 4;

/// Byte order of the inferior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
	/// Little-endian byte order.
	Little,
	/// Big-endian byte order.
	Big,
}

impl Endianness {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Inferior architecture facts needed to locate fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
	/// Target triple as reported by the host.
	pub triple: Box<str>,
	/// Pointer width in bytes.
	pub pointer_size: usize,
	/// Byte order.
	pub endianness: Endianness,
}

impl Target {
	/// Build a target, rejecting pointer widths other than 4 and 8.
	pub fn new(triple: &str, pointer_size: usize, endianness: Endianness) -> Result<Self> {
		if !matches!(pointer_size, 4 | 8) {
			return Err(ViewError::UnsupportedPointerSize { size: pointer_size });
		}
		Ok(Self {
			triple: triple.into(),
			pointer_size,
			endianness,
		})
	}

	/// 64-bit little-endian Linux.
	pub fn x86_64_linux() -> Self {
		Self {
			triple: "x86_64-unknown-linux-gnu".into(),
			pointer_size: 8,
			endianness: Endianness::Little,
		}
	}

	/// Default prefix width ahead of inline text storage on this target.
	pub fn text_prefix_width(&self) -> u64 {
		if self.triple.as_ref() == PREFIXED_TEXT_TRIPLE { TEXT_PREFIX_WIDTH } else { 0 }
	}
}

impl Default for Target {
	fn default() -> Self {
		Self::x86_64_linux()
	}
}
