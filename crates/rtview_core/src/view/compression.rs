use std::io::Read;

use crate::view::{Result, ViewError};

/// Largest decompressed snapshot accepted.
pub const MAX_DECOMPRESSED_BYTES: usize = 256 * 1024 * 1024;
/// zstd frame magic used by compressed snapshots.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Plain JSON.
	None,
	/// zstd-compressed JSON.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Detect and decode compression, returning `(mode, json_bytes)`.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if looks_like_json(&raw) {
		return Ok((Compression::None, raw));
	}

	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw, MAX_DECOMPRESSED_BYTES)?;
		if !looks_like_json(&out) {
			return Err(ViewError::UnknownMagic { magic: first4(&out) });
		}
		return Ok((Compression::Zstd, out));
	}

	Err(ViewError::UnknownMagic { magic: first4(&raw) })
}

fn decode_zstd(raw: &[u8], limit: usize) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > limit {
			return Err(ViewError::DecompressedTooLarge { limit });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

fn looks_like_json(bytes: &[u8]) -> bool {
	let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
	bytes.iter().find(|byte| !byte.is_ascii_whitespace()) == Some(&b'{')
}

fn first4(bytes: &[u8]) -> [u8; 4] {
	let mut magic = [0_u8; 4];
	let take = bytes.len().min(4);
	magic[..take].copy_from_slice(&bytes[..take]);
	magic
}

#[cfg(test)]
mod tests {
	use super::{Compression, decode_bytes, decode_zstd};
	use crate::view::ViewError;

	#[test]
	fn plain_json_passes_through() {
		let (mode, out) = decode_bytes(b"  {\"a\": 1}".to_vec()).expect("json accepted");
		assert_eq!(mode, Compression::None);
		assert_eq!(out, b"  {\"a\": 1}");
	}

	#[test]
	fn zstd_frames_are_inflated() {
		let packed = zstd::stream::encode_all(&b"{\"roots\": []}"[..], 3).expect("encode");
		let (mode, out) = decode_bytes(packed).expect("zstd accepted");
		assert_eq!(mode, Compression::Zstd);
		assert_eq!(out, b"{\"roots\": []}");
	}

	#[test]
	fn unknown_leading_bytes_are_rejected() {
		let err = decode_bytes(b"ELF\x7f...".to_vec()).expect_err("not a snapshot");
		assert!(matches!(err, ViewError::UnknownMagic { magic } if &magic == b"ELF\x7f"));
	}

	#[test]
	fn decompression_respects_limit() {
		let packed = zstd::stream::encode_all(&[b' '; 64][..], 3).expect("encode");
		let err = decode_zstd(&packed, 16).expect_err("over limit");
		assert!(matches!(err, ViewError::DecompressedTooLarge { limit: 16 }));
	}
}
