use crate::view::{Result, ViewError};

/// Read-only access to the inferior's address space.
pub trait Memory {
	/// Read exactly `len` bytes at `address`.
	fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>>;

	/// Read bytes at `address` up to the first zero byte or `max_len`, whichever comes first.
	///
	/// The zero byte is not included. Backends with a native bounded C-string read should
	/// override this; the default reads the whole window.
	fn read_cstring(&self, address: u64, max_len: usize) -> Result<Vec<u8>> {
		let mut bytes = self.read_bytes(address, max_len)?;
		if let Some(end) = bytes.iter().position(|byte| *byte == 0) {
			bytes.truncate(end);
		}
		Ok(bytes)
	}
}

/// One captured address range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
	/// First address covered.
	pub start: u64,
	/// Captured bytes.
	pub bytes: Vec<u8>,
}

impl Region {
	/// Exclusive end address.
	pub fn end(&self) -> u64 {
		self.start.saturating_add(self.bytes.len() as u64)
	}
}

/// Range index over captured memory regions, as found in a core dump or snapshot.
#[derive(Debug, Default)]
pub struct SparseMemory {
	starts: Vec<u64>,
	regions: Vec<Region>,
}

impl SparseMemory {
	/// Build a sorted index, rejecting overlapping regions.
	pub fn new(mut regions: Vec<Region>) -> Result<Self> {
		regions.retain(|region| !region.bytes.is_empty());
		regions.sort_by_key(|region| region.start);

		for pair in regions.windows(2) {
			if pair[1].start < pair[0].end() {
				return Err(ViewError::OverlappingRegions { address: pair[1].start });
			}
		}

		let starts = regions.iter().map(|region| region.start).collect();
		Ok(Self { starts, regions })
	}

	/// Locate the region containing `address` and the offset inside it.
	pub fn resolve(&self, address: u64) -> Option<(&Region, usize)> {
		let idx = self.starts.partition_point(|start| *start <= address);
		if idx == 0 {
			return None;
		}

		let region = &self.regions[idx - 1];
		if address >= region.end() {
			return None;
		}

		Some((region, (address - region.start) as usize))
	}

	/// Return all regions in address order.
	pub fn regions(&self) -> &[Region] {
		&self.regions
	}

	/// Total number of captured bytes.
	pub fn mapped_bytes(&self) -> usize {
		self.regions.iter().map(|region| region.bytes.len()).sum()
	}

	fn window(&self, address: u64, len: usize) -> Result<&[u8]> {
		let unmapped = ViewError::UnmappedMemory { address, len };
		let (region, offset) = self.resolve(address).ok_or(unmapped)?;
		let end = offset.checked_add(len).ok_or(ViewError::UnmappedMemory { address, len })?;
		region.bytes.get(offset..end).ok_or(ViewError::UnmappedMemory { address, len })
	}
}

impl Memory for SparseMemory {
	fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
		if len == 0 {
			return Ok(Vec::new());
		}
		Ok(self.window(address, len)?.to_vec())
	}

	fn read_cstring(&self, address: u64, max_len: usize) -> Result<Vec<u8>> {
		if max_len == 0 {
			return Ok(Vec::new());
		}
		let (region, offset) = self.resolve(address).ok_or(ViewError::UnmappedMemory { address, len: max_len })?;
		let available = &region.bytes[offset..];
		let window = &available[..available.len().min(max_len)];
		match window.iter().position(|byte| *byte == 0) {
			Some(end) => Ok(window[..end].to_vec()),
			None if window.len() == max_len => Ok(window.to_vec()),
			None => Err(ViewError::UnmappedMemory {
				address: region.end(),
				len: max_len - window.len(),
			}),
		}
	}
}
