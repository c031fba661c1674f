use std::sync::Arc;

use tracing::{debug, warn};

use crate::view::{DisplayHint, Inspector, Result, SEQUENCE_BUFFER, SEQUENCE_SIZE, TypeDescriptor, Value, ViewError};

/// Lazily enumerable view over one sequence value.
///
/// The element count and buffer address are read once when the view is built;
/// elements are only located when a child is requested.
pub struct SequenceView {
	value: Value,
	element: Arc<TypeDescriptor>,
	element_size: usize,
	buffer: u64,
	count: usize,
	reported: usize,
}

impl SequenceView {
	/// Snapshot count and buffer of a sequence value (or a pointer to one).
	pub fn new(inspector: &Inspector<'_>, value: &Value) -> Result<Self> {
		let value = inspector.resolve(value)?;
		let max_children = inspector.options().max_children;

		let size_field = inspector.field(&value, SEQUENCE_SIZE)?;
		let raw = inspector.read_signed(&size_field)?;
		let reported = usize::try_from(raw).map_err(|_| ViewError::MalformedLength {
			field: SEQUENCE_SIZE.name,
			raw,
			max: max_children as u64,
		})?;
		let count = reported.min(max_children);
		if count < reported {
			warn!(label = %value.label, reported, max_children, "sequence count clamped");
		}

		let buffer_field = inspector.field(&value, SEQUENCE_BUFFER)?;
		let buffer = inspector.read_pointer(&buffer_field)?;
		if buffer == 0 && count > 0 {
			return Err(ViewError::NullBuffer { count });
		}

		let element = value
			.ty
			.element
			.clone()
			.or_else(|| buffer_field.ty.pointee())
			.ok_or_else(|| ViewError::MissingElementType {
				type_name: value.type_name().to_owned(),
			})?;
		let element_size = element.size(inspector.target())?;

		debug!(
			label = %value.label,
			count,
			buffer,
			element = %element.name,
			element_size,
			"opened sequence value"
		);

		Ok(Self {
			value,
			element,
			element_size,
			buffer,
			count,
			reported,
		})
	}

	/// Number of children exposed.
	pub fn count(&self) -> usize {
		self.count
	}

	/// Count as read from memory, before clamping.
	pub fn reported_count(&self) -> usize {
		self.reported
	}

	/// Whether the exposed count was clamped.
	pub fn truncated(&self) -> bool {
		self.count < self.reported
	}

	/// Element buffer address.
	pub fn buffer(&self) -> u64 {
		self.buffer
	}

	/// Element type.
	pub fn element_type(&self) -> &Arc<TypeDescriptor> {
		&self.element
	}

	/// Element stride in bytes.
	pub fn element_size(&self) -> usize {
		self.element_size
	}

	/// The resolved sequence value.
	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Host summary line: the sequence type name.
	pub fn summary(&self) -> &str {
		self.value.type_name()
	}

	/// Host display hint.
	pub fn hint(&self) -> DisplayHint {
		DisplayHint::Array
	}

	/// Child value at `index`, labelled `[index]`.
	pub fn child_at(&self, index: usize) -> Result<Value> {
		if index >= self.count {
			return Err(ViewError::IndexOutOfRange { index, count: self.count });
		}

		let offset = (index as u64).checked_mul(self.element_size as u64).ok_or(ViewError::AddressOverflow {
			base: self.buffer,
			offset: u64::MAX,
		})?;
		let address = self.buffer.checked_add(offset).ok_or(ViewError::AddressOverflow { base: self.buffer, offset })?;
		Ok(Value::new(&format!("[{index}]"), Arc::clone(&self.element), address))
	}

	/// Map a display key (`[N]` or `N`) back to a child index.
	pub fn index_of(&self, key: &str) -> Option<usize> {
		parse_child_key(key)
	}

	/// Lazily locate every exposed child in order.
	pub fn children(&self) -> impl Iterator<Item = Result<Value>> + '_ {
		(0..self.count).map(|index| self.child_at(index))
	}
}

/// Parse a child display key, accepting `[N]` or a bare `N`.
pub fn parse_child_key(key: &str) -> Option<usize> {
	let key = key.trim();
	let inner = match key.strip_prefix('[') {
		Some(rest) => rest.strip_suffix(']')?,
		None => key,
	};
	inner.trim().parse().ok()
}

#[cfg(test)]
mod tests;
