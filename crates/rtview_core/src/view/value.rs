use std::sync::Arc;

use crate::view::TypeDescriptor;

/// Read-only view of one inferior value: its declared type and load address.
///
/// A value never owns inferior memory; reading it always goes through a [`Memory`](crate::view::Memory).
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
	/// Display label (variable name, field name, or `[index]`).
	pub label: Box<str>,
	/// Declared type.
	pub ty: Arc<TypeDescriptor>,
	/// Load address of the value's first byte.
	pub address: u64,
}

impl Value {
	/// View of a `ty` at `address`.
	pub fn new(label: &str, ty: Arc<TypeDescriptor>, address: u64) -> Self {
		Self {
			label: label.into(),
			ty,
			address,
		}
	}

	/// Type name as declared.
	pub fn type_name(&self) -> &str {
		&self.ty.name
	}
}

/// Presentation hint handed back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayHint {
	/// Render as a quoted string.
	String,
	/// Render as indexed children.
	Array,
}

impl DisplayHint {
	/// Host hint label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Array => "array",
		}
	}
}
