use crate::view::TypeDescriptor;
use crate::view::decl::parse_type_name;

/// Default runtime name of text values.
pub const TEXT_TYPE_NAME: &str = "String";
/// Default runtime name of sequence values.
pub const SEQUENCE_TYPE_NAME: &str = "Array";
/// Default runtime name of the nil type in nullable unions.
pub const NIL_TYPE_NAME: &str = "Nil";

/// Decoding strategy selected for a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// Length-tagged character buffer.
	Text,
	/// Size-tagged contiguous element buffer.
	Sequence,
	/// Left to other printers.
	Unrecognized,
}

impl ValueKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Sequence => "sequence",
			Self::Unrecognized => "unrecognized",
		}
	}
}

/// Classifies declared type names against the registered text and sequence names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMatcher {
	text_name: Box<str>,
	sequence_name: Box<str>,
	nil_name: Box<str>,
}

impl Default for TypeMatcher {
	fn default() -> Self {
		Self::new(TEXT_TYPE_NAME, SEQUENCE_TYPE_NAME, NIL_TYPE_NAME)
	}
}

impl TypeMatcher {
	/// Matcher for custom runtime type names.
	pub fn new(text_name: &str, sequence_name: &str, nil_name: &str) -> Self {
		Self {
			text_name: text_name.into(),
			sequence_name: sequence_name.into(),
			nil_name: nil_name.into(),
		}
	}

	/// Registered text type name.
	pub fn text_name(&self) -> &str {
		&self.text_name
	}

	/// Registered sequence type name.
	pub fn sequence_name(&self) -> &str {
		&self.sequence_name
	}

	/// Registered nil type name.
	pub fn nil_name(&self) -> &str {
		&self.nil_name
	}

	/// Classify a descriptor after stripping one layer of pointer indirection.
	pub fn classify_type(&self, ty: &TypeDescriptor) -> ValueKind {
		self.classify(ty.value_name())
	}

	/// Classify a type-name spelling. Text rules are checked before sequence rules.
	pub fn classify(&self, type_name: &str) -> ValueKind {
		let decl = parse_type_name(type_name);

		if decl.params.is_none() && decl.base == self.text_name.as_ref() {
			return ValueKind::Text;
		}
		if self.is_nullable_text(&decl.union_members) {
			return ValueKind::Text;
		}

		if decl.base == self.sequence_name.as_ref() {
			match decl.params {
				None => return ValueKind::Sequence,
				Some(params) if decl.params_closed && !params.is_empty() && immediately_opens(type_name, &self.sequence_name) => {
					return ValueKind::Sequence;
				}
				Some(_) => {}
			}
		}

		ValueKind::Unrecognized
	}

	fn is_nullable_text(&self, members: &[&str]) -> bool {
		match members {
			[a, b] => (*a == self.text_name.as_ref() && *b == self.nil_name.as_ref()) || (*b == self.text_name.as_ref() && *a == self.nil_name.as_ref()),
			_ => false,
		}
	}
}

/// Whether `name` continues with `(` right after `prefix`, with no intervening whitespace.
fn immediately_opens(name: &str, prefix: &str) -> bool {
	name.trim_start().strip_prefix(prefix).is_some_and(|rest| rest.starts_with('('))
}

#[cfg(test)]
mod tests;
