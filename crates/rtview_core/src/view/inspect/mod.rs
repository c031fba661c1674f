use tracing::{debug, warn};

use crate::view::{DisplayHint, Inspector, SequenceView, TextSummary, TypeMatcher, Value, ValueKind, decode_text};

/// Outcome of presenting one value to the decoders.
pub enum Rendering {
	/// Decoded text value.
	Text(TextSummary),
	/// Opened sequence value.
	Sequence(SequenceView),
	/// The value was claimed but could not be decoded.
	Fallback {
		/// Strategy that claimed the value.
		kind: ValueKind,
		/// Decoder error message.
		reason: String,
	},
	/// No decoder claims this type.
	Unclaimed,
}

impl Rendering {
	/// Strategy that claimed the value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Text(_) => ValueKind::Text,
			Self::Sequence(_) => ValueKind::Sequence,
			Self::Fallback { kind, .. } => *kind,
			Self::Unclaimed => ValueKind::Unrecognized,
		}
	}

	/// One-line host summary, if any decoder claimed the value.
	pub fn summary(&self) -> Option<String> {
		match self {
			Self::Text(text) => Some(text.quoted()),
			Self::Sequence(view) => Some(view.summary().to_owned()),
			Self::Fallback { reason, .. } => Some(format!("<error: {reason}>")),
			Self::Unclaimed => None,
		}
	}

	/// Host display hint for claimed values.
	pub fn hint(&self) -> Option<DisplayHint> {
		match self.kind() {
			ValueKind::Text => Some(DisplayHint::String),
			ValueKind::Sequence => Some(DisplayHint::Array),
			ValueKind::Unrecognized => None,
		}
	}
}

/// Classify `value` and run the matching decoder.
///
/// Decoder failures never escape: they become [`Rendering::Fallback`] so a
/// host can keep rendering sibling values.
pub fn inspect(inspector: &Inspector<'_>, matcher: &TypeMatcher, value: &Value) -> Rendering {
	let kind = matcher.classify_type(&value.ty);
	debug!(label = %value.label, type_name = value.type_name(), kind = kind.as_str(), "classified value");

	let outcome = match kind {
		ValueKind::Text => decode_text(inspector, value).map(Rendering::Text),
		ValueKind::Sequence => SequenceView::new(inspector, value).map(Rendering::Sequence),
		ValueKind::Unrecognized => return Rendering::Unclaimed,
	};

	outcome.unwrap_or_else(|err| {
		warn!(label = %value.label, type_name = value.type_name(), error = %err, "decoder failed; using fallback rendering");
		Rendering::Fallback {
			kind,
			reason: err.to_string(),
		}
	})
}
