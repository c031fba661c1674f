mod access;
mod bytes;
mod compression;
mod decl;
mod error;
mod inspect;
mod layout;
mod matcher;
mod memory;
mod registry;
mod sequence;
mod snapshot;
mod target;
mod text;
mod types;
mod value;

#[cfg(test)]
mod test_support;

/// Memory access port, field backends, runtime field slots, and decode options.
pub use access::{
	DecodeOptions, FieldAccess, FieldMode, FieldSlot, Inspector, NamedFields, PositionalFields, SEQUENCE_BUFFER, SEQUENCE_CAPACITY, SEQUENCE_OFFSET,
	SEQUENCE_SIZE, TEXT_BYTESIZE, TEXT_CHARS, TEXT_LENGTH, TYPE_ID, TextPrefix,
};
/// Snapshot compression detection result.
pub use compression::Compression;
/// Error and result aliases.
pub use error::{Result, ViewError};
/// Classification plus decoding with per-value error isolation.
pub use inspect::{Rendering, inspect};
/// C-style field placement.
pub use layout::{FieldShape, StructLayout};
/// Type-name classification.
pub use matcher::{NIL_TYPE_NAME, SEQUENCE_TYPE_NAME, TEXT_TYPE_NAME, TypeMatcher, ValueKind};
/// Inferior memory abstraction and the captured-region index.
pub use memory::{Memory, Region, SparseMemory};
/// Host printer registration.
pub use registry::{Category, DEFAULT_CATEGORY, HostFlavor, Printer, PrinterMatch, PrinterRegistry, ProviderKind, sequence_regex, text_regex};
/// Sequence decoder.
pub use sequence::{SequenceView, parse_child_key};
/// Memory snapshot loading.
pub use snapshot::{Root, Snapshot, parse_address, parse_hex_bytes};
/// Target architecture facts.
pub use target::{Endianness, PREFIXED_TEXT_TRIPLE, TEXT_PREFIX_WIDTH, Target};
/// Text decoder.
pub use text::{LengthSource, TextSummary, decode_text, escape_utf8};
/// Type descriptors and the snapshot type table.
pub use types::{FieldDesc, FieldSpec, Pointee, TypeDescriptor, TypeKind, TypeSpec, TypeTable};
/// Value views and display hints.
pub use value::{DisplayHint, Value};
