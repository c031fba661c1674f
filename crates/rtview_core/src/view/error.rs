use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ViewError>;

/// Errors produced while matching, laying out, reading, and decoding runtime values.
#[derive(Debug, Error)]
pub enum ViewError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Snapshot JSON failed to parse.
	#[error("snapshot json: {0}")]
	Json(#[from] serde_json::Error),
	/// Unknown leading snapshot magic.
	#[error("unsupported compression or not a snapshot (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Address range is not readable in the inferior.
	#[error("unmapped memory at 0x{address:016x} (len={len})")]
	UnmappedMemory {
		/// First requested address.
		address: u64,
		/// Requested byte count.
		len: usize,
	},
	/// Requested read exceeded the safety ceiling.
	#[error("read of {len} bytes at 0x{address:016x} exceeds ceiling {max}")]
	ReadTooLarge {
		/// First requested address.
		address: u64,
		/// Requested byte count.
		len: usize,
		/// Configured ceiling.
		max: usize,
	},
	/// Address arithmetic wrapped around the address space.
	#[error("address overflow: 0x{base:016x} + {offset}")]
	AddressOverflow {
		/// Base address.
		base: u64,
		/// Byte offset that overflowed.
		offset: u64,
	},
	/// Length or size field is negative or implausibly large.
	#[error("malformed {field} length {raw} (max={max})")]
	MalformedLength {
		/// Logical field being validated.
		field: &'static str,
		/// Raw value as read from memory.
		raw: i64,
		/// Maximum accepted value.
		max: u64,
	},
	/// Sequence child requested beyond the cached count.
	#[error("index {index} out of range (count={count})")]
	IndexOutOfRange {
		/// Requested child index.
		index: usize,
		/// Cached element count.
		count: usize,
	},
	/// Sequence reports elements but its buffer pointer is null.
	#[error("null buffer for non-empty sequence (count={count})")]
	NullBuffer {
		/// Element count read from the value.
		count: usize,
	},
	/// Pointer dereference hit null.
	#[error("null pointer to {type_name}")]
	NullPointer {
		/// Declared pointee type name.
		type_name: String,
	},
	/// Dereference attempted on a non-pointer value.
	#[error("{type_name} is not a pointer type")]
	NotAPointer {
		/// Type name of the value.
		type_name: String,
	},
	/// Named field is absent from the type description.
	#[error("missing field {field} on {type_name}")]
	MissingField {
		/// Owning type name.
		type_name: String,
		/// Requested field name.
		field: String,
	},
	/// Positional field index is beyond the known layout.
	#[error("field index {index} out of range on {type_name} (fields={count})")]
	FieldIndexOutOfRange {
		/// Owning type name.
		type_name: String,
		/// Requested field index.
		index: usize,
		/// Number of known fields.
		count: usize,
	},
	/// Value type exposes no field information and has no positional schema.
	#[error("no field layout available for {type_name}")]
	NoFieldLayout {
		/// Type name of the value.
		type_name: String,
	},
	/// Scalar read requested for an unsupported width.
	#[error("unsupported scalar size {size} for {type_name}")]
	UnsupportedScalarSize {
		/// Type name being read.
		type_name: String,
		/// Declared byte width.
		size: usize,
	},
	/// Target pointer width is not 4 or 8 bytes.
	#[error("unsupported pointer size {size}")]
	UnsupportedPointerSize {
		/// Declared pointer width.
		size: usize,
	},
	/// Sequence element type could not be determined.
	#[error("cannot determine element type of {type_name}")]
	MissingElementType {
		/// Sequence type name.
		type_name: String,
	},
	/// Decoder invoked on a value whose type it does not handle.
	#[error("{type_name} is not a {expected} value")]
	UnexpectedKind {
		/// Decoder kind label.
		expected: &'static str,
		/// Offending type name.
		type_name: String,
	},
	/// Type name could not be resolved in the type table.
	#[error("unknown type: {name}")]
	UnknownType {
		/// Requested type name.
		name: String,
	},
	/// Type declared twice in a snapshot.
	#[error("duplicate type: {name}")]
	DuplicateType {
		/// Repeated type name.
		name: String,
	},
	/// Type references form a cycle.
	#[error("recursive type reference: {name}")]
	RecursiveType {
		/// Type where the cycle was detected.
		name: String,
	},
	/// Hex literal in a snapshot is malformed.
	#[error("invalid hex literal: {value}")]
	InvalidHex {
		/// Original text.
		value: String,
	},
	/// Two captured memory regions overlap.
	#[error("overlapping memory regions at 0x{address:016x}")]
	OverlappingRegions {
		/// Start address of the later region.
		address: u64,
	},
	/// Requested snapshot root label was not found.
	#[error("root not found: {label}")]
	RootNotFound {
		/// Requested root label.
		label: String,
	},
	/// Host type pattern failed to compile.
	#[error("invalid type pattern {pattern}: {source}")]
	InvalidPattern {
		/// Pattern source text.
		pattern: String,
		/// Regex compile error.
		#[source]
		source: regex::Error,
	},
	/// Display key does not parse as a child index.
	#[error("unrecognized child key: {key}")]
	UnrecognizedKey {
		/// Key as supplied by the caller.
		key: String,
	},
}

impl ViewError {
	/// Whether this error only means "the field is not there", as opposed to a read failure.
	pub fn is_missing_field(&self) -> bool {
		matches!(self, Self::MissingField { .. } | Self::FieldIndexOutOfRange { .. })
	}
}
