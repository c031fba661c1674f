//! Public library API for decoding managed-runtime text and sequence values out of inferior memory.

/// Type matching, layout computation, memory access, and the text/sequence decoders.
pub mod view;
