/// Sequence child lookup command.
pub mod child;
/// Snapshot summary command.
pub mod info;
/// Host registration command listing.
pub mod patterns;
/// Root rendering command and shared value tree builder.
pub mod print;
/// Shared CLI helpers.
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;
