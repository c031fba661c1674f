use std::sync::Arc;

use crate::view::{TypeDescriptor, TypeMatcher, ValueKind};

#[test]
fn text_matches_exact_and_nullable_spellings() {
	let matcher = TypeMatcher::default();
	assert_eq!(matcher.classify("String"), ValueKind::Text);
	assert_eq!(matcher.classify("String*"), ValueKind::Text);
	assert_eq!(matcher.classify("(String | Nil)"), ValueKind::Text);
	assert_eq!(matcher.classify("(Nil | String) *"), ValueKind::Text);
}

#[test]
fn text_rejects_lookalikes() {
	let matcher = TypeMatcher::default();
	assert_eq!(matcher.classify("StringBuilder"), ValueKind::Unrecognized);
	assert_eq!(matcher.classify("String(Int32)"), ValueKind::Unrecognized);
	assert_eq!(matcher.classify("(String | Int32)"), ValueKind::Unrecognized);
	assert_eq!(matcher.classify("(String | Int32 | Nil)"), ValueKind::Unrecognized);
}

#[test]
fn sequence_matches_exact_and_parametric_names() {
	let matcher = TypeMatcher::default();
	assert_eq!(matcher.classify("Array"), ValueKind::Sequence);
	assert_eq!(matcher.classify("Array(Int32)"), ValueKind::Sequence);
	assert_eq!(matcher.classify("Array(String | Nil)*"), ValueKind::Sequence);
	assert_eq!(matcher.classify("Array(Array(UInt8)) **"), ValueKind::Sequence);
}

#[test]
fn sequence_prefix_requires_immediate_delimiter() {
	let matcher = TypeMatcher::new("Str", "Seq", "Nil");
	assert_eq!(matcher.classify("Seq(Int32)"), ValueKind::Sequence);
	assert_eq!(matcher.classify("SeqOfThings"), ValueKind::Unrecognized);
	assert_eq!(matcher.classify("Seq (Int32)"), ValueKind::Unrecognized);
	assert_eq!(matcher.classify("Seq()"), ValueKind::Unrecognized);
	assert_eq!(matcher.classify("Seq(Int32"), ValueKind::Unrecognized);
}

#[test]
fn nullable_sequence_is_not_claimed() {
	let matcher = TypeMatcher::default();
	assert_eq!(matcher.classify("(Array(Int32) | Nil)"), ValueKind::Unrecognized);
}

#[test]
fn descriptor_classification_strips_one_pointer_layer() {
	let matcher = TypeMatcher::default();
	let string = Arc::new(TypeDescriptor::opaque("String", 16));
	let ptr = TypeDescriptor::pointer_to(Arc::clone(&string));
	assert_eq!(matcher.classify_type(&string), ValueKind::Text);
	assert_eq!(matcher.classify_type(&ptr), ValueKind::Text);

	let int32 = TypeDescriptor::scalar("Int32", 4, true);
	assert_eq!(matcher.classify_type(&int32), ValueKind::Unrecognized);
}
