use std::sync::Arc;

use crate::view::test_support::{array_bytes, array_type, int32, memory, ptr, string_type, text_bytes};
use crate::view::{
	DecodeOptions, DisplayHint, FieldMode, FieldSpec, Inspector, SequenceView, Target, TypeDescriptor, TypeSpec, TypeTable, Value, ViewError, decode_text,
	parse_child_key,
};

fn int64() -> Arc<TypeDescriptor> {
	Arc::new(TypeDescriptor::scalar("Int64", 8, true))
}

fn int64_buffer(values: &[i64]) -> Vec<u8> {
	values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

#[test]
fn children_are_spaced_by_element_size() {
	let memory = memory(vec![(0x100, array_bytes(3, 4, 0x1000)), (0x1000, int64_buffer(&[10, -20, 30]))]);
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), DecodeOptions::default());
	let view = SequenceView::new(&inspector, &Value::new("a", array_type(int64()), 0x100)).expect("opens");

	assert_eq!(view.count(), 3);
	assert_eq!(view.element_size(), 8);
	let addresses: Vec<u64> = view.children().map(|child| child.expect("child").address).collect();
	assert_eq!(addresses, vec![0x1000, 0x1008, 0x1010]);

	let second = view.child_at(1).expect("child");
	assert_eq!(second.label.as_ref(), "[1]");
	assert_eq!(second.type_name(), "Int64");
	assert_eq!(inspector.read_signed(&second).expect("element"), -20);

	let err = view.child_at(3).expect_err("past the end");
	assert!(matches!(err, ViewError::IndexOutOfRange { index: 3, count: 3 }));
}

#[test]
fn summary_is_type_name_without_pointer() {
	let array = array_type(int32());
	let memory = memory(vec![(0x100, 0x200_u64.to_le_bytes().to_vec()), (0x200, array_bytes(0, 0, 0))]);
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), DecodeOptions::default());
	let view = SequenceView::new(&inspector, &Value::new("a", ptr(&array), 0x100)).expect("opens");

	assert_eq!(view.summary(), "Array(Int32)");
	assert_eq!(view.hint(), DisplayHint::Array);
	assert_eq!(view.count(), 0);
	assert_eq!(view.children().count(), 0);
}

#[test]
fn display_keys_map_back_to_indices() {
	assert_eq!(parse_child_key("[2]"), Some(2));
	assert_eq!(parse_child_key("7"), Some(7));
	assert_eq!(parse_child_key(" [ 12 ] "), Some(12));
	assert_eq!(parse_child_key("[x]"), None);
	assert_eq!(parse_child_key("[-1]"), None);
	assert_eq!(parse_child_key("[3"), None);
	assert_eq!(parse_child_key(""), None);
}

#[test]
fn negative_count_is_malformed() {
	let memory = memory(vec![(0x100, array_bytes(-5, 0, 0x1000))]);
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), DecodeOptions::default());
	let err = SequenceView::new(&inspector, &Value::new("a", array_type(int32()), 0x100))
		.err()
		.expect("negative count");
	assert!(matches!(err, ViewError::MalformedLength { field: "size", raw: -5, .. }));
}

#[test]
fn huge_count_is_clamped() {
	let memory = memory(vec![(0x100, array_bytes(1000, 1000, 0x1000))]);
	let options = DecodeOptions {
		max_children: 4,
		..DecodeOptions::default()
	};
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), options);
	let view = SequenceView::new(&inspector, &Value::new("a", array_type(int32()), 0x100)).expect("opens");

	assert_eq!(view.count(), 4);
	assert_eq!(view.reported_count(), 1000);
	assert!(view.truncated());
	assert_eq!(view.child_at(3).expect("last exposed").address, 0x100c);
	assert!(view.child_at(4).is_err());
}

#[test]
fn null_buffer_with_elements_is_refused() {
	let memory = memory(vec![(0x100, array_bytes(2, 2, 0))]);
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), DecodeOptions::default());
	let err = SequenceView::new(&inspector, &Value::new("a", array_type(int32()), 0x100))
		.err()
		.expect("null buffer");
	assert!(matches!(err, ViewError::NullBuffer { count: 2 }));
}

#[test]
fn element_type_falls_back_to_buffer_pointee() {
	let int32 = int32();
	let array = Arc::new(TypeDescriptor::structure(
		"Array(Int32)",
		vec![
			crate::view::FieldDesc::named("type_id", Arc::clone(&int32)),
			crate::view::FieldDesc::named("size", Arc::clone(&int32)),
			crate::view::FieldDesc::named("capacity", Arc::clone(&int32)),
			crate::view::FieldDesc::named("offset_to_buffer", Arc::clone(&int32)),
			crate::view::FieldDesc::named("buffer", ptr(&int32)),
		],
	));
	let memory = memory(vec![(0x100, array_bytes(2, 2, 0x1000))]);
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), DecodeOptions::default());
	let view = SequenceView::new(&inspector, &Value::new("a", array, 0x100)).expect("opens");
	assert_eq!(view.element_type().name.as_ref(), "Int32");
	assert_eq!(view.child_at(1).expect("child").address, 0x1004);
}

#[test]
fn text_children_are_reenterable() {
	let string = string_type();
	let mut buffer = Vec::new();
	buffer.extend_from_slice(&0x2000_u64.to_le_bytes());
	buffer.extend_from_slice(&0x2100_u64.to_le_bytes());
	let memory = memory(vec![
		(0x100, array_bytes(2, 2, 0x1000)),
		(0x1000, buffer),
		(0x2000, text_bytes(3, 3, b"one")),
		(0x2100, text_bytes(3, 3, b"two")),
	]);
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), DecodeOptions::default());
	let view = SequenceView::new(&inspector, &Value::new("words", array_type(ptr(&string)), 0x100)).expect("opens");

	let texts: Vec<String> = view
		.children()
		.map(|child| decode_text(&inspector, &child.expect("child")).expect("text").text)
		.collect();
	assert_eq!(texts, vec!["one", "two"]);
}

#[test]
fn positional_backend_reads_opaque_sequence() {
	let memory = memory(vec![(0x100, array_bytes(2, 2, 0x1000))]);
	let options = DecodeOptions {
		fields: FieldMode::Positional,
		..DecodeOptions::default()
	};
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), options);
	let opaque = Arc::new(TypeDescriptor::opaque("Array(Int32)", 24).with_element(int32()));
	let view = SequenceView::new(&inspector, &Value::new("a", opaque, 0x100)).expect("opens");
	assert_eq!(view.count(), 2);
	assert_eq!(view.child_at(1).expect("child").address, 0x1004);
}

#[test]
fn linked_element_children_decode_and_follow_next() {
	let field = |name: &str, type_name: &str| FieldSpec {
		name: Some(name.to_owned()),
		type_name: type_name.to_owned(),
		offset: None,
	};
	let table = TypeTable::build(vec![
		TypeSpec::Scalar {
			name: "Int32".to_owned(),
			size: 4,
			signed: true,
		},
		TypeSpec::Struct {
			name: "Node".to_owned(),
			fields: vec![field("value", "Int32"), field("next", "Node*")],
			element: None,
			size: None,
		},
		TypeSpec::Struct {
			name: "Array(Node)".to_owned(),
			fields: vec![
				field("type_id", "Int32"),
				field("size", "Int32"),
				field("capacity", "Int32"),
				field("offset_to_buffer", "Int32"),
				field("buffer", "Node*"),
			],
			element: Some("Node".to_owned()),
			size: None,
		},
	])
	.expect("linked types build");

	let mut nodes = Vec::new();
	for (value, next) in [(7_i32, 0x2010_u64), (8, 0)] {
		nodes.extend_from_slice(&value.to_le_bytes());
		nodes.extend_from_slice(&[0; 4]);
		nodes.extend_from_slice(&next.to_le_bytes());
	}
	let memory = memory(vec![(0x1000, array_bytes(2, 2, 0x2000)), (0x2000, nodes)]);
	let inspector = Inspector::new(&memory, Target::x86_64_linux(), DecodeOptions::default());
	let list = Value::new("list", table.get("Array(Node)").expect("array type"), 0x1000);
	let view = SequenceView::new(&inspector, &list).expect("opens");

	assert_eq!(view.count(), 2);
	assert_eq!(view.element_size(), 16);
	let first = view.child_at(0).expect("child");
	let value = inspector.fields().field_by_name(&first, "value").expect("value field");
	assert_eq!(inspector.read_signed(&value).expect("value"), 7);

	let next = inspector.fields().field_by_name(&first, "next").expect("next field");
	let second = inspector.deref(&next).expect("next node");
	assert_eq!(second.address, view.child_at(1).expect("child").address);
	let value = inspector.fields().field_by_name(&second, "value").expect("value field");
	assert_eq!(inspector.read_signed(&value).expect("value"), 8);

	let last = inspector.fields().field_by_name(&second, "next").expect("next field");
	assert!(matches!(inspector.deref(&last), Err(ViewError::NullPointer { .. })));
}
