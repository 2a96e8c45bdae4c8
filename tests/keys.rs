use trellis_dom::{
	keys::{generate_keys, TypeNames},
	ComponentType, ElementNode, ReconcileError, ViewNode,
};

struct Card;
struct Banner;

#[test]
fn positional_per_type() {
	let children: Vec<ViewNode> = vec![ElementNode::new("span").into(), ElementNode::new("i").into(), ElementNode::new("span").into()];
	let keyed = generate_keys(&children, &mut TypeNames::new()).unwrap();
	assert_eq!(keyed.keys, ["span_0", "i_0", "span_1"]);
	assert_eq!(keyed.get("span_1").map(|(_, index)| index), Some(2));
}

#[test]
fn text_is_counted_separately() {
	let children: Vec<ViewNode> = vec!["Hello".into(), ElementNode::new("span").into(), "!".into()];
	let keyed = generate_keys(&children, &mut TypeNames::new()).unwrap();
	assert_eq!(keyed.keys, ["$text_0", "span_0", "$text_1"]);
}

#[test]
fn explicit_keys_are_verbatim() {
	let children: Vec<ViewNode> = vec![
		ElementNode::new("li").key("first").into(),
		ElementNode::new("li").into(),
		ElementNode::new("li").key(7).into(),
	];
	let keyed = generate_keys(&children, &mut TypeNames::new()).unwrap();
	assert_eq!(keyed.keys, ["first", "li_0", "7"]);
}

#[test]
fn component_names_are_stable() {
	let mut type_names = TypeNames::new();
	let children: Vec<ViewNode> = vec![
		ElementNode::new(ComponentType::of::<Card>()).into(),
		ElementNode::new(ComponentType::of::<Banner>()).into(),
		ElementNode::new(ComponentType::of::<Card>()).into(),
	];

	let keyed = generate_keys(&children, &mut type_names).unwrap();
	assert_eq!(keyed.keys, ["$component0_0", "$component1_0", "$component0_1"]);
	assert_eq!(type_names.len(), 2);

	let again = generate_keys(&children[1..], &mut type_names).unwrap();
	assert_eq!(again.keys, ["$component1_0", "$component0_0"]);
	assert_eq!(type_names.len(), 2);
}

#[test]
fn duplicate_explicit_key() {
	let children: Vec<ViewNode> = vec![ElementNode::new("span").key("a").into(), ElementNode::new("i").key("a").into()];
	match generate_keys(&children, &mut TypeNames::new()) {
		Err(ReconcileError::DuplicateKey { key }) => assert_eq!(key, "a"),
		other => panic!("Expected a duplicate key error, got {:?}", other),
	};
}

#[test]
fn explicit_key_can_clash_with_implicit() {
	let children: Vec<ViewNode> = vec![ElementNode::new("i").key("span_0").into(), ElementNode::new("span").into()];
	assert!(matches!(
		generate_keys(&children, &mut TypeNames::new()),
		Err(ReconcileError::DuplicateKey { .. })
	));
}
