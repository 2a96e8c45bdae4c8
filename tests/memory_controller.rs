mod common;

use indexmap::IndexMap;
use std::{any::Any, cell::Cell, rc::Rc};
use trellis_dom::{
	memory::{MemoryNode, MemoryRenderer, Mutation},
	ElementNode, Handler, Reconciler, Root, ViewNode,
};

fn mount() -> Root<MemoryRenderer> {
	common::init_logging();
	let renderer = MemoryRenderer::recording();
	let container = renderer.container("div");
	Root::new(Reconciler::new(renderer), container)
}

fn render(root: &mut Root<MemoryRenderer>, view: impl Into<ViewNode>) -> String {
	root.render(&view.into()).unwrap();
	root.renderer().inner_html(*root.container())
}

fn root_node(root: &Root<MemoryRenderer>) -> MemoryNode {
	*root.controller().unwrap().node()
}

fn child_node(root: &Root<MemoryRenderer>, key: &str) -> MemoryNode {
	*root.controller().unwrap().as_element().unwrap().child(key).unwrap().node()
}

#[test]
fn text() {
	let mut root = mount();
	assert_eq!(render(&mut root, "Hello"), "Hello");
	assert_eq!(render(&mut root, "World"), "World");
}

#[test]
fn empty_text() {
	let mut root = mount();
	assert_eq!(render(&mut root, ""), "");
	assert_eq!(root.renderer().children(*root.container()).len(), 1);
}

#[test]
fn props() {
	let mut root = mount();
	assert_eq!(
		render(&mut root, ElementNode::new("input").prop("type", "text").prop("tabIndex", 1)),
		r#"<input type="text" tabindex="1">"#
	);
	assert_eq!(
		render(
			&mut root,
			ElementNode::new("input").prop("type", "text").prop("tabIndex", 1).prop("value", "abc")
		),
		r#"<input type="text" tabindex="1" value="abc">"#
	);
	assert_eq!(
		render(&mut root, ElementNode::new("input").prop("tabIndex", 1)),
		r#"<input type="" tabindex="1" value="">"#
	);
}

#[test]
fn property_values() {
	let mut root = mount();
	render(
		&mut root,
		ElementNode::new("input").prop("value", "abc").prop("disabled", true).prop("size", 2.5),
	);
	let node = root_node(&root);
	let renderer = root.renderer();
	assert_eq!(renderer.property(node, "value").as_deref(), Some("abc"));
	assert_eq!(renderer.property(node, "disabled").as_deref(), Some("true"));
	assert_eq!(renderer.property(node, "size").as_deref(), Some("2.5"));
}

#[test]
fn class_name() {
	let mut root = mount();
	assert_eq!(render(&mut root, ElementNode::new("div").class("a b")), r#"<div class="a b"></div>"#);
	assert_eq!(render(&mut root, ElementNode::new("div").class(["a", "b", "c"])), r#"<div class="a b c"></div>"#);
	assert_eq!(render(&mut root, ElementNode::new("div").class("a c")), r#"<div class="a c"></div>"#);
	assert_eq!(render(&mut root, ElementNode::new("div")), "<div></div>");
}

#[test]
fn class_map() {
	let mut root = mount();
	let mut classes = IndexMap::new();
	classes.insert("active".to_owned(), true);
	classes.insert("hidden".to_owned(), false);
	assert_eq!(render(&mut root, ElementNode::new("div").class(classes)), r#"<div class="active"></div>"#);

	root.renderer().take_mutations();
	render(&mut root, ElementNode::new("div").class("active"));
	assert_eq!(root.renderer().take_mutations(), []);
}

#[test]
fn style() {
	let mut root = mount();
	assert_eq!(
		render(&mut root, ElementNode::new("div").style("height", "100px")),
		r#"<div style="height: 100px;"></div>"#
	);
	assert_eq!(
		render(&mut root, ElementNode::new("div").style("height", "100px").style("width", "100px")),
		r#"<div style="height: 100px; width: 100px;"></div>"#
	);
	assert_eq!(
		render(&mut root, ElementNode::new("div").style("height", "100px")),
		r#"<div style="height: 100px;"></div>"#
	);
}

#[test]
fn style_unit_suffix() {
	let mut root = mount();
	assert_eq!(
		render(&mut root, ElementNode::new("div").style("width.px", "100").style("opacity", "0.5")),
		r#"<div style="width: 100px; opacity: 0.5;"></div>"#
	);

	root.renderer().take_mutations();
	render(&mut root, ElementNode::new("div").style("width", "100px").style("opacity", "0.5"));
	assert_eq!(root.renderer().take_mutations(), []);
}

#[test]
fn mixed_children() {
	let mut root = mount();
	assert_eq!(
		render(&mut root, ElementNode::new("p").child("Hello").child(ElementNode::new("span").child("World")).child("!")),
		"<p>Hello<span>World</span>!</p>"
	);
}

#[test]
fn append_children() {
	let mut root = mount();
	render(&mut root, ElementNode::new("p").child(ElementNode::new("span").child("Hello")));
	let first = child_node(&root, "span_0");

	assert_eq!(
		render(
			&mut root,
			ElementNode::new("p")
				.child(ElementNode::new("span").child("Hello"))
				.child(ElementNode::new("span").child("World"))
		),
		"<p><span>Hello</span><span>World</span></p>"
	);
	assert_eq!(child_node(&root, "span_0"), first);
}

#[test]
fn remove_children() {
	let mut root = mount();
	render(
		&mut root,
		ElementNode::new("p")
			.child(ElementNode::new("span").child("Hello"))
			.child(ElementNode::new("span").child("World"))
			.child("!"),
	);
	assert_eq!(
		render(&mut root, ElementNode::new("p").child(ElementNode::new("span").child("World")).child("!")),
		"<p><span>World</span>!</p>"
	);
}

#[test]
fn swap_children() {
	let mut root = mount();
	render(
		&mut root,
		ElementNode::new("p")
			.child(ElementNode::new("span").key("a").child("Hello"))
			.child(ElementNode::new("span").key("b").child("World"))
			.child("!"),
	);
	let a = child_node(&root, "a");
	let b = child_node(&root, "b");

	assert_eq!(
		render(
			&mut root,
			ElementNode::new("p")
				.child("! ")
				.child(ElementNode::new("span").key("b").child("World"))
				.child(ElementNode::new("span").key("a").child("Hello"))
		),
		"<p>! <span>World</span><span>Hello</span></p>"
	);
	assert_eq!(child_node(&root, "a"), a);
	assert_eq!(child_node(&root, "b"), b);
}

#[test]
fn insert_children() {
	let mut root = mount();
	render(
		&mut root,
		ElementNode::new("p").child(ElementNode::new("span").key("a").child("Hello")).child("!"),
	);
	let a = child_node(&root, "a");
	root.renderer().take_mutations();

	assert_eq!(
		render(
			&mut root,
			ElementNode::new("p")
				.child(ElementNode::new("span").key("b").child("World"))
				.child(" ")
				.child(ElementNode::new("i"))
				.child(ElementNode::new("span").key("a").child("Hello"))
				.child("!")
		),
		"<p><span>World</span> <i></i><span>Hello</span>!</p>"
	);
	assert_eq!(child_node(&root, "a"), a);
	assert!(!root
		.renderer()
		.take_mutations()
		.iter()
		.any(|mutation| matches!(mutation, Mutation::RemoveChild { child, .. } | Mutation::InsertBefore { child, .. } | Mutation::AppendChild { child, .. } if *child == a)));
}

#[test]
fn retyped_explicit_key_is_replaced() {
	let mut root = mount();
	render(&mut root, ElementNode::new("ul").child(ElementNode::new("li").key(1).child("one")));
	let before = child_node(&root, "1");

	assert_eq!(
		render(&mut root, ElementNode::new("ul").child(ElementNode::new("p").key(1).child("one"))),
		"<ul><p>one</p></ul>"
	);
	assert_ne!(child_node(&root, "1"), before);
	assert!(!root.renderer().is_live(before));
}

#[test]
fn events() {
	let mut root = mount();
	let clicks = Rc::new(Cell::new(0));
	let replaced = Rc::new(Cell::new(0));

	render(&mut root, ElementNode::new("button").on("onClick", {
		let clicks = Rc::clone(&clicks);
		move |_: &dyn Any| clicks.set(clicks.get() + 1)
	}));
	let button = root_node(&root);
	assert_eq!(root.renderer().dispatch(button, "click", &()), 1);
	assert_eq!(clicks.get(), 1);

	render(&mut root, ElementNode::new("button").on("onClick", {
		let replaced = Rc::clone(&replaced);
		move |_: &dyn Any| replaced.set(replaced.get() + 1)
	}));
	assert_eq!(root.renderer().listener_count(button), 1);
	assert_eq!(root.renderer().dispatch(button, "click", &()), 1);
	assert_eq!((clicks.get(), replaced.get()), (1, 1));

	assert_eq!(render(&mut root, ElementNode::new("button")), "<button></button>");
	assert_eq!(root.renderer().listener_count(button), 0);
	assert_eq!(root.renderer().dispatch(button, "click", &()), 0);
	assert_eq!((clicks.get(), replaced.get()), (1, 1));
}

#[test]
fn event_payload() {
	let mut root = mount();
	let seen = Rc::new(Cell::new(0));
	render(&mut root, ElementNode::new("input").on("onInput", {
		let seen = Rc::clone(&seen);
		move |event: &dyn Any| seen.set(*event.downcast_ref::<i32>().unwrap())
	}));
	root.renderer().dispatch(root_node(&root), "input", &42);
	assert_eq!(seen.get(), 42);
}

#[test]
fn idempotent() {
	let mut root = mount();
	let handler = Handler::new(|_| ());
	let view = || -> ViewNode {
		ElementNode::new("section")
			.class("a b")
			.style("width.px", "10")
			.prop("title", "Greeting")
			.prop("onClick", handler.clone())
			.child(ElementNode::new("h1").child("Hello"))
			.child("World")
			.into()
	};

	root.render(&view()).unwrap();
	assert!(!root.renderer().take_mutations().is_empty());

	root.render(&view()).unwrap();
	assert_eq!(root.renderer().take_mutations(), []);
}

#[test]
fn unchanged_children_stay_in_place() {
	let mut root = mount();
	let list = |items: &[&str]| -> ViewNode {
		ElementNode::new("ul")
			.children(items.iter().map(|&item| ElementNode::new("li").key(item).child(item)))
			.into()
	};

	root.render(&list(&["a", "b", "c"])).unwrap();
	let nodes = ["a", "b", "c"].iter().map(|key| child_node(&root, key)).collect::<Vec<_>>();
	root.renderer().take_mutations();

	root.render(&list(&["a", "c"])).unwrap();
	let list_node = root_node(&root);
	let mutations = root.renderer().take_mutations();
	assert_eq!(
		mutations
			.iter()
			.filter(|mutation| matches!(mutation, Mutation::RemoveChild { parent, .. } if *parent == list_node))
			.collect::<Vec<_>>(),
		[&Mutation::RemoveChild {
			parent: list_node,
			child: nodes[1],
		}]
	);
	assert!(!mutations
		.iter()
		.any(|mutation| matches!(mutation, Mutation::InsertBefore { .. } | Mutation::AppendChild { .. })));
	assert_eq!(child_node(&root, "a"), nodes[0]);
	assert_eq!(child_node(&root, "c"), nodes[2]);
}

#[test]
fn keys_follow_the_children() {
	let mut root = mount();
	render(&mut root, ElementNode::new("div").child("x").child(ElementNode::new("b")).child("y"));
	let keys = root
		.controller()
		.unwrap()
		.as_element()
		.unwrap()
		.children()
		.map(|(key, _)| key.to_owned())
		.collect::<Vec<_>>();
	assert_eq!(keys, ["$text_0", "b_0", "$text_1"]);
}

#[test]
fn end_to_end() {
	let mut root = mount();
	assert_eq!(
		render(
			&mut root,
			ElementNode::new("p")
				.child(ElementNode::new("span").child("Hello"))
				.child(" ")
				.child(ElementNode::new("span").child("World"))
				.child("!")
		),
		"<p><span>Hello</span> <span>World</span>!</p>"
	);
	assert_eq!(
		render(&mut root, ElementNode::new("p").child(ElementNode::new("span").child("World")).child("!")),
		"<p><span>World</span>!</p>"
	);
}

#[test]
fn property_round_trip() {
	let mut root = mount();
	render(&mut root, ElementNode::new("div").prop("a", 1).prop("b", 2));
	let div = root_node(&root);
	root.renderer().take_mutations();

	render(&mut root, ElementNode::new("div").prop("a", 1));
	assert_eq!(
		root.renderer().take_mutations(),
		[Mutation::SetProperty {
			node: div,
			name: "b".to_owned(),
			value: String::new(),
		}]
	);

	render(&mut root, ElementNode::new("div"));
	root.renderer().take_mutations();
	render(&mut root, ElementNode::new("div").prop("a", 1));
	assert_eq!(
		root.renderer().take_mutations(),
		[Mutation::SetProperty {
			node: div,
			name: "a".to_owned(),
			value: "1".to_owned(),
		}]
	);
}

#[test]
fn same_event_twice() {
	let mut root = mount();
	let result = root.render(
		&ElementNode::new("button")
			.on("onClick", |_: &dyn Any| ())
			.on("onCLICK", |_: &dyn Any| ())
			.into(),
	);
	assert!(matches!(
		result,
		Err(trellis_dom::ReconcileError::MalformedProperty { reason: "event bound twice", .. })
	));
	assert!(root.controller().is_none());
	assert!(!root
		.renderer()
		.take_mutations()
		.iter()
		.any(|mutation| matches!(mutation, Mutation::Listen { .. })));
	assert_eq!(root.renderer().node_count(), 1);
}
