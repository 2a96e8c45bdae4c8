//! Reading descriptors back out of existing DOM content.

use crate::view::{ClassValue, ElementNode, StyleMap, ViewNode};
use tracing::trace;
use wasm_bindgen::JsCast;
use web_sys::{Attr, Element, NamedNodeMap, Node, NodeList, Text};

/// Builds a descriptor for `node`, or [`None`] if it's neither an element nor text (e.g. a comment).
#[must_use]
pub fn load_node(node: &Node) -> Option<ViewNode> {
	if let Some(element) = node.dyn_ref::<Element>() {
		Some(load_element(element).into())
	} else if let Some(text) = node.dyn_ref::<Text>() {
		Some(ViewNode::text(text.data()))
	} else {
		trace!("Skipping unsupported node {:?}.", node);
		None
	}
}

#[must_use]
pub fn load_child_nodes(child_nodes: &NodeList) -> Vec<ViewNode> {
	(0..child_nodes.length())
		.filter_map(|i| child_nodes.item(i))
		.filter_map(|child| load_node(&child))
		.collect()
}

/// Attributes become string properties, except for `class` and `style`.
#[must_use]
pub fn load_element(element: &Element) -> ElementNode {
	let mut loaded = ElementNode::new(element.local_name());
	load_attributes(&element.attributes(), &mut loaded);

	let node: &Node = element.as_ref();
	let children = load_child_nodes(&node.child_nodes());
	if !children.is_empty() {
		loaded.children = Some(children)
	}
	loaded
}

fn load_attributes(attributes: &NamedNodeMap, element: &mut ElementNode) {
	for attribute in (0..attributes.length()).filter_map(|i| attributes.item(i)) {
		load_attribute(&attribute, element)
	}
}

fn load_attribute(attribute: &Attr, element: &mut ElementNode) {
	let value = attribute.value();
	match attribute.local_name().as_str() {
		"class" => element.class_name = Some(ClassValue::Single(value)),
		"style" => element.style = Some(parse_style(&value)),
		name => {
			element.props.insert(name.to_owned(), value.into());
		}
	}
}

/// Parses inline declarations like `height: 100px; width: 100px;`.
#[must_use]
pub fn parse_style(declarations: &str) -> StyleMap {
	declarations
		.split(';')
		.filter_map(|declaration| declaration.split_once(':'))
		.map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
		.filter(|(name, _)| !name.is_empty())
		.collect()
}
