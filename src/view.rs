//! Declarative view descriptors.
//!
//! A [`ViewNode`] describes one tree position for a single render pass. Descriptors are plain immutable data:
//! they are produced fresh for every render and compared against the state a controller retained from the last one.

use core::{
	any::{type_name, Any, TypeId},
	fmt::{self, Debug, Display, Formatter},
};
use indexmap::IndexMap;
use std::{borrow::Cow, rc::Rc};

/// The type name reported by text nodes.
pub const TEXT_TYPE: &str = "$text";

/// Flat property mapping of an element, in insertion order.
pub type Props = IndexMap<String, PropValue>;

/// CSS declarations by property name, in insertion order.
///
/// A name may carry a unit suffix (`"width.px"`), which is appended to the value when applied.
pub type StyleMap = IndexMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub enum ViewNode {
	Text(TextNode),
	Element(ElementNode),
}

impl ViewNode {
	#[must_use]
	pub fn text(content: impl Into<String>) -> Self {
		Self::Text(TextNode { content: content.into() })
	}

	/// The tag used to pick a controller kind and to prefix implicit keys.
	#[must_use]
	pub fn type_tag(&self) -> TypeTag {
		match self {
			ViewNode::Text(_) => TypeTag::text(),
			ViewNode::Element(element) => element.type_tag.clone(),
		}
	}

	#[must_use]
	pub fn key(&self) -> Option<&Key> {
		match self {
			ViewNode::Text(_) => None,
			ViewNode::Element(element) => element.key.as_ref(),
		}
	}
}

impl From<TextNode> for ViewNode {
	fn from(text: TextNode) -> Self {
		Self::Text(text)
	}
}

impl From<ElementNode> for ViewNode {
	fn from(element: ElementNode) -> Self {
		Self::Element(element)
	}
}

impl From<&str> for ViewNode {
	fn from(content: &str) -> Self {
		Self::text(content)
	}
}

impl From<String> for ViewNode {
	fn from(content: String) -> Self {
		Self::text(content)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNode {
	pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElementNode {
	pub type_tag: TypeTag,
	pub class_name: Option<ClassValue>,
	pub style: Option<StyleMap>,
	pub props: Props,
	pub children: Option<Vec<ViewNode>>,
	pub key: Option<Key>,
}

impl ElementNode {
	#[must_use]
	pub fn new(type_tag: impl Into<TypeTag>) -> Self {
		Self {
			type_tag: type_tag.into(),
			class_name: None,
			style: None,
			props: Props::new(),
			children: None,
			key: None,
		}
	}

	#[must_use]
	pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
		self.props.insert(name.into(), value.into());
		self
	}

	/// Shorthand for an event-prefixed handler property, i.e. `on("onClick", …)`.
	#[must_use]
	pub fn on(self, name: impl Into<String>, handler: impl Fn(&dyn Any) + 'static) -> Self {
		self.prop(name, Handler::new(handler))
	}

	#[must_use]
	pub fn class(mut self, class_name: impl Into<ClassValue>) -> Self {
		self.class_name = Some(class_name.into());
		self
	}

	#[must_use]
	pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.style.get_or_insert_with(StyleMap::new).insert(name.into(), value.into());
		self
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<ViewNode>) -> Self {
		self.children.get_or_insert_with(Vec::new).push(child.into());
		self
	}

	#[must_use]
	pub fn children<I>(mut self, children: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<ViewNode>,
	{
		self.children.get_or_insert_with(Vec::new).extend(children.into_iter().map(Into::into));
		self
	}

	#[must_use]
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}
}

/// Identifies which kind of node a descriptor stands for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
	/// A host element tag name, or the text sentinel [`TEXT_TYPE`].
	Native(Cow<'static, str>),
	/// A non-primitive type value. No built-in controller kind supports these.
	Component(ComponentType),
}

impl TypeTag {
	#[must_use]
	pub fn text() -> Self {
		Self::Native(Cow::Borrowed(TEXT_TYPE))
	}

	#[must_use]
	pub fn as_native(&self) -> Option<&str> {
		match self {
			TypeTag::Native(name) => Some(&**name),
			TypeTag::Component(_) => None,
		}
	}
}

impl Display for TypeTag {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			TypeTag::Native(name) => write!(f, "{:?}", name),
			TypeTag::Component(component) => write!(f, "<{}>", component.name()),
		}
	}
}

impl From<&'static str> for TypeTag {
	fn from(name: &'static str) -> Self {
		Self::Native(Cow::Borrowed(name))
	}
}

impl From<String> for TypeTag {
	fn from(name: String) -> Self {
		Self::Native(Cow::Owned(name))
	}
}

impl From<ComponentType> for TypeTag {
	fn from(component: ComponentType) -> Self {
		Self::Component(component)
	}
}

/// Identity of a non-primitive node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentType {
	id: TypeId,
	name: &'static str,
}

impl ComponentType {
	#[must_use]
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	#[must_use]
	pub fn id(&self) -> TypeId {
		self.id
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}
}

/// An explicit sibling identity supplied by the author.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
	String(String),
	Number(i64),
}

impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Key::String(key) => f.write_str(key),
			Key::Number(key) => write!(f, "{}", key),
		}
	}
}

impl From<&str> for Key {
	fn from(key: &str) -> Self {
		Self::String(key.to_owned())
	}
}

impl From<String> for Key {
	fn from(key: String) -> Self {
		Self::String(key)
	}
}

impl From<i64> for Key {
	fn from(key: i64) -> Self {
		Self::Number(key)
	}
}

impl From<i32> for Key {
	fn from(key: i32) -> Self {
		Self::Number(key.into())
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassValue {
	/// Whitespace-separated class names.
	Single(String),
	List(Vec<String>),
	/// Class names mapped to whether they are applied.
	Map(IndexMap<String, bool>),
}

impl From<&str> for ClassValue {
	fn from(class_name: &str) -> Self {
		Self::Single(class_name.to_owned())
	}
}

impl From<String> for ClassValue {
	fn from(class_name: String) -> Self {
		Self::Single(class_name)
	}
}

impl From<Vec<String>> for ClassValue {
	fn from(class_names: Vec<String>) -> Self {
		Self::List(class_names)
	}
}

impl From<Vec<&str>> for ClassValue {
	fn from(class_names: Vec<&str>) -> Self {
		Self::List(class_names.into_iter().map(str::to_owned).collect())
	}
}

impl<const N: usize> From<[&str; N]> for ClassValue {
	fn from(class_names: [&str; N]) -> Self {
		Self::List(class_names.iter().map(|&name| name.to_owned()).collect())
	}
}

impl From<IndexMap<String, bool>> for ClassValue {
	fn from(class_names: IndexMap<String, bool>) -> Self {
		Self::Map(class_names)
	}
}

#[derive(Clone, Debug)]
pub enum PropValue {
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	/// Only valid under event-prefixed names (`onClick`).
	Handler(Handler),
}

impl PartialEq for PropValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(PropValue::Null, PropValue::Null) => true,
			(PropValue::Bool(a), PropValue::Bool(b)) => a == b,
			#[allow(clippy::float_cmp)]
			(PropValue::Number(a), PropValue::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
			(PropValue::String(a), PropValue::String(b)) => a == b,
			(PropValue::Handler(a), PropValue::Handler(b)) => a == b,
			_ => false,
		}
	}
}

impl Display for PropValue {
	/// Formats the value the way it reads as a host attribute. Handlers have no textual form.
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			PropValue::Null => Ok(()),
			PropValue::Bool(value) => write!(f, "{}", value),
			#[allow(clippy::cast_possible_truncation)]
			PropValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => write!(f, "{}", *value as i64),
			PropValue::Number(value) => write!(f, "{}", value),
			PropValue::String(value) => f.write_str(value),
			PropValue::Handler(_) => f.write_str("[handler]"),
		}
	}
}

impl From<bool> for PropValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for PropValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i32> for PropValue {
	fn from(value: i32) -> Self {
		Self::Number(value.into())
	}
}

impl From<&str> for PropValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for PropValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Handler> for PropValue {
	fn from(handler: Handler) -> Self {
		Self::Handler(handler)
	}
}

/// A shared event callback. The event is passed type-erased, as whatever the renderer dispatches.
///
/// Two handlers are equal only if they are the same allocation,
/// so re-creating a closure on every render counts as a change.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&dyn Any)>);

impl Handler {
	pub fn new(handler: impl Fn(&dyn Any) + 'static) -> Self {
		Self(Rc::new(handler))
	}

	pub fn call(&self, event: &dyn Any) {
		(*self.0)(event)
	}
}

impl PartialEq for Handler {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for Handler {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Handler").field(&Rc::as_ptr(&self.0).cast::<()>()).finish()
	}
}
