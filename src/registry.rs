use crate::{
	controller::{Controller, ElementController, TextController},
	error::ReconcileError,
	keys::TypeNames,
	renderer::Renderer,
	view::{TypeTag, ViewNode, TEXT_TYPE},
};
use tracing::{error, instrument, trace};

/// The built-in controller variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerKind {
	/// Claims exactly the text sentinel tag.
	Text,
	/// Claims every other native tag that doesn't start with `$`.
	NativeElement,
}

impl ControllerKind {
	#[must_use]
	pub fn supports(self, type_tag: &TypeTag) -> bool {
		match (self, type_tag.as_native()) {
			(ControllerKind::Text, Some(tag)) => tag == TEXT_TYPE,
			(ControllerKind::NativeElement, Some(tag)) => !tag.starts_with('$'),
			(_, None) => false,
		}
	}

	/// # Errors
	///
	/// [`ReconcileError::UnsupportedNodeType`] if this kind doesn't [support](`ControllerKind::supports`) `type_tag`,
	/// or [`ReconcileError::Host`] if the host refuses to create the node.
	pub fn create<R: Renderer>(self, renderer: &R, type_tag: &TypeTag) -> Result<Controller<R>, ReconcileError> {
		if !self.supports(type_tag) {
			return Err(ReconcileError::UnsupportedNodeType(type_tag.clone()));
		}
		Ok(match self {
			ControllerKind::Text => Controller::Text(TextController::new(renderer)),
			ControllerKind::NativeElement => Controller::Element(ElementController::new(renderer, type_tag.clone())?),
		})
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	/// Consulted in order. The first kind that supports a type tag creates its controller.
	pub kinds: Vec<ControllerKind>,
	/// Maximum element nesting below (and including) the controller an update starts at.
	pub depth_limit: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			kinds: vec![ControllerKind::Text, ControllerKind::NativeElement],
			depth_limit: 512,
		}
	}
}

/// Shared context of one controller tree: the host renderer, configuration and the type name interner used for keys.
///
/// Controllers don't keep a reference to it. It's passed into each [`Controller::update`] instead.
#[derive(Debug)]
pub struct Reconciler<R: Renderer> {
	renderer: R,
	config: Config,
	type_names: TypeNames,
}

impl<R: Renderer> Reconciler<R> {
	pub fn new(renderer: R) -> Self {
		Self::with_config(renderer, Config::default())
	}

	#[instrument(skip(renderer))]
	pub fn with_config(renderer: R, config: Config) -> Self {
		if config.kinds.is_empty() {
			error!("No controller kinds are configured. Every node type will be unsupported.");
		}
		Self {
			renderer,
			config,
			type_names: TypeNames::new(),
		}
	}

	#[must_use]
	pub fn renderer(&self) -> &R {
		&self.renderer
	}

	#[must_use]
	pub fn config(&self) -> &Config {
		&self.config
	}

	#[must_use]
	pub fn type_names(&self) -> &TypeNames {
		&self.type_names
	}

	pub fn type_names_mut(&mut self) -> &mut TypeNames {
		&mut self.type_names
	}

	/// Creates a fresh controller for `type_tag`. Its node is detached and empty until the first update.
	///
	/// # Errors
	///
	/// [`ReconcileError::UnsupportedNodeType`] if no configured kind claims `type_tag`,
	/// or [`ReconcileError::Host`] if the host refuses to create the node.
	pub fn create(&self, type_tag: &TypeTag) -> Result<Controller<R>, ReconcileError> {
		let kind = match self.config.kinds.iter().copied().find(|kind| kind.supports(type_tag)) {
			Some(kind) => kind,
			None => {
				error!(%type_tag, "No controller kind supports this node type.");
				return Err(ReconcileError::UnsupportedNodeType(type_tag.clone()));
			}
		};
		trace!(%type_tag, ?kind, "Creating controller.");
		kind.create(&self.renderer, type_tag)
	}

	/// [Creates](`Reconciler::create`) a controller for `view` and applies `view` to it.
	///
	/// # Errors
	///
	/// As for [`Reconciler::create`] and [`Controller::update`].
	/// If the update fails, the partially built controller is destroyed before returning.
	pub fn build(&mut self, view: &ViewNode) -> Result<Controller<R>, ReconcileError> {
		let mut controller = self.create(&view.type_tag())?;
		match controller.update(self, view) {
			Ok(()) => Ok(controller),
			Err(error) => {
				controller.destroy(&self.renderer);
				Err(error)
			}
		}
	}

	pub fn into_renderer(self) -> R {
		self.renderer
	}
}
