use crate::{
	controller::Controller,
	error::ReconcileError,
	registry::Reconciler,
	renderer::Renderer,
	view::ViewNode,
};
use tracing::{instrument, trace_span};

/// Mounts a single view tree into a container node that it doesn't own.
///
/// The mounted controller is replaced whenever the root descriptor's type tag changes,
/// and patched in place otherwise.
#[derive(Debug)]
pub struct Root<R: Renderer> {
	reconciler: Reconciler<R>,
	container: R::Node,
	mounted: Option<Controller<R>>,
}

impl<R: Renderer> Root<R> {
	pub fn new(reconciler: Reconciler<R>, container: R::Node) -> Self {
		Self {
			reconciler,
			container,
			mounted: None,
		}
	}

	/// # Errors
	///
	/// See [`Controller::update`]. If a replacement controller can't be created, the container is left empty.
	#[instrument(skip(self, view), fields(type_tag = %view.type_tag()))]
	pub fn render(&mut self, view: &ViewNode) -> Result<(), ReconcileError> {
		if let Some(mounted) = &self.mounted {
			if !mounted.accepts(view) {
				let span = trace_span!("Type changed. Replacing the root controller.", previous = %mounted.type_tag());
				let _enter = span.enter();
				self.unmount();
			}
		}

		let controller = match self.mounted.take() {
			Some(controller) => controller,
			None => {
				let controller = self.reconciler.create(&view.type_tag())?;
				self.reconciler.renderer().append_child(&self.container, controller.node());
				controller
			}
		};
		let controller = self.mounted.insert(controller);
		controller.update(&mut self.reconciler, view)
	}

	/// Detaches the mounted controller's node from the container, if any, and destroys the controller.
	pub fn unmount(&mut self) {
		if let Some(controller) = self.mounted.take() {
			let renderer = self.reconciler.renderer();
			renderer.remove_child(&self.container, controller.node());
			controller.destroy(renderer);
		}
	}

	#[must_use]
	pub fn container(&self) -> &R::Node {
		&self.container
	}

	#[must_use]
	pub fn controller(&self) -> Option<&Controller<R>> {
		self.mounted.as_ref()
	}

	#[must_use]
	pub fn reconciler(&self) -> &Reconciler<R> {
		&self.reconciler
	}

	#[must_use]
	pub fn renderer(&self) -> &R {
		self.reconciler.renderer()
	}
}
