use std::sync::Arc;

use super::builtins::{ExecutableInstalled, LibraryLoads, TypeExists};
use super::Constraint;
use crate::settings::Settings;

/// Collects the constraints a feature or action declares and reduces them to
/// a single boolean.
///
/// Evaluation order is declaration order, short-circuiting at the first
/// failing constraint.
pub struct ConstraintsBuilder {
	settings: Arc<Settings>,
	constraints: Vec<Box<dyn Constraint>>,
}

impl Default for ConstraintsBuilder {
	fn default() -> Self {
		Self::with_settings(Arc::new(Settings::default()))
	}
}

impl ConstraintsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn with_settings(settings: Arc<Settings>) -> Self {
		Self {
			settings,
			constraints: Vec::new(),
		}
	}

	/// Requires an executable to be discoverable on `PATH` or the configured
	/// path dirs.
	pub fn executable_installed(&mut self, name: impl Into<String>) -> &mut Self {
		let dirs = self.settings.path_dirs();
		self.constraint(ExecutableInstalled::new(name).with_dirs(dirs))
	}

	/// Requires a shared library to be loadable by name.
	pub fn library_loads(&mut self, name: impl Into<String>) -> &mut Self {
		self.constraint(LibraryLoads::new(name))
	}

	/// Requires a fully-qualified type name to appear in the loadable-type
	/// manifest.
	pub fn type_exists(&mut self, name: impl Into<String>) -> &mut Self {
		self.constraint(TypeExists::new(name))
	}

	/// Adds a custom constraint.
	pub fn constraint(&mut self, constraint: impl Constraint + 'static) -> &mut Self {
		self.constraints.push(Box::new(constraint));
		self
	}

	/// Logical AND over all declared constraints.
	pub fn all_met(&self) -> bool {
		self.first_unmet().is_none()
	}

	/// First failing constraint in declaration order, if any.
	pub fn first_unmet(&self) -> Option<&dyn Constraint> {
		self.constraints
			.iter()
			.find(|constraint| !constraint.is_met())
			.map(|constraint| constraint.as_ref())
	}

	pub fn len(&self) -> usize {
		self.constraints.len()
	}

	pub fn is_empty(&self) -> bool {
		self.constraints.is_empty()
	}
}
