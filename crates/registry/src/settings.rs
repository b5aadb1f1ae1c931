//! Process-wide configuration owned by the registry.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use warden_primitives::Actor;

use crate::availability::AvailabilityBuilder;

/// Constructs availability builders; swappable process-wide through
/// [`Settings::use_availability_factory`].
pub type AvailabilityFactory =
	Arc<dyn for<'a> Fn(&str, &'a dyn Actor) -> AvailabilityBuilder<'a> + Send + Sync>;

/// Mutable configuration consulted by constraint declaration and availability
/// evaluation.
#[derive(Default)]
pub struct Settings {
	path_dirs: RwLock<Vec<PathBuf>>,
	availability_factory: RwLock<Option<AvailabilityFactory>>,
}

impl Settings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Executable search directories: the configured extras followed by the
	/// built-in defaults (the application root and its `bin` subdirectory).
	/// Consumed by the executable-discovery constraint on top of `PATH`.
	pub fn path_dirs(&self) -> Vec<PathBuf> {
		let mut dirs = self.path_dirs.read().clone();
		let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
		dirs.push(root.clone());
		dirs.push(root.join("bin"));
		dirs
	}

	/// Replaces the extra directory list wholesale. The built-in defaults are
	/// always appended on read.
	pub fn set_path_dirs(&self, dirs: impl IntoIterator<Item = PathBuf>) {
		*self.path_dirs.write() = dirs.into_iter().collect();
	}

	/// Substitutes the availability-builder construction for all subsequent
	/// availability checks.
	pub fn use_availability_factory(&self, factory: AvailabilityFactory) {
		*self.availability_factory.write() = Some(factory);
	}

	pub(crate) fn new_availability_builder<'a>(
		&self,
		action_id: &str,
		actor: &'a dyn Actor,
	) -> AvailabilityBuilder<'a> {
		match &*self.availability_factory.read() {
			Some(factory) => factory(action_id, actor),
			None => AvailabilityBuilder::new(action_id, actor),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_always_appended() {
		let settings = Settings::new();
		let defaults = settings.path_dirs().len();

		settings.set_path_dirs([PathBuf::from("/opt/warden/tools")]);
		let dirs = settings.path_dirs();

		assert_eq!(dirs.len(), defaults + 1);
		assert_eq!(dirs[0], PathBuf::from("/opt/warden/tools"));
	}

	#[test]
	fn set_replaces_the_extras_wholesale() {
		let settings = Settings::new();
		settings.set_path_dirs([PathBuf::from("/a"), PathBuf::from("/b")]);
		settings.set_path_dirs([PathBuf::from("/c")]);

		let dirs = settings.path_dirs();
		assert!(dirs.contains(&PathBuf::from("/c")));
		assert!(!dirs.contains(&PathBuf::from("/a")));
	}
}
