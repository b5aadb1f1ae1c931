use std::path::PathBuf;

use super::Constraint;

/// An executable is discoverable by name on the process `PATH`, or in a set
/// of extra directories (usually the registry's configured path dirs).
pub struct ExecutableInstalled {
	name: String,
	extra_dirs: Vec<PathBuf>,
}

impl ExecutableInstalled {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			extra_dirs: Vec::new(),
		}
	}

	/// Extends the search beyond `PATH` with additional directories.
	pub fn with_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
		self.extra_dirs = dirs.into_iter().collect();
		self
	}
}

impl Constraint for ExecutableInstalled {
	fn is_met(&self) -> bool {
		if which::which(&self.name).is_ok() {
			return true;
		}
		if self.extra_dirs.is_empty() {
			return false;
		}
		let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
		std::env::join_paths(&self.extra_dirs)
			.ok()
			.is_some_and(|paths| which::which_in(&self.name, Some(paths), cwd).is_ok())
	}

	fn description(&self) -> String {
		format!("executable {:?} must be installed", self.name)
	}
}

/// A shared library by this name can be loaded into the process.
pub struct LibraryLoads {
	name: String,
}

impl LibraryLoads {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

impl Constraint for LibraryLoads {
	fn is_met(&self) -> bool {
		// SAFETY: probe only; the handle is dropped immediately. Library
		// initializers may run, as with any dlopen.
		unsafe { libloading::Library::new(&self.name).is_ok() }
	}

	fn description(&self) -> String {
		format!("shared library {:?} must be loadable", self.name)
	}
}

/// Entry in the process-wide manifest of loadable types, collected through
/// [`inventory`]. See [`crate::submit_type!`].
pub struct LoadableType {
	pub name: &'static str,
}

inventory::collect!(LoadableType);

/// Registers a fully-qualified type name into the loadable-type manifest.
#[macro_export]
macro_rules! submit_type {
	($name:literal) => {
		inventory::submit! {
			$crate::constraints::LoadableType { name: $name }
		}
	};
}

/// A fully-qualified type name appears in the loadable-type manifest.
pub struct TypeExists {
	name: String,
}

impl TypeExists {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

impl Constraint for TypeExists {
	fn is_met(&self) -> bool {
		inventory::iter::<LoadableType>
			.into_iter()
			.any(|loadable| loadable.name == self.name)
	}

	fn description(&self) -> String {
		format!("type {:?} must be linked into the process", self.name)
	}
}
