//! Feature contract, declaration references, and the feature catalog.

use std::any::Any;

use crate::action::ActionDecl;
use crate::constraints::ConstraintsBuilder;
use crate::ident;

/// A named grouping of actions and/or nested features.
///
/// Features are pure registration/organization nodes — never invoked by end
/// users — but their constraints gate every action reachable beneath them.
pub trait Feature: Any + Send + Sync {
	/// Unique id within the feature's stack. Defaults to the kebab-cased type
	/// name minus a trailing `Feature`/`Features`.
	fn id(&self) -> String {
		ident::derive_id(std::any::type_name_of_val(self), &["Features", "Feature"])
	}

	/// Optional human-readable description.
	fn description(&self) -> Option<String> {
		None
	}

	/// Stack namespace for this feature tree. Only honored on a registration
	/// root; a nested feature declaring one fails registration.
	fn stack(&self) -> Option<&str> {
		None
	}

	/// Actions this feature offers.
	fn actions(&self) -> Vec<ActionDecl> {
		Vec::new()
	}

	/// Nested features this feature groups.
	fn features(&self) -> Vec<FeatureRef> {
		Vec::new()
	}

	/// Declares the system constraints gating this feature and all of its
	/// descendants.
	fn constraints(&self, _constraints: &mut ConstraintsBuilder) {}
}

/// Reference to a feature in a declaration list: a constructed value, or a
/// symbolic name resolved through the catalog at registration time.
pub enum FeatureRef {
	Value(Box<dyn Feature>),
	Named(&'static str),
}

impl<F: Feature> From<F> for FeatureRef {
	fn from(feature: F) -> Self {
		Self::Value(Box::new(feature))
	}
}

impl From<Box<dyn Feature>> for FeatureRef {
	fn from(feature: Box<dyn Feature>) -> Self {
		Self::Value(feature)
	}
}

impl From<&'static str> for FeatureRef {
	fn from(name: &'static str) -> Self {
		Self::Named(name)
	}
}

/// Entry in the process-wide feature catalog, collected through
/// [`inventory`]. Enables registration by symbolic name — the seam for
/// independently-authored feature packs. See [`crate::submit_feature!`].
pub struct FeatureEntry {
	name: &'static str,
	build: fn() -> Box<dyn Feature>,
}

impl FeatureEntry {
	pub const fn new(name: &'static str, build: fn() -> Box<dyn Feature>) -> Self {
		Self { name, build }
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

inventory::collect!(FeatureEntry);

pub(crate) fn catalog_lookup(name: &str) -> Option<Box<dyn Feature>> {
	inventory::iter::<FeatureEntry>
		.into_iter()
		.find(|entry| entry.name == name)
		.map(|entry| (entry.build)())
}

/// Submits a `Default`-constructible feature into the catalog under a
/// symbolic name.
#[macro_export]
macro_rules! submit_feature {
	($name:literal => $feature:ty) => {
		inventory::submit! {
			$crate::FeatureEntry::new($name, || {
				::std::boxed::Box::new(<$feature as ::core::default::Default>::default())
			})
		}
	};
}
