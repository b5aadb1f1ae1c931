//! Feature/action authorization registry.
//!
//! Applications declare hierarchical [`Feature`]s offering named [`Action`]s;
//! the [`FeatureRegistry`] validates and indexes the declarations, publishes
//! one availability predicate per action into the [`Gate`], and hands out
//! [`ActionProxy`]s enforcing check-before-use around `prepare`/`perform`.
//!
//! Two tiers of checks gate every action:
//!
//! - **constraints** — static environment facts (an installed binary, a
//!   loadable library, a linked type), evaluated once per concrete type at
//!   registration and memoized;
//! - **availability** — request-scoped assertions about the current actor,
//!   evaluated fresh on every check.
//!
//! Independently-authored feature sets coexist through *stacks*: dotted
//! namespaces isolating one declarer's ids from another's.
//!
//! ```
//! use warden_registry::{
//!     Action, ActionDecl, ActionExt, AvailabilityBuilder, Feature, FeatureRegistry,
//! };
//!
//! #[derive(Default)]
//! struct ExportReportAction;
//!
//! impl Action for ExportReportAction {
//!     fn allows_guests(&self) -> bool {
//!         true
//!     }
//!
//!     fn availability<'a>(&'a self, builder: &mut AvailabilityBuilder<'a>) {
//!         builder.assert_true(true);
//!     }
//!
//!     fn perform(&self) -> Option<warden_registry::ActionResponse> {
//!         Some(self.success(serde_json::json!({"pages": 3})))
//!     }
//! }
//!
//! #[derive(Default)]
//! struct ReportingFeature;
//!
//! impl Feature for ReportingFeature {
//!     fn actions(&self) -> Vec<ActionDecl> {
//!         vec![ActionDecl::of::<ExportReportAction>()]
//!     }
//! }
//!
//! let registry = FeatureRegistry::builder().build();
//! registry.register(ReportingFeature)?;
//!
//! let mut export = ExportReportAction.proxy(&registry)?;
//! assert!(export.available(None));
//! assert_eq!(export.perform()?.get("pages"), Some(&serde_json::json!(3)));
//! # Ok::<(), warden_registry::WardenError>(())
//! ```

pub mod action;
pub mod availability;
pub mod constraints;
pub mod feature;
pub mod gate;
mod ident;
pub mod proxy;
pub mod registry;
pub mod settings;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionDecl};
pub use availability::{AvailabilityBuilder, MaybeEmpty};
pub use constraints::{
	Constraint, ConstraintsBuilder, ExecutableInstalled, LibraryLoads, LoadableType, TypeExists,
};
pub use feature::{Feature, FeatureEntry, FeatureRef};
pub use gate::{AccessGate, Gate, GatePredicate, GateVerdict};
pub use proxy::{ActionExt, ActionProxy};
pub use registry::{DEFAULT_STACK, FeatureInfo, FeatureRegistry, FeatureRegistryBuilder};
pub use settings::{AvailabilityFactory, Settings};
pub use warden_primitives::{
	AbilityArgs, ActionResponse, Actor, ActorResolver, Decision, Guest, NullActorResolver, Result,
	Value, WardenError,
};
