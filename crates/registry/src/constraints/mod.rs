//! System-level constraints gating features and actions.
//!
//! Constraints are environment facts: an installed binary, a loadable shared
//! library, a type linked into the process. They are assumed stable for the
//! process lifetime, so the registry evaluates each concrete feature/action
//! type's constraints once at registration and memoizes the boolean.
//!
//! Constraints never fail for an unmet condition; the outcome is always
//! folded into a `bool` and, further up the pipeline, into a
//! [`Decision`](warden_primitives::Decision).

mod builder;
mod builtins;

pub use builder::ConstraintsBuilder;
pub use builtins::{ExecutableInstalled, LibraryLoads, LoadableType, TypeExists};

/// A single boolean predicate about the process environment.
pub trait Constraint: Send + Sync {
	/// Whether the condition currently holds.
	fn is_met(&self) -> bool;

	/// Human-readable statement of the condition, for diagnostics.
	fn description(&self) -> String;
}
