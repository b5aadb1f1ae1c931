//! Action contract and declaration plumbing.

use std::any::{Any, TypeId};
use std::sync::Arc;

use warden_primitives::{ActionResponse, Value};

use crate::availability::AvailabilityBuilder;
use crate::constraints::ConstraintsBuilder;
use crate::ident;

/// The invokable unit of business behavior.
///
/// Actions carry their own dependencies as fields and declare two tiers of
/// gating: system [constraints](Action::constraints) (environment facts,
/// memoized per concrete type) and request-scoped
/// [availability](Action::availability) checks (evaluated fresh per check).
///
/// `prepare` and `perform` are optional overrides. The defaults return
/// `None`, which the proxy reports as
/// [`WardenError::ActionMethodMissing`](warden_primitives::WardenError::ActionMethodMissing);
/// overrides return `Some` of a response built through [`Action::success`] or
/// [`Action::failure`].
pub trait Action: Any + Send + Sync {
	/// Unique id within the action's stack. Defaults to the kebab-cased type
	/// name with a trailing `Action` stripped (`SendReminderAction` →
	/// `send-reminder`). Must not contain `.`, the stack separator.
	fn id(&self) -> String {
		ident::derive_id(std::any::type_name_of_val(self), &["Action"])
	}

	/// Whether the action may be checked and performed by guest actors. Off
	/// by default: an unresolved actor denies the action.
	fn allows_guests(&self) -> bool {
		false
	}

	/// Declares the system constraints gating this action.
	fn constraints(&self, _constraints: &mut ConstraintsBuilder) {}

	/// Declares the request-scoped checks gating this action. The default
	/// declares none: the action is available to any resolved actor once
	/// constraints pass.
	fn availability<'a>(&'a self, _builder: &mut AvailabilityBuilder<'a>) {}

	/// Optional data-preparation step, e.g. assembling what a form needs
	/// before [`Action::perform`] runs.
	fn prepare(&self) -> Option<ActionResponse> {
		None
	}

	/// The main task of the action.
	fn perform(&self) -> Option<ActionResponse> {
		None
	}

	/// Builds a successful response attributed to this action.
	fn success(&self, data: impl Into<Value>) -> ActionResponse
	where
		Self: Sized,
	{
		ActionResponse::success(self.id(), data)
	}

	/// Builds a failed response attributed to this action.
	fn failure<E: Into<String>>(
		&self,
		errors: impl IntoIterator<Item = E>,
		data: impl Into<Value>,
	) -> ActionResponse
	where
		Self: Sized,
	{
		ActionResponse::failure(self.id(), errors, data)
	}
}

/// Type-erased declaration of an action offered by a feature.
///
/// Captures everything the registry needs without knowing the concrete type:
/// a `Default`-backed factory for gate checks that arrive without an
/// instance, the [`TypeId`] keying the stack and constraint indices, and a
/// downcast helper recovering the action from gate context arguments.
pub struct ActionDecl {
	pub(crate) type_id: TypeId,
	pub(crate) make: Arc<dyn Fn() -> Box<dyn Action> + Send + Sync>,
	pub(crate) downcast: fn(&dyn Any) -> Option<&dyn Action>,
}

impl ActionDecl {
	/// Declares the action type `A`.
	pub fn of<A: Action + Default>() -> Self {
		Self {
			type_id: TypeId::of::<A>(),
			make: Arc::new(|| Box::new(A::default())),
			downcast: |any| any.downcast_ref::<A>().map(|action| action as &dyn Action),
		}
	}
}
