//! The caller-facing handle enforcing check-before-use around an action.

use std::any::Any;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::trace;
use warden_primitives::{ActionResponse, Actor, Decision, Result, WardenError};

use crate::action::Action;
use crate::registry::FeatureRegistry;

/// Wraps exactly one action instance and gates `prepare`/`perform` behind an
/// availability check.
///
/// The proxy derefs to the wrapped action, so every action-declared field and
/// method behaves as if accessed directly; `available`,
/// `check_availability_through_gate`, `prepare` and `perform` are intercepted
/// here.
///
/// Availability is computed at most once per proxy: the first
/// [`available`](ActionProxy::available) call (or the first gated operation)
/// fixes the decision. Call [`invalidate`](ActionProxy::invalidate) or build
/// a fresh proxy when a re-check is needed.
pub struct ActionProxy<A: Action> {
	registry: Arc<FeatureRegistry>,
	action: A,
	ability: String,
	decision: Option<Decision>,
}

impl<A: Action> ActionProxy<A> {
	pub(crate) fn new(registry: Arc<FeatureRegistry>, action: A, ability: String) -> Self {
		Self {
			registry,
			action,
			ability,
			decision: None,
		}
	}

	/// Checks availability through the gate and memoizes the outcome.
	///
	/// The actor is the explicit one if given, else the ambient actor, else —
	/// only for guest-permitting actions — a fresh guest.
	pub fn available(&mut self, actor: Option<&dyn Actor>) -> bool {
		let resolved = self.registry.resolve_actor(actor, self.action.allows_guests());
		let args: [&dyn Any; 1] = [&self.action];
		let decision = self
			.registry
			.gate()
			.inspect(&self.ability, resolved.get(), &args);
		trace!(ability = %self.ability, allowed = decision.allowed(), "checked through gate");
		let allowed = decision.allowed();
		self.decision = Some(decision);
		allowed
	}

	/// Runs the availability pipeline directly — the body of the published
	/// gate predicate — and memoizes the outcome.
	pub fn check_availability_through_gate(&mut self, actor: Option<&dyn Actor>) -> Decision {
		let decision = self.registry.availability_decision(&self.action, actor);
		self.decision = Some(decision.clone());
		decision
	}

	/// The memoized decision, if availability has been checked.
	pub fn decision(&self) -> Option<&Decision> {
		self.decision.as_ref()
	}

	/// Clears the memoized decision so the next call re-checks.
	pub fn invalidate(&mut self) {
		self.decision = None;
	}

	/// Gated call into the action's optional `prepare`.
	pub fn prepare(&mut self) -> Result<ActionResponse> {
		self.gated("prepare", |action| action.prepare())
	}

	/// Gated call into the action's `perform`.
	pub fn perform(&mut self) -> Result<ActionResponse> {
		self.gated("perform", |action| action.perform())
	}

	/// Consumes the proxy, returning the wrapped action.
	pub fn into_inner(self) -> A {
		self.action
	}

	fn gated(
		&mut self,
		method: &'static str,
		call: impl FnOnce(&A) -> Option<ActionResponse>,
	) -> Result<ActionResponse> {
		if self.decision.is_none() {
			self.available(None);
		}
		if let Some(decision) = &self.decision {
			if decision.denied() {
				return Err(WardenError::ActionNotAvailable {
					id: self.action.id(),
					message: decision.message().unwrap_or_default().to_owned(),
				});
			}
		}
		call(&self.action).ok_or_else(|| WardenError::ActionMethodMissing {
			id: self.action.id(),
			method,
		})
	}
}

impl<A: Action> Deref for ActionProxy<A> {
	type Target = A;

	fn deref(&self) -> &A {
		&self.action
	}
}

impl<A: Action> DerefMut for ActionProxy<A> {
	fn deref_mut(&mut self) -> &mut A {
		&mut self.action
	}
}

/// Proxy-construction sugar for action values.
pub trait ActionExt: Action + Sized {
	/// Wraps the action in a proxy bound to `registry`.
	fn proxy(self, registry: &Arc<FeatureRegistry>) -> Result<ActionProxy<Self>> {
		registry.proxy(self)
	}
}

impl<A: Action + Sized> ActionExt for A {}
