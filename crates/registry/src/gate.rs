//! Authorization gate boundary and the in-memory reference implementation.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use warden_primitives::{AbilityArgs, Actor, Decision};

/// Outcome of a gate predicate: a bare boolean or a full decision.
pub enum GateVerdict {
	Granted(bool),
	Ruled(Decision),
}

impl GateVerdict {
	/// Normalizes to a decision; bare booleans carry no message.
	pub fn into_decision(self) -> Decision {
		match self {
			Self::Granted(true) => Decision::allow(),
			Self::Granted(false) => Decision::deny(),
			Self::Ruled(decision) => decision,
		}
	}
}

impl From<bool> for GateVerdict {
	fn from(granted: bool) -> Self {
		Self::Granted(granted)
	}
}

impl From<Decision> for GateVerdict {
	fn from(decision: Decision) -> Self {
		Self::Ruled(decision)
	}
}

/// Predicate deciding one ability for one actor. Extra context arguments are
/// passed through untyped, as the caller provided them.
pub type GatePredicate =
	Arc<dyn Fn(Option<&dyn Actor>, AbilityArgs<'_>) -> GateVerdict + Send + Sync>;

/// The external authorization service: the registry publishes one predicate
/// per registered action into it, and proxies query it back.
pub trait Gate: Send + Sync {
	/// Registers the predicate deciding `ability`, replacing any previous
	/// definition.
	fn define(&self, ability: &str, predicate: GatePredicate);

	/// Boolean form of [`Gate::inspect`]. Unknown abilities are denied.
	fn check(&self, ability: &str, actor: Option<&dyn Actor>, args: AbilityArgs<'_>) -> bool {
		self.inspect(ability, actor, args).allowed()
	}

	/// Full decision for `ability`, normalizing bare-boolean predicates.
	fn inspect(&self, ability: &str, actor: Option<&dyn Actor>, args: AbilityArgs<'_>) -> Decision;
}

/// In-memory gate: an ability table behind a lock. Predicates run after the
/// lock is released, so they are free to re-enter the registry.
#[derive(Default)]
pub struct AccessGate {
	abilities: RwLock<FxHashMap<String, GatePredicate>>,
}

impl AccessGate {
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether an ability has been defined.
	pub fn defines(&self, ability: &str) -> bool {
		self.abilities.read().contains_key(ability)
	}
}

impl Gate for AccessGate {
	fn define(&self, ability: &str, predicate: GatePredicate) {
		tracing::debug!(ability, "defining gate ability");
		self.abilities.write().insert(ability.to_owned(), predicate);
	}

	fn inspect(&self, ability: &str, actor: Option<&dyn Actor>, args: AbilityArgs<'_>) -> Decision {
		let predicate = self.abilities.read().get(ability).cloned();
		match predicate {
			Some(predicate) => predicate(actor, args).into_decision(),
			None => Decision::deny_with(format!("ability {ability:?} is not defined")),
		}
	}
}
