use std::any::Any;

/// Context arguments threaded through ability checks and gate predicates.
pub type AbilityArgs<'a> = &'a [&'a dyn Any];

/// Minimal authenticatable capability the availability pipeline requires of
/// callers: an identity and an authorization query.
pub trait Actor: Send + Sync {
	/// Stable identity of the actor, when one exists. Guests have none.
	fn actor_id(&self) -> Option<&str>;

	/// Whether the actor holds the given ability.
	fn can(&self, ability: &str, args: AbilityArgs<'_>) -> bool;

	/// Complement of [`Actor::can`].
	fn cannot(&self, ability: &str, args: AbilityArgs<'_>) -> bool {
		!self.can(ability, args)
	}
}

/// Host boundary that resolves the ambient actor for the current call and
/// materializes anonymous actors for guest-permitted actions.
pub trait ActorResolver: Send + Sync {
	/// The actor attached to the current session/request, if any.
	fn current(&self) -> Option<Box<dyn Actor>>;

	/// An anonymous actor, used only when an action permits guests.
	fn guest(&self) -> Box<dyn Actor> {
		Box::new(Guest)
	}
}

/// Anonymous actor: no identity, no abilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Guest;

impl Actor for Guest {
	fn actor_id(&self) -> Option<&str> {
		None
	}

	fn can(&self, _ability: &str, _args: AbilityArgs<'_>) -> bool {
		false
	}
}

/// Resolver for hosts without ambient session state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullActorResolver;

impl ActorResolver for NullActorResolver {
	fn current(&self) -> Option<Box<dyn Actor>> {
		None
	}
}
