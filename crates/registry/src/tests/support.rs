//! Shared fixtures for the scenario tests.

use warden_primitives::{AbilityArgs, Actor, ActorResolver};

/// Actor with a fixed identity and a fixed ability set.
#[derive(Debug, Clone, Default)]
pub(crate) struct StaticActor {
	pub id: Option<String>,
	pub abilities: Vec<String>,
}

impl StaticActor {
	pub fn with_id(id: &str) -> Self {
		Self {
			id: Some(id.to_owned()),
			..Self::default()
		}
	}

	pub fn with_abilities(abilities: &[&str]) -> Self {
		Self {
			id: Some("actor-1".to_owned()),
			abilities: abilities.iter().map(ToString::to_string).collect(),
		}
	}
}

impl Actor for StaticActor {
	fn actor_id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	fn can(&self, ability: &str, _args: AbilityArgs<'_>) -> bool {
		self.abilities.iter().any(|held| held == ability)
	}
}

/// Resolver with a fixed ambient actor.
pub(crate) struct SessionActors(pub Option<StaticActor>);

impl ActorResolver for SessionActors {
	fn current(&self) -> Option<Box<dyn Actor>> {
		self.0
			.clone()
			.map(|actor| Box::new(actor) as Box<dyn Actor>)
	}
}
