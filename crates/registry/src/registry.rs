//! The feature/action registry.
//!
//! Builds the feature → action → stack index from declarations, validates the
//! hierarchy, memoizes constraint results per concrete type, and publishes
//! one availability predicate per action into the gate. Registration is
//! all-or-nothing per stack: any failure rolls the stack's indices back
//! before the error propagates.

use std::any::{Any, TypeId};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};
use warden_primitives::{Actor, ActorResolver, Decision, NullActorResolver, Result, WardenError};

use crate::action::{Action, ActionDecl};
use crate::constraints::ConstraintsBuilder;
use crate::feature::{catalog_lookup, Feature, FeatureRef};
use crate::gate::{AccessGate, Gate, GateVerdict};
use crate::proxy::ActionProxy;
use crate::settings::Settings;

/// Stack assigned to registrations that do not declare one.
pub const DEFAULT_STACK: &str = "default";

/// Separator joining stack segments, and a stack to an action id in
/// gate-qualified ids. Action ids must not contain it.
const STACK_SEPARATOR: char = '.';

/// Feature node as recorded at registration time.
#[derive(Debug, Clone)]
pub struct FeatureInfo {
	pub id: String,
	pub description: Option<String>,
	/// Memoized outcome of the feature's declared constraints.
	pub constraints_met: bool,
	/// Ids of the actions this feature owns, in declaration order.
	pub actions: Vec<String>,
	/// Ids of the child features, in declaration order.
	pub features: Vec<String>,
}

struct FeatureNode {
	info: FeatureInfo,
	/// Feature ids root→self, recorded from the registration call stack.
	ancestry: Vec<String>,
}

struct ActionRecord {
	feature_id: String,
	constraints_met: bool,
}

#[derive(Default)]
struct Indexes {
	/// stack → feature id → node.
	features: FxHashMap<String, FxHashMap<String, FeatureNode>>,
	/// stack → action id → record.
	actions: FxHashMap<String, FxHashMap<String, ActionRecord>>,
	/// Concrete action type → stack it registered under (latest wins).
	action_stacks: FxHashMap<TypeId, String>,
	/// stack → installed root feature ids.
	roots: FxHashMap<String, Vec<String>>,
	/// Per-concrete-type constraint memo; first evaluation wins and survives
	/// stack resets.
	constraint_results: FxHashMap<TypeId, bool>,
}

/// Builds and owns the feature/action index. The composition root constructs
/// one at startup and holds it in an [`Arc`]; the published gate predicates
/// keep a weak back-reference.
pub struct FeatureRegistry {
	gate: Arc<dyn Gate>,
	actors: Arc<dyn ActorResolver>,
	settings: Arc<Settings>,
	indexes: RwLock<Indexes>,
}

#[derive(Default)]
pub struct FeatureRegistryBuilder {
	gate: Option<Arc<dyn Gate>>,
	actors: Option<Arc<dyn ActorResolver>>,
	settings: Settings,
}

impl FeatureRegistryBuilder {
	/// Publishes into and checks through this gate instead of a fresh
	/// [`AccessGate`].
	pub fn gate(mut self, gate: Arc<dyn Gate>) -> Self {
		self.gate = Some(gate);
		self
	}

	/// Resolves ambient and guest actors through this resolver instead of
	/// [`NullActorResolver`].
	pub fn actors(mut self, actors: Arc<dyn ActorResolver>) -> Self {
		self.actors = Some(actors);
		self
	}

	pub fn settings(mut self, settings: Settings) -> Self {
		self.settings = settings;
		self
	}

	pub fn build(self) -> Arc<FeatureRegistry> {
		Arc::new(FeatureRegistry {
			gate: self.gate.unwrap_or_else(|| Arc::new(AccessGate::new())),
			actors: self.actors.unwrap_or_else(|| Arc::new(NullActorResolver)),
			settings: Arc::new(self.settings),
			indexes: RwLock::new(Indexes::default()),
		})
	}
}

impl FeatureRegistry {
	pub fn builder() -> FeatureRegistryBuilder {
		FeatureRegistryBuilder::default()
	}

	pub fn gate(&self) -> &Arc<dyn Gate> {
		&self.gate
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Registers a root feature tree under its declared stack, or
	/// [`DEFAULT_STACK`] if it declares none.
	pub fn register(self: &Arc<Self>, root: impl Into<FeatureRef>) -> Result<()> {
		self.register_root(root.into(), None)
	}

	/// Registers a root feature tree under a stack override. A stack the root
	/// itself declares is appended to the override with the separator.
	pub fn register_stacked(self: &Arc<Self>, root: impl Into<FeatureRef>, stack: &str) -> Result<()> {
		self.register_root(root.into(), Some(stack))
	}

	fn register_root(self: &Arc<Self>, root: FeatureRef, stack_override: Option<&str>) -> Result<()> {
		let feature = resolve_ref(root)?;
		let stack = effective_stack(stack_override, feature.stack());
		let root_id = feature.id();
		debug!(stack = %stack, root = %root_id, "registering feature tree");

		// Root-level validation happens before anything is indexed, so these
		// failures leave the stack exactly as it was. Only failures inside the
		// recursion below trigger the rollback.
		if feature.actions().is_empty() && feature.features().is_empty() {
			return Err(WardenError::FeatureEmpty { id: root_id });
		}

		let mut indexes = self.indexes.write();

		if indexes
			.roots
			.get(&stack)
			.is_some_and(|roots| roots.contains(&root_id))
		{
			return Err(WardenError::AlreadySetup {
				id: root_id,
				stack,
			});
		}

		let mut ancestors = Vec::new();
		match self.register_feature(&mut indexes, feature.as_ref(), &stack, &mut ancestors) {
			Ok(()) => {
				indexes.roots.entry(stack).or_default().push(root_id);
				Ok(())
			}
			Err(error) => {
				warn!(stack = %stack, code = error.code(), %error, "registration failed, rolling back stack");
				reset_stack(&mut indexes, &stack);
				Err(error)
			}
		}
	}

	fn register_feature(
		self: &Arc<Self>,
		indexes: &mut Indexes,
		feature: &dyn Feature,
		stack: &str,
		ancestors: &mut Vec<String>,
	) -> Result<()> {
		let feature_id = feature.id();
		let actions = feature.actions();
		let children = feature.features();

		if actions.is_empty() && children.is_empty() {
			return Err(WardenError::FeatureEmpty { id: feature_id });
		}

		// Only a registration root may introduce a stack.
		if !ancestors.is_empty() && feature.stack().is_some() {
			return Err(WardenError::SubFeatureCannotDeclareStack { id: feature_id });
		}

		// Validate every declared action id before indexing any of them.
		let mut probes = Vec::with_capacity(actions.len());
		for decl in &actions {
			let probe = (decl.make)();
			let action_id = probe.id();
			if action_id.contains(STACK_SEPARATOR) {
				return Err(WardenError::ActionIdInvalid {
					id: action_id,
					reason: "contains the stack separator `.`",
				});
			}
			probes.push((decl, probe, action_id));
		}

		if indexes
			.features
			.get(stack)
			.is_some_and(|features| features.contains_key(&feature_id))
		{
			return Err(WardenError::FeatureAlreadyDeclared {
				id: feature_id,
				stack: stack.to_owned(),
			});
		}

		ancestors.push(feature_id.clone());

		let constraints_met = self.memoized_constraints(
			indexes,
			(feature as &dyn Any).type_id(),
			&feature_id,
			&|builder| feature.constraints(builder),
		);

		let node = FeatureNode {
			info: FeatureInfo {
				id: feature_id.clone(),
				description: feature.description(),
				constraints_met,
				actions: probes.iter().map(|(_, _, id)| id.clone()).collect(),
				features: Vec::new(),
			},
			ancestry: ancestors.clone(),
		};
		indexes
			.features
			.entry(stack.to_owned())
			.or_default()
			.insert(feature_id.clone(), node);

		for (decl, probe, action_id) in probes {
			if indexes
				.actions
				.get(stack)
				.is_some_and(|actions| actions.contains_key(&action_id))
			{
				return Err(WardenError::ActionAlreadyDeclared {
					id: action_id,
					stack: stack.to_owned(),
				});
			}
			let constraints_met = self.memoized_constraints(
				indexes,
				decl.type_id,
				&action_id,
				&|builder| probe.constraints(builder),
			);
			indexes.actions.entry(stack.to_owned()).or_default().insert(
				action_id.clone(),
				ActionRecord {
					feature_id: feature_id.clone(),
					constraints_met,
				},
			);
			indexes.action_stacks.insert(decl.type_id, stack.to_owned());
			self.define_gate_predicate(stack, &action_id, decl);
		}

		let mut child_ids = Vec::with_capacity(children.len());
		for child in children {
			let child = resolve_ref(child)?;
			child_ids.push(child.id());
			self.register_feature(indexes, child.as_ref(), stack, ancestors)?;
		}
		if let Some(node) = indexes
			.features
			.get_mut(stack)
			.and_then(|features| features.get_mut(&feature_id))
		{
			node.info.features = child_ids;
		}

		ancestors.pop();
		Ok(())
	}

	/// Per-concrete-type constraint evaluation; the first result is memoized
	/// for the process lifetime.
	fn memoized_constraints(
		&self,
		indexes: &mut Indexes,
		type_id: TypeId,
		label: &str,
		declare: &dyn Fn(&mut ConstraintsBuilder),
	) -> bool {
		if let Some(&met) = indexes.constraint_results.get(&type_id) {
			return met;
		}
		let mut builder = ConstraintsBuilder::with_settings(Arc::clone(&self.settings));
		declare(&mut builder);
		let met = match builder.first_unmet() {
			Some(constraint) => {
				warn!(item = label, constraint = %constraint.description(), "system constraint unmet");
				false
			}
			None => true,
		};
		indexes.constraint_results.insert(type_id, met);
		met
	}

	fn define_gate_predicate(self: &Arc<Self>, stack: &str, action_id: &str, decl: &ActionDecl) {
		let ability = qualified(stack, action_id);
		let registry = Arc::downgrade(self);
		let make = Arc::clone(&decl.make);
		let downcast = decl.downcast;
		self.gate.define(
			&ability,
			Arc::new(move |actor, args| {
				let Some(registry) = registry.upgrade() else {
					return GateVerdict::Granted(false);
				};
				// An action instance travels through the args when the check
				// comes from a proxy; a bare gate check builds a fresh one.
				match args.first().and_then(|arg| downcast(*arg)) {
					Some(action) => registry.availability_decision(action, actor).into(),
					None => {
						let action = make();
						registry.availability_decision(action.as_ref(), actor).into()
					}
				}
			}),
		);
	}

	/// Ancestor chain of the feature owning `action`, root→owner order, as
	/// recorded at registration time.
	pub fn features_for_action(&self, action: &dyn Action) -> Result<Vec<FeatureInfo>> {
		self.locate(action).map(|(chain, _)| chain)
	}

	/// Gate-qualified ability id for a registered action: the bare action id
	/// in the default stack, `"<stack>.<action id>"` otherwise.
	pub fn gate_qualified_id(&self, action: &dyn Action) -> Result<String> {
		let type_id = (action as &dyn Any).type_id();
		let indexes = self.indexes.read();
		let stack = indexes
			.action_stacks
			.get(&type_id)
			.ok_or_else(|| WardenError::ActionNotDeclared { id: action.id() })?;
		Ok(qualified(stack, &action.id()))
	}

	/// Wraps `action` in a proxy bound to this registry. Fails if the
	/// action's concrete type was never registered.
	pub fn proxy<A: Action>(self: &Arc<Self>, action: A) -> Result<ActionProxy<A>> {
		let ability = self.gate_qualified_id(&action)?;
		Ok(ActionProxy::new(Arc::clone(self), action, ability))
	}

	/// Runs the full availability pipeline for `action`: ancestor feature
	/// constraints, actor resolution, the action's own constraints, then its
	/// availability checks. Always yields a decision — unmet constraints and
	/// unresolved actors are distinct denials, never bare booleans.
	pub fn availability_decision(&self, action: &dyn Action, actor: Option<&dyn Actor>) -> Decision {
		let action_id = action.id();

		let (chain, action_constraints_met) = match self.locate(action) {
			Ok(located) => located,
			Err(_) => {
				return Decision::deny_with(format!(
					"Action {action_id:?}: has not been declared by any feature"
				));
			}
		};

		for feature in &chain {
			if !feature.constraints_met {
				trace!(action = %action_id, feature = %feature.id, "ancestor constraints unmet");
				return Decision::deny_with(format!(
					"Feature {:?}: system constraints not met",
					feature.id
				));
			}
		}

		let resolved = self.resolve_actor(actor, action.allows_guests());
		let Some(actor) = resolved.get() else {
			return Decision::deny_with(
				"actor not signed in, and action not available to guest actors",
			);
		};

		if !action_constraints_met {
			return Decision::deny_with(format!("Action {action_id:?}: constraints failed"));
		}

		let mut builder = self.settings.new_availability_builder(&action_id, actor);
		action.availability(&mut builder);
		let decision = builder.checks_met();
		trace!(action = %action_id, allowed = decision.allowed(), "availability evaluated");
		decision
	}

	/// Clears one stack's indices, or everything. Exposed for recovery from a
	/// failed partial registration and for test harnesses.
	pub fn reset(&self, stack: Option<&str>) {
		let mut indexes = self.indexes.write();
		match stack {
			Some(stack) => reset_stack(&mut indexes, stack),
			None => {
				debug!("resetting all stacks");
				let constraint_results = std::mem::take(&mut indexes.constraint_results);
				*indexes = Indexes {
					constraint_results,
					..Indexes::default()
				};
			}
		}
	}

	pub(crate) fn resolve_actor<'a>(
		&self,
		explicit: Option<&'a dyn Actor>,
		allow_guests: bool,
	) -> ResolvedActor<'a> {
		if let Some(actor) = explicit {
			return ResolvedActor::Borrowed(actor);
		}
		if let Some(actor) = self.actors.current() {
			return ResolvedActor::Owned(actor);
		}
		if allow_guests {
			return ResolvedActor::Owned(self.actors.guest());
		}
		ResolvedActor::Unresolved
	}

	fn locate(&self, action: &dyn Action) -> Result<(Vec<FeatureInfo>, bool)> {
		let type_id = (action as &dyn Any).type_id();
		let action_id = action.id();
		let not_declared = || WardenError::ActionNotDeclared {
			id: action_id.clone(),
		};

		let indexes = self.indexes.read();
		let stack = indexes.action_stacks.get(&type_id).ok_or_else(not_declared)?;
		let record = indexes
			.actions
			.get(stack)
			.and_then(|actions| actions.get(&action_id))
			.ok_or_else(not_declared)?;
		let nodes = indexes.features.get(stack).ok_or_else(not_declared)?;
		let owner = nodes.get(&record.feature_id).ok_or_else(not_declared)?;

		let chain = owner
			.ancestry
			.iter()
			.filter_map(|feature_id| nodes.get(feature_id))
			.map(|node| node.info.clone())
			.collect();
		Ok((chain, record.constraints_met))
	}
}

/// Actor resolved for one availability check: explicit, ambient, guest, or
/// nothing.
pub(crate) enum ResolvedActor<'a> {
	Borrowed(&'a dyn Actor),
	Owned(Box<dyn Actor>),
	Unresolved,
}

impl ResolvedActor<'_> {
	pub(crate) fn get(&self) -> Option<&dyn Actor> {
		match self {
			Self::Borrowed(actor) => Some(*actor),
			Self::Owned(actor) => Some(actor.as_ref()),
			Self::Unresolved => None,
		}
	}
}

fn resolve_ref(reference: FeatureRef) -> Result<Box<dyn Feature>> {
	match reference {
		FeatureRef::Value(feature) => Ok(feature),
		FeatureRef::Named(name) => catalog_lookup(name).ok_or_else(|| WardenError::FeatureNotFound {
			name: name.to_owned(),
		}),
	}
}

fn effective_stack(stack_override: Option<&str>, declared: Option<&str>) -> String {
	match (stack_override, declared) {
		(Some(outer), Some(inner)) => format!("{outer}{STACK_SEPARATOR}{inner}"),
		(Some(stack), None) | (None, Some(stack)) => stack.to_owned(),
		(None, None) => DEFAULT_STACK.to_owned(),
	}
}

fn qualified(stack: &str, action_id: &str) -> String {
	if stack == DEFAULT_STACK {
		action_id.to_owned()
	} else {
		format!("{stack}{STACK_SEPARATOR}{action_id}")
	}
}

fn reset_stack(indexes: &mut Indexes, stack: &str) {
	debug!(stack, "resetting stack indices");
	indexes.features.remove(stack);
	indexes.actions.remove(stack);
	indexes.roots.remove(stack);
	indexes.action_stacks.retain(|_, action_stack| action_stack != stack);
}
