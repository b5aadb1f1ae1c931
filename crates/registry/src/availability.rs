//! Request-scoped availability checks.

use warden_primitives::{Actor, Decision, Value};

/// Deferred assertion evaluated by [`AvailabilityBuilder::checks_met`].
type Check<'a> = Box<dyn Fn() -> Decision + 'a>;

/// Declares the checks that must pass for an action to be available to the
/// current actor — a privilege the actor must hold, ownership of a resource,
/// and so on.
///
/// Unlike constraints, availability checks are evaluated fresh on every call:
/// they depend on the actor and resource state of the current request and are
/// never cached. All declared checks run (no short-circuit), so a denial
/// reports every failure at once.
///
/// Custom assertion vocabularies are extension traits over
/// [`AvailabilityBuilder::defer`]:
///
/// ```
/// use warden_registry::{AvailabilityBuilder, Decision};
///
/// trait TenancyChecks {
///     fn assert_same_tenant(&mut self, ours: u64, theirs: u64) -> &mut Self;
/// }
///
/// impl TenancyChecks for AvailabilityBuilder<'_> {
///     fn assert_same_tenant(&mut self, ours: u64, theirs: u64) -> &mut Self {
///         self.defer(move || {
///             if ours == theirs {
///                 Decision::allow()
///             } else {
///                 Decision::deny_with("resource belongs to another tenant")
///             }
///         })
///     }
/// }
/// ```
pub struct AvailabilityBuilder<'a> {
	action_id: String,
	actor: &'a dyn Actor,
	checks: Vec<Check<'a>>,
}

impl<'a> AvailabilityBuilder<'a> {
	pub fn new(action_id: impl Into<String>, actor: &'a dyn Actor) -> Self {
		Self {
			action_id: action_id.into(),
			actor,
			checks: Vec::new(),
		}
	}

	/// The actor under evaluation.
	pub fn actor(&self) -> &'a dyn Actor {
		self.actor
	}

	/// Id of the action under evaluation.
	pub fn action_id(&self) -> &str {
		&self.action_id
	}

	/// Appends an arbitrary deferred check. This is the extension point for
	/// custom assertion methods.
	pub fn defer(&mut self, check: impl Fn() -> Decision + 'a) -> &mut Self {
		self.checks.push(Box::new(check));
		self
	}

	fn outcome(&mut self, passed: bool, failure: String) -> &mut Self {
		self.defer(move || {
			if passed {
				Decision::allow()
			} else {
				Decision::deny_with(failure.clone())
			}
		})
	}

	/// Requires the actor to hold `ability`.
	pub fn user_can(&mut self, ability: impl Into<String>) -> &mut Self {
		let actor = self.actor;
		let ability = ability.into();
		self.defer(move || {
			if actor.can(&ability, &[]) {
				Decision::allow()
			} else {
				Decision::deny_with(format!("actor does not have access to ability: {ability}"))
			}
		})
	}

	/// Requires the actor NOT to hold `ability`.
	pub fn user_cannot(&mut self, ability: impl Into<String>) -> &mut Self {
		let actor = self.actor;
		let ability = ability.into();
		self.defer(move || {
			if actor.cannot(&ability, &[]) {
				Decision::allow()
			} else {
				Decision::deny_with(format!("actor has access to ability: {ability}"))
			}
		})
	}

	pub fn assert_true(&mut self, value: bool) -> &mut Self {
		self.assert_true_msg(value, "value passed to `assert_true` is false")
	}

	pub fn assert_true_msg(&mut self, value: bool, failure: impl Into<String>) -> &mut Self {
		self.outcome(value, failure.into())
	}

	pub fn assert_false(&mut self, value: bool) -> &mut Self {
		self.assert_false_msg(value, "value passed to `assert_false` is true")
	}

	pub fn assert_false_msg(&mut self, value: bool, failure: impl Into<String>) -> &mut Self {
		self.outcome(!value, failure.into())
	}

	pub fn assert_none<T>(&mut self, value: Option<T>) -> &mut Self {
		self.assert_none_msg(value, "value passed to `assert_none` is some")
	}

	pub fn assert_none_msg<T>(&mut self, value: Option<T>, failure: impl Into<String>) -> &mut Self {
		self.outcome(value.is_none(), failure.into())
	}

	pub fn assert_some<T>(&mut self, value: Option<T>) -> &mut Self {
		self.assert_some_msg(value, "value passed to `assert_some` is none")
	}

	pub fn assert_some_msg<T>(&mut self, value: Option<T>, failure: impl Into<String>) -> &mut Self {
		self.outcome(value.is_some(), failure.into())
	}

	pub fn assert_empty(&mut self, value: impl MaybeEmpty) -> &mut Self {
		self.assert_empty_msg(value, "value passed to `assert_empty` is not empty")
	}

	pub fn assert_empty_msg(
		&mut self,
		value: impl MaybeEmpty,
		failure: impl Into<String>,
	) -> &mut Self {
		self.outcome(value.is_empty_value(), failure.into())
	}

	pub fn assert_not_empty(&mut self, value: impl MaybeEmpty) -> &mut Self {
		self.assert_not_empty_msg(value, "value passed to `assert_not_empty` is empty")
	}

	pub fn assert_not_empty_msg(
		&mut self,
		value: impl MaybeEmpty,
		failure: impl Into<String>,
	) -> &mut Self {
		self.outcome(!value.is_empty_value(), failure.into())
	}

	pub fn assert_equal<T: PartialEq>(&mut self, expected: T, other: T) -> &mut Self {
		self.assert_equal_msg(expected, other, "values passed to `assert_equal` are not equal")
	}

	pub fn assert_equal_msg<T: PartialEq>(
		&mut self,
		expected: T,
		other: T,
		failure: impl Into<String>,
	) -> &mut Self {
		self.outcome(expected == other, failure.into())
	}

	pub fn assert_not_equal<T: PartialEq>(&mut self, expected: T, other: T) -> &mut Self {
		self.assert_not_equal_msg(expected, other, "values passed to `assert_not_equal` are equal")
	}

	pub fn assert_not_equal_msg<T: PartialEq>(
		&mut self,
		expected: T,
		other: T,
		failure: impl Into<String>,
	) -> &mut Self {
		self.outcome(expected != other, failure.into())
	}

	/// Evaluates every declared check and reduces the outcomes to a single
	/// decision. Failure messages of denied checks are collected into the
	/// denial, comma-joined; passing checks contribute nothing.
	pub fn checks_met(&self) -> Decision {
		let failures: Vec<String> = self
			.checks
			.iter()
			.map(|check| check())
			.filter(Decision::denied)
			.map(|decision| decision.message().unwrap_or("check failed").to_owned())
			.collect();

		if failures.is_empty() {
			Decision::allow_with(format!("Action {:?}: all checks passed", self.action_id))
		} else {
			Decision::deny_with(format!(
				"Action {:?}: some checks failed. {}.",
				self.action_id,
				failures.join(", ")
			))
		}
	}
}

/// Emptiness probe behind the `assert_empty` family.
pub trait MaybeEmpty {
	fn is_empty_value(&self) -> bool;
}

impl MaybeEmpty for str {
	fn is_empty_value(&self) -> bool {
		self.is_empty()
	}
}

impl MaybeEmpty for String {
	fn is_empty_value(&self) -> bool {
		self.is_empty()
	}
}

impl<T> MaybeEmpty for [T] {
	fn is_empty_value(&self) -> bool {
		self.is_empty()
	}
}

impl<T> MaybeEmpty for Vec<T> {
	fn is_empty_value(&self) -> bool {
		self.is_empty()
	}
}

impl<T> MaybeEmpty for Option<T> {
	fn is_empty_value(&self) -> bool {
		self.is_none()
	}
}

impl MaybeEmpty for Value {
	fn is_empty_value(&self) -> bool {
		match self {
			Value::Null => true,
			Value::Bool(value) => !value,
			Value::Number(value) => value.as_f64() == Some(0.0),
			Value::String(value) => value.is_empty(),
			Value::Array(items) => items.is_empty(),
			Value::Object(map) => map.is_empty(),
		}
	}
}

impl<T: MaybeEmpty + ?Sized> MaybeEmpty for &T {
	fn is_empty_value(&self) -> bool {
		(**self).is_empty_value()
	}
}
