use serde::Serialize;

/// An allow/deny ruling with an optional diagnostic message.
///
/// Every layer of the check pipeline reduces to a decision: constraint
/// gating, availability assertions, and gate predicates. Decisions are
/// immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
	allowed: bool,
	message: Option<String>,
}

impl Decision {
	/// Allows, with no message.
	pub fn allow() -> Self {
		Self {
			allowed: true,
			message: None,
		}
	}

	/// Allows, attaching a diagnostic message.
	pub fn allow_with(message: impl Into<String>) -> Self {
		Self {
			allowed: true,
			message: Some(message.into()),
		}
	}

	/// Denies, with no message.
	pub fn deny() -> Self {
		Self {
			allowed: false,
			message: None,
		}
	}

	/// Denies, attaching a diagnostic message.
	pub fn deny_with(message: impl Into<String>) -> Self {
		Self {
			allowed: false,
			message: Some(message.into()),
		}
	}

	pub fn allowed(&self) -> bool {
		self.allowed
	}

	pub fn denied(&self) -> bool {
		!self.allowed
	}

	/// The attached diagnostic message, if any.
	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn predicates_are_complementary() {
		assert!(Decision::allow().allowed());
		assert!(!Decision::allow().denied());
		assert!(Decision::deny().denied());
		assert!(!Decision::deny().allowed());
	}

	#[test]
	fn messages_are_optional() {
		assert_eq!(Decision::allow().message(), None);
		assert_eq!(
			Decision::deny_with("not yours").message(),
			Some("not yours")
		);
	}
}
