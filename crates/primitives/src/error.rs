use thiserror::Error;

/// Convenience alias used across the warden crates.
pub type Result<T, E = WardenError> = std::result::Result<T, E>;

/// Unified error type for the warden crates, carrying a stable numeric code.
///
/// Structural and declaration errors (codes 1 and 1xx/2xx registration codes)
/// abort the whole `register` call and roll the stack's indices back; boot
/// code should treat them as fatal. [`WardenError::ActionNotAvailable`] and
/// [`WardenError::ActionMethodMissing`] are expected, recoverable conditions:
/// "this call was not permitted / not implemented".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WardenError {
	/// A root feature with this id is already installed in the stack.
	#[error("setup already ran for root feature {id:?} in stack {stack:?}")]
	AlreadySetup { id: String, stack: String },

	/// A symbolic feature name did not resolve through the catalog.
	#[error("feature {name:?} is not present in the feature catalog")]
	FeatureNotFound { name: String },

	#[error("feature {id:?} already declared in stack {stack:?}")]
	FeatureAlreadyDeclared { id: String, stack: String },

	#[error("feature {id:?} declares no actions and no sub-features")]
	FeatureEmpty { id: String },

	/// Only a registration root may introduce a stack.
	#[error("feature {id:?} declares a stack but is not the top-most feature")]
	SubFeatureCannotDeclareStack { id: String },

	#[error("action {id:?} has not been declared by any feature")]
	ActionNotDeclared { id: String },

	#[error("action {id:?} already declared in stack {stack:?}")]
	ActionAlreadyDeclared { id: String, stack: String },

	/// The availability pipeline denied the action.
	#[error("action {id:?} is not available: {message}")]
	ActionNotAvailable { id: String, message: String },

	/// The action does not override the requested optional operation.
	#[error("action {id:?} does not implement {method:?}")]
	ActionMethodMissing { id: String, method: &'static str },

	#[error("action id {id:?} is invalid: {reason}")]
	ActionIdInvalid { id: String, reason: &'static str },
}

impl WardenError {
	/// Stable numeric code. Ranges group the taxonomy: 1 configuration,
	/// 1xx feature errors, 2xx action errors.
	pub fn code(&self) -> u16 {
		match self {
			Self::AlreadySetup { .. } => 1,
			Self::FeatureNotFound { .. } => 100,
			Self::FeatureAlreadyDeclared { .. } => 101,
			Self::FeatureEmpty { .. } => 103,
			Self::SubFeatureCannotDeclareStack { .. } => 104,
			Self::ActionNotDeclared { .. } => 200,
			Self::ActionAlreadyDeclared { .. } => 201,
			Self::ActionNotAvailable { .. } => 202,
			Self::ActionMethodMissing { .. } => 203,
			Self::ActionIdInvalid { .. } => 204,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn codes_follow_the_taxonomy_ranges() {
		let feature_errors = [
			WardenError::FeatureNotFound {
				name: "x".into(),
			}
			.code(),
			WardenError::FeatureEmpty { id: "x".into() }.code(),
			WardenError::SubFeatureCannotDeclareStack { id: "x".into() }.code(),
		];
		assert!(feature_errors.iter().all(|code| (100..200).contains(code)));

		let action_errors = [
			WardenError::ActionNotDeclared { id: "x".into() }.code(),
			WardenError::ActionMethodMissing {
				id: "x".into(),
				method: "perform",
			}
			.code(),
		];
		assert!(action_errors.iter().all(|code| (200..300).contains(code)));
	}
}
