//! Identifier derivation from type names.

use heck::ToKebabCase;

/// Derives a registry id from a fully-qualified type name: the final path
/// segment, minus the first matching suffix, kebab-cased.
///
/// `app::actions::SendReminderAction` with the `Action` suffix becomes
/// `send-reminder`. A type named exactly like a suffix keeps its name.
pub(crate) fn derive_id(type_name: &str, suffixes: &[&str]) -> String {
	let mut short = type_name.rsplit("::").next().unwrap_or(type_name);
	for suffix in suffixes {
		if short.len() > suffix.len() && short.ends_with(suffix) {
			short = &short[..short.len() - suffix.len()];
			break;
		}
	}
	short.to_kebab_case()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_the_suffix_and_kebab_cases() {
		assert_eq!(
			derive_id("app::actions::SendReminderAction", &["Action"]),
			"send-reminder"
		);
		assert_eq!(
			derive_id("app::CalendarFeatures", &["Features", "Feature"]),
			"calendar"
		);
		assert_eq!(
			derive_id("app::ExportFeature", &["Features", "Feature"]),
			"export"
		);
	}

	#[test]
	fn bare_suffix_names_are_kept() {
		assert_eq!(derive_id("app::Action", &["Action"]), "action");
	}

	#[test]
	fn unsuffixed_names_pass_through() {
		assert_eq!(derive_id("app::BulkImport", &["Action"]), "bulk-import");
	}
}
