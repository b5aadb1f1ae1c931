use serde::Serialize;
use serde_json::Value;

/// Immutable result of an action's `prepare` or `perform`.
///
/// Built only through the [`ActionResponse::success`] and
/// [`ActionResponse::failure`] constructors. The result payload is a JSON
/// value addressable by dotted path, so callers can pull nested fields
/// without knowing the full shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
	action: String,
	success: bool,
	data: Value,
	errors: Vec<String>,
}

impl ActionResponse {
	/// A successful response attributed to `action`, with optional data.
	pub fn success(action: impl Into<String>, data: impl Into<Value>) -> Self {
		Self {
			action: action.into(),
			success: true,
			data: data.into(),
			errors: Vec::new(),
		}
	}

	/// A failed response attributed to `action`, with error entries and
	/// optional data.
	pub fn failure<E: Into<String>>(
		action: impl Into<String>,
		errors: impl IntoIterator<Item = E>,
		data: impl Into<Value>,
	) -> Self {
		Self {
			action: action.into(),
			success: false,
			data: data.into(),
			errors: errors.into_iter().map(Into::into).collect(),
		}
	}

	/// Id of the action that produced this response.
	pub fn action(&self) -> &str {
		&self.action
	}

	pub fn successful(&self) -> bool {
		self.success
	}

	pub fn unsuccessful(&self) -> bool {
		!self.success
	}

	/// The whole result payload.
	pub fn data(&self) -> &Value {
		&self.data
	}

	/// Looks up a nested field by dotted path (`"user.roles.0"`). Map keys
	/// and array indices are both addressable; an empty path yields the whole
	/// payload.
	pub fn get(&self, path: &str) -> Option<&Value> {
		if path.is_empty() {
			return Some(&self.data);
		}
		path.split('.').try_fold(&self.data, |value, segment| match value {
			Value::Object(map) => map.get(segment),
			Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
			_ => None,
		})
	}

	/// [`ActionResponse::get`] with a fallback for missing paths.
	pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
		self.get(path).unwrap_or(default)
	}

	/// Error entries; expected to be non-empty only on a failed response.
	pub fn errors(&self) -> &[String] {
		&self.errors
	}
}
