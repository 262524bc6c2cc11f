//! Path pattern matching.
//!
//! Patterns are `/`-separated segments. A segment starting with `:` binds
//! the corresponding path segment under that name; any other segment must
//! match exactly. Empty segments are ignored on both sides, so `/a//b/` and
//! `a/b` are the same path. There are no wildcards and no optional segments.

use std::collections::HashMap;

/// Result of matching a path against a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatch {
	/// Whether every segment matched.
	pub matches: bool,
	/// Values bound by `:name` segments. Empty unless `matches` is true.
	pub params: HashMap<String, String>,
}

impl PathMatch {
	fn miss() -> Self {
		Self::default()
	}
}

/// Matches `path` against `pattern`.
///
/// # Example
///
/// ```ignore
/// let m = match_path("/user/:id", "/user/7");
/// assert!(m.matches);
/// assert_eq!(m.params["id"], "7");
/// ```
pub fn match_path(pattern: &str, path: &str) -> PathMatch {
	let pattern_segments: Vec<&str> = segments(pattern).collect();
	let path_segments: Vec<&str> = segments(path).collect();

	if pattern_segments.len() != path_segments.len() {
		return PathMatch::miss();
	}

	let mut params = HashMap::new();
	for (expected, actual) in pattern_segments.iter().zip(&path_segments) {
		match expected.strip_prefix(':') {
			Some(name) => {
				params.insert(name.to_string(), (*actual).to_string());
			}
			None if expected == actual => {}
			None => return PathMatch::miss(),
		}
	}

	PathMatch {
		matches: true,
		params,
	}
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
	path.split('/').filter(|segment| !segment.is_empty())
}

/// What a route rule is selected on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteCondition {
	/// A path pattern such as `/users/:id`.
	Path(String),
	/// Selected only when no path rule of the stack matches.
	NotFound,
}

impl RouteCondition {
	/// Matches `path` against this condition. `NotFound` never matches.
	pub fn matches(&self, path: &str) -> PathMatch {
		match self {
			Self::Path(pattern) => match_path(pattern, path),
			Self::NotFound => PathMatch::miss(),
		}
	}

	/// Returns `true` for the not-found marker.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound)
	}
}

impl From<&str> for RouteCondition {
	fn from(pattern: &str) -> Self {
		Self::Path(pattern.to_string())
	}
}

impl From<String> for RouteCondition {
	fn from(pattern: String) -> Self {
		Self::Path(pattern)
	}
}
