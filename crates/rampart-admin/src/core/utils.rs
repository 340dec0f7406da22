//! Name helpers shared by registration and rendering

use regex::Regex;
use std::sync::LazyLock;

static URL_SAFE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("URL_SAFE_REGEX: invalid regex pattern")
});

/// Whether `name` can appear as a single URL path segment without escaping.
///
/// Empty names are never safe.
pub fn is_url_safe(name: &str) -> bool {
	URL_SAFE_REGEX.is_match(name)
}

/// Turns an identifier into a display name.
///
/// Underscores become spaces, camel-case boundaries are split (keeping
/// acronyms together) and every word is capitalized.
///
/// # Examples
///
/// ```
/// use rampart_admin::core::humanize_name;
///
/// assert_eq!(humanize_name("HTTPStatus"), "HTTP Status");
/// assert_eq!(humanize_name("testName"), "Test Name");
/// assert_eq!(humanize_name("blog_post"), "Blog Post");
/// ```
pub fn humanize_name(name: &str) -> String {
	let chars: Vec<char> = name.chars().map(|c| if c == '_' { ' ' } else { c }).collect();
	let mut spaced = String::with_capacity(name.len() + 4);

	for (i, &c) in chars.iter().enumerate() {
		if i > 0 && c.is_uppercase() {
			let prev = chars[i - 1];
			let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
			let boundary = prev.is_lowercase()
				|| prev.is_ascii_digit()
				|| (prev.is_uppercase() && next_is_lower);
			if boundary && !spaced.ends_with(' ') {
				spaced.push(' ');
			}
		}
		spaced.push(c);
	}

	spaced
		.split_whitespace()
		.map(capitalize)
		.collect::<Vec<_>>()
		.join(" ")
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("HTTPStatus", "HTTP Status")]
	#[case("testName", "Test Name")]
	#[case("TestName", "Test Name")]
	#[case("Test Name", "Test Name")]
	#[case("user_id", "User Id")]
	#[case("ID", "ID")]
	#[case("version2Beta", "Version2 Beta")]
	#[case("  padded__name ", "Padded Name")]
	#[case("", "")]
	fn test_humanize_name(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(humanize_name(input), expected);
	}

	#[rstest]
	#[case("blog", true)]
	#[case("Blog_Post-2.v1", true)]
	#[case("", false)]
	#[case("blog post", false)]
	#[case("blog/post", false)]
	#[case("café", false)]
	fn test_is_url_safe(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(is_url_safe(name), expected);
	}

	proptest! {
		#[test]
		fn prop_humanize_is_idempotent(name in "[A-Za-z0-9_ ]{0,24}") {
			let once = humanize_name(&name);
			prop_assert_eq!(humanize_name(&once), once.clone());
			prop_assert!(!once.contains("  "));
		}
	}
}
