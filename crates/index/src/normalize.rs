/// Number of leading characters used as the prefix bucket key.
pub const PREFIX_LEN: usize = 3;

/// Folds a raw name or query into its comparable form.
///
/// Leading and trailing whitespace is dropped, interior whitespace runs collapse to a
/// single space, and ASCII letters are lowercased. Non-ASCII characters pass through
/// unchanged.
pub fn normalize(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	for word in raw.split_whitespace() {
		if !out.is_empty() {
			out.push(' ');
		}
		out.extend(word.chars().map(|c| c.to_ascii_lowercase()));
	}
	out
}

/// Returns the prefix bucket key for an already normalized name.
///
/// Names shorter than [`PREFIX_LEN`] characters are keyed by the whole name.
pub fn prefix_key(normalized: &str) -> &str {
	match normalized.char_indices().nth(PREFIX_LEN) {
		Some((end, _)) => &normalized[..end],
		None => normalized,
	}
}

/// Character count, used for every length comparison in the cascade.
#[inline]
pub(crate) fn char_len(s: &str) -> usize {
	s.chars().count()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn folds_case_and_whitespace() {
		assert_eq!(normalize("  Apple   Cabbage\tStew "), "apple cabbage stew");
		assert_eq!(normalize(""), "");
		assert_eq!(normalize("   "), "");
	}

	#[test]
	fn leaves_non_ascii_alone() {
		assert_eq!(normalize("Ösmund"), "Ösmund");
	}

	#[test]
	fn prefix_key_respects_char_boundaries() {
		assert_eq!(prefix_key("apple"), "app");
		assert_eq!(prefix_key("ab"), "ab");
		assert_eq!(prefix_key("äöüx"), "äöü");
	}
}
