//! Moderation filter: block-list scanning of message text.

/// Scan `text` for block-list terms as case-insensitive substrings.
///
/// Returns the matched terms (as configured, not as they appear in the
/// text), deduplicated, in block-list order. Empty terms never match.
pub fn scan(text: &str, block_list: &[String]) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut matches = Vec::new();
    for term in block_list {
        if term.is_empty() {
            continue;
        }
        let needle = term.to_lowercase();
        if lowered.contains(&needle) && !matches.contains(term) {
            matches.push(term.clone());
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        let matches = scan("this is a BadWord here", &list(&["badword"]));
        assert_eq!(matches, vec!["badword"]);
    }

    #[test]
    fn test_clean_text_matches_nothing() {
        assert!(scan("clean text", &list(&["badword"])).is_empty());
    }

    #[test]
    fn test_multiple_terms_in_list_order() {
        let matches = scan("FOO and bar", &list(&["bar", "foo", "baz"]));
        assert_eq!(matches, vec!["bar", "foo"]);
    }

    #[test]
    fn test_duplicate_terms_deduplicated() {
        let matches = scan("foo foo foo", &list(&["foo", "foo"]));
        assert_eq!(matches, vec!["foo"]);
    }

    #[test]
    fn test_empty_term_never_matches() {
        assert!(scan("anything", &list(&[""])).is_empty());
    }

    #[test]
    fn test_mixed_case_block_list_term() {
        let matches = scan("badword", &list(&["BadWord"]));
        assert_eq!(matches, vec!["BadWord"]);
    }
}
