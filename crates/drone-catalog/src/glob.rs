//! Substring-wildcard matching for compatibility-rule pattern globs.
//!
//! `*` means "any substring" — nothing more. There is deliberately no
//! dependency on a regex engine here: a glob decomposes into literal
//! segments at `*` boundaries, and matching is a handful of `starts_with`/
//! `find`/`ends_with` calls.

/// Whether `text` matches `glob`. An empty glob matches only empty text.
#[must_use]
pub fn glob_match(glob: &str, text: &str) -> bool {
    if glob == "*" {
        return true;
    }
    let segments: Vec<&str> = glob.split('*').collect();
    if segments.len() == 1 {
        return glob == text;
    }

    let first = segments[0];
    if !text.starts_with(first) {
        return false;
    }
    let mut pos = first.len();

    let last = segments[segments.len() - 1];
    for segment in &segments[1..segments.len() - 1] {
        if segment.is_empty() {
            continue;
        }
        match text[pos..].find(segment) {
            Some(found) => pos += found + segment.len(),
            None => return false,
        }
    }

    if text.len() < pos + last.len() {
        return false;
    }
    text.ends_with(last) && text.len() - last.len() >= pos
}

/// Specificity of a glob: exact literal (2) beats one-sided wildcard (1)
/// beats the bare `*` (0). Used to resolve overlapping compatibility rules
/// to the most specific one.
#[must_use]
pub fn glob_specificity(glob: &str) -> u8 {
    if glob == "*" {
        0
    } else if glob.contains('*') {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_star_matches_anything() {
        assert!(glob_match("*", "hover-autonomous-performer-bare.sim-simple"));
        assert!(glob_match("*", ""));
    }

    #[test]
    fn exact_glob_matches_only_exact_text() {
        assert!(glob_match("hover-x", "hover-x"));
        assert!(!glob_match("hover-x", "hover-xy"));
    }

    #[test]
    fn prefix_glob() {
        assert!(glob_match("hover-*", "hover-autonomous-performer-bare.sim-simple"));
        assert!(!glob_match("hover-*", "translate-autonomous-performer-bare.sim-simple"));
    }

    #[test]
    fn suffix_glob() {
        assert!(glob_match("*.sim-simple", "hover-autonomous-performer-bare.sim-simple"));
        assert!(!glob_match("*.sim-simple", "hover-autonomous-performer-bare.crazyflie-2.1"));
    }

    #[test]
    fn infix_glob_requires_order() {
        assert!(glob_match("hover-*-bare*", "hover-autonomous-performer-bare.sim-simple"));
        assert!(!glob_match("bare-*-hover*", "hover-autonomous-performer-bare.sim-simple"));
    }

    #[test]
    fn empty_glob_matches_only_empty_text() {
        assert!(glob_match("", ""));
        assert!(!glob_match("", "x"));
    }

    #[test]
    fn specificity_orders_exact_over_wildcard_over_star() {
        assert!(glob_specificity("hover-x") > glob_specificity("hover-*"));
        assert!(glob_specificity("hover-*") > glob_specificity("*"));
    }
}
