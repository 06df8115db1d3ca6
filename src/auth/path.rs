//! Path exclusion matching

/// Decide whether `path` needs authentication given a list of exclusion rules.
///
/// A rule ending in `*` exempts every path that starts with the text before
/// the `*`. Any other rule exempts paths starting with the rule minus its
/// trailing `/`. Matching is a plain prefix test, so `/api/v1` also exempts
/// `/api/v1extra`.
pub fn requires_auth(path: Option<&str>, exclusions: &[String]) -> bool {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return true;
    };
    if exclusions.is_empty() {
        return true;
    }

    !exclusions.iter().any(|rule| matches_rule(path, rule))
}

fn matches_rule(path: &str, rule: &str) -> bool {
    match rule.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => path.starts_with(rule.trim_end_matches('/')),
    }
}
