//! URL path helpers for published content.
//!
//! Paths are stored rooted (`/news/2026/spring-launch`) without a trailing
//! slash; the site root is the single slash `/`.

/// Normalize a stored URL path: ensure a leading slash, strip any trailing
/// slash (except for the root itself), and collapse empty input to `/`.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return "/".to_string();
    }
    let mut out = String::with_capacity(trimmed.len() + 1);
    if !trimmed.starts_with('/') {
        out.push('/');
    }
    out.push_str(trimmed.trim_end_matches('/'));
    out
}

/// Compute the parent path by removing the last `/`-delimited segment.
///
/// The root path maps to an empty parent.
///
/// ```
/// use vellum_core::paths::parent_path;
///
/// assert_eq!(parent_path("/news/2026/spring-launch"), "/news/2026");
/// assert_eq!(parent_path("/news"), "/");
/// assert_eq!(parent_path("/"), "");
/// ```
pub fn parent_path(path: &str) -> String {
    let normalized = normalize(path);
    if normalized == "/" {
        return String::new();
    }
    match normalized.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    }
}

/// Whether a purge target addresses the whole site.
///
/// Both the literal root path and the case-insensitive `root` token are
/// accepted; either one escalates a path purge to a full purge.
pub fn is_root_target(path: &str) -> bool {
    let trimmed = path.trim();
    trimmed == "/" || trimmed.eq_ignore_ascii_case("root")
}

/// Deduplicate a purge list, preserving first-seen order.
pub fn dedupe(paths: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    paths
        .iter()
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_leading_slash() {
        assert_eq!(normalize("news/today"), "/news/today");
    }

    #[test]
    fn normalize_strips_trailing_slash() {
        assert_eq!(normalize("/news/today/"), "/news/today");
    }

    #[test]
    fn normalize_keeps_root() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn parent_of_nested_path() {
        assert_eq!(parent_path("/a/b/c"), "/a/b");
    }

    #[test]
    fn parent_of_top_level_path_is_root() {
        assert_eq!(parent_path("/about"), "/");
    }

    #[test]
    fn parent_of_root_is_empty() {
        assert_eq!(parent_path("/"), "");
    }

    #[test]
    fn root_target_detection() {
        assert!(is_root_target("/"));
        assert!(is_root_target("root"));
        assert!(is_root_target("ROOT"));
        assert!(!is_root_target("/root-cellar"));
    }

    #[test]
    fn dedupe_preserves_order() {
        let input = vec![
            "/a".to_string(),
            "/b".to_string(),
            "/a".to_string(),
            "/c".to_string(),
        ];
        assert_eq!(dedupe(&input), vec!["/a", "/b", "/c"]);
    }
}
