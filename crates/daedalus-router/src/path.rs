//! Path template helpers.

/// Normalizes a path: guarantees a leading `/`, collapses empty segments and
/// drops a trailing `/` (except for the root itself).
///
/// ```rust
/// use daedalus_router::normalize_path;
///
/// assert_eq!(normalize_path("fruits//{id}/"), "/fruits/{id}");
/// assert_eq!(normalize_path("/"), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    out
}

/// Returns the names of every `{param}` and `*wildcard` segment of a path
/// template, in order of appearance.
///
/// ```rust
/// use daedalus_router::path_parameters;
///
/// assert_eq!(
///     path_parameters("/orgs/{org}/files/*rest"),
///     vec!["org".to_string(), "rest".to_string()]
/// );
/// ```
#[must_use]
pub fn path_parameters(template: &str) -> Vec<String> {
    template
        .split('/')
        .filter_map(|segment| {
            segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .or_else(|| segment.strip_prefix('*'))
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_leading_slash() {
        assert_eq!(normalize_path("fruits"), "/fruits");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
    }

    #[test]
    fn test_normalize_joins_prefixes() {
        let joined = format!("{}/{}", "/api/", "/fruits/");
        assert_eq!(normalize_path(&joined), "/api/fruits");
    }

    #[test]
    fn test_path_parameters_none() {
        assert!(path_parameters("/fruits").is_empty());
    }

    #[test]
    fn test_path_parameters_skips_partial_braces() {
        assert!(path_parameters("/files/{name").is_empty());
    }
}
