//! High-level router API.

use http::Method;

use crate::error::InsertError;
use crate::method_router::MethodRouter;
use crate::node::{Node, NodeInsertError};
use crate::params::Params;
use crate::path::normalize_path;
use crate::RouteMatch;

/// A radix tree router mapping `(method, path template)` to values of type `T`.
///
/// # Route Priority
///
/// 1. **Static segments** (`/fruits/featured`)
/// 2. **Parameter segments** (`/fruits/{id}`)
/// 3. **Wildcard segments** (`/static/*path`)
///
/// A parameter branch that fails deeper down is abandoned and the wildcard
/// branch is tried next, with the parameters captured on the way discarded.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Inserts a route.
    ///
    /// The path is normalized first, so `/fruits/` and `/fruits` are the same
    /// template. Fails without modifying the router when the method is already
    /// registered on the template, when a parameter name clashes with an
    /// existing one at the same position, or when the template is malformed.
    pub fn insert(&mut self, method: &Method, path: &str, value: T) -> Result<(), InsertError<T>> {
        if !path.starts_with('/') {
            return Err(InsertError::InvalidPath {
                path: path.to_string(),
                reason: "path must start with '/'".to_string(),
                value,
            });
        }

        let normalized = normalize_path(path);
        let segments = match Node::<T>::parse_path(&normalized) {
            Ok(segments) => segments,
            Err(reason) => {
                return Err(InsertError::InvalidPath {
                    path: normalized,
                    reason,
                    value,
                })
            }
        };

        match self.root.insert(&segments, method, value) {
            Ok(()) => {
                self.route_count += 1;
                Ok(())
            }
            Err((NodeInsertError::Occupied, value)) => Err(InsertError::Conflict {
                method: method.clone(),
                path: normalized,
                value,
            }),
            Err((NodeInsertError::ParamName { existing, found }, value)) => {
                Err(InsertError::ParamConflict {
                    path: normalized,
                    existing,
                    found,
                    value,
                })
            }
        }
    }

    /// Matches a method and concrete path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let (methods, params) = self.root.match_path(path)?;
        let value = methods.get(method)?;
        Some(RouteMatch::new(value, params))
    }

    /// Matches a path regardless of method.
    ///
    /// Lets the caller tell "no such path" (404) apart from "path exists,
    /// method does not" (405).
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        self.root.match_path(path)
    }

    /// Number of `(method, path)` pairs registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_new() {
        let router: Router<()> = Router::new();
        assert!(router.is_empty());
    }

    #[test]
    fn test_static_vs_param_priority() {
        let mut router = Router::new();
        router.insert(&Method::GET, "/fruits/featured", "featured").unwrap();
        router.insert(&Method::GET, "/fruits/{id}", "byId").unwrap();

        assert_eq!(
            router.match_route(&Method::GET, "/fruits/featured").map(|m| *m.value),
            Some("featured")
        );
        let m = router.match_route(&Method::GET, "/fruits/9").unwrap();
        assert_eq!(*m.value, "byId");
        assert_eq!(m.params.get("id"), Some("9"));
    }

    #[test]
    fn test_wildcard_captures_rest() {
        let mut router = Router::new();
        router.insert(&Method::GET, "/static/*path", 1).unwrap();

        let m = router.match_route(&Method::GET, "/static/css/site.css").unwrap();
        assert_eq!(m.params.get("path"), Some("css/site.css"));
    }

    #[test]
    fn test_method_not_allowed_is_distinguishable() {
        let mut router = Router::new();
        router.insert(&Method::GET, "/fruits", 1).unwrap();

        assert!(router.match_route(&Method::POST, "/fruits").is_none());
        let (methods, _) = router.match_path("/fruits").unwrap();
        assert_eq!(methods.allowed_methods(), vec![Method::GET]);
    }

    #[test]
    fn test_trailing_slash_matches() {
        let mut router = Router::new();
        router.insert(&Method::GET, "/fruits", 1).unwrap();
        assert!(router.match_route(&Method::GET, "/fruits/").is_some());
    }

    #[test]
    fn test_root_path() {
        let mut router = Router::new();
        router.insert(&Method::GET, "/", "root").unwrap();
        assert_eq!(router.match_route(&Method::GET, "/").map(|m| *m.value), Some("root"));
    }

    #[test]
    fn test_invalid_paths_do_not_count() {
        let mut router = Router::new();
        assert!(matches!(
            router.insert(&Method::GET, "fruits", 1),
            Err(InsertError::InvalidPath { .. })
        ));
        assert!(matches!(
            router.insert(&Method::GET, "/files/*rest/more", 2),
            Err(InsertError::InvalidPath { .. })
        ));
        assert!(router.is_empty());
    }

    #[test]
    fn test_param_conflict_reported() {
        let mut router = Router::new();
        router.insert(&Method::GET, "/fruits/{id}", 1).unwrap();
        let err = router.insert(&Method::GET, "/fruits/{name}/seeds", 2).unwrap_err();
        assert!(matches!(err, InsertError::ParamConflict { .. }));
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_deep_templates() {
        let mut router = Router::new();
        router.insert(&Method::GET, "/orgs/{org}/fruits", "list").unwrap();
        router.insert(&Method::GET, "/orgs/{org}/fruits/{id}", "get").unwrap();

        let m = router.match_route(&Method::GET, "/orgs/acme/fruits/3").unwrap();
        assert_eq!(*m.value, "get");
        assert_eq!(m.params.get("org"), Some("acme"));
        assert_eq!(m.params.get("id"), Some("3"));
    }
}
