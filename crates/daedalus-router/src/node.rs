//! Radix tree node.
//!
//! Each node owns one path segment. Static children are kept sorted so lookup
//! can binary search; parameter and wildcard children are singular because two
//! parameters at the same position would be ambiguous.

use crate::method_router::MethodRouter;
use crate::params::Params;

/// Kind of a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    /// Literal text
    Static,
    /// `{name}`
    Param(String),
    /// `*name`, must be last
    Wildcard(String),
}

/// Why a segment list could not be inserted.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum NodeInsertError {
    /// The method is already present at the target node.
    Occupied,
    /// A parameter with another name already sits at this position.
    ParamName { existing: String, found: String },
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    segment: String,
    kind: SegmentKind,
    methods: Option<MethodRouter<T>>,
    static_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn with_kind(segment: String, kind: SegmentKind) -> Self {
        Self {
            segment,
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    pub(crate) fn root() -> Self {
        Self::with_kind(String::new(), SegmentKind::Static)
    }

    /// Splits a template into typed segments, validating parameter syntax.
    pub(crate) fn parse_path(path: &str) -> Result<Vec<(String, SegmentKind)>, String> {
        let raw: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());

        for (i, s) in raw.iter().enumerate() {
            let kind = if let Some(inner) = s.strip_prefix('{') {
                let name = inner
                    .strip_suffix('}')
                    .ok_or_else(|| format!("unclosed parameter segment '{s}'"))?;
                if name.is_empty() {
                    return Err("empty parameter name".to_string());
                }
                SegmentKind::Param(name.to_string())
            } else if let Some(name) = s.strip_prefix('*') {
                if name.is_empty() {
                    return Err("empty wildcard name".to_string());
                }
                if i + 1 != raw.len() {
                    return Err(format!("wildcard '*{name}' must be the last segment"));
                }
                SegmentKind::Wildcard(name.to_string())
            } else {
                SegmentKind::Static
            };
            segments.push(((*s).to_string(), kind));
        }

        Ok(segments)
    }

    pub(crate) fn insert(
        &mut self,
        segments: &[(String, SegmentKind)],
        method: &http::Method,
        value: T,
    ) -> Result<(), (NodeInsertError, T)> {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            let methods = self.methods.get_or_insert_with(MethodRouter::new);
            return methods
                .try_insert(method, value)
                .map_err(|value| (NodeInsertError::Occupied, value));
        };

        let child = match kind {
            SegmentKind::Static => {
                match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(i) => &mut self.static_children[i],
                    Err(i) => {
                        self.static_children
                            .insert(i, Self::with_kind(segment.clone(), SegmentKind::Static));
                        &mut self.static_children[i]
                    }
                }
            }
            SegmentKind::Param(name) | SegmentKind::Wildcard(name) => {
                let slot = if matches!(kind, SegmentKind::Param(_)) {
                    &mut self.param_child
                } else {
                    &mut self.wildcard_child
                };
                if let Some(existing) = slot.as_deref() {
                    if let SegmentKind::Param(existing) | SegmentKind::Wildcard(existing) =
                        &existing.kind
                    {
                        if existing != name {
                            return Err((
                                NodeInsertError::ParamName {
                                    existing: existing.clone(),
                                    found: name.clone(),
                                },
                                value,
                            ));
                        }
                    }
                }
                &mut **slot
                    .get_or_insert_with(|| Box::new(Self::with_kind(segment.clone(), kind.clone())))
            }
        };

        child.insert(remaining, method, value)
    }

    /// Finds the method table for a concrete request path.
    pub(crate) fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments(&self, segments: &[&str], params: &mut Params) -> Option<&MethodRouter<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Ok(i) = self
            .static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
        {
            if let Some(found) = self.static_children[i].match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.mark();
                params.push(name.clone(), (*segment).to_string());
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.rewind(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                let methods = child.methods.as_ref()?;
                params.push(name.clone(), segments.join("/"));
                return Some(methods);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn insert(root: &mut Node<&'static str>, path: &str, value: &'static str) {
        let segments = Node::<&str>::parse_path(path).unwrap();
        root.insert(&segments, &Method::GET, value).unwrap();
    }

    #[test]
    fn test_parse_path_kinds() {
        let segments = Node::<()>::parse_path("/files/{id}/*rest").unwrap();
        assert_eq!(segments[0].1, SegmentKind::Static);
        assert_eq!(segments[1].1, SegmentKind::Param("id".to_string()));
        assert_eq!(segments[2].1, SegmentKind::Wildcard("rest".to_string()));
    }

    #[test]
    fn test_parse_path_rejects_bad_templates() {
        assert!(Node::<()>::parse_path("/a/{}").is_err());
        assert!(Node::<()>::parse_path("/a/{id").is_err());
        assert!(Node::<()>::parse_path("/a/*rest/b").is_err());
        assert!(Node::<()>::parse_path("/a/*").is_err());
    }

    #[test]
    fn test_backtracks_from_dead_param_branch() {
        let mut root = Node::root();
        insert(&mut root, "/fruits/{id}/seeds", "seeds");
        insert(&mut root, "/fruits/*rest", "catchAll");

        let (methods, params) = root.match_path("/fruits/7/leaves").unwrap();
        assert_eq!(methods.get(&Method::GET), Some(&"catchAll"));
        assert_eq!(params.get("rest"), Some("7/leaves"));
        assert_eq!(params.get("id"), None);
    }

    #[test]
    fn test_param_name_conflict() {
        let mut root = Node::root();
        insert(&mut root, "/fruits/{id}", "get");
        let segments = Node::<&str>::parse_path("/fruits/{name}/seeds").unwrap();
        let (err, value) = root.insert(&segments, &Method::GET, "seeds").unwrap_err();
        assert_eq!(
            err,
            NodeInsertError::ParamName {
                existing: "id".to_string(),
                found: "name".to_string()
            }
        );
        assert_eq!(value, "seeds");
    }

    #[test]
    fn test_occupied() {
        let mut root = Node::root();
        insert(&mut root, "/fruits", "list");
        let segments = Node::<&str>::parse_path("/fruits").unwrap();
        let (err, _) = root.insert(&segments, &Method::GET, "again").unwrap_err();
        assert_eq!(err, NodeInsertError::Occupied);
    }
}
