//! HTTP method-based routing.
//!
//! [`MethodRouter`] holds the values registered for a single path template,
//! one slot per standard method plus a list for extension methods.

use http::Method;

/// Per-method value table for one path.
///
/// # Example
///
/// ```rust
/// use daedalus_router::MethodRouter;
/// use http::Method;
///
/// let mut methods = MethodRouter::new();
/// methods.try_insert(&Method::GET, "listFruits").unwrap();
/// assert!(methods.try_insert(&Method::GET, "again").is_err());
/// assert_eq!(methods.get(&Method::GET), Some(&"listFruits"));
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    get: Option<T>,
    post: Option<T>,
    put: Option<T>,
    delete: Option<T>,
    patch: Option<T>,
    head: Option<T>,
    options: Option<T>,
    trace: Option<T>,
    extensions: Vec<(Method, T)>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            get: None,
            post: None,
            put: None,
            delete: None,
            patch: None,
            head: None,
            options: None,
            trace: None,
            extensions: Vec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, method: &Method) -> Option<&mut Option<T>> {
        match *method {
            Method::GET => Some(&mut self.get),
            Method::POST => Some(&mut self.post),
            Method::PUT => Some(&mut self.put),
            Method::DELETE => Some(&mut self.delete),
            Method::PATCH => Some(&mut self.patch),
            Method::HEAD => Some(&mut self.head),
            Method::OPTIONS => Some(&mut self.options),
            Method::TRACE => Some(&mut self.trace),
            _ => None,
        }
    }

    /// Stores `value` for `method`.
    ///
    /// Returns the value back when the method is already taken; the existing
    /// entry is never replaced.
    pub fn try_insert(&mut self, method: &Method, value: T) -> Result<(), T> {
        if let Some(slot) = self.slot_mut(method) {
            if slot.is_some() {
                return Err(value);
            }
            *slot = Some(value);
            return Ok(());
        }

        if self.extensions.iter().any(|(m, _)| m == method) {
            return Err(value);
        }
        self.extensions.push((method.clone(), value));
        Ok(())
    }

    /// Returns the value registered for `method`.
    ///
    /// `HEAD` falls back to the `GET` entry when no explicit `HEAD` route exists.
    #[must_use]
    pub fn get(&self, method: &Method) -> Option<&T> {
        match *method {
            Method::GET => self.get.as_ref(),
            Method::POST => self.post.as_ref(),
            Method::PUT => self.put.as_ref(),
            Method::DELETE => self.delete.as_ref(),
            Method::PATCH => self.patch.as_ref(),
            Method::HEAD => self.head.as_ref().or(self.get.as_ref()),
            Method::OPTIONS => self.options.as_ref(),
            Method::TRACE => self.trace.as_ref(),
            _ => self
                .extensions
                .iter()
                .find(|(m, _)| m == method)
                .map(|(_, v)| v),
        }
    }

    /// Returns true if at least one method is registered.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        !self.allowed_methods().is_empty()
    }

    /// Lists the registered methods, standard ones first in a fixed order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        let standard = [
            (Method::GET, self.get.is_some()),
            (Method::POST, self.post.is_some()),
            (Method::PUT, self.put.is_some()),
            (Method::DELETE, self.delete.is_some()),
            (Method::PATCH, self.patch.is_some()),
            (Method::HEAD, self.head.is_some()),
            (Method::OPTIONS, self.options.is_some()),
            (Method::TRACE, self.trace.is_some()),
        ];
        standard
            .into_iter()
            .filter_map(|(method, present)| present.then_some(method))
            .chain(self.extensions.iter().map(|(m, _)| m.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let router: MethodRouter<u8> = MethodRouter::new();
        assert!(!router.has_any_method());
        assert!(router.allowed_methods().is_empty());
    }

    #[test]
    fn test_insert_each_standard_method() {
        let mut router = MethodRouter::new();
        for (i, method) in [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH]
            .iter()
            .enumerate()
        {
            router.try_insert(method, i).unwrap();
        }
        assert_eq!(router.get(&Method::PUT), Some(&2));
        assert_eq!(router.get(&Method::PATCH), Some(&4));
        assert_eq!(router.allowed_methods().len(), 5);
    }

    #[test]
    fn test_duplicate_returns_value() {
        let mut router = MethodRouter::new();
        router.try_insert(&Method::DELETE, "first").unwrap();
        assert_eq!(router.try_insert(&Method::DELETE, "second"), Err("second"));
        assert_eq!(router.get(&Method::DELETE), Some(&"first"));
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let mut router = MethodRouter::new();
        router.try_insert(&Method::GET, 1).unwrap();
        assert_eq!(router.get(&Method::HEAD), Some(&1));
        assert!(!router.allowed_methods().contains(&Method::HEAD));
    }

    #[test]
    fn test_extension_method() {
        let purge = Method::from_bytes(b"PURGE").unwrap();
        let mut router = MethodRouter::new();
        router.try_insert(&purge, 9).unwrap();
        assert_eq!(router.get(&purge), Some(&9));
        assert!(router.try_insert(&purge, 10).is_err());
        assert_eq!(router.allowed_methods(), vec![purge]);
    }
}
