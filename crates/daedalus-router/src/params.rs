//! Captured path parameters.

use smallvec::SmallVec;

/// Values bound to `{name}` and `*name` segments, in template order.
///
/// Names are unique per route (the tree rejects templates that reuse one), so
/// lookup by name is a linear scan over a few inline entries.
///
/// ```rust
/// use daedalus_router::Params;
///
/// let mut params = Params::new();
/// params.push("id", "42");
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("name"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params(SmallVec<[(String, String); 4]>);

impl Params {
    /// No parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// The value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A position to [`rewind`](Self::rewind) to when a branch of the tree
    /// fails to match.
    pub(crate) fn mark(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn rewind(&mut self, mark: usize) {
        self.0.truncate(mark);
    }

    /// `(name, value)` pairs in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(pairs: I) -> Self {
        Self(pairs.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}
