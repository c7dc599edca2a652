//! Query string parsing.

use serde::de::DeserializeOwned;

use crate::error::BindError;

/// Deserializes a URL query string with `serde_urlencoded`.
///
/// ```rust
/// use daedalus_extract::parse_query;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Paging {
///     limit: u32,
///     offset: Option<u32>,
/// }
///
/// let paging: Paging = parse_query(Some("limit=10")).unwrap();
/// assert_eq!(paging.limit, 10);
/// assert!(paging.offset.is_none());
///
/// assert!(parse_query::<Paging>(Some("limit=ten")).is_err());
/// ```
pub fn parse_query<T: DeserializeOwned>(query: Option<&str>) -> Result<T, BindError> {
    serde_urlencoded::from_str(query.unwrap_or_default())
        .map_err(|e| BindError::decode(format!("invalid query string: {e}")))
}

/// Splits a urlencoded string into keys with all their values, keeping the
/// order in which keys first appear.
pub(crate) fn group_pairs(encoded: &[u8]) -> Result<Vec<(String, Vec<String>)>, BindError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(encoded)
        .map_err(|e| BindError::decode(format!("invalid form body: {e}")))?;

    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in pairs {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }
    Ok(grouped)
}
