//! Property tests for path matching.

use daedalus_router::{InsertError, Router};
use http::Method;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}"
}

proptest! {
    #[test]
    fn parameters_round_trip_through_match(
        prefix in segment(),
        id in "[A-Za-z0-9_-]{1,12}",
        child in "[A-Za-z0-9_-]{1,12}",
    ) {
        let mut router = Router::new();
        let template = format!("/{prefix}/{{id}}/items/{{child}}");
        router.insert(&Method::GET, &template, ()).unwrap();

        let concrete = format!("/{prefix}/{id}/items/{child}");
        let matched = router.match_route(&Method::GET, &concrete).unwrap();
        prop_assert_eq!(matched.params.get("id"), Some(id.as_str()));
        prop_assert_eq!(matched.params.get("child"), Some(child.as_str()));
    }

    #[test]
    fn second_insert_of_same_pair_always_conflicts(
        segments in proptest::collection::vec(segment(), 1..5),
    ) {
        let mut router = Router::new();
        let path = format!("/{}", segments.join("/"));
        router.insert(&Method::PUT, &path, 1).unwrap();

        let err = router.insert(&Method::PUT, &path, 2).unwrap_err();
        let is_conflict = matches!(err, InsertError::Conflict { .. });
        prop_assert!(is_conflict);
        prop_assert_eq!(router.len(), 1);
        prop_assert_eq!(router.match_route(&Method::PUT, &path).map(|m| *m.value), Some(1));
    }
}
