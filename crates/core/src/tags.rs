//! Tag-resolution engine.
//!
//! Callers supply tag *names*; the catalog supplies enabled candidate rows
//! (already filtered by kind and by the acting user's disablement set at
//! the store layer). Resolution is strict: every distinct requested name
//! must match exactly one enabled catalog entry, otherwise the whole call
//! fails with a kind-specific validation error. Output order is always
//! catalog order -- ascending `sort_order`, ties broken by name -- so the
//! result is independent of the caller's input order.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::TagKind;

/// Minimal view of a catalog tag required for resolution. Implemented by
/// the store's tag row so this module stays persistence-free.
pub trait CatalogTag {
    fn tag_name(&self) -> &str;
    fn sort_order(&self) -> i32;
}

/// Resolve a list of requested tag names against enabled catalog
/// candidates.
///
/// Duplicates in `requested` collapse; an empty request resolves to an
/// empty list. Fails with [`CoreError::invalid_tags`] when any requested
/// name has no enabled match or the distinct resolved count differs from
/// the distinct requested count.
pub fn resolve_tags<T: CatalogTag>(
    kind: TagKind,
    requested: &[String],
    candidates: Vec<T>,
) -> Result<Vec<T>, CoreError> {
    let requested_names: HashSet<&str> = requested.iter().map(String::as_str).collect();
    if requested_names.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut resolved: Vec<T> = Vec::with_capacity(requested_names.len());
    for candidate in candidates {
        if requested_names.contains(candidate.tag_name()) && seen.insert(candidate.tag_name().to_string())
        {
            resolved.push(candidate);
        }
    }

    if resolved.len() != requested_names.len() {
        return Err(CoreError::invalid_tags(kind));
    }

    resolved.sort_by(|a, b| {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.tag_name().cmp(b.tag_name()))
    });
    Ok(resolved)
}

/// Resolve an optional singular tag name (e.g. a reaction's feeling).
///
/// `None` passes through; a supplied name is held to the same enablement
/// check as [`resolve_tags`] and fails identically on a mismatch.
pub fn resolve_tag_by_name<T: CatalogTag>(
    kind: TagKind,
    name: Option<&str>,
    candidates: Vec<T>,
) -> Result<Option<T>, CoreError> {
    let Some(name) = name else {
        return Ok(None);
    };
    let mut matched: Vec<T> = candidates
        .into_iter()
        .filter(|c| c.tag_name() == name)
        .collect();
    match matched.len() {
        1 => Ok(Some(matched.remove(0))),
        _ => Err(CoreError::invalid_tags(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Debug, Clone, PartialEq)]
    struct TestTag {
        name: &'static str,
        order: i32,
    }

    impl CatalogTag for TestTag {
        fn tag_name(&self) -> &str {
            self.name
        }
        fn sort_order(&self) -> i32 {
            self.order
        }
    }

    fn tag(name: &'static str, order: i32) -> TestTag {
        TestTag { name, order }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_in_catalog_order_regardless_of_input_order() {
        let catalog = vec![tag("A", 1), tag("B", 2)];
        let forward = resolve_tags(TagKind::Behavior, &names(&["A", "B"]), catalog.clone()).unwrap();
        let reversed = resolve_tags(TagKind::Behavior, &names(&["B", "A"]), catalog).unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(forward[0].name, "A");
        assert_eq!(forward[1].name, "B");
    }

    #[test]
    fn catalog_order_ties_break_by_name() {
        let catalog = vec![tag("zebra", 5), tag("apple", 5), tag("mango", 1)];
        let resolved = resolve_tags(
            TagKind::Activity,
            &names(&["zebra", "apple", "mango"]),
            catalog,
        )
        .unwrap();
        let resolved: Vec<&str> = resolved.iter().map(|t| t.name).collect();
        assert_eq!(resolved, vec!["mango", "apple", "zebra"]);
    }

    #[test]
    fn duplicate_requested_names_collapse() {
        let catalog = vec![tag("A", 1)];
        let resolved =
            resolve_tags(TagKind::Therapy, &names(&["A", "A", "A"]), catalog).unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn empty_request_resolves_empty() {
        let resolved = resolve_tags(TagKind::Sleep, &[], vec![tag("A", 1)]).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn unmatched_name_fails_with_kind_specific_message() {
        let err = resolve_tags(TagKind::Behavior, &names(&["A", "missing"]), vec![tag("A", 1)])
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert_eq!(msg, "Invalid or disabled behavior tags");
        });
    }

    #[test]
    fn disabled_tag_fails_resolution() {
        // A disabled tag never reaches the candidate set; from the engine's
        // point of view it is simply absent from the catalog.
        let err = resolve_tags(TagKind::Sleep, &names(&["night terror"]), Vec::<TestTag>::new())
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert_eq!(msg, "Invalid or disabled sleep tags");
        });
    }

    #[test]
    fn singular_resolution_passes_through_none() {
        let resolved =
            resolve_tag_by_name(TagKind::Feeling, None, vec![tag("happy", 1)]).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn singular_resolution_matches_one() {
        let resolved =
            resolve_tag_by_name(TagKind::Feeling, Some("happy"), vec![tag("happy", 1)])
                .unwrap()
                .unwrap();
        assert_eq!(resolved.name, "happy");
    }

    #[test]
    fn singular_resolution_fails_on_unknown_name() {
        let err = resolve_tag_by_name(TagKind::Feeling, Some("elated"), vec![tag("happy", 1)])
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert_eq!(msg, "Invalid or disabled feeling tags");
        });
    }
}
