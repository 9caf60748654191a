//! # Subscription Matching
//!
//! Evaluates subscription patterns against concrete message types.
//!
//! | Pattern | Matches | Level |
//! |---------|---------|-------|
//! | `*` | every type | 0 |
//! | `a.b.*` | types starting with `a.b.` | atoms in `a.b` (2) |
//! | `a.b.c` | exactly `a.b.c` | atoms in `a.b.c` (3) |
//!
//! A non-match has level -1. When several patterns match, the one with the
//! highest level wins; ties go to the first pattern in map order.

use shared_types::{Map, Subscriptions, WILDCARD};

/// Level returned when a pattern does not match.
pub const NO_MATCH: i32 = -1;

fn atom_count(s: &str) -> i32 {
    i32::try_from(s.split('.').count()).unwrap_or(i32::MAX)
}

/// Number of atoms of `mtype` matched by `pattern`, 0 for `*`, -1 for none.
pub fn match_level(pattern: &str, mtype: &str) -> i32 {
    if pattern == WILDCARD {
        return 0;
    }
    if let Some(prefix) = pattern.strip_suffix(".*") {
        let matches = mtype
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'));
        return if matches { atom_count(prefix) } else { NO_MATCH };
    }
    if pattern == mtype {
        atom_count(mtype)
    } else {
        NO_MATCH
    }
}

/// Annotation of the best-matching pattern, if any pattern matches.
pub fn best_subscription<'a>(subscriptions: &'a Subscriptions, mtype: &str) -> Option<&'a Map> {
    let mut best: Option<(i32, &Map)> = None;
    for (pattern, annotation) in subscriptions {
        let level = match_level(pattern, mtype);
        if level > best.map_or(NO_MATCH, |(l, _)| l) {
            best = Some((level, annotation));
        }
    }
    best.map(|(_, annotation)| annotation)
}

/// Whether a client with these subscriptions receives `mtype`.
///
/// A subscription on a client that cannot be called back is meaningless.
pub fn is_subscribed(subscriptions: &Subscriptions, mtype: &str, callable: bool) -> bool {
    callable
        && subscriptions
            .keys()
            .any(|pattern| match_level(pattern, mtype) >= 0)
}
