//! Choosing the tags an assembled area carries.

use std::collections::BTreeMap;

use log::debug;

use crate::parsers::{Relation, TagList, Way};

/// Keys that never decide whether an object has "real" tags.
pub(crate) const UNINTERESTING_KEYS: &[&str] = &[
    "type",
    "created_by",
    "source",
    "note",
    "test:id",
    "test:section",
];

/// The filter used when deciding whether a closed inner way deserves its own
/// area. Deliberately without "type": a type tag on a way is a real tag.
pub(crate) const PROMOTION_KEYS: &[&str] =
    &["created_by", "source", "note", "test:id", "test:section"];

/// The tags remaining after dropping the given keys.
pub(crate) fn filtered(tags: &TagList, dropped_keys: &[&str]) -> TagList {
    tags.iter()
        .filter(|(k, _)| !dropped_keys.contains(&k.as_str()))
        .cloned()
        .collect()
}

/// Tag selection for a relation area: the relation's own tags win if it has
/// any beyond the uninteresting set; otherwise a single outer way donates
/// everything; otherwise the outer ways' common tags are used.
pub(crate) fn area_tags_from_relation(
    relation: &Relation,
    outer_ways: &[&Way],
    debug_enabled: bool,
) -> TagList {
    let interesting = filtered(&relation.tags, UNINTERESTING_KEYS);
    if debug_enabled {
        debug!(
            "  relation {} has {} tags beyond the ignored ones",
            relation.id.0,
            interesting.len()
        );
    }

    if !interesting.is_empty() {
        // all relation tags except type=*
        return relation
            .tags
            .iter()
            .filter(|(k, _)| k.as_str() != "type")
            .cloned()
            .collect();
    }

    if outer_ways.len() == 1 {
        if debug_enabled {
            debug!("    tags from the single outer way");
        }
        return outer_ways[0].tags.clone();
    }

    if debug_enabled {
        debug!("    common tags of {} outer ways", outer_ways.len());
    }
    common_tags(outer_ways)
}

/// The key/value pairs present on every one of the given ways, in key
/// order.
pub(crate) fn common_tags(ways: &[&Way]) -> TagList {
    let mut counter: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for way in ways {
        for (k, v) in way.tags.iter() {
            *counter.entry((k.as_str(), v.as_str())).or_insert(0) += 1;
        }
    }
    counter
        .into_iter()
        .filter(|&(_, count)| count == ways.len())
        .map(|((k, v), _)| (k.to_string(), v.to_string()))
        .collect()
}
