//! Completeness filtering: only relations whose member ways are fully
//! resolvable are worth sending into the assembler.

use rayon::prelude::*;

use std::collections::HashSet;

use crate::parsers::pbfreader::RawInput;
use crate::parsers::{RelationId, WayId};

/// The ids of all relations whose member ways are present and have every
/// node location resolved, sorted for deterministic processing.
pub fn complete_relations(input: &RawInput) -> Vec<RelationId> {
    let mut complete_ways = HashSet::new();
    complete_ways.par_extend(input.ways.par_iter().filter_map(|(id, way)| {
        for node_id in &way.nodes {
            if !input.nodes.contains_key(node_id) {
                return None;
            }
        }
        Some(*id)
    }));
    let complete_ways: HashSet<WayId> = complete_ways;

    let mut ids: Vec<RelationId> = input
        .relations
        .par_iter()
        .filter_map(|(id, relation)| {
            for member in &relation.members {
                if !complete_ways.contains(&member.way) {
                    return None;
                }
            }
            Some(*id)
        })
        .collect();
    ids.sort_by_key(|id| id.0);
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::pbfreader::{RawRelation, RawWay};
    use crate::parsers::{Location, Member, NodeId, Role, TagList};

    fn input_with_two_relations() -> RawInput {
        let mut input = RawInput::default();
        for (rel_id, way_id) in [(1i64, 10i64), (2, 20)] {
            input.relations.insert(
                RelationId(rel_id),
                RawRelation {
                    id: RelationId(rel_id),
                    tags: TagList::new(),
                    members: vec![Member {
                        way: WayId(way_id),
                        role: Role::Outer,
                    }],
                },
            );
            input.ways.insert(
                WayId(way_id),
                RawWay {
                    id: WayId(way_id),
                    tags: TagList::new(),
                    nodes: vec![NodeId(way_id * 100), NodeId(way_id * 100 + 1)],
                },
            );
        }
        for node_id in [1000i64, 1001, 2000, 2001] {
            input.nodes.insert(NodeId(node_id), Location::new(0, 0));
        }
        input
    }

    #[test]
    fn all_relations_complete() {
        let input = input_with_two_relations();
        assert_eq!(
            complete_relations(&input),
            vec![RelationId(1), RelationId(2)]
        );
    }

    #[test]
    fn missing_node_drops_the_relation() {
        let mut input = input_with_two_relations();
        input.nodes.remove(&NodeId(2001));
        assert_eq!(complete_relations(&input), vec![RelationId(1)]);
    }

    #[test]
    fn missing_way_drops_the_relation() {
        let mut input = input_with_two_relations();
        input.ways.remove(&WayId(10));
        assert_eq!(complete_relations(&input), vec![RelationId(2)]);
    }
}
