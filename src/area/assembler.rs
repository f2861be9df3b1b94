//! Orchestration of the assembly pipeline for single ways and multipolygon
//! relations.

use std::collections::HashSet;

use log::debug;

use crate::area::builder::RingBuilder;
use crate::area::classify;
use crate::area::ring::ProtoRing;
use crate::area::segment::SegmentList;
use crate::area::tags;
use crate::area::{AreaBuffer, AreaPolygon, AreaRecordBuilder};
use crate::parsers::{NodeRef, Relation, Role, Way};
use crate::report::{ObjectKind, ProblemReporter};

#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblerConfig {
    /// Enables the very chatty per-segment trace on the debug log level.
    pub debug: bool,
}

/// Assembles area records from a closed way or from a multipolygon
/// relation and its member ways. All state is per call; one assembler can
/// be reused for any number of inputs but must not be shared between
/// threads.
pub struct Assembler<'r> {
    config: AssemblerConfig,
    reporter: &'r mut dyn ProblemReporter,
}

/// The completed rings of one assembly, with the outer ring arena indices
/// in emission order.
struct RingSet {
    rings: Vec<ProtoRing>,
    outer: Vec<usize>,
    role_mismatches: usize,
}

impl<'r> Assembler<'r> {
    pub fn new(config: AssemblerConfig, reporter: &'r mut dyn ProblemReporter) -> Self {
        Assembler { config, reporter }
    }

    /// Assemble an area from a single closed way. The record lands in
    /// `out`; its index is returned. On invalid geometry the record is a
    /// shell: attributes and tags, no polygons.
    pub fn assemble_way(&mut self, way: &Way, out: &mut AreaBuffer) -> usize {
        self.reporter.set_object(ObjectKind::Way, way.id.0);

        if !way.nodes.is_empty() && !way.ends_have_same_id() {
            let front = way.nodes[0];
            let back = way.nodes[way.nodes.len() - 1];
            self.reporter
                .report_duplicate_node(front.id, back.id, front.location);
        }

        let mut segment_list = SegmentList::new(self.config.debug);
        segment_list.extract_from_way(way, Role::Outer);
        if self.config.debug {
            debug!(
                "assembling way {} from {} segments",
                way.id.0,
                segment_list.len()
            );
        }

        let mut record = AreaRecordBuilder::from_way(way);
        record.set_tags(way.tags.clone());
        if let Some(set) = self.create_rings(&mut segment_list) {
            add_polygons(&mut record, &set);
        }
        record.finish(out)
    }

    /// Assemble an area from a relation and its member ways; `members` runs
    /// parallel to `relation.members`. Afterwards, closed inner ways whose
    /// own tags differ from the area's are assembled into records of their
    /// own, unless any member role contradicted the computed geometry.
    pub fn assemble_relation(
        &mut self,
        relation: &Relation,
        members: &[Way],
        out: &mut AreaBuffer,
    ) -> usize {
        self.reporter
            .set_object(ObjectKind::Relation, relation.id.0);

        let mut segment_list = SegmentList::new(self.config.debug);
        segment_list.extract_from_relation(relation, members);
        if self.config.debug {
            debug!(
                "assembling relation {} from {} members, {} segments",
                relation.id.0,
                members.len(),
                segment_list.len()
            );
        }

        let mut record = AreaRecordBuilder::from_relation(relation);
        let mut role_mismatches = 0;
        match self.create_rings(&mut segment_list) {
            Some(set) => {
                let donors = outer_ways(&set, members);
                record.set_tags(tags::area_tags_from_relation(
                    relation,
                    &donors,
                    self.config.debug,
                ));
                add_polygons(&mut record, &set);
                role_mismatches = set.role_mismatches;
            }
            None => {
                // shell record: keep the tag selection working without rings
                record.set_tags(tags::area_tags_from_relation(
                    relation,
                    &[],
                    self.config.debug,
                ));
            }
        }
        let index = record.finish(out);

        if role_mismatches == 0 {
            self.promote_tagged_inner_ways(relation, members, index, out);
        }
        index
    }

    /// A closed inner way carrying tags of its own describes a feature that
    /// happens to be a hole in the enclosing area; give it an area record
    /// of its own.
    fn promote_tagged_inner_ways(
        &mut self,
        relation: &Relation,
        members: &[Way],
        area_index: usize,
        out: &mut AreaBuffer,
    ) {
        let area_tags = match out.get(area_index) {
            Some(area) => tags::filtered(&area.tags, tags::PROMOTION_KEYS),
            None => return,
        };
        for (member, way) in relation.members.iter().zip(members) {
            if member.role != Role::Inner || !way.is_closed() || way.tags.is_empty() {
                continue;
            }
            let way_tags = tags::filtered(&way.tags, tags::PROMOTION_KEYS);
            if way_tags.is_empty() || way_tags == area_tags {
                continue;
            }
            if self.config.debug {
                debug!("  promoting tagged closed inner way {}", way.id.0);
            }
            let mut assembler = Assembler::new(self.config, &mut *self.reporter);
            assembler.assemble_way(way, out);
        }
    }

    /// Normalize the segment list and run it through ring construction,
    /// classification, nesting and role checking. None means the geometry
    /// is invalid and was reported.
    fn create_rings(&mut self, segment_list: &mut SegmentList) -> Option<RingSet> {
        segment_list.sort();
        segment_list.erase_duplicate_segments();

        if segment_list.find_intersections(self.reporter) {
            return None;
        }

        let mut rings =
            RingBuilder::new(segment_list, &mut *self.reporter, self.config.debug).build()?;

        let (mut outer, inner) =
            classify::classify_rings(&mut rings, segment_list, self.config.debug);
        classify::assign_inner_rings(&mut rings, &mut outer, &inner, self.reporter);
        let role_mismatches = classify::check_roles(&rings, &outer, &inner, self.reporter);

        Some(RingSet {
            rings,
            outer,
            role_mismatches,
        })
    }
}

/// The member ways contributing segments to any outer ring, in member
/// order, each at most once.
fn outer_ways<'a>(set: &RingSet, members: &'a [Way]) -> Vec<&'a Way> {
    let mut ids = HashSet::new();
    for &o in &set.outer {
        set.rings[o].way_ids(&mut ids);
    }
    let mut ways = Vec::new();
    for way in members {
        if ids.remove(&way.id) {
            ways.push(way);
        }
    }
    ways
}

/// The explicitly closed node list of a ring: front terminal, then every
/// segment's far endpoint.
fn ring_nodes(ring: &ProtoRing) -> Vec<NodeRef> {
    let mut nodes = Vec::with_capacity(ring.segments().len() + 1);
    nodes.push(ring.first());
    for segment in ring.segments() {
        nodes.push(segment.second());
    }
    nodes
}

fn add_polygons(record: &mut AreaRecordBuilder, set: &RingSet) {
    for &o in &set.outer {
        let ring = &set.rings[o];
        let inners = ring
            .inner_rings()
            .iter()
            .map(|&i| ring_nodes(&set.rings[i]))
            .collect();
        record.add_polygon(AreaPolygon {
            outer: ring_nodes(ring),
            inners,
        });
    }
}
