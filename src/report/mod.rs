//! Problem sinks for the area assembler.
//!
//! Geometry problems are not errors in the Result sense: the assembler keeps
//! going (or degrades to a ring-less shell area) and reports what it saw
//! through one of these sinks. Reports never alter control flow.

use crate::parsers::{Location, NodeId, WayId};

/// What kind of object the subsequent reports refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Way,
    Relation,
}

/// A single recorded problem, as captured by [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Problem {
    /// Two node references share a location but not an id.
    DuplicateNode {
        id1: NodeId,
        id2: NodeId,
        location: Location,
    },
    /// A ring could not be closed; the two dangling endpoints.
    RingNotClosed { start: Location, end: Location },
    /// Two segments cross; carries both segments and the crossing point.
    SegmentIntersection {
        seg1: (Location, Location),
        seg2: (Location, Location),
        intersection: Location,
    },
    /// A segment ended up in an outer ring but its member role said otherwise.
    RoleShouldBeOuter {
        way: WayId,
        start: Location,
        end: Location,
    },
    /// A segment ended up in an inner ring but its member role said otherwise.
    RoleShouldBeInner {
        way: WayId,
        start: Location,
        end: Location,
    },
    /// An inner ring that no outer ring encloses; it is dropped from output.
    OrphanInnerRing { location: Location },
}

/// Sink for assembly diagnostics. All methods default to no-ops so that
/// implementations only pick up the reports they care about.
pub trait ProblemReporter {
    /// Set the object context for subsequent reports.
    fn set_object(&mut self, kind: ObjectKind, id: i64) {
        let _ = (kind, id);
    }

    fn report_duplicate_node(&mut self, id1: NodeId, id2: NodeId, location: Location) {
        let _ = (id1, id2, location);
    }

    fn report_ring_not_closed(&mut self, start: Location, end: Location) {
        let _ = (start, end);
    }

    fn report_segment_intersection(
        &mut self,
        seg1: (Location, Location),
        seg2: (Location, Location),
        intersection: Location,
    ) {
        let _ = (seg1, seg2, intersection);
    }

    fn report_role_should_be_outer(&mut self, way: WayId, start: Location, end: Location) {
        let _ = (way, start, end);
    }

    fn report_role_should_be_inner(&mut self, way: WayId, start: Location, end: Location) {
        let _ = (way, start, end);
    }

    fn report_orphan_inner_ring(&mut self, location: Location) {
        let _ = location;
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProblemReporter for NullReporter {}

/// Accumulates every report together with the object context it was made
/// under. Used by the import driver and throughout the tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    current: Option<(ObjectKind, i64)>,
    problems: Vec<(Option<(ObjectKind, i64)>, Problem)>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        CollectingReporter::default()
    }

    pub fn problems(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter().map(|(_, p)| p)
    }

    pub fn contexts(&self) -> &[(Option<(ObjectKind, i64)>, Problem)] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn into_problems(self) -> Vec<(Option<(ObjectKind, i64)>, Problem)> {
        self.problems
    }

    fn push(&mut self, problem: Problem) {
        self.problems.push((self.current, problem));
    }
}

impl ProblemReporter for CollectingReporter {
    fn set_object(&mut self, kind: ObjectKind, id: i64) {
        self.current = Some((kind, id));
    }

    fn report_duplicate_node(&mut self, id1: NodeId, id2: NodeId, location: Location) {
        self.push(Problem::DuplicateNode { id1, id2, location });
    }

    fn report_ring_not_closed(&mut self, start: Location, end: Location) {
        self.push(Problem::RingNotClosed { start, end });
    }

    fn report_segment_intersection(
        &mut self,
        seg1: (Location, Location),
        seg2: (Location, Location),
        intersection: Location,
    ) {
        self.push(Problem::SegmentIntersection {
            seg1,
            seg2,
            intersection,
        });
    }

    fn report_role_should_be_outer(&mut self, way: WayId, start: Location, end: Location) {
        self.push(Problem::RoleShouldBeOuter { way, start, end });
    }

    fn report_role_should_be_inner(&mut self, way: WayId, start: Location, end: Location) {
        self.push(Problem::RoleShouldBeInner { way, start, end });
    }

    fn report_orphan_inner_ring(&mut self, location: Location) {
        self.push(Problem::OrphanInnerRing { location });
    }
}
