//! Growing chains of segments on their way to becoming closed rings.

use std::collections::HashSet;
use std::ops::Range;

use crate::area::segment::NodeRefSegment;
use crate::parsers::{NodeRef, WayId};

/// Classification a ring receives once the scanline has looked at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RingClass {
    Undetermined,
    Outer,
    Inner,
}

/// A non-empty chain of segments. Adjacent segments share an endpoint
/// location; the chain is directed, so `segments[i].second()` connects to
/// `segments[i + 1].first()`.
///
/// Rings live in an arena owned by the assembly; nesting between rings is
/// kept as arena indices so re-sorting the outer rings cannot invalidate
/// anything.
#[derive(Debug, Clone)]
pub(crate) struct ProtoRing {
    segments: Vec<NodeRefSegment>,
    class: RingClass,
    inners: Vec<usize>,
}

impl ProtoRing {
    pub fn new(segment: NodeRefSegment) -> Self {
        ProtoRing {
            segments: vec![segment],
            class: RingClass::Undetermined,
            inners: Vec::new(),
        }
    }

    pub fn from_segments(segments: Vec<NodeRefSegment>) -> Self {
        assert!(!segments.is_empty());
        ProtoRing {
            segments,
            class: RingClass::Undetermined,
            inners: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[NodeRefSegment] {
        &self.segments
    }

    /// The front terminal of the chain.
    pub fn first(&self) -> NodeRef {
        self.segments[0].first()
    }

    /// The back terminal of the chain.
    pub fn last(&self) -> NodeRef {
        self.segments[self.segments.len() - 1].second()
    }

    pub fn closed(&self) -> bool {
        self.segments.len() >= 3 && self.first().location == self.last().location
    }

    pub fn add_segment_back(&mut self, segment: NodeRefSegment) {
        self.segments.push(segment);
    }

    pub fn add_segment_front(&mut self, segment: NodeRefSegment) {
        self.segments.insert(0, segment);
    }

    /// Reverse the chain direction: segment order and every segment's
    /// endpoints are flipped.
    pub fn reverse(&mut self) {
        self.segments.reverse();
        for segment in &mut self.segments {
            segment.swap_locations();
        }
    }

    /// Exchange the segment chains of two rings.
    pub fn swap_segments(&mut self, other: &mut ProtoRing) {
        std::mem::swap(&mut self.segments, &mut other.segments);
    }

    /// Append the other ring's chain after this one.
    pub fn merge_ring(&mut self, other: ProtoRing) {
        self.segments.extend(other.segments);
    }

    /// Append the other ring's chain after this one, reversed.
    pub fn merge_ring_reverse(&mut self, mut other: ProtoRing) {
        other.reverse();
        self.segments.extend(other.segments);
    }

    /// Detach and return a slice of the chain; used to split off a closed
    /// sub-ring.
    pub fn remove_segments(&mut self, range: Range<usize>) -> Vec<NodeRefSegment> {
        self.segments.drain(range).collect()
    }

    /// Whether this segment (either orientation) is part of the ring; used
    /// to exclude a ring's own segments from the scanline count.
    pub fn contains(&self, segment: &NodeRefSegment) -> bool {
        self.segments.iter().any(|s| {
            (s.first().location == segment.first().location
                && s.second().location == segment.second().location)
                || (s.first().location == segment.second().location
                    && s.second().location == segment.first().location)
        })
    }

    /// Twice the shoelace area of the chain; only the sign and relative
    /// magnitude are ever used.
    pub fn signed_area(&self) -> i128 {
        let mut sum: i128 = 0;
        for segment in &self.segments {
            let a = segment.first().location;
            let b = segment.second().location;
            sum += i128::from(a.x) * i128::from(b.y) - i128::from(b.x) * i128::from(a.y);
        }
        sum
    }

    pub fn is_cw(&self) -> bool {
        self.signed_area() > 0
    }

    /// The lexicographically smallest endpoint of the ring, the basepoint
    /// for all point-in-polygon work.
    pub fn min_node(&self) -> NodeRef {
        let mut min = self.segments[0].first();
        for segment in &self.segments {
            for nr in [segment.first(), segment.second()] {
                if nr.location < min.location {
                    min = nr;
                }
            }
        }
        min
    }

    /// Even-odd test of this ring's basepoint against the outer ring's
    /// chain.
    pub fn is_in(&self, outer: &ProtoRing) -> bool {
        let pt = self.min_node().location;
        let mut inside = false;
        for segment in &outer.segments {
            let a = segment.first().location;
            let b = segment.second().location;
            if (a.y > pt.y) != (b.y > pt.y) {
                // pt.x < crossing x, compared exactly; sign of dy decides the direction
                let dy = i128::from(b.y) - i128::from(a.y);
                let lhs = (i128::from(pt.x) - i128::from(a.x)) * dy;
                let rhs = (i128::from(b.x) - i128::from(a.x)) * (i128::from(pt.y) - i128::from(a.y));
                if (dy > 0 && lhs < rhs) || (dy < 0 && lhs > rhs) {
                    inside = !inside;
                }
            }
        }
        inside
    }

    pub fn class(&self) -> RingClass {
        self.class
    }

    pub fn set_class(&mut self, class: RingClass) {
        self.class = class;
    }

    pub fn add_inner_ring(&mut self, index: usize) {
        self.inners.push(index);
    }

    pub fn inner_rings(&self) -> &[usize] {
        &self.inners
    }

    /// Collect the ids of all ways contributing segments to this ring.
    pub fn way_ids(&self, out: &mut HashSet<WayId>) {
        for segment in &self.segments {
            out.insert(segment.way());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{Location, NodeId, Role};

    fn node(id: i64, x: i32, y: i32) -> NodeRef {
        NodeRef::new(NodeId(id), Location::new(x, y))
    }

    fn seg(a: NodeRef, b: NodeRef) -> NodeRefSegment {
        let mut s = NodeRefSegment::new(a, b, WayId(1), Role::Outer);
        // chain direction a -> b
        if s.first().location != a.location {
            s.swap_locations();
        }
        s
    }

    /// Counter-clockwise unit square chain (0,0) (10,0) (10,10) (0,10).
    fn square() -> ProtoRing {
        let n1 = node(1, 0, 0);
        let n2 = node(2, 10, 0);
        let n3 = node(3, 10, 10);
        let n4 = node(4, 0, 10);
        ProtoRing::from_segments(vec![
            seg(n1, n2),
            seg(n2, n3),
            seg(n3, n4),
            seg(n4, n1),
        ])
    }

    #[test]
    fn closedness_needs_three_segments_and_matching_ends() {
        let ring = square();
        assert!(ring.closed());

        let mut open = ProtoRing::new(seg(node(1, 0, 0), node(2, 10, 0)));
        assert!(!open.closed());
        open.add_segment_back(seg(node(2, 10, 0), node(3, 10, 10)));
        assert!(!open.closed());
    }

    #[test]
    fn signed_area_flips_with_direction() {
        let mut ring = square();
        let area = ring.signed_area();
        assert_eq!(area, 200); // twice the area of a 10x10 square
        assert!(ring.is_cw());
        ring.reverse();
        assert_eq!(ring.signed_area(), -area);
        assert!(!ring.is_cw());
        assert!(ring.closed());
    }

    #[test]
    fn min_node_is_lexicographic_smallest() {
        let ring = square();
        assert_eq!(ring.min_node().location, Location::new(0, 0));
    }

    #[test]
    fn merge_and_swap_preserve_chains() {
        let n1 = node(1, 0, 0);
        let n2 = node(2, 10, 0);
        let n3 = node(3, 10, 10);
        let mut a = ProtoRing::new(seg(n1, n2));
        let b = ProtoRing::new(seg(n2, n3));
        a.merge_ring(b);
        assert_eq!(a.segments().len(), 2);
        assert_eq!(a.first().location, n1.location);
        assert_eq!(a.last().location, n3.location);

        // reversed merge attaches a chain ending where ours ends
        let mut a = ProtoRing::new(seg(n1, n2));
        let c = ProtoRing::new(seg(n3, n2));
        a.merge_ring_reverse(c);
        assert_eq!(a.last().location, n3.location);
    }

    #[test]
    fn contains_matches_either_orientation() {
        let ring = square();
        let forward = seg(node(9, 0, 0), node(8, 10, 0));
        let backward = seg(node(9, 10, 0), node(8, 0, 0));
        let elsewhere = seg(node(9, 3, 3), node(8, 4, 4));
        assert!(ring.contains(&forward));
        assert!(ring.contains(&backward));
        assert!(!ring.contains(&elsewhere));
    }

    #[test]
    fn point_in_polygon() {
        let outer = square();
        let inside = ProtoRing::new(seg(node(9, 4, 4), node(8, 6, 6)));
        let outside = ProtoRing::new(seg(node(9, 14, 4), node(8, 16, 6)));
        assert!(inside.is_in(&outer));
        assert!(!outside.is_in(&outer));
    }
}
