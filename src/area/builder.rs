//! Incremental ring construction from the sorted segment list.

use log::debug;

use crate::area::ring::ProtoRing;
use crate::area::segment::{NodeRefSegment, SegmentList};
use crate::parsers::NodeRef;
use crate::report::ProblemReporter;

/// Compare two node refs by location; a location match under different ids
/// is reported as a duplicate node but still counts as a match.
pub(crate) fn same_location(
    reporter: &mut dyn ProblemReporter,
    nr1: NodeRef,
    nr2: NodeRef,
) -> bool {
    if nr1.location != nr2.location {
        return false;
    }
    if nr1.id != nr2.id {
        reporter.report_duplicate_node(nr1.id, nr2.id, nr1.location);
    }
    true
}

/// Builds proto-rings by tacking each segment onto an existing open ring
/// where possible, merging rings whose terminals meet, and splitting off
/// closed sub-rings as they appear.
pub(crate) struct RingBuilder<'a> {
    segments: &'a SegmentList,
    reporter: &'a mut dyn ProblemReporter,
    debug: bool,
    rings: Vec<ProtoRing>,
}

impl<'a> RingBuilder<'a> {
    pub fn new(
        segments: &'a SegmentList,
        reporter: &'a mut dyn ProblemReporter,
        debug: bool,
    ) -> Self {
        RingBuilder {
            segments,
            reporter,
            debug,
            rings: Vec::new(),
        }
    }

    /// Consume the segment list in order and return the completed rings, or
    /// None if any ring stayed open (reported).
    pub fn build(mut self) -> Option<Vec<ProtoRing>> {
        let segments = self.segments;
        for segment in segments.iter() {
            if self.debug {
                debug!("  checking segment {:?}", segment);
            }
            if !self.add_to_existing_ring(*segment) {
                if self.debug {
                    debug!("    new ring for segment {:?}", segment);
                }
                self.rings.push(ProtoRing::new(*segment));
            }
        }

        if self.check_for_open_rings() {
            return None;
        }
        Some(self.rings)
    }

    /// Try to attach the segment to either terminal of an open ring. The
    /// first of the four endpoint matches wins; the segment is swapped into
    /// chain direction where needed.
    fn add_to_existing_ring(&mut self, mut segment: NodeRefSegment) -> bool {
        for idx in 0..self.rings.len() {
            if self.rings[idx].closed() {
                continue;
            }
            let back = self.rings[idx].last();
            let front = self.rings[idx].first();
            if same_location(self.reporter, back, segment.first()) {
                self.combine_rings_back(segment, idx);
                return true;
            }
            if same_location(self.reporter, back, segment.second()) {
                segment.swap_locations();
                self.combine_rings_back(segment, idx);
                return true;
            }
            if same_location(self.reporter, front, segment.first()) {
                segment.swap_locations();
                self.combine_rings_front(segment, idx);
                return true;
            }
            if same_location(self.reporter, front, segment.second()) {
                self.combine_rings_front(segment, idx);
                return true;
            }
        }
        false
    }

    fn combine_rings_back(&mut self, segment: NodeRefSegment, idx: usize) {
        if self.debug {
            debug!("    match at back of ring {}", idx);
        }
        self.rings[idx].add_segment_back(segment);
        self.has_closed_subring_back(idx, segment.second());
        if let Some(idx) = self.possibly_combine_rings_back(idx) {
            self.check_for_closed_subring(idx);
        }
    }

    fn combine_rings_front(&mut self, segment: NodeRefSegment, idx: usize) {
        if self.debug {
            debug!("    match at front of ring {}", idx);
        }
        self.rings[idx].add_segment_front(segment);
        self.has_closed_subring_front(idx, segment.first());
        if let Some(idx) = self.possibly_combine_rings_front(idx) {
            self.check_for_closed_subring(idx);
        }
    }

    /// If the new back endpoint coincides with an interior endpoint of the
    /// chain, the tail from that point on is a closed sub-ring: split it off.
    fn has_closed_subring_back(&mut self, idx: usize, nr: NodeRef) -> bool {
        let len = self.rings[idx].segments().len();
        if len < 3 {
            return false;
        }
        for i in 1..len - 1 {
            let first = self.rings[idx].segments()[i].first();
            if same_location(self.reporter, nr, first) {
                let sub = self.rings[idx].remove_segments(i..len);
                self.split_off_subring(sub, idx);
                return true;
            }
        }
        false
    }

    /// Mirror image: the new front endpoint closes a sub-ring at the head of
    /// the chain.
    fn has_closed_subring_front(&mut self, idx: usize, nr: NodeRef) -> bool {
        let len = self.rings[idx].segments().len();
        if len < 3 {
            return false;
        }
        for i in 1..len - 1 {
            let second = self.rings[idx].segments()[i].second();
            if same_location(self.reporter, nr, second) {
                let sub = self.rings[idx].remove_segments(0..i + 1);
                self.split_off_subring(sub, idx);
                return true;
            }
        }
        false
    }

    fn split_off_subring(&mut self, sub: Vec<NodeRefSegment>, idx: usize) {
        if self.debug {
            debug!(
                "    split ring {} into {:?} and {:?}",
                idx,
                sub,
                self.rings[idx].segments()
            );
        }
        self.rings.push(ProtoRing::from_segments(sub));
    }

    /// Merge another open ring whose terminal meets this ring's back.
    /// Returns the ring's index after the merge (removal may shift it), or
    /// None if nothing merged.
    fn possibly_combine_rings_back(&mut self, idx: usize) -> Option<usize> {
        let nr = self.rings[idx].last();
        for i in 0..self.rings.len() {
            if i == idx || self.rings[i].closed() {
                continue;
            }
            if same_location(self.reporter, nr, self.rings[i].first()) {
                if self.debug {
                    debug!("    ring {} back joins front of ring {}", idx, i);
                }
                let other = self.rings.remove(i);
                let idx = if i < idx { idx - 1 } else { idx };
                self.rings[idx].merge_ring(other);
                return Some(idx);
            }
            if same_location(self.reporter, nr, self.rings[i].last()) {
                if self.debug {
                    debug!("    ring {} back joins back of ring {}", idx, i);
                }
                let other = self.rings.remove(i);
                let idx = if i < idx { idx - 1 } else { idx };
                self.rings[idx].merge_ring_reverse(other);
                return Some(idx);
            }
        }
        None
    }

    /// Merge another open ring whose terminal meets this ring's front.
    fn possibly_combine_rings_front(&mut self, idx: usize) -> Option<usize> {
        let nr = self.rings[idx].first();
        for i in 0..self.rings.len() {
            if i == idx || self.rings[i].closed() {
                continue;
            }
            if same_location(self.reporter, nr, self.rings[i].last()) {
                if self.debug {
                    debug!("    ring {} front joins back of ring {}", idx, i);
                }
                let mut other = self.rings.remove(i);
                let idx = if i < idx { idx - 1 } else { idx };
                // other comes first in the combined chain
                self.rings[idx].swap_segments(&mut other);
                self.rings[idx].merge_ring(other);
                return Some(idx);
            }
            if same_location(self.reporter, nr, self.rings[i].first()) {
                if self.debug {
                    debug!("    ring {} front joins front of ring {}", idx, i);
                }
                let other = self.rings.remove(i);
                let idx = if i < idx { idx - 1 } else { idx };
                self.rings[idx].reverse();
                self.rings[idx].merge_ring(other);
                return Some(idx);
            }
        }
        None
    }

    /// After a merge the combined chain can contain an interior coincidence
    /// anywhere, not just at a terminal. Sort a copy of the segments; two
    /// neighbors sharing a `first` endpoint expose the coincidence, and the
    /// chain is split between their two positions.
    fn check_for_closed_subring(&mut self, idx: usize) -> bool {
        let mut sorted = self.rings[idx].segments().to_vec();
        sorted.sort();

        let mut pair = None;
        for w in sorted.windows(2) {
            if same_location(self.reporter, w[0].first(), w[1].first()) {
                pair = Some((w[0], w[1]));
                break;
            }
        }
        let (a, b) = match pair {
            Some(p) => p,
            None => return false,
        };

        let segments = self.rings[idx].segments();
        let r1 = segments.iter().position(|s| s == &a);
        let r2 = segments.iter().position(|s| s == &b);
        let (r1, r2) = match (r1, r2) {
            (Some(r1), Some(r2)) => (r1.min(r2), r1.max(r2)),
            _ => return false,
        };

        let sub = self.rings[idx].remove_segments(r1..r2);
        self.split_off_subring(sub, idx);
        true
    }

    /// Report every ring that is still open. Returns true if any was.
    fn check_for_open_rings(&mut self) -> bool {
        let mut open = false;
        for ring in &self.rings {
            if !ring.closed() {
                open = true;
                self.reporter
                    .report_ring_not_closed(ring.first().location, ring.last().location);
            }
        }
        open
    }
}
