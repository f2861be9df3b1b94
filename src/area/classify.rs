//! Inner/outer classification, winding normalization, nesting assignment
//! and role conformance checking for completed rings.

use log::{debug, warn};

use crate::area::ring::{ProtoRing, RingClass};
use crate::area::segment::SegmentList;
use crate::parsers::Role;
use crate::report::ProblemReporter;

/// Decide outer vs inner for every ring and normalize winding: outer rings
/// get a positive shoelace sum, inner rings a negative one. Returns the
/// arena indices of the outer and inner rings.
pub(crate) fn classify_rings(
    rings: &mut [ProtoRing],
    segments: &SegmentList,
    debug_enabled: bool,
) -> (Vec<usize>, Vec<usize>) {
    if rings.len() == 1 {
        rings[0].set_class(RingClass::Outer);
        if !rings[0].is_cw() {
            rings[0].reverse();
        }
        return (vec![0], Vec::new());
    }

    let mut outer = Vec::new();
    let mut inner = Vec::new();
    for (idx, ring) in rings.iter_mut().enumerate() {
        if ray_cast_is_inner(ring, segments, debug_enabled) {
            ring.set_class(RingClass::Inner);
            if ring.is_cw() {
                ring.reverse();
            }
            inner.push(idx);
        } else {
            ring.set_class(RingClass::Outer);
            if !ring.is_cw() {
                ring.reverse();
            }
            outer.push(idx);
        }
        if debug_enabled {
            debug!("    ring {} is {:?}", idx, ring.class());
        }
    }
    (outer, inner)
}

/// Leftward ray-cast parity test of the ring's basepoint against the global
/// segment list. The list is sorted, so only the prefix up to the
/// basepoint's x needs scanning. Segments ending exactly on the basepoint
/// are handled by the `above` correction: an odd number of such segments
/// continuing upward flips the parity.
fn ray_cast_is_inner(ring: &ProtoRing, segments: &SegmentList, debug_enabled: bool) -> bool {
    let min_node = ring.min_node();
    let pt = min_node.location;
    if debug_enabled {
        debug!("    classify ring with min_node {:?}", min_node);
    }

    let mut count = 0u32;
    let mut above = 0u32;
    for segment in segments.iter() {
        if segment.first().location.x > pt.x {
            break;
        }
        if ring.contains(segment) {
            continue;
        }
        if segment.to_left_of(pt) {
            count += 1;
        }
        if segment.first().location == pt && segment.second().location.y > pt.y {
            above += 1;
        }
        if segment.second().location == pt && segment.first().location.y > pt.y {
            above += 1;
        }
    }
    if debug_enabled {
        debug!("      count={} above={}", count, above);
    }

    (count + above % 2) % 2 == 1
}

/// Attach every inner ring to the smallest outer ring containing its
/// basepoint. `outer` is re-sorted by area, smallest first, so the first
/// containing outer is the tightest one. Inners with no enclosing outer are
/// dropped and reported.
pub(crate) fn assign_inner_rings(
    rings: &mut [ProtoRing],
    outer: &mut Vec<usize>,
    inner: &[usize],
    reporter: &mut dyn ProblemReporter,
) {
    if outer.len() == 1 {
        let o = outer[0];
        for &i in inner {
            rings[o].add_inner_ring(i);
        }
        return;
    }

    outer.sort_by_key(|&o| rings[o].signed_area());
    for &i in inner {
        let owner = outer
            .iter()
            .copied()
            .find(|&o| rings[i].is_in(&rings[o]));
        match owner {
            Some(o) => rings[o].add_inner_ring(i),
            None => {
                let location = rings[i].min_node().location;
                warn!("inner ring at {:?} has no enclosing outer ring", location);
                reporter.report_orphan_inner_ring(location);
            }
        }
    }
}

/// Compare each segment's declared member role against the ring it landed
/// in. Mismatches are reported and counted; the count gates the promotion
/// of tagged closed inner ways.
pub(crate) fn check_roles(
    rings: &[ProtoRing],
    outer: &[usize],
    inner: &[usize],
    reporter: &mut dyn ProblemReporter,
) -> usize {
    let mut mismatches = 0;
    for &o in outer {
        for segment in rings[o].segments() {
            if segment.role() != Role::Outer {
                mismatches += 1;
                reporter.report_role_should_be_outer(
                    segment.way(),
                    segment.first().location,
                    segment.second().location,
                );
            }
        }
    }
    for &i in inner {
        for segment in rings[i].segments() {
            if segment.role() != Role::Inner {
                mismatches += 1;
                reporter.report_role_should_be_inner(
                    segment.way(),
                    segment.first().location,
                    segment.second().location,
                );
            }
        }
    }
    mismatches
}
