//! Assembles polygonal area objects from OpenStreetMap geometry: a single
//! closed way, or a multipolygon relation referencing member ways with
//! `outer` and `inner` roles.
//!
//! The core is the ring-assembly engine in [`area`]: way segments are
//! normalized into a sorted list, chained into rings, classified as outer
//! or inner by a scanline parity test, nested, and emitted as [`Area`]
//! records. Invalid geometry is rejected with structured diagnostics
//! through a [`ProblemReporter`] and yields a ring-less shell record.

use std::io;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

pub mod area;
pub mod output;
pub mod parsers;
pub mod report;

mod filter;

pub mod prelude {
    pub use crate::area::{
        Area, AreaBuffer, AreaId, AreaPolygon, AreaRecordBuilder, Assembler, AssemblerConfig,
    };
    pub use crate::parsers::{
        Latitude, Location, Longitude, Member, Meta, NodeId, NodeRef, Relation, RelationId,
        Role, TagList, Way, WayId,
    };
    pub use crate::report::{
        CollectingReporter, NullReporter, ObjectKind, Problem, ProblemReporter,
    };
}

pub use prelude::*;

/// Outcome of assembling a whole pbf extract.
pub struct AssemblyRun {
    pub areas: Vec<Area>,
    pub problems: Vec<(Option<(ObjectKind, i64)>, Problem)>,
    /// Relations skipped because member ways or node locations were missing.
    pub skipped_relations: usize,
}

/// Import a pbf extract and assemble every complete area relation in it.
/// Relations are assembled in parallel; each gets its own assembler,
/// buffer and reporter, merged afterwards in relation id order.
pub fn assemble_areas(path: &Path, config: &AssemblerConfig) -> io::Result<AssemblyRun> {
    let now = Instant::now();
    let input = parsers::import(path)?;
    let import_time = now.elapsed();

    let now = Instant::now();
    let complete = filter::complete_relations(&input);
    let skipped_relations = input.relations.len() - complete.len();
    let filter_time = now.elapsed();

    let now = Instant::now();
    let results: Vec<_> = complete
        .par_iter()
        .filter_map(|&id| {
            let (relation, members) = input.resolve(id)?;
            let mut reporter = CollectingReporter::new();
            let mut buffer = AreaBuffer::new();
            Assembler::new(*config, &mut reporter).assemble_relation(
                &relation,
                &members,
                &mut buffer,
            );
            Some((buffer.into_areas(), reporter.into_problems()))
        })
        .collect();
    let assembly_time = now.elapsed();

    let mut areas = Vec::new();
    let mut problems = Vec::new();
    for (mut a, mut p) in results {
        areas.append(&mut a);
        problems.append(&mut p);
    }

    println!(
        "Stage     |   Number   | Time\n\
         ----------+------------+--------\n\
         Relations |{:>11} | {:?}\n\
         Complete  |{:>11} | {:?}\n\
         Areas     |{:>11} | {:?}",
        input.relations.len(),
        import_time,
        complete.len(),
        filter_time,
        areas.len(),
        assembly_time
    );

    Ok(AssemblyRun {
        areas,
        problems,
        skipped_relations,
    })
}
