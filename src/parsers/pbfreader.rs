//! Import of area relations, their member ways and node locations from an
//! .osm.pbf file.
//!
//! Three passes over the file: relations first, then the member ways they
//! reference, then the nodes those ways reference. The id sets are gathered
//! through channels by collector threads while the reader iterates.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::thread::spawn;

use log::warn;
use osmpbfreader::OsmPbfReader;

use crate::parsers::{
    is_area_relation, Location, Member, Meta, NodeId, NodeRef, Relation, RelationId, Role,
    TagList, Way, WayId,
};

/// Raw import of one pbf extract: area relations with their accepted way
/// members, the member ways as node id lists, and the node locations.
#[derive(Debug, Default)]
pub struct RawInput {
    pub relations: HashMap<RelationId, RawRelation>,
    pub ways: HashMap<WayId, RawWay>,
    pub nodes: HashMap<NodeId, Location>,
}

#[derive(Debug)]
pub struct RawRelation {
    pub id: RelationId,
    pub tags: TagList,
    pub members: Vec<Member>,
}

#[derive(Debug)]
pub struct RawWay {
    pub id: WayId,
    pub tags: TagList,
    pub nodes: Vec<NodeId>,
}

impl RawInput {
    /// Resolve a relation into the assembler's input model: the relation
    /// plus its member ways with located node references, parallel to the
    /// member list. None if anything is missing; the completeness filter
    /// normally rules that out beforehand.
    pub fn resolve(&self, id: RelationId) -> Option<(Relation, Vec<Way>)> {
        let raw = self.relations.get(&id)?;
        let mut ways = Vec::with_capacity(raw.members.len());
        for member in &raw.members {
            ways.push(self.resolve_way(member.way)?);
        }
        let relation = Relation {
            id: raw.id,
            meta: Meta::default(),
            tags: raw.tags.clone(),
            members: raw.members.clone(),
        };
        Some((relation, ways))
    }

    fn resolve_way(&self, id: WayId) -> Option<Way> {
        let raw = self.ways.get(&id)?;
        let mut nodes = Vec::with_capacity(raw.nodes.len());
        for node_id in &raw.nodes {
            let location = self.nodes.get(node_id)?;
            nodes.push(NodeRef::new(*node_id, *location));
        }
        Some(Way {
            id: raw.id,
            meta: Meta::default(),
            tags: raw.tags.clone(),
            nodes,
        })
    }
}

pub(crate) fn import(path: &Path) -> io::Result<RawInput> {
    let file = File::open(path)?;
    let mut reader = OsmPbfReader::new(file);

    let (way_id_sender, way_id_receiver) = channel();
    let way_id_set_receiver = collect_ids(way_id_receiver);

    let relations: HashMap<RelationId, RawRelation> = reader
        .par_iter()
        .filter_map(|obj| obj.ok())
        .filter(|obj| obj.is_relation())
        .filter_map(|obj| {
            let rel = obj.relation()?;
            let tags = convert_tags(&rel.tags);
            if !is_area_relation(&tags) {
                return None;
            }
            let mut members = Vec::new();
            for r in &rel.refs {
                let role = match Role::parse(r.role.as_str()) {
                    Some(role) => role,
                    None => {
                        warn!(
                            "relation {}: skipping member with role {:?}",
                            rel.id.0, r.role
                        );
                        continue;
                    }
                };
                match r.member {
                    osmpbfreader::OsmId::Way(way_id) => {
                        way_id_sender
                            .send(way_id)
                            .expect("Could not send way id to the collector!");
                        members.push(Member { way: way_id, role });
                    }
                    _ => warn!(
                        "relation {}: skipping non-way member with role {:?}",
                        rel.id.0, r.role
                    ),
                }
            }
            Some((rel.id, RawRelation {
                id: rel.id,
                tags,
                members,
            }))
        })
        .collect();

    drop(way_id_sender);
    let way_ids = way_id_set_receiver
        .recv()
        .expect("Could not receive the way id set!");

    let (node_id_sender, node_id_receiver) = channel();
    let node_id_set_receiver = collect_ids(node_id_receiver);

    reader.rewind().expect("Could not rewind the pbf file!");
    let ways: HashMap<WayId, RawWay> = reader
        .par_iter()
        .filter_map(|obj| obj.ok())
        .filter(|obj| obj.is_way())
        .filter_map(|obj| {
            let way = obj.way()?;
            if !way_ids.contains(&way.id) {
                return None;
            }
            for node_id in &way.nodes {
                node_id_sender
                    .send(*node_id)
                    .expect("Could not send node id to the collector!");
            }
            Some((way.id, RawWay {
                id: way.id,
                tags: convert_tags(&way.tags),
                nodes: way.nodes.clone(),
            }))
        })
        .collect();

    drop(node_id_sender);
    let node_ids = node_id_set_receiver
        .recv()
        .expect("Could not receive the node id set!");

    reader.rewind().expect("Could not rewind the pbf file!");
    let nodes: HashMap<NodeId, Location> = reader
        .par_iter()
        .filter_map(|obj| obj.ok())
        .filter(|obj| obj.is_node())
        .filter_map(|obj| {
            let node = obj.node()?;
            if !node_ids.contains(&node.id) {
                return None;
            }
            Some((
                node.id,
                Location::new(node.decimicro_lon, node.decimicro_lat),
            ))
        })
        .collect();

    Ok(RawInput {
        relations,
        ways,
        nodes,
    })
}

fn convert_tags(tags: &osmpbfreader::Tags) -> TagList {
    tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn collect_ids<IdType>(ids: Receiver<IdType>) -> Receiver<HashSet<IdType>>
where
    IdType: std::cmp::Eq + std::hash::Hash + std::marker::Send + 'static,
{
    let (send, recv) = channel();

    spawn(move || {
        let mut set = HashSet::new();
        for id in ids {
            set.insert(id);
        }
        send.send(set)
            .expect("Could not send the id set back to the importer!");
    });

    recv
}
