pub(crate) mod pbfreader;

use std::iter::FromIterator;

pub use osmpbfreader::{NodeId, RelationId, WayId};

pub type Latitude = i32;
pub type Longitude = i32;

pub(crate) use pbfreader::import;

/// A 2D fixed-point coordinate: degrees times 1e7, x is longitude and y is
/// latitude. The derived ordering is lexicographic on (x, y), which is the
/// ordering the segment list and the ring basepoint search rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub x: Longitude,
    pub y: Latitude,
}

impl Location {
    pub fn new(x: Longitude, y: Latitude) -> Self {
        Location { x, y }
    }
}

/// A node reference: id plus resolved location. Topological comparisons in
/// the assembler are by location only; ids are kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    pub id: NodeId,
    pub location: Location,
}

impl NodeRef {
    pub fn new(id: NodeId, location: Location) -> Self {
        NodeRef { id, location }
    }
}

/// An ordered list of key/value tag pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagList(Vec<(String, String)>);

impl TagList {
    pub fn new() -> Self {
        TagList(Vec::new())
    }

    pub fn push<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for TagList {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        TagList(iter.into_iter().collect())
    }
}

/// Header fields shared by ways and relations. The pbf reader used by this
/// crate does not expose object metadata, so imported objects carry the
/// defaults; the assembler copies whatever it is given.
#[derive(Debug, Clone)]
pub struct Meta {
    pub version: i32,
    pub changeset: i64,
    pub timestamp: i64,
    pub visible: bool,
    pub uid: i64,
    pub user: String,
}

impl Default for Meta {
    fn default() -> Self {
        Meta {
            version: 0,
            changeset: 0,
            timestamp: 0,
            visible: true,
            uid: 0,
            user: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Way {
    pub id: WayId,
    pub meta: Meta,
    pub tags: TagList,
    pub nodes: Vec<NodeRef>,
}

impl Way {
    /// Closed by geometry: first and last node share a location.
    pub fn is_closed(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(a), Some(b)) => a.location == b.location,
            _ => false,
        }
    }

    pub fn ends_have_same_id(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(a), Some(b)) => a.id == b.id,
            _ => false,
        }
    }
}

/// The ring membership a relation member declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Outer,
    Inner,
}

impl Role {
    /// Any role string other than "outer" or "inner" yields None; the
    /// importer skips such members with a diagnostic.
    pub fn parse(role: &str) -> Option<Role> {
        match role {
            "outer" => Some(Role::Outer),
            "inner" => Some(Role::Inner),
            _ => None,
        }
    }
}

/// A way member of a multipolygon relation, already filtered down to the
/// members the assembler accepts.
#[derive(Debug, Clone, Copy)]
pub struct Member {
    pub way: WayId,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct Relation {
    pub id: RelationId,
    pub meta: Meta,
    pub tags: TagList,
    pub members: Vec<Member>,
}

/// Check whether a relation's tags mark it as a polygonal area. Mirrors the
/// member collection pass: only these relations have their ways fetched.
pub fn is_area_relation(tags: &TagList) -> bool {
    matches!(tags.get("type"), Some("multipolygon") | Some("boundary"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_order_is_lexicographic() {
        assert!(Location::new(1, 9) < Location::new(2, 0));
        assert!(Location::new(1, 1) < Location::new(1, 2));
        assert_eq!(Location::new(3, 4), Location::new(3, 4));
    }

    #[test]
    fn role_parse() {
        assert_eq!(Role::parse("outer"), Some(Role::Outer));
        assert_eq!(Role::parse("inner"), Some(Role::Inner));
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("enclave"), None);
    }

    #[test]
    fn taglist_lookup() {
        let mut tags = TagList::new();
        tags.push("building", "yes");
        tags.push("name", "town hall");
        assert_eq!(tags.get("building"), Some("yes"));
        assert_eq!(tags.get("operator"), None);
        assert!(tags.contains("name", "town hall"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn way_closedness() {
        let node = |id: i64, x, y| NodeRef::new(NodeId(id), Location::new(x, y));
        let mut way = Way {
            id: WayId(1),
            meta: Meta::default(),
            tags: TagList::new(),
            nodes: vec![node(1, 0, 0), node(2, 5, 0), node(3, 5, 5), node(1, 0, 0)],
        };
        assert!(way.is_closed());
        assert!(way.ends_have_same_id());

        // same location under a different id closes the geometry but not the ids
        way.nodes[3] = node(9, 0, 0);
        assert!(way.is_closed());
        assert!(!way.ends_have_same_id());
    }

    #[test]
    fn area_relation_filter() {
        let mut tags = TagList::new();
        tags.push("type", "multipolygon");
        assert!(is_area_relation(&tags));

        let mut tags = TagList::new();
        tags.push("type", "route");
        assert!(!is_area_relation(&tags));
        assert!(!is_area_relation(&TagList::new()));
    }
}
