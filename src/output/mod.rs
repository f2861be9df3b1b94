//! Plain-text export of assembled areas.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::area::Area;
use crate::parsers::NodeRef;

pub fn to_file(path: &Path, areas: &[Area]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_areas(&mut writer, areas)
}

/// One header line per area (id, polygon count, tag count, tags), followed
/// by one line per ring. Shell areas have no ring lines.
pub fn write_areas<W: Write>(writer: &mut W, areas: &[Area]) -> io::Result<()> {
    writeln!(writer, "Areacount:{}", areas.len())?;
    for area in areas {
        let tag_list: Vec<String> = area
            .tags
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        writeln!(
            writer,
            "{},{},{}:{}",
            area.id.0,
            area.polygons.len(),
            area.tags.len(),
            tag_list.join(",")
        )?;
        for polygon in &area.polygons {
            writeln!(writer, "outer:{}", ring_to_line(&polygon.outer))?;
            for inner in &polygon.inners {
                writeln!(writer, "inner:{}", ring_to_line(inner))?;
            }
        }
    }
    Ok(())
}

fn ring_to_line(nodes: &[NodeRef]) -> String {
    let points: Vec<String> = nodes
        .iter()
        .map(|n| format!("{},{},{}", n.id.0, n.location.x, n.location.y))
        .collect();
    points.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{AreaId, AreaPolygon};
    use crate::parsers::{Location, Meta, NodeId, TagList};

    #[test]
    fn writes_one_line_per_area_and_ring() {
        let node = |id: i64, x, y| NodeRef::new(NodeId(id), Location::new(x, y));
        let mut tags = TagList::new();
        tags.push("building", "yes");
        let areas = vec![Area {
            id: AreaId(14),
            meta: Meta::default(),
            tags,
            polygons: vec![AreaPolygon {
                outer: vec![node(1, 0, 0), node(2, 5, 0), node(3, 5, 5), node(1, 0, 0)],
                inners: Vec::new(),
            }],
        }];

        let mut out = Vec::new();
        write_areas(&mut out, &areas).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Areacount:1");
        assert_eq!(lines[1], "14,1,1:building=yes");
        assert_eq!(lines[2], "outer:1,0,0;2,5,0;3,5,5;1,0,0");
    }
}
