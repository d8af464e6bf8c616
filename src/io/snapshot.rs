//! Binary persistence of the expensive-to-recompute precomputed state
//! (facet table and visibility graph), gated behind the `snapshot`
//! feature. This is a convenience cache, not part of the interoperable
//! result surface described in `spec.md` section 6 -- the format is
//! whatever `bincode` currently produces and carries no version
//! negotiation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mesh::{Facet, FacetTable};
use crate::visibility::VisibilityGraph;

#[derive(Serialize, Deserialize)]
struct FacetRecord {
    vertices: [[f64; 3]; 3],
    center: [f64; 3],
    normal: [f64; 3],
    area: f64,
}

impl From<&Facet> for FacetRecord {
    fn from(f: &Facet) -> Self {
        Self {
            vertices: f.vertices.map(|v| v.to_array()),
            center: f.center.to_array(),
            normal: f.normal.to_array(),
            area: f.area,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    facets: Vec<FacetRecord>,
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
    cos_self: Vec<f64>,
    cos_other: Vec<f64>,
    dist: Vec<f64>,
    weight: Vec<f64>,
}

/// Writes a facet table and its visibility graph to `path` in one
/// `bincode`-encoded blob.
pub fn save(path: impl AsRef<Path>, table: &FacetTable, graph: &VisibilityGraph) -> Result<()> {
    let path = path.as_ref();
    let snapshot = Snapshot {
        facets: table.facets().iter().map(FacetRecord::from).collect(),
        offsets: graph.offsets().to_vec(),
        neighbors: graph.neighbors_flat().to_vec(),
        cos_self: graph.cos_self_flat().to_vec(),
        cos_other: graph.cos_other_flat().to_vec(),
        dist: graph.dist_flat().to_vec(),
        weight: graph.weight_flat().to_vec(),
    };
    let file = std::fs::File::create(path).map_err(|source| Error::ResultIo {
        path: path.display().to_string(),
        source,
    })?;
    bincode::serialize_into(file, &snapshot).map_err(|e| Error::ResultIo {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// Reads back a facet table and visibility graph previously written by
/// [`save`].
pub fn load(path: impl AsRef<Path>) -> Result<(FacetTable, VisibilityGraph)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| Error::MeshIo {
        path: path.display().to_string(),
        source,
    })?;
    let snapshot: Snapshot = bincode::deserialize_from(file).map_err(|e| Error::MeshIo {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    let facets: Vec<Facet> = snapshot
        .facets
        .iter()
        .map(|r| Facet {
            vertices: r.vertices.map(glam::DVec3::from_array),
            center: glam::DVec3::from_array(r.center),
            normal: glam::DVec3::from_array(r.normal),
            area: r.area,
        })
        .collect();

    let table = FacetTable::from_facets(facets);
    let graph = VisibilityGraph::from_csr(
        snapshot.offsets,
        snapshot.neighbors,
        snapshot.cos_self,
        snapshot.cos_other,
        snapshot.dist,
        snapshot.weight,
    );

    Ok((table, graph))
}
