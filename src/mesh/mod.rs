//! The mesh and its derived, immutable-after-build facet table
//! (`spec.md` sections 3 and 4.2).

use glam::DVec3;

use crate::error::{Error, Result};
use crate::geometry::{triangle_area, triangle_centroid, triangle_normal};

/// A closed, outward-oriented triangular polyhedron: node positions in
/// meters plus triangular faces referencing them by index.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub nodes: Vec<DVec3>,
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    /// Validates face indices (in range, no repeated vertex within a face)
    /// and that the mesh is non-empty. Does not check closedness or
    /// orientation consistency; see [`crate::geometry::polyhedron_volume`]
    /// and the "mesh closedness" test property for that.
    pub fn new(nodes: Vec<DVec3>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if faces.is_empty() {
            return Err(Error::EmptyMesh);
        }
        for (f, face) in faces.iter().enumerate() {
            for &idx in face {
                if idx >= nodes.len() {
                    return Err(Error::NodeIndexOutOfRange {
                        face: f,
                        index: idx,
                        n_nodes: nodes.len(),
                    });
                }
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                let dup = if face[0] == face[1] {
                    face[0]
                } else if face[1] == face[2] {
                    face[1]
                } else {
                    face[0]
                };
                return Err(Error::DuplicateFaceVertex { face: f, node: dup });
            }
        }
        Ok(Self { nodes, faces })
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }
}

/// Static, per-facet derived geometry. Immutable for the life of the
/// simulation once built.
#[derive(Debug, Clone, Copy)]
pub struct Facet {
    pub vertices: [DVec3; 3],
    pub center: DVec3,
    pub normal: DVec3,
    pub area: f64,
}

/// Per-facet static attributes over the whole mesh.
///
/// Built once from a [`Mesh`]; never mutated afterward. Dynamic per-facet
/// state (temperature columns, flux triples) lives in
/// [`crate::solver::TemperatureField`] and [`crate::flux::FluxField`], not
/// here.
#[derive(Debug, Clone)]
pub struct FacetTable {
    facets: Vec<Facet>,
}

impl FacetTable {
    /// Rebuilds a facet table directly from already-derived facets, e.g.
    /// when loading a [`crate::io::snapshot`].
    pub fn from_facets(facets: Vec<Facet>) -> Self {
        Self { facets }
    }

    /// Builds the facet table, computing center/normal/area for each face.
    ///
    /// Rejects facets whose area falls below `area_eps` as a fatal
    /// [`Error::ZeroAreaFacet`]. A genuinely degenerate facet produced by
    /// legitimate mesh simplification upstream should be removed before
    /// reaching this crate, not silently skipped here and left with an
    /// undefined normal.
    pub fn build(mesh: &Mesh, area_eps: f64) -> Result<Self> {
        let mut facets = Vec::with_capacity(mesh.n_faces());
        for (f, &[a, b, c]) in mesh.faces.iter().enumerate() {
            let (v0, v1, v2) = (mesh.nodes[a], mesh.nodes[b], mesh.nodes[c]);
            let area = triangle_area(v0, v1, v2);
            if area <= area_eps {
                return Err(Error::ZeroAreaFacet { facet: f, area });
            }
            facets.push(Facet {
                vertices: [v0, v1, v2],
                center: triangle_centroid(v0, v1, v2),
                normal: triangle_normal(v0, v1, v2),
                area,
            });
        }
        Ok(Self { facets })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    #[inline]
    pub fn facet(&self, i: usize) -> &Facet {
        &self.facets[i]
    }

    #[inline]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    #[inline]
    pub fn center(&self, i: usize) -> DVec3 {
        self.facets[i].center
    }

    #[inline]
    pub fn normal(&self, i: usize) -> DVec3 {
        self.facets[i].normal
    }

    #[inline]
    pub fn area(&self, i: usize) -> f64 {
        self.facets[i].area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube_mesh() -> Mesh {
        let nodes = vec![
            DVec3::new(-0.5, -0.5, -0.5),
            DVec3::new(0.5, -0.5, -0.5),
            DVec3::new(0.5, 0.5, -0.5),
            DVec3::new(-0.5, 0.5, -0.5),
            DVec3::new(-0.5, -0.5, 0.5),
            DVec3::new(0.5, -0.5, 0.5),
            DVec3::new(0.5, 0.5, 0.5),
            DVec3::new(-0.5, 0.5, 0.5),
        ];
        let faces = vec![
            [0, 3, 2], [0, 2, 1],
            [4, 5, 6], [4, 6, 7],
            [0, 1, 5], [0, 5, 4],
            [2, 3, 7], [2, 7, 6],
            [1, 2, 6], [1, 6, 5],
            [3, 0, 4], [3, 4, 7],
        ];
        Mesh::new(nodes, faces).unwrap()
    }

    #[test]
    fn builds_facet_table_for_unit_cube() {
        let mesh = unit_cube_mesh();
        let table = FacetTable::build(&mesh, 1e-12).unwrap();
        assert_eq!(table.len(), 12);
        for f in table.facets() {
            assert!(f.area > 0.0);
            assert!((f.normal.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn mesh_closedness_area_weighted_normals_sum_to_zero() {
        let mesh = unit_cube_mesh();
        let table = FacetTable::build(&mesh, 1e-12).unwrap();
        let sum: DVec3 = table
            .facets()
            .iter()
            .map(|f| f.normal * f.area)
            .fold(DVec3::ZERO, |a, b| a + b);
        let mean_area: f64 =
            table.facets().iter().map(|f| f.area).sum::<f64>() / table.len() as f64;
        assert!(sum.length() < 1e-9 * mean_area, "sum = {sum:?}");
    }

    #[test]
    fn rejects_empty_mesh() {
        let err = Mesh::new(vec![DVec3::ZERO], vec![]).unwrap_err();
        assert!(matches!(err, Error::EmptyMesh));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let nodes = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let err = Mesh::new(nodes, vec![[0, 1, 5]]).unwrap_err();
        assert!(matches!(err, Error::NodeIndexOutOfRange { .. }));
    }

    #[test]
    fn rejects_duplicate_vertex_in_face() {
        let nodes = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let err = Mesh::new(nodes, vec![[0, 0, 1]]).unwrap_err();
        assert!(matches!(err, Error::DuplicateFaceVertex { .. }));
    }

    #[test]
    fn rejects_zero_area_facet() {
        let nodes = vec![DVec3::ZERO, DVec3::X, DVec3::new(2.0, 0.0, 0.0)];
        let mesh = Mesh::new(nodes, vec![[0, 1, 2]]).unwrap();
        let err = FacetTable::build(&mesh, 1e-12).unwrap_err();
        assert!(matches!(err, Error::ZeroAreaFacet { .. }));
    }
}
