//! ASCII OBJ mesh loading (`spec.md` section 6): `v` lines give node
//! positions (scaled by a caller-supplied factor), `f` lines give
//! triangular faces by 1-based node index. Texture/normal indices
//! (`v/vt/vn` triplets) are ignored. Non-triangular faces are an error.

use std::path::Path;

use glam::DVec3;

use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Loads a triangular-mesh OBJ file, scaling node coordinates by `scale`
/// (e.g. to convert from kilometers to meters).
pub fn load_mesh(path: impl AsRef<Path>, scale: f64) -> Result<Mesh> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::MeshIo {
        path: path.display().to_string(),
        source,
    })?;
    parse_obj(&text, scale)
}

/// Parses OBJ text already read into memory.
pub fn parse_obj(text: &str, scale: f64) -> Result<Mesh> {
    let mut nodes = Vec::new();
    let mut faces = Vec::new();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else { continue };

        match tag {
            "v" => {
                let coords: Vec<f64> = tokens
                    .take(3)
                    .map(|t| {
                        t.parse::<f64>().map_err(|_| Error::MeshParse {
                            line: line_no + 1,
                            reason: format!("invalid float '{t}'"),
                        })
                    })
                    .collect::<Result<_>>()?;
                if coords.len() != 3 {
                    return Err(Error::MeshParse {
                        line: line_no + 1,
                        reason: "expected 3 coordinates after 'v'".to_string(),
                    });
                }
                nodes.push(DVec3::new(coords[0], coords[1], coords[2]) * scale);
            }
            "f" => {
                let refs: Vec<&str> = tokens.collect();
                if refs.len() != 3 {
                    return Err(Error::NonTriangularFace {
                        face: faces.len(),
                        n_vertices: refs.len(),
                    });
                }
                let mut idx = [0usize; 3];
                for (k, r) in refs.iter().enumerate() {
                    // "v", "v/vt", "v/vt/vn", or "v//vn" -- only the first
                    // (position) index matters here.
                    let v_str = r.split('/').next().unwrap_or(r);
                    let one_based: i64 = v_str.parse().map_err(|_| Error::MeshParse {
                        line: line_no + 1,
                        reason: format!("invalid face index '{r}'"),
                    })?;
                    if one_based <= 0 {
                        return Err(Error::MeshParse {
                            line: line_no + 1,
                            reason: format!("non-positive face index '{r}'"),
                        });
                    }
                    idx[k] = (one_based - 1) as usize;
                }
                faces.push(idx);
            }
            _ => {
                // Anything else (vt, vn, g, o, s, mtllib, usemtl, ...) is
                // irrelevant to a bare triangular mesh and is ignored.
            }
        }
    }

    Mesh::new(nodes, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_triangle() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(obj, 1.0).unwrap();
        assert_eq!(mesh.n_nodes(), 3);
        assert_eq!(mesh.n_faces(), 1);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
    }

    #[test]
    fn applies_scale_factor() {
        let obj = "v 1 2 3\nv 4 5 6\nv 7 8 9\nf 1 2 3\n";
        let mesh = parse_obj(obj, 1000.0).unwrap();
        assert!((mesh.nodes[0] - DVec3::new(1000.0, 2000.0, 3000.0)).length() < 1e-9);
    }

    #[test]
    fn ignores_texture_and_normal_indices() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/1 3/3/1\n";
        let mesh = parse_obj(obj, 1.0).unwrap();
        assert_eq!(mesh.faces[0], [0, 1, 2]);
    }

    #[test]
    fn rejects_non_triangular_face() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3 4\n";
        let err = parse_obj(obj, 1.0).unwrap_err();
        assert!(matches!(err, Error::NonTriangularFace { .. }));
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let obj = "# a comment\n\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(obj, 1.0).unwrap();
        assert_eq!(mesh.n_faces(), 1);
    }
}
