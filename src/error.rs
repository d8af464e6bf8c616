//! Typed error kinds for every fatal condition named in the model's error
//! handling design. Non-fatal conditions (degenerate triangles during
//! visibility precompute, lenient-mode Newton non-convergence) are reported
//! through [`crate::warnings::RunWarnings`] instead of this enum.

use thiserror::Error;

/// Errors that can abort setup or a running simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// An OBJ `f` line did not reference exactly three vertices.
    #[error("face {face} is not a triangle ({n_vertices} vertices)")]
    NonTriangularFace { face: usize, n_vertices: usize },

    /// An OBJ `f` line referenced the same vertex index twice.
    #[error("face {face} repeats node index {node}")]
    DuplicateFaceVertex { face: usize, node: usize },

    /// A face's three vertices are (numerically) collinear.
    #[error("facet {facet} has zero or near-zero area ({area:e})")]
    ZeroAreaFacet { facet: usize, area: f64 },

    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// An out-of-range 1-based node index appeared in a face.
    #[error("face {face} references node index {index}, but mesh has {n_nodes} nodes")]
    NodeIndexOutOfRange {
        face: usize,
        index: usize,
        n_nodes: usize,
    },

    /// The stability coefficient exceeded the hard bound for some facet.
    #[error("lambda = {lambda} exceeds stability limit {limit} at facet {facet}")]
    UnstableLambda {
        facet: usize,
        lambda: f64,
        limit: f64,
    },

    /// Depth grid has fewer than the minimum three nodes.
    #[error("depth grid needs at least 3 levels, got {nz}")]
    InvalidDepthGrid { nz: usize },

    /// `z_max` must be strictly positive.
    #[error("z_max must be > 0, got {z_max}")]
    InvalidMaxDepth { z_max: f64 },

    /// A material property that must be non-negative was negative.
    #[error("parameter {field} must be non-negative, got {value}")]
    NegativeMaterialProperty { field: &'static str, value: f64 },

    /// A per-facet parameter vector's length did not match the facet count.
    #[error("parameter {field} has length {got}, expected {expected}")]
    ParamLengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    /// `t_end` was not strictly after `t_begin`.
    #[error("t_end ({t_end}) must be greater than t_begin ({t_begin})")]
    InvalidTimeWindow { t_begin: f64, t_end: f64 },

    /// `dt` was not strictly positive.
    #[error("dt must be > 0, got {dt}")]
    InvalidTimeStep { dt: f64 },

    /// Newton iteration for the surface boundary condition failed to
    /// converge within the iteration budget, and the driver is running in
    /// strict mode (the default).
    #[error("Newton iteration failed to converge at facet {facet}, step {step} ({iters} iterations, residual {residual:e})")]
    NewtonDivergence {
        facet: usize,
        step: usize,
        iters: usize,
        residual: f64,
    },

    /// A temperature went non-positive somewhere in the mesh.
    #[error("non-positive temperature {temperature} K at facet {facet}, depth {depth}, step {step}")]
    NonPositiveTemperature {
        facet: usize,
        depth: usize,
        step: usize,
        temperature: f64,
    },

    /// An OBJ file could not be read or parsed.
    #[error("failed to read mesh from {path}: {source}")]
    MeshIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An OBJ line was malformed.
    #[error("malformed OBJ line {line}: {reason}")]
    MeshParse { line: usize, reason: String },

    /// A result export could not be written.
    #[error("failed to write results to {path}: {source}")]
    ResultIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
