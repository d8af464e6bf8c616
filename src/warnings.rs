//! Non-fatal conditions accumulated during a run, per the error handling
//! design's "the driver exposes a result object carrying any non-fatal
//! warnings accumulated during the run."

/// A single non-fatal condition observed during precompute or the time loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A facet's area fell below the visibility precompute's degeneracy
    /// threshold; it was excluded from the visibility graph entirely.
    DegenerateTriangleSkipped { facet: usize, area: f64 },
    /// Newton iteration did not converge, but the driver is running in
    /// lenient mode and continued with the last iterate.
    NewtonDivergenceLenient {
        facet: usize,
        step: usize,
        iters: usize,
        residual: f64,
    },
}

/// Warnings accumulated over a single run.
pub type RunWarnings = Vec<Warning>;
