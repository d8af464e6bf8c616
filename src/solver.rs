//! 1-D explicit finite-difference heat conduction per facet column, with a
//! nonlinear radiative surface boundary condition and an insulating
//! bottom boundary (`spec.md` section 4.5).

use crate::constants::{NEWTON_MAX_ITERS, NEWTON_TOLERANCE, SIGMA_SB};

/// Two-slab temperature state for every facet's depth column. Only the
/// current slab is kept live; history retention is the result sink's
/// concern (Design Note in `spec.md` section 9), not the solver's.
#[derive(Debug, Clone)]
pub struct TemperatureField {
    nz: usize,
    columns: Vec<f64>,
}

impl TemperatureField {
    /// Initializes every depth column at every facet to `t0` (typically a
    /// radiative-equilibrium estimate supplied by the caller).
    pub fn new_uniform(n_face: usize, nz: usize, t0: f64) -> Self {
        Self {
            nz,
            columns: vec![t0; n_face * nz],
        }
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    pub fn n_face(&self) -> usize {
        self.columns.len() / self.nz.max(1)
    }

    pub fn column(&self, facet: usize) -> &[f64] {
        let start = facet * self.nz;
        &self.columns[start..start + self.nz]
    }

    pub fn surface_temp(&self, facet: usize) -> f64 {
        self.column(facet)[0]
    }

    /// Overwrites a facet's column in place. Visible to the rest of the
    /// crate so the driver can commit column updates computed out-of-line
    /// (e.g. by [`advance_column`] run across facets under the `parallel`
    /// feature).
    pub(crate) fn set_column(&mut self, facet: usize, values: &[f64]) {
        let start = facet * self.nz;
        self.columns[start..start + self.nz].copy_from_slice(values);
    }
}

/// Outcome of advancing one facet's column by one step.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    pub converged: bool,
    pub iterations: usize,
    pub residual: f64,
}

/// Advances a single facet's column from `old` (length `nz`) to a new
/// column of the same length, independent of any shared state. Used
/// directly by [`step_column`] and, under the `parallel` feature, invoked
/// concurrently across facets by the driver before the results are
/// committed back into a [`TemperatureField`] in facet order.
///
/// `flux_total` is the already-combined absorbed flux
/// (`(1-A_B)(F_sun+F_scat) + (1-A_TH)*F_rad`, see [`crate::flux::Flux::total_absorbed`]).
/// `lambda` is the stability coefficient `dt / (4*pi*dz^2)`; callers must
/// have validated `lambda <= 0.5` beforehand (`spec.md` section 4.5, 4.7).
pub fn advance_column(
    old: &[f64],
    lambda: f64,
    k: f64,
    skin_depth: f64,
    dz: f64,
    eps: f64,
    flux_total: f64,
) -> (Vec<f64>, StepOutcome) {
    let nz = old.len();
    let mut new = vec![0.0f64; nz];

    for i in 1..nz - 1 {
        new[i] = (1.0 - 2.0 * lambda) * old[i] + lambda * (old[i + 1] + old[i - 1]);
    }

    // Bottom boundary: insulating (zero gradient).
    new[nz - 1] = new[nz - 2];

    // Surface boundary: Newton iteration on the nonlinear radiation BC.
    //   F_total + (k/l)*(T1 - T0)/dz - eps*sigma*T0^4 = 0
    let conductance = k / skin_depth;
    let t1 = new[1];
    let mut t0 = old[0];
    let mut converged = false;
    let mut residual = f64::INFINITY;
    let mut iterations = 0;

    for iter in 1..=NEWTON_MAX_ITERS {
        iterations = iter;
        let g = flux_total + conductance * (t1 - t0) / dz - eps * SIGMA_SB * t0.powi(4);
        let g_prime = -conductance / dz - 4.0 * eps * SIGMA_SB * t0.powi(3);
        let t0_next = t0 - g / g_prime;
        residual = if t0_next.abs() > 0.0 {
            (1.0 - t0 / t0_next).abs()
        } else {
            g.abs()
        };
        t0 = t0_next;
        if residual < NEWTON_TOLERANCE {
            converged = true;
            break;
        }
    }
    new[0] = t0;

    (
        new,
        StepOutcome {
            converged,
            iterations,
            residual,
        },
    )
}

/// Advances a single facet's column in place in `field` at `facet`. A thin
/// wrapper around [`advance_column`] for the common, fully sequential case.
pub fn step_column(
    field: &mut TemperatureField,
    facet: usize,
    lambda: f64,
    k: f64,
    skin_depth: f64,
    dz: f64,
    eps: f64,
    flux_total: f64,
) -> StepOutcome {
    let old = field.column(facet).to_vec();
    let (new, outcome) = advance_column(old.as_slice(), lambda, k, skin_depth, dz, eps, flux_total);
    field.set_column(facet, &new);
    outcome
}
