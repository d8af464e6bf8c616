//! Per-step solar, scattered, and thermal-infrared flux assembly
//! (`spec.md` section 4.4).

use glam::DVec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::constants::{AU, SIGMA_SB, SOLAR_CONSTANT};
use crate::mesh::FacetTable;
use crate::params::Parameters;
use crate::visibility::{is_illuminated, VisibilityGraph};

/// Toggles for the two single-bounce coupling terms, independent of each
/// other as `spec.md` section 4.4 requires.
#[derive(Debug, Clone, Copy)]
pub struct FluxOptions {
    pub self_shadowing: bool,
    pub self_heating: bool,
    pub ray_eps: f64,
}

impl Default for FluxOptions {
    fn default() -> Self {
        Self {
            self_shadowing: true,
            self_heating: true,
            ray_eps: crate::constants::RAY_PARALLEL_EPS,
        }
    }
}

/// The three flux terms for a single facet, refreshed every step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flux {
    pub sun: f64,
    pub scat: f64,
    pub rad: f64,
}

impl Flux {
    /// The absorbed flux entering the surface boundary condition:
    /// `(1 - A_B)(F_sun + F_scat) + (1 - A_TH) * F_rad`.
    pub fn total_absorbed(&self, a_bond: f64, a_thermal: f64) -> f64 {
        (1.0 - a_bond) * (self.sun + self.scat) + (1.0 - a_thermal) * self.rad
    }
}

/// Per-facet flux triples for one time step.
#[derive(Debug, Clone)]
pub struct FluxField {
    fluxes: Vec<Flux>,
}

impl FluxField {
    pub fn get(&self, facet: usize) -> Flux {
        self.fluxes[facet]
    }

    pub fn as_slice(&self) -> &[Flux] {
        &self.fluxes
    }
}

/// Computes direct solar flux, single-bounce scattered flux, and
/// thermal-infrared re-radiation for every facet, given the Sun's position
/// in the body frame and the previous step's surface temperatures.
pub fn assemble_fluxes(
    table: &FacetTable,
    graph: &VisibilityGraph,
    params: &Parameters,
    sun_pos: DVec3,
    prev_surface_temp: &[f64],
    opts: &FluxOptions,
) -> FluxField {
    let n = table.len();

    // Pass 1: direct solar flux and illumination state for every facet.
    // Each facet is independent of every other here, so this is one of the
    // three parallel hooks the `parallel` feature switches to `rayon`.
    let compute_direct = |f: usize| -> f64 {
        let r = sun_pos - table.center(f);
        let d = r.length();
        if d <= 0.0 {
            return 0.0;
        }
        let r_hat = r / d;
        let lit = is_illuminated(table, graph, f, r_hat, opts.ray_eps, opts.self_shadowing);
        if lit {
            let au_over_d = AU / d;
            SOLAR_CONSTANT * au_over_d * au_over_d * table.normal(f).dot(r_hat)
        } else {
            0.0
        }
    };
    #[cfg(feature = "parallel")]
    let direct: Vec<f64> = (0..n).into_par_iter().map(compute_direct).collect();
    #[cfg(not(feature = "parallel"))]
    let direct: Vec<f64> = (0..n).map(compute_direct).collect();

    // Pass 2: scattered and re-radiated flux from visible neighbors. Reads
    // `direct` only after pass 1 has fully populated it.
    let compute_flux = |f: usize| -> Flux {
        let sun = direct[f];
        let (mut scat, mut rad) = (0.0, 0.0);
        if opts.self_heating {
            for entry in graph.entries(f) {
                let j = entry.j;
                scat += entry.weight * params.a_bond.at(j) * direct[j];
                let t_j = prev_surface_temp[j];
                rad += entry.weight * params.eps.at(j) * SIGMA_SB * t_j.powi(4);
            }
        }
        Flux { sun, scat, rad }
    };
    #[cfg(feature = "parallel")]
    let fluxes: Vec<Flux> = (0..n).into_par_iter().map(compute_flux).collect();
    #[cfg(not(feature = "parallel"))]
    let fluxes: Vec<Flux> = (0..n).map(compute_flux).collect();

    FluxField { fluxes }
}
