//! A thermophysical model of a rotating, irregularly shaped small body.
//!
//! Coupled illumination (self-shadowing), radiative flux (direct solar,
//! single-bounce scattered, and single-bounce thermal-infrared), 1-D
//! explicit finite-difference heat conduction with a nonlinear radiative
//! surface boundary condition, and the resulting Yarkovsky (force) and
//! YORP (torque) non-gravitational recoil.
//!
//! The crate is a computational core, not an application: mesh and
//! ephemeris acquisition, orbit propagation, and result visualization are
//! the caller's concern. See [`driver::run`] for the entry point once a
//! mesh, visibility graph, parameters, and ephemeris are in hand.

pub mod constants;
pub mod driver;
pub mod ephemeris;
pub mod error;
pub mod flux;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod nongrav;
pub mod params;
pub mod solver;
pub mod visibility;
pub mod warnings;

/// The common set of types most callers need, in one `use`.
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::driver::{run, HistorySink, RunOptions, RunResult};
    pub use crate::ephemeris::Ephemeris;
    pub use crate::error::{Error, Result};
    pub use crate::flux::{assemble_fluxes, Flux, FluxField, FluxOptions};
    pub use crate::mesh::{Facet, FacetTable, Mesh};
    pub use crate::nongrav::{net_recoil, CycleAccumulator, ThermalRecoil};
    pub use crate::params::{DerivedParams, Parameters, PerFacet};
    pub use crate::solver::{step_column, StepOutcome, TemperatureField};
    pub use crate::visibility::{find_visible_facets, is_illuminated, VisibilityGraph};
    pub use crate::warnings::{RunWarnings, Warning};
}
