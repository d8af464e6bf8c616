//! Physical constants used throughout the thermophysical model.
//!
//! All quantities are SI unless noted. Normalized (depth-by-skin-depth,
//! time-by-rotation-period) quantities live alongside the physics that
//! defines them rather than here.

/// Stefan-Boltzmann constant, W m^-2 K^-4.
pub const SIGMA_SB: f64 = 5.670374419e-8;

/// Solar constant at 1 AU, W m^-2.
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// One astronomical unit, meters.
pub const AU: f64 = 1.495978707e11;

/// Speed of light, m/s. Converts radiant flux to momentum flux in the
/// non-gravitational integrator (`spec.md` section 4.8).
pub const C0: f64 = 299_792_458.0;

/// Small offset, in units of the local facet normal, used to push a ray
/// origin off the surface it is cast from so it does not immediately
/// re-intersect its own facet.
pub const RAY_ORIGIN_EPS: f64 = 1e-9;

/// Default epsilon for the Moller-Trumbore ray-triangle test: rejects
/// rays that are (numerically) parallel to the triangle's plane.
pub const RAY_PARALLEL_EPS: f64 = 1e-12;

/// Maximum Newton iterations for the nonlinear radiative surface boundary
/// condition (`spec.md` section 4.5).
pub const NEWTON_MAX_ITERS: usize = 20;

/// Newton convergence tolerance on the relative surface-temperature update.
pub const NEWTON_TOLERANCE: f64 = 1e-10;

/// Hard stability bound on the finite-difference diffusion number.
pub const LAMBDA_STABILITY_LIMIT: f64 = 0.5;
