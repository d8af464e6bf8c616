//! Thermophysical and run-control parameters, resolved once at
//! construction into a uniform-or-per-facet tagged variant
//! (`spec.md` section 4.7, Design Note section 9).

use crate::constants::LAMBDA_STABILITY_LIMIT;
use crate::error::{Error, Result};

/// A scalar that is either the same for every facet, or given per facet.
///
/// Resolving via [`PerFacet::at`] is branch-once-per-field rather than
/// branch-per-access: the enum discriminant is checked here, not inside
/// the hot per-facet loops of the flux assembler or heat solver.
#[derive(Debug, Clone)]
pub enum PerFacet<T> {
    Uniform(T),
    Varying(Vec<T>),
}

impl<T: Copy> PerFacet<T> {
    #[inline]
    pub fn at(&self, facet: usize) -> T {
        match self {
            PerFacet::Uniform(v) => *v,
            PerFacet::Varying(v) => v[facet],
        }
    }

    fn validate_len(&self, field: &'static str, n_face: usize) -> Result<()> {
        if let PerFacet::Varying(v) = self {
            if v.len() != n_face {
                return Err(Error::ParamLengthMismatch {
                    field,
                    expected: n_face,
                    got: v.len(),
                });
            }
        }
        Ok(())
    }
}

/// Per-facet or uniform thermophysical parameters, plus the simulation-wide
/// time-grid and depth-grid scalars.
#[derive(Debug, Clone)]
pub struct Parameters {
    /// Bond albedo (visible).
    pub a_bond: PerFacet<f64>,
    /// Albedo at thermal wavelengths.
    pub a_thermal: PerFacet<f64>,
    /// Thermal conductivity, W m^-1 K^-1.
    pub k: PerFacet<f64>,
    /// Density, kg m^-3.
    pub rho: PerFacet<f64>,
    /// Specific heat capacity, J kg^-1 K^-1.
    pub cp: PerFacet<f64>,
    /// Emissivity.
    pub eps: PerFacet<f64>,
    /// Maximum depth, normalized by skin depth.
    pub z_max: PerFacet<f64>,
    /// Depth step, normalized by skin depth.
    pub dz: PerFacet<f64>,

    /// Rotation period, seconds.
    pub period: f64,
    pub t_begin: f64,
    pub t_end: f64,
    /// Time step, normalized by `period`.
    pub dt: f64,
    pub nz: usize,
}

/// Derived per-facet scalars that depend only on the raw parameters.
#[derive(Debug, Clone, Copy)]
pub struct DerivedParams {
    /// Thermal skin depth, meters: `sqrt(4*pi*P*k / (rho*Cp))`.
    pub skin_depth: f64,
    /// Thermal inertia: `sqrt(k*rho*Cp)`.
    pub gamma: f64,
    /// Stability coefficient: `dt / (4*pi*dz^2)` in normalized units.
    pub lambda: f64,
}

impl Parameters {
    /// Validates lengths, `dt > 0`, `nz >= 3`, `z_max > 0`, non-negative
    /// material properties, and `lambda <= 0.5` at every facet.
    pub fn validate(&self, n_face: usize) -> Result<()> {
        self.a_bond.validate_len("A_B", n_face)?;
        self.a_thermal.validate_len("A_TH", n_face)?;
        self.k.validate_len("k", n_face)?;
        self.rho.validate_len("rho", n_face)?;
        self.cp.validate_len("Cp", n_face)?;
        self.eps.validate_len("eps", n_face)?;
        self.z_max.validate_len("z_max", n_face)?;
        self.dz.validate_len("dz", n_face)?;

        if self.nz < 3 {
            return Err(Error::InvalidDepthGrid { nz: self.nz });
        }
        if self.t_end <= self.t_begin {
            return Err(Error::InvalidTimeWindow {
                t_begin: self.t_begin,
                t_end: self.t_end,
            });
        }
        if self.dt <= 0.0 {
            return Err(Error::InvalidTimeStep { dt: self.dt });
        }

        for f in 0..n_face {
            check_non_negative("k", self.k.at(f))?;
            check_non_negative("rho", self.rho.at(f))?;
            check_non_negative("Cp", self.cp.at(f))?;
            let z_max = self.z_max.at(f);
            if z_max <= 0.0 {
                return Err(Error::InvalidMaxDepth { z_max });
            }
            let derived = self.derived_at(f);
            if derived.lambda > LAMBDA_STABILITY_LIMIT {
                return Err(Error::UnstableLambda {
                    facet: f,
                    lambda: derived.lambda,
                    limit: LAMBDA_STABILITY_LIMIT,
                });
            }
        }
        Ok(())
    }

    /// Derived scalars (skin depth, thermal inertia, stability coefficient)
    /// at a given facet.
    pub fn derived_at(&self, facet: usize) -> DerivedParams {
        let k = self.k.at(facet);
        let rho = self.rho.at(facet);
        let cp = self.cp.at(facet);
        let dz = self.dz.at(facet);

        let skin_depth = (4.0 * std::f64::consts::PI * self.period * k / (rho * cp)).sqrt();
        let gamma = (k * rho * cp).sqrt();
        let lambda = self.dt / (4.0 * std::f64::consts::PI * dz * dz);

        DerivedParams {
            skin_depth,
            gamma,
            lambda,
        }
    }

    /// Number of time steps spanning `[t_begin, t_end]` at step `dt`
    /// (both normalized by `period`).
    pub fn n_steps(&self) -> usize {
        (((self.t_end - self.t_begin) / self.dt).round() as usize).max(1)
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value < 0.0 {
        return Err(Error::NegativeMaterialProperty { field, value });
    }
    Ok(())
}
