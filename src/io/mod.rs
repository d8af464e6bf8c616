//! Mesh loading and result export (`spec.md` section 6's external
//! interfaces). Ephemeris and orbital-element propagation are out of
//! scope here; callers supply a precomputed [`crate::ephemeris::Ephemeris`].

pub mod csv;
pub mod obj;

#[cfg(feature = "snapshot")]
pub mod snapshot;
