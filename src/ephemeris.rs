//! The Sun-position ephemeris: an opaque, externally supplied lookup table
//! indexed by time step (`spec.md` section 6). No temporal interpolation
//! happens in the core; step `n` always uses `sun[n]` directly.

use glam::DVec3;

/// Parallel `time`/`sun` sequences. `time` is monotonic, in seconds; `sun`
/// is the Sun's position in meters, in the body-fixed frame, at the
/// corresponding time.
#[derive(Debug, Clone)]
pub struct Ephemeris {
    pub time: Vec<f64>,
    pub sun: Vec<DVec3>,
}

impl Ephemeris {
    pub fn new(time: Vec<f64>, sun: Vec<DVec3>) -> Self {
        debug_assert_eq!(time.len(), sun.len(), "ephemeris time/sun length mismatch");
        Self { time, sun }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sun position at step `n`. No interpolation: this is an index lookup.
    pub fn sun_at(&self, n: usize) -> DVec3 {
        self.sun[n]
    }

    pub fn time_at(&self, n: usize) -> f64 {
        self.time[n]
    }
}
