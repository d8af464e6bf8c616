//! Surface integral of thermal pressure: the Yarkovsky (force) and YORP
//! (torque) non-gravitational recoil (`spec.md` section 4.8).

use glam::DVec3;

use crate::constants::C0;
use crate::mesh::FacetTable;
use crate::params::Parameters;
use crate::solver::TemperatureField;

/// Instantaneous body-frame force and torque contributed by one facet's
/// thermal emission.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThermalRecoil {
    pub force: DVec3,
    pub torque: DVec3,
}

/// Per-facet thermal recoil `dF_f = -(2/3) * eps * sigma * T^4 * A_f * n_f / c0`,
/// Lambertian-emission factor included, and its contribution to torque
/// about `r_ref`.
pub fn facet_recoil(
    table: &FacetTable,
    params: &Parameters,
    temps: &TemperatureField,
    facet: usize,
    r_ref: DVec3,
) -> ThermalRecoil {
    let t = temps.surface_temp(facet);
    let eps = params.eps.at(facet);
    let area = table.area(facet);
    let normal = table.normal(facet);
    let center = table.center(facet);

    let magnitude = -(2.0 / 3.0) * eps * crate::constants::SIGMA_SB * t.powi(4) * area / C0;
    let force = normal * magnitude;
    let torque = (center - r_ref).cross(force);

    ThermalRecoil { force, torque }
}

/// Instantaneous net force and torque over the whole mesh.
pub fn net_recoil(
    table: &FacetTable,
    params: &Parameters,
    temps: &TemperatureField,
    r_ref: DVec3,
) -> ThermalRecoil {
    (0..table.len()).fold(ThermalRecoil::default(), |acc, f| {
        let r = facet_recoil(table, params, temps, f, r_ref);
        ThermalRecoil {
            force: acc.force + r.force,
            torque: acc.torque + r.torque,
        }
    })
}

/// Accumulates force and torque across a rotation cycle. Reset at the
/// start of each cycle per `spec.md` section 3's lifecycle rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleAccumulator {
    force_sum: DVec3,
    torque_sum: DVec3,
    n: usize,
}

impl CycleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn add(&mut self, recoil: ThermalRecoil) {
        self.force_sum += recoil.force;
        self.torque_sum += recoil.torque;
        self.n += 1;
    }

    pub fn n_observations(&self) -> usize {
        self.n
    }

    /// Cycle-mean force and torque: the Yarkovsky and YORP quantities.
    pub fn mean(&self) -> ThermalRecoil {
        if self.n == 0 {
            return ThermalRecoil::default();
        }
        let n = self.n as f64;
        ThermalRecoil {
            force: self.force_sum / n,
            torque: self.torque_sum / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::params::PerFacet;

    fn octahedron() -> (FacetTable, Parameters) {
        // A regular octahedron: 6 vertices, 8 equilateral faces, centered
        // at the origin -- isotropic enough that uniform temperature
        // gives a near-zero net force/torque.
        let nodes = vec![
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, -1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(0.0, 0.0, -1.0),
        ];
        let faces = vec![
            [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
            [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
        ];
        let mesh = Mesh::new(nodes, faces).unwrap();
        let table = FacetTable::build(&mesh, 1e-12).unwrap();
        let params = Parameters {
            a_bond: PerFacet::Uniform(0.0),
            a_thermal: PerFacet::Uniform(0.0),
            k: PerFacet::Uniform(0.1),
            rho: PerFacet::Uniform(1000.0),
            cp: PerFacet::Uniform(600.0),
            eps: PerFacet::Uniform(1.0),
            z_max: PerFacet::Uniform(1.0),
            dz: PerFacet::Uniform(0.1),
            period: 3600.0,
            t_begin: 0.0,
            t_end: 1.0,
            dt: 0.01,
            nz: 10,
        };
        (table, params)
    }

    #[test]
    fn symmetric_body_at_uniform_temperature_has_zero_net_force_and_torque() {
        let (table, params) = octahedron();
        let temps = TemperatureField::new_uniform(table.len(), 10, 300.0);
        let recoil = net_recoil(&table, &params, &temps, DVec3::ZERO);
        assert!(recoil.force.length() < 1e-10, "force = {:?}", recoil.force);
        assert!(recoil.torque.length() < 1e-10, "torque = {:?}", recoil.torque);
    }

    #[test]
    fn cycle_accumulator_mean_matches_manual_average() {
        let (table, params) = octahedron();
        let temps_hot = TemperatureField::new_uniform(table.len(), 10, 310.0);
        let temps_cold = TemperatureField::new_uniform(table.len(), 10, 290.0);

        let mut acc = CycleAccumulator::new();
        acc.add(net_recoil(&table, &params, &temps_hot, DVec3::ZERO));
        acc.add(net_recoil(&table, &params, &temps_cold, DVec3::ZERO));

        let mean = acc.mean();
        assert!(mean.force.length() < 1e-10);
    }
}
