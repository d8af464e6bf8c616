//! The time loop: rotation-frame bookkeeping, per-step flux assembly and
//! column advance, and cycle-averaged force/torque accumulation
//! (`spec.md` section 4.6).

use glam::DVec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::ephemeris::Ephemeris;
use crate::error::{Error, Result};
use crate::flux::{assemble_fluxes, FluxOptions};
use crate::mesh::FacetTable;
use crate::nongrav::{net_recoil, CycleAccumulator, ThermalRecoil};
use crate::params::Parameters;
use crate::solver::{advance_column, StepOutcome, TemperatureField};
use crate::visibility::VisibilityGraph;
use crate::warnings::{RunWarnings, Warning};

/// One facet's column update, computed independently of any shared
/// mutable state so it can be produced concurrently across facets
/// (`parallel` feature) before being committed to the shared
/// [`TemperatureField`] in facet order.
struct ColumnUpdate {
    new_column: Vec<f64>,
    outcome: StepOutcome,
}

/// Per-step callback for history retention, decoupled from the solver
/// itself per `spec.md` section 9's design note. Implementations choose
/// what (if anything) to keep; the driver only calls this inside the
/// requested save window.
pub trait HistorySink {
    fn record(
        &mut self,
        step: usize,
        time: f64,
        sun_pos: DVec3,
        surface_temps: &[f64],
        subsurface: &[(usize, Vec<f64>)],
        recoil: ThermalRecoil,
    );
}

/// Controls for one driver run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub flux: FluxOptions,
    /// Abort on Newton non-convergence (default) vs. continue with the
    /// last iterate and record a warning.
    pub strict: bool,
    /// Inclusive step range to report through the [`HistorySink`].
    pub save_from_step: usize,
    pub save_to_step: usize,
    /// Facet indices whose full depth profile is recorded when saving.
    pub save_facets: Vec<usize>,
    /// Origin of the body frame for torque (typically center of mass).
    pub r_ref: DVec3,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            flux: FluxOptions::default(),
            strict: true,
            save_from_step: 0,
            save_to_step: usize::MAX,
            save_facets: Vec::new(),
            r_ref: DVec3::ZERO,
        }
    }
}

/// What a run produced: the final two-slab temperature state, the
/// cycle-mean force/torque of the last completed (or partially completed,
/// on cancellation) rotation cycle, and any accumulated non-fatal warnings.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub final_temps: TemperatureField,
    pub cycle_mean_recoil: ThermalRecoil,
    pub steps_completed: usize,
    pub warnings: RunWarnings,
}

/// Runs the coupled illumination -> flux -> conduction -> recoil loop from
/// `t_begin` to `t_end` at the configured `dt`, starting every facet's
/// column at the uniform temperature `initial_temp`.
///
/// `cancel` is polled once per step (cooperative cancellation, `spec.md`
/// section 5): when it returns `true` the loop stops and the partial
/// result accumulated so far is returned, not an error.
///
/// There is no automatic convergence detection across cycles; the caller
/// is expected to run for `n_cycle >= 2` rotation periods and treat the
/// last cycle's mean recoil as the near-periodic steady state, per
/// `spec.md` section 4.6.
pub fn run(
    table: &FacetTable,
    graph: &VisibilityGraph,
    params: &Parameters,
    ephemeris: &Ephemeris,
    initial_temp: f64,
    opts: &RunOptions,
    mut sink: Option<&mut dyn HistorySink>,
    mut cancel: impl FnMut() -> bool,
) -> Result<RunResult> {
    let n_face = table.len();
    params.validate(n_face)?;

    let mut temps = TemperatureField::new_uniform(n_face, params.nz, initial_temp);
    let mut warnings = Vec::new();
    let n_steps = params.n_steps();
    let steps_per_cycle = (1.0 / params.dt).round().max(1.0) as usize;

    let mut cycle_acc = CycleAccumulator::new();
    let mut last_cycle_mean = ThermalRecoil::default();
    let mut steps_completed = 0;

    for n in 0..n_steps {
        if cancel() {
            break;
        }
        if n > 0 && n % steps_per_cycle == 0 {
            last_cycle_mean = cycle_acc.mean();
            cycle_acc.reset();
        }

        let eph_idx = n.min(ephemeris.len().saturating_sub(1));
        let sun_pos = ephemeris.sun_at(eph_idx);
        let prev_surface: Vec<f64> = (0..n_face).map(|f| temps.surface_temp(f)).collect();
        let flux_field = assemble_fluxes(table, graph, params, sun_pos, &prev_surface, &opts.flux);

        let compute = |f: usize| {
            let derived = params.derived_at(f);
            let flux = flux_field.get(f);
            let flux_total = flux.total_absorbed(params.a_bond.at(f), params.a_thermal.at(f));
            let old_column = temps.column(f).to_vec();
            let (new_column, outcome) = advance_column(
                old_column.as_slice(),
                derived.lambda,
                params.k.at(f),
                derived.skin_depth,
                params.dz.at(f),
                params.eps.at(f),
                flux_total,
            );
            ColumnUpdate { new_column, outcome }
        };

        #[cfg(feature = "parallel")]
        let updates: Vec<ColumnUpdate> = (0..n_face).into_par_iter().map(compute).collect();
        #[cfg(not(feature = "parallel"))]
        let updates: Vec<ColumnUpdate> = (0..n_face).map(compute).collect();

        for (f, update) in updates.into_iter().enumerate() {
            temps.set_column(f, &update.new_column);
            let outcome = update.outcome;

            if !outcome.converged {
                if opts.strict {
                    return Err(Error::NewtonDivergence {
                        facet: f,
                        step: n,
                        iters: outcome.iterations,
                        residual: outcome.residual,
                    });
                }
                log::warn!(
                    "Newton iteration did not converge at facet {f}, step {n} (residual {:e})",
                    outcome.residual
                );
                warnings.push(Warning::NewtonDivergenceLenient {
                    facet: f,
                    step: n,
                    iters: outcome.iterations,
                    residual: outcome.residual,
                });
            }

            for (depth, &t) in temps.column(f).iter().enumerate() {
                if t <= 0.0 {
                    return Err(Error::NonPositiveTemperature {
                        facet: f,
                        depth,
                        step: n,
                        temperature: t,
                    });
                }
            }
        }

        let recoil = net_recoil(table, params, &temps, opts.r_ref);
        cycle_acc.add(recoil);

        if let Some(sink) = sink.as_deref_mut() {
            if n >= opts.save_from_step && n <= opts.save_to_step {
                let surface_temps: Vec<f64> = (0..n_face).map(|f| temps.surface_temp(f)).collect();
                let subsurface: Vec<(usize, Vec<f64>)> = opts
                    .save_facets
                    .iter()
                    .map(|&f| (f, temps.column(f).to_vec()))
                    .collect();
                sink.record(
                    n,
                    ephemeris.time_at(eph_idx),
                    sun_pos,
                    &surface_temps,
                    &subsurface,
                    recoil,
                );
            }
        }

        steps_completed = n + 1;
    }

    if cycle_acc.n_observations() > 0 {
        last_cycle_mean = cycle_acc.mean();
    }

    Ok(RunResult {
        final_temps: temps,
        cycle_mean_recoil: last_cycle_mean,
        steps_completed,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::params::PerFacet;
    use crate::visibility::find_visible_facets;

    fn unit_cube() -> FacetTable {
        let nodes = vec![
            DVec3::new(-0.5, -0.5, -0.5),
            DVec3::new(0.5, -0.5, -0.5),
            DVec3::new(0.5, 0.5, -0.5),
            DVec3::new(-0.5, 0.5, -0.5),
            DVec3::new(-0.5, -0.5, 0.5),
            DVec3::new(0.5, -0.5, 0.5),
            DVec3::new(0.5, 0.5, 0.5),
            DVec3::new(-0.5, 0.5, 0.5),
        ];
        let faces = vec![
            [0, 3, 2], [0, 2, 1],
            [4, 5, 6], [4, 6, 7],
            [0, 1, 5], [0, 5, 4],
            [2, 3, 7], [2, 7, 6],
            [1, 2, 6], [1, 6, 5],
            [3, 0, 4], [3, 4, 7],
        ];
        let mesh = Mesh::new(nodes, faces).unwrap();
        FacetTable::build(&mesh, 1e-12).unwrap()
    }

    #[test]
    fn cancellation_returns_a_partial_result() {
        let table = unit_cube();
        let (graph, _) = find_visible_facets(&table, 1e-12, 1e-12);
        let params = Parameters {
            a_bond: PerFacet::Uniform(0.0),
            a_thermal: PerFacet::Uniform(0.0),
            k: PerFacet::Uniform(0.01),
            rho: PerFacet::Uniform(1500.0),
            cp: PerFacet::Uniform(600.0),
            eps: PerFacet::Uniform(1.0),
            z_max: PerFacet::Uniform(1.0),
            dz: PerFacet::Uniform(0.2),
            period: 3600.0,
            t_begin: 0.0,
            t_end: 1.0,
            dt: 0.01,
            nz: 6,
        };
        let ephemeris = Ephemeris::new(
            (0..200).map(|i| i as f64 * 36.0).collect(),
            (0..200).map(|_| DVec3::new(crate::constants::AU, 0.0, 0.0)).collect(),
        );

        let mut calls = 0;
        let result = run(
            &table,
            &graph,
            &params,
            &ephemeris,
            280.0,
            &RunOptions::default(),
            None,
            || {
                calls += 1;
                calls > 5
            },
        )
        .unwrap();

        assert!(result.steps_completed <= 5);
    }
}
