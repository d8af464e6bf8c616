//! Plain-text CSV export of run results (`spec.md` section 6). These are
//! written with `std::fmt`/`write!` directly rather than a CSV-writing
//! dependency: every field here is a bare `f64` or `usize`, none of them
//! ever need quoting or escaping.

use std::io::Write;

use glam::DVec3;

use crate::error::{Error, Result};
use crate::nongrav::ThermalRecoil;

fn io_err(path: &str) -> impl Fn(std::io::Error) -> Error + '_ {
    move |source| Error::ResultIo {
        path: path.to_string(),
        source,
    }
}

/// Sub-solar point on the body, in body-frame spherical coordinates, and
/// the Sun's distance. `None` for a degenerate (zero-length) sun position,
/// since longitude/latitude are undefined there.
fn sub_solar_point(sun_pos: DVec3) -> (f64, Option<(f64, f64)>) {
    let distance = sun_pos.length();
    if distance <= 0.0 {
        return (distance, None);
    }
    let lon = sun_pos.y.atan2(sun_pos.x);
    let lat = (sun_pos.z / distance).asin();
    (distance, Some((lon, lat)))
}

/// Writes one row per saved step: time, solar distance, sub-solar
/// longitude/latitude (blank if the sun position was degenerate), mean
/// surface temperature, and the net thermal force/torque.
pub fn write_physical_quantities(
    path: &str,
    rows: &[(usize, f64, DVec3, Vec<f64>, ThermalRecoil)],
) -> Result<()> {
    let mut out = std::fs::File::create(path).map_err(io_err(path))?;
    writeln!(
        out,
        "step,time,solar_distance,sub_solar_lon,sub_solar_lat,mean_surface_temp,fx,fy,fz,tx,ty,tz"
    )
    .map_err(io_err(path))?;
    for (step, time, sun_pos, surface_temps, recoil) in rows {
        let (distance, lon_lat) = sub_solar_point(*sun_pos);
        let (lon, lat) = match lon_lat {
            Some((lon, lat)) => (lon.to_string(), lat.to_string()),
            None => (String::new(), String::new()),
        };
        let mean_temp = surface_temps.iter().sum::<f64>() / surface_temps.len() as f64;
        let f: DVec3 = recoil.force;
        let t: DVec3 = recoil.torque;
        writeln!(
            out,
            "{step},{time},{distance},{lon},{lat},{mean_temp},{},{},{},{},{},{}",
            f.x, f.y, f.z, t.x, t.y, t.z
        )
        .map_err(io_err(path))?;
    }
    Ok(())
}

/// Writes one row per saved step: step, time, and every facet's surface
/// temperature.
pub fn write_surface_temperature(
    path: &str,
    n_face: usize,
    rows: &[(usize, f64, Vec<f64>)],
) -> Result<()> {
    let mut out = std::fs::File::create(path).map_err(io_err(path))?;
    write!(out, "step,time").map_err(io_err(path))?;
    for f in 0..n_face {
        write!(out, ",T{f}").map_err(io_err(path))?;
    }
    writeln!(out).map_err(io_err(path))?;

    for (step, time, temps) in rows {
        write!(out, "{step},{time}").map_err(io_err(path))?;
        for t in temps {
            write!(out, ",{t}").map_err(io_err(path))?;
        }
        writeln!(out).map_err(io_err(path))?;
    }
    Ok(())
}

/// Writes one row per (saved step, requested facet, depth level): the full
/// depth profile of the facets the caller asked the driver to retain.
pub fn write_subsurface_temperature(
    path: &str,
    rows: &[(usize, f64, Vec<(usize, Vec<f64>)>)],
) -> Result<()> {
    let mut out = std::fs::File::create(path).map_err(io_err(path))?;
    writeln!(out, "step,time,facet,depth,temperature").map_err(io_err(path))?;
    for (step, time, columns) in rows {
        for (facet, column) in columns {
            for (depth, t) in column.iter().enumerate() {
                writeln!(out, "{step},{time},{facet},{depth},{t}").map_err(io_err(path))?;
            }
        }
    }
    Ok(())
}

/// Writes one row per saved step: step, time, and net force/torque
/// components (body frame).
pub fn write_thermal_force(
    path: &str,
    rows: &[(usize, f64, ThermalRecoil)],
) -> Result<()> {
    let mut out = std::fs::File::create(path).map_err(io_err(path))?;
    writeln!(out, "step,time,fx,fy,fz,tx,ty,tz").map_err(io_err(path))?;
    for (step, time, recoil) in rows {
        let f: DVec3 = recoil.force;
        let t: DVec3 = recoil.torque;
        writeln!(out, "{step},{time},{},{},{},{},{},{}", f.x, f.y, f.z, t.x, t.y, t.z)
            .map_err(io_err(path))?;
    }
    Ok(())
}

/// Convenience bundle matching `spec.md` section 6's named result files.
pub fn write_all(
    dir: &str,
    physical_rows: &[(usize, f64, DVec3, Vec<f64>, ThermalRecoil)],
    surface_rows: &[(usize, f64, Vec<f64>)],
    subsurface_rows: &[(usize, f64, Vec<(usize, Vec<f64>)>)],
    force_rows: &[(usize, f64, ThermalRecoil)],
) -> Result<()> {
    let n_face = surface_rows.first().map(|(_, _, t)| t.len()).unwrap_or(0);
    write_physical_quantities(&format!("{dir}/physical_quantities.csv"), physical_rows)?;
    write_surface_temperature(
        &format!("{dir}/surface_temperature.csv"),
        n_face,
        surface_rows,
    )?;
    write_subsurface_temperature(
        &format!("{dir}/subsurface_temperature.csv"),
        subsurface_rows,
    )?;
    write_thermal_force(&format!("{dir}/thermal_force.csv"), force_rows)?;
    Ok(())
}
