/**
 * Rational Screen Geometry Solver
 *
 * A digital halftone screen can only realize angles and frequencies whose
 * tangent and cell area are rational in device pixels. Given a target
 * angle/frequency pair in device resolution units, this module searches
 * small integer (run, rise) vectors for the periodic lattice whose
 * continuous angle and frequency best approximate the request.
 *
 * GEOMETRY
 * ========
 * The screen is the point lattice generated by two integer vectors u1, u2.
 * u1 = (run, rise) carries the screen angle; the cell area |u1 x u2| sets
 * the dot density and thereby the achieved frequency
 *
 * ```text
 * f = sqrt(hres * vres / area)
 * ```
 *
 * which is the density frequency: a screen of f lines per inch places
 * f * f dots per square inch regardless of rotation. The second vector is
 * not searched; once (run, rise) and the integer area are fixed, u2 is the
 * integer solution of run*d - rise*c = area closest to the perpendicular
 * of u1, found with the extended Euclidean algorithm.
 *
 * SEARCH
 * ======
 * Candidates are ranked by a combined cost:
 *   - angle error in degrees (weight 1.0)
 *   - density-frequency log error in percent (weight 2.0)
 *   - pitch log error of u1 itself in percent (weight 0.05), which keeps
 *     the fundamental vector near the requested dot pitch so 0 degrees at
 *     150 lpi / 300 dpi resolves to run 2 rather than run 1
 * Ties break to the smaller cell area, then lexicographic (run, rise).
 * Costs are compared as quantized integer keys, so identical inputs always
 * select the identical basis on every platform.
 *
 * Exact rational requests resolve exactly: 0, 45 and 90 degrees at equal
 * resolutions produce small-integer bases with zero angle error, and zero
 * frequency error whenever hres*vres/f^2 lands on an achievable integer
 * area.
 */

use crate::error::{Result, ScreenError};
use crate::params::{RoundingPolicy, ScreenParams};

/// Hard ceiling on fundamental cell pixels (and on the expanded supercell)
pub const MAX_CELL_PIXELS: u64 = 1 << 20;

/// Default half-edge of the (run, rise) search window
const DEFAULT_SEARCH_EDGE: i64 = 64;

/// Absolute cap on the search window, whatever the parameters ask for
const MAX_SEARCH_EDGE: i64 = 256;

const ANGLE_WEIGHT: f64 = 1.0;
const FREQ_WEIGHT: f64 = 2.0;
const PITCH_WEIGHT: f64 = 0.05;

/// Integer lattice basis for the periodic screen tiling
///
/// Invariants: the vectors are linearly independent (positive cell area)
/// and u1 is in the upper half-plane with `rise >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeBasis {
    /// Primary vector (run, rise); carries the screen angle
    pub u1: (i64, i64),
    /// Secondary vector completing the tiling
    pub u2: (i64, i64),
}

impl LatticeBasis {
    /// Cell area |u1 x u2| in pixels; one dot's worth of cells
    pub fn area(&self) -> u64 {
        (self.u1.0 * self.u2.1 - self.u1.1 * self.u2.0).unsigned_abs()
    }

    /// Achieved screen angle in degrees, measured in ink space
    pub fn actual_angle(&self, hres: f64, vres: f64) -> f64 {
        let ang = (self.u1.1 as f64 / vres)
            .atan2(self.u1.0 as f64 / hres)
            .to_degrees();
        if ang < 0.0 {
            ang + 360.0
        } else {
            ang
        }
    }

    /// Achieved density frequency in lines per inch
    pub fn actual_frequency(&self, hres: f64, vres: f64) -> f64 {
        (hres * vres / self.area() as f64).sqrt()
    }
}

pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Extended gcd: returns (g, s, t) with s*a + t*b == g, g > 0 for
/// non-zero input
fn egcd(a: i64, b: i64) -> (i64, i64, i64) {
    if b == 0 {
        if a < 0 {
            (-a, -1, 0)
        } else {
            (a, 1, 0)
        }
    } else {
        let (g, s, t) = egcd(b, a.rem_euclid(b));
        (g, t, s - a.div_euclid(b) * t)
    }
}

/// Shortest angular distance on the 180-degree screen circle
fn angle_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(180.0);
    d.min(180.0 - d)
}

/// Relative log error in percent; symmetric under over/undershoot
fn log_error_percent(actual: f64, target: f64) -> f64 {
    100.0 * (actual / target).ln().abs()
}

/// Pick the integer cell area achievable for a given basis-vector gcd
fn snap_area(target: f64, g: u64, rounding: RoundingPolicy) -> u64 {
    let steps = target / g as f64;
    let n = match rounding {
        RoundingPolicy::Nearest => steps.round(),
        RoundingPolicy::Holladay => steps.floor(),
    };
    (n.max(1.0) as u64) * g
}

/// Construct u2: the integer solution of run*d - rise*c = area closest to
/// the perpendicular of u1
fn second_vector(run: i64, rise: i64, area: i64) -> (i64, i64) {
    let (g, s, t) = egcd(run, rise);
    let scale = area / g;
    let (c0, d0) = (-t * scale, s * scale);

    // Homogeneous direction of the solution family
    let (hx, hy) = (run / g, rise / g);

    // Perpendicular target: area / |u1|^2 * (-rise, run)
    let norm = (run * run + rise * rise) as f64;
    let px = area as f64 / norm * (-rise) as f64;
    let py = area as f64 / norm * run as f64;

    let shift = ((px - c0 as f64) * hx as f64 + (py - d0 as f64) * hy as f64)
        / (hx * hx + hy * hy) as f64;
    let k = shift.round() as i64;

    (c0 + k * hx, d0 + k * hy)
}

/// Solve for the lattice basis best approximating the requested screen
///
/// Fails with `Range` for non-positive frequency or resolution, and when a
/// forced supercell size cannot accommodate the requested level count.
pub fn solve(params: &ScreenParams) -> Result<LatticeBasis> {
    params.validate()?;

    let (hres, vres, freq) = (params.hres, params.vres, params.frequency);
    let supercell = params.supercell_size as u64;

    if supercell > 1 && supercell * supercell < params.levels as u64 {
        return Err(ScreenError::Range(format!(
            "SuperCellSize {} cannot accommodate {} levels",
            supercell, params.levels
        )));
    }

    // Target vector in device pixels and target cell area
    let theta = params.angle.to_radians();
    let target_x = hres / freq * theta.cos();
    let target_y = vres / freq * theta.sin();
    let target_area = hres * vres / (freq * freq);
    let target_angle = params.angle.rem_euclid(180.0);

    let reach = target_x.abs().max(target_y.abs()).ceil() as i64 + 2;
    let edge = if supercell > 1 {
        (supercell as i64).max(reach)
    } else {
        DEFAULT_SEARCH_EDGE.max(reach)
    }
    .min(MAX_SEARCH_EDGE);

    // (cost key, area, run, rise) minimized lexicographically
    let mut best: Option<(i64, u64, i64, i64)> = None;

    for run in -edge..=edge {
        for rise in 0..=edge {
            // Canonical upper half-plane: rise > 0, or rise == 0 && run > 0
            if rise == 0 && run <= 0 {
                continue;
            }

            let g = gcd(run.unsigned_abs(), rise.unsigned_abs());
            let area = snap_area(target_area, g, params.rounding);
            if area > MAX_CELL_PIXELS {
                continue;
            }

            let cand_angle = (rise as f64 / vres).atan2(run as f64 / hres).to_degrees();
            let cand_freq = (hres * vres / area as f64).sqrt();
            let pitch_freq =
                1.0 / ((run as f64 / hres).powi(2) + (rise as f64 / vres).powi(2)).sqrt();

            let cost = ANGLE_WEIGHT * angle_distance(cand_angle, target_angle)
                + FREQ_WEIGHT * log_error_percent(cand_freq, freq)
                + PITCH_WEIGHT * log_error_percent(pitch_freq, freq);
            let key = (cost * 1.0e6).round() as i64;

            let entry = (key, area, run, rise);
            if best.map_or(true, |b| entry < b) {
                best = Some(entry);
            }
        }
    }

    let (_, area, run, rise) =
        best.ok_or_else(|| ScreenError::Range("no representable screen lattice".into()))?;

    let u2 = second_vector(run, rise, area as i64);
    let basis = LatticeBasis { u1: (run, rise), u2 };
    debug_assert_eq!(basis.area(), area);
    Ok(basis)
}

/// Expansion factor applied when a supercell size is forced: the smallest
/// k with k^2 * area >= size^2
pub fn expansion_factor(area: u64, supercell_size: u16) -> u64 {
    if supercell_size <= 1 {
        return 1;
    }
    let target = supercell_size as u64 * supercell_size as u64;
    let mut k = 1u64;
    while k * k * area < target {
        k += 1;
    }
    k
}
