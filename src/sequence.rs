/**
 * Turn-On Sequence Generator
 *
 * Orders every cell of the fundamental tile so that progressively inking
 * cells in that order grows a monotone, connected halftone dot of the
 * requested shape.
 *
 * GROWTH SIMULATION
 * =================
 * Each cell gets a shape-weighted distance to the nearest dot center (the
 * tile seed plus any lattice translate, so rotated dots wrap correctly
 * through the Holladay brick). Growth then runs as a small state machine:
 *
 *   Seeded -> Growing -> MidpointForced -> Growing -> Done
 *
 * Starting from the metric minimum, cells are admitted from the frontier
 * of the already-on region in increasing metric order, ties broken by
 * row-major scan order. Restricting admission to the frontier makes every
 * prefix of the sequence a single 4-connected region (modulo the tiling)
 * by construction; no growth step can open a hole.
 *
 * The MidpointForced step fires exactly once, at sequence index
 * num_pix / 2 (floor): that cell's cumulative coverage is snapped to
 * exactly 0.5 so 50% gray always renders the half-on pattern. For even
 * cell counts the snap coincides with the interpolated value; for odd
 * counts it overrides it, using the same floor-based index rule as the
 * surrounding loop.
 *
 * The coverage schedule is consumed by the threshold synthesizer; the
 * point list is also the TOSArray payload.
 */

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{Result, ScreenError};
use crate::mask::{DotMask, Grid};
use crate::params::DotShape;

/// Fixed-point scale for metric comparison keys
const METRIC_KEY_SCALE: f64 = (1u64 << 20) as f64;

/// Lattice translates examined when finding the nearest dot center
const LATTICE_NEIGHBORHOOD: i64 = 3;

/// Eccentricity of the elliptical dot's minor axis
const ELLIPSE_ECCENTRICITY: f64 = 1.5;

/// Axis weights of the rhomboid dot
const RHOMBOID_X_WEIGHT: f64 = 0.75;
const RHOMBOID_Y_WEIGHT: f64 = 1.25;

/// Growth phases of the turn-on simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrowthPhase {
    Seeded,
    Growing,
    MidpointForced,
    Done,
}

/// The turn-on order of one tile, with the cumulative-coverage schedule
/// attached to each step
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOnSequence {
    points: Vec<(u16, u16)>,
    coverage: Vec<f64>,
    width: u32,
    height: u32,
}

impl TurnOnSequence {
    /// Grow the turn-on order for a tile. `aspect` is hres/vres, applied
    /// to vertical deltas so dots stay round in ink space.
    pub fn grow(mask: &DotMask, shape: DotShape, aspect: f64) -> Result<Self> {
        let (w, h) = (mask.width(), mask.height());
        let n = mask.num_pix();

        let metric = distance_field(mask, shape, aspect)?;
        let seed = seed_cell(&metric, w, h);

        let mut points = Vec::new();
        points
            .try_reserve_exact(n)
            .map_err(|_| ScreenError::OutOfMemory(n * 4))?;
        let mut coverage = Vec::new();
        coverage
            .try_reserve_exact(n)
            .map_err(|_| ScreenError::OutOfMemory(n * 8))?;

        let mut visited: Grid<bool> = Grid::new(w, h)?;
        let mut frontier: BinaryHeap<Reverse<(i64, u32, u32)>> = BinaryHeap::new();
        frontier.push(Reverse((*metric.get(seed.0, seed.1), seed.1, seed.0)));

        let delta = 1.0 / n as f64;
        let midpoint = n / 2;
        let mut phase = GrowthPhase::Seeded;

        while let Some(Reverse((_, y, x))) = frontier.pop() {
            if *visited.get(x, y) {
                continue;
            }
            visited.set(x, y, true);

            let index = points.len();
            phase = match index {
                0 => GrowthPhase::Seeded,
                i if i == midpoint => GrowthPhase::MidpointForced,
                _ => GrowthPhase::Growing,
            };

            points.push((x as u16, y as u16));
            coverage.push(match phase {
                GrowthPhase::MidpointForced => 0.5,
                _ => index as f64 * delta,
            });

            if points.len() == n {
                phase = GrowthPhase::Done;
                break;
            }

            for (nx, ny) in mask.neighbors4(x, y) {
                if !*visited.get(nx, ny) && *mask.occupancy().get(nx, ny) {
                    frontier.push(Reverse((*metric.get(nx, ny), ny, nx)));
                }
            }
        }

        if points.len() != n {
            return Err(ScreenError::Range(
                "tile occupancy is not connected under the growth metric".into(),
            ));
        }
        debug_assert_eq!(phase, GrowthPhase::Done);

        Ok(Self {
            points,
            coverage,
            width: w,
            height: h,
        })
    }

    /// Replicate the sequence over a k-times supercell tile. All k^2 dot
    /// copies advance together: global rank r*k^2 + j is growth step r of
    /// dot j, which multiplies the distinct gray levels by k^2 without
    /// changing the screen geometry.
    pub fn replicate(&self, mask: &DotMask, factor: u64) -> Result<Self> {
        if factor <= 1 {
            return Ok(self.clone());
        }
        let expanded = mask.expand(factor)?;
        let basis = mask.basis();
        let n_total = self.len() * (factor * factor) as usize;

        let mut points = Vec::new();
        points
            .try_reserve_exact(n_total)
            .map_err(|_| ScreenError::OutOfMemory(n_total * 4))?;

        for &(px, py) in &self.points {
            for m in 0..factor as i64 {
                for n in 0..factor as i64 {
                    let x = px as i64 + m * basis.u1.0 + n * basis.u2.0;
                    let y = py as i64 + m * basis.u1.1 + n * basis.u2.1;
                    let (cx, cy) = expanded.canonicalize(x, y);
                    points.push((cx as u16, cy as u16));
                }
            }
        }

        let delta = 1.0 / n_total as f64;
        let midpoint = n_total / 2;
        let coverage = (0..n_total)
            .map(|i| {
                if i == midpoint && i > 0 {
                    0.5
                } else {
                    i as f64 * delta
                }
            })
            .collect();

        Ok(Self {
            points,
            coverage,
            width: expanded.width(),
            height: expanded.height(),
        })
    }

    /// Number of cells in the sequence
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for a zero-cell sequence (never produced by `grow`)
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Tile width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Tile height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Turn-on order as (x, y) pairs
    pub fn points(&self) -> &[(u16, u16)] {
        &self.points
    }

    /// Cumulative area coverage when step `i` turns on
    pub fn coverage(&self, i: usize) -> f64 {
        self.coverage[i]
    }
}

/// Shape-weighted squared-ish distance for a displacement from the dot
/// center. Smaller turns on earlier. `radius` normalizes the composite
/// shapes to the cell size.
fn shape_metric(shape: DotShape, dx: f64, dy: f64, radius: f64) -> f64 {
    match shape {
        DotShape::Round => dx * dx + dy * dy,
        DotShape::Ellipse => {
            let my = ELLIPSE_ECCENTRICITY * dy;
            dx * dx + my * my
        }
        DotShape::Inverted => -(dx * dx + dy * dy),
        DotShape::Rhomboid => RHOMBOID_X_WEIGHT * dx.abs() + RHOMBOID_Y_WEIGHT * dy.abs(),
        DotShape::LineX => dy * dy,
        DotShape::LineY => dx * dx,
        DotShape::Diamond => dx.abs() + dy.abs(),
        DotShape::Square => dx.abs().max(dy.abs()),
        DotShape::RedBook => {
            let (nx, ny) = (dx.abs() / radius, dy.abs() / radius);
            if nx + ny <= 1.0 {
                nx * nx + ny * ny
            } else {
                2.0 - ((nx - 1.0) * (nx - 1.0) + (ny - 1.0) * (ny - 1.0))
            }
        }
    }
}

/// Per-cell metric: minimum over nearby lattice translates of the seed
/// center, quantized to a fixed-point comparison key
fn distance_field(mask: &DotMask, shape: DotShape, aspect: f64) -> Result<Grid<i64>> {
    let (w, h) = (mask.width(), mask.height());
    let basis = mask.basis();
    let center = (w as i64 / 2, h as i64 / 2);
    let radius = (mask.num_pix() as f64).sqrt() / 2.0;

    let mut field: Grid<i64> = Grid::new(w, h)?;
    for y in 0..h {
        for x in 0..w {
            let mut best = f64::INFINITY;
            for m in -LATTICE_NEIGHBORHOOD..=LATTICE_NEIGHBORHOOD {
                for n in -LATTICE_NEIGHBORHOOD..=LATTICE_NEIGHBORHOOD {
                    let cx = center.0 + m * basis.u1.0 + n * basis.u2.0;
                    let cy = center.1 + m * basis.u1.1 + n * basis.u2.1;
                    let dx = x as i64 - cx;
                    let dy = y as i64 - cy;
                    let d = shape_metric(shape, dx as f64, dy as f64 * aspect, radius);
                    if d < best {
                        best = d;
                    }
                }
            }
            field.set(x, y, (best * METRIC_KEY_SCALE).round() as i64);
        }
    }
    Ok(field)
}

/// Growth seed: the metric minimum, ties broken row-major. The geometric
/// center for center-growing shapes, a cell corner for inverted dots.
fn seed_cell(metric: &Grid<i64>, w: u32, h: u32) -> (u32, u32) {
    let mut best = (i64::MAX, 0u32, 0u32);
    for y in 0..h {
        for x in 0..w {
            let key = (*metric.get(x, y), y, x);
            if key < best {
                best = key;
            }
        }
    }
    (best.2, best.1)
}
