/**
 * Dot Mask Builder
 *
 * Reduces a lattice basis to a rectangular fundamental tile: a width x
 * height brick, width * height equal to the cell area, that tiles the
 * plane under the lattice when every block of `height` rows is offset by
 * `row_shift` (the Holladay brick representation). Every device pixel maps
 * to exactly one tile cell, so the tile covers one period with no gaps or
 * overlaps.
 *
 * The reduction is the Hermite form of the basis: the lattice contains
 * (width, 0) and (row_shift, height) with height = gcd of the basis rise
 * components, and those two vectors generate it.
 *
 * The occupancy grid and the turn-on order are deliberately separate
 * types; `DotMask` only answers "which cells exist and how do they wrap",
 * and `TurnOnSequence` (sequence.rs) owns the ordering.
 */

use crate::error::{Result, ScreenError};
use crate::geometry::{gcd, LatticeBasis, MAX_CELL_PIXELS};

/// Tile dimensions are encoded as 16-bit values in the raw output header
const MAX_TILE_EDGE: u64 = 0xFFFF;

/// Row-major 2D buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Allocate a cleared grid, surfacing reservation failure instead of
    /// aborting
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = width as usize * height as usize;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ScreenError::OutOfMemory(len * std::mem::size_of::<T>()))?;
        data.resize(len, T::default());
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

impl<T> Grid<T> {
    /// Grid width in cells
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell count
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid holds no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        x as usize + self.width as usize * y as usize
    }

    /// Read a cell
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Write a cell
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// Row-major backing slice
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume into the row-major buffer
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// Rectangular fundamental tile of the screen lattice
#[derive(Debug, Clone)]
pub struct DotMask {
    occupancy: Grid<bool>,
    row_shift: u32,
    basis: LatticeBasis,
}

impl DotMask {
    /// Build the fundamental tile for a lattice basis
    ///
    /// Fails with `Range` when the basis is degenerate, when the cell area
    /// does not reduce to an integral grid, or when the tile exceeds the
    /// dimension/pixel ceilings.
    pub fn build(basis: &LatticeBasis) -> Result<Self> {
        let area = basis.area();
        if area == 0 {
            return Err(ScreenError::Range(
                "degenerate lattice basis (zero cell area)".into(),
            ));
        }
        if area > MAX_CELL_PIXELS {
            return Err(ScreenError::Range(format!(
                "cell area {area} exceeds {MAX_CELL_PIXELS} pixel ceiling"
            )));
        }

        let height = gcd(basis.u1.1.unsigned_abs(), basis.u2.1.unsigned_abs());
        if height == 0 || area % height != 0 {
            return Err(ScreenError::Range(
                "cell area does not divide into an integral pixel grid".into(),
            ));
        }
        let width = area / height;
        if width > MAX_TILE_EDGE || height > MAX_TILE_EDGE {
            return Err(ScreenError::Range(format!(
                "tile {width}x{height} exceeds the {MAX_TILE_EDGE} edge limit"
            )));
        }

        let row_shift = hermite_row_shift(basis, width, height);

        let mut occupancy = Grid::new(width as u32, height as u32)?;
        for y in 0..height as u32 {
            for x in 0..width as u32 {
                occupancy.set(x, y, true);
            }
        }

        Ok(Self {
            occupancy,
            row_shift,
            basis: *basis,
        })
    }

    /// Expand the tile by an integer factor for a forced supercell: the
    /// k-times tile holds k^2 dots and tiles under the scaled lattice.
    pub fn expand(&self, factor: u64) -> Result<Self> {
        if factor <= 1 {
            return Ok(self.clone());
        }
        let width = self.width() as u64 * factor;
        let height = self.height() as u64 * factor;
        if width > MAX_TILE_EDGE || height > MAX_TILE_EDGE {
            return Err(ScreenError::Range(format!(
                "supercell {width}x{height} exceeds the {MAX_TILE_EDGE} edge limit"
            )));
        }
        if width * height > MAX_CELL_PIXELS {
            return Err(ScreenError::Range(format!(
                "supercell area {} exceeds {MAX_CELL_PIXELS} pixel ceiling",
                width * height
            )));
        }

        let mut occupancy = Grid::new(width as u32, height as u32)?;
        for y in 0..height as u32 {
            for x in 0..width as u32 {
                occupancy.set(x, y, true);
            }
        }

        Ok(Self {
            occupancy,
            row_shift: self.row_shift * factor as u32,
            basis: self.basis,
        })
    }

    /// Tile width in cells
    pub fn width(&self) -> u32 {
        self.occupancy.width()
    }

    /// Tile height in cells
    pub fn height(&self) -> u32 {
        self.occupancy.height()
    }

    /// Cells in one period
    pub fn num_pix(&self) -> usize {
        self.occupancy.len()
    }

    /// Horizontal offset applied to each successive block of `height` rows
    /// when the brick tiles the plane
    pub fn row_shift(&self) -> u32 {
        self.row_shift
    }

    /// The lattice basis the tile was reduced from
    pub fn basis(&self) -> &LatticeBasis {
        &self.basis
    }

    /// Occupancy of the period: which cells belong to the halftone tile
    pub fn occupancy(&self) -> &Grid<bool> {
        &self.occupancy
    }

    /// Map an arbitrary lattice point into its unique tile cell
    #[inline]
    pub fn canonicalize(&self, x: i64, y: i64) -> (u32, u32) {
        let w = self.width() as i64;
        let h = self.height() as i64;
        let block = y.div_euclid(h);
        let cy = y - block * h;
        let cx = (x - block * self.row_shift as i64).rem_euclid(w);
        (cx as u32, cy as u32)
    }

    /// The four neighbors of a tile cell under wrap-around adjacency
    /// modulo the tiling
    pub fn neighbors4(&self, x: u32, y: u32) -> [(u32, u32); 4] {
        let (x, y) = (x as i64, y as i64);
        [
            self.canonicalize(x - 1, y),
            self.canonicalize(x + 1, y),
            self.canonicalize(x, y - 1),
            self.canonicalize(x, y + 1),
        ]
    }
}

/// Find the horizontal component of the lattice vector (shift, height):
/// with height = gcd(b, d) = m*b + n*d, the matching x is m*a + n*c.
fn hermite_row_shift(basis: &LatticeBasis, width: u64, height: u64) -> u32 {
    let (a, b) = basis.u1;
    let (c, d) = basis.u2;
    let (m, n) = bezout_for(b, d, height as i64);
    let x = m * a + n * c;
    x.rem_euclid(width as i64) as u32
}

/// Coefficients (m, n) with m*b + n*d == g
fn bezout_for(b: i64, d: i64, g: i64) -> (i64, i64) {
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
    let (gg, m, n) = egcd(b, d);
    debug_assert_eq!(gg, g);
    (m, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::solve;
    use crate::params::ScreenParams;
    use std::collections::HashSet;

    fn basis_for(angle: f64, freq: f64, res: f64) -> LatticeBasis {
        solve(&ScreenParams {
            angle,
            frequency: freq,
            hres: res,
            vres: res,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_two_by_two_tile() {
        let mask = DotMask::build(&basis_for(0.0, 150.0, 300.0)).unwrap();
        assert_eq!(mask.width(), 2);
        assert_eq!(mask.height(), 2);
        assert_eq!(mask.row_shift(), 0);
        assert_eq!(mask.num_pix(), 4);
        assert!(mask.occupancy().as_slice().iter().all(|&c| c));
    }

    #[test]
    fn test_diagonal_strip() {
        let mask = DotMask::build(&basis_for(45.0, 75.0, 300.0)).unwrap();
        assert_eq!(mask.num_pix() as u64, mask.basis().area());
        assert_eq!(
            mask.width() as u64 * mask.height() as u64,
            mask.basis().area()
        );
        // The 45-degree brick is wider than tall with a nonzero shift.
        assert!(mask.row_shift() > 0);
    }

    #[test]
    fn test_canonicalize_is_identity_on_tile() {
        let mask = DotMask::build(&basis_for(45.0, 75.0, 300.0)).unwrap();
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                assert_eq!(mask.canonicalize(x as i64, y as i64), (x, y));
            }
        }
    }

    #[test]
    fn test_canonicalize_respects_lattice() {
        // Translating by any lattice vector must land on the same cell.
        for (angle, freq) in [(0.0, 150.0), (45.0, 75.0), (15.0, 75.0), (75.0, 120.0)] {
            let basis = basis_for(angle, freq, 300.0);
            let mask = DotMask::build(&basis).unwrap();
            let (u1, u2) = (basis.u1, basis.u2);
            for y in 0..mask.height() as i64 {
                for x in 0..mask.width() as i64 {
                    for (m, n) in [(1, 0), (0, 1), (-1, 2), (3, -2)] {
                        let tx = x + m * u1.0 + n * u2.0;
                        let ty = y + m * u1.1 + n * u2.1;
                        assert_eq!(
                            mask.canonicalize(tx, ty),
                            (x as u32, y as u32),
                            "lattice translate moved a cell at {angle} deg"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_tile_covers_period_without_overlap() {
        // Every pixel of a large region maps into the tile, and each tile
        // cell receives the same number of pixels: no gaps, no overlaps.
        let mask = DotMask::build(&basis_for(45.0, 75.0, 300.0)).unwrap();
        let (w, h) = (mask.width() as i64, mask.height() as i64);
        let mut counts = vec![0usize; mask.num_pix()];
        let reps = 4;
        for y in 0..h * reps {
            for x in 0..w * reps {
                let (cx, cy) = mask.canonicalize(x, y);
                counts[cx as usize + w as usize * cy as usize] += 1;
            }
        }
        assert!(counts.iter().all(|&c| c == (reps * reps) as usize));
    }

    #[test]
    fn test_neighbors_wrap() {
        let mask = DotMask::build(&basis_for(0.0, 150.0, 300.0)).unwrap();
        let n: HashSet<_> = mask.neighbors4(0, 0).into_iter().collect();
        assert!(n.contains(&(1, 0)));
        assert!(n.contains(&(0, 1)));
    }

    #[test]
    fn test_degenerate_basis_fails() {
        let bad = LatticeBasis {
            u1: (2, 1),
            u2: (4, 2),
        };
        assert!(matches!(
            DotMask::build(&bad),
            Err(ScreenError::Range(_))
        ));
    }

    #[test]
    fn test_expand_scales_tile() {
        let mask = DotMask::build(&basis_for(0.0, 150.0, 300.0)).unwrap();
        let expanded = mask.expand(3).unwrap();
        assert_eq!(expanded.width(), 6);
        assert_eq!(expanded.height(), 6);
        assert_eq!(expanded.num_pix(), 36);
        // Scaled lattice: translating by 3 * u1 stays on the same cell.
        let (u1x, u1y) = (mask.basis().u1.0 * 3, mask.basis().u1.1 * 3);
        assert_eq!(expanded.canonicalize(u1x, u1y), expanded.canonicalize(0, 0));
    }
}
