//! The island: a land/water raster and its projected extent.
//!
//! # Geometry
//!
//! The mask is a north-up grid of `rows × cols` square pixels.  Its top-left
//! corner sits at `(tlx, tly)` and each pixel is `pixel_size` metres wide:
//!
//! ```text
//! brx = tlx + cols * pixel_size
//! bry = tly - rows * pixel_size
//! ```
//!
//! A point is looked up by rounding to the nearest grid index:
//!
//! ```text
//! col = round((x - tlx) / pixel_size)
//! row = round((tly - y) / pixel_size)
//! ```
//!
//! An index that rounds past the last row/column is water.

use stoat_core::{Point, SimRng};

use crate::{SpatialError, SpatialResult};

/// Upper bound on rejection-sampling attempts when drawing an on-land point.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1_000_000;

// ── LandMask ──────────────────────────────────────────────────────────────────

/// Row-major land/water raster.  `true` = land.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandMask {
    rows:  usize,
    cols:  usize,
    cells: Vec<bool>,
}

impl LandMask {
    /// Wrap a row-major cell vector of length `rows * cols`.
    pub fn new(rows: usize, cols: usize, cells: Vec<bool>) -> SpatialResult<Self> {
        if cells.len() != rows * cols {
            return Err(SpatialError::MaskShape { rows, cols, got: cells.len() });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build from raster rows where any non-zero value is land.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> SpatialResult<Self> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(SpatialError::Geometry(format!(
                    "ragged mask: row of {} cells, expected {cols}",
                    row.len()
                )));
            }
            cells.extend(row.iter().map(|&v| v > 0));
        }
        Self::new(rows.len(), cols, cells)
    }

    /// Build by evaluating `is_land(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, is_land: impl Fn(usize, usize) -> bool) -> Self {
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| is_land(r, c))
            .collect();
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `true` if `(row, col)` is inside the grid and land.
    #[inline]
    pub fn is_land(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    pub fn land_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Fraction of cells that are land, in `[0, 1]`.
    pub fn land_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.land_cells() as f64 / self.cells.len() as f64
    }
}

// ── Extent ────────────────────────────────────────────────────────────────────

/// Projected bounding box of the mask: top-left and bottom-right corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extent {
    pub tlx: f64,
    pub tly: f64,
    pub brx: f64,
    pub bry: f64,
}

impl Extent {
    #[inline]
    pub fn width(&self) -> f64 {
        self.brx - self.tlx
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.tly - self.bry
    }

    /// Closed bounding-box membership.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.tlx && p.x <= self.brx && p.y <= self.tly && p.y >= self.bry
    }
}

// ── SpatialDomain ─────────────────────────────────────────────────────────────

/// Land mask plus its geotransform.  Answers "is this point on the island?"
/// and draws uniform on-island points.
#[derive(Clone, Debug)]
pub struct SpatialDomain {
    mask:       LandMask,
    extent:     Extent,
    pixel_size: f64,
}

impl SpatialDomain {
    /// Place `mask` with its top-left corner at `top_left`.
    ///
    /// Rejects masks without any land (rejection sampling could never
    /// terminate) and non-positive pixel sizes.
    pub fn new(mask: LandMask, top_left: Point, pixel_size: f64) -> SpatialResult<Self> {
        if !(pixel_size > 0.0) || !pixel_size.is_finite() {
            return Err(SpatialError::Geometry(format!("pixel size must be > 0, got {pixel_size}")));
        }
        if mask.land_cells() == 0 {
            return Err(SpatialError::NoLand);
        }
        let extent = Extent {
            tlx: top_left.x,
            tly: top_left.y,
            brx: top_left.x + mask.cols() as f64 * pixel_size,
            bry: top_left.y - mask.rows() as f64 * pixel_size,
        };
        Ok(Self { mask, extent, pixel_size })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    pub fn mask(&self) -> &LandMask {
        &self.mask
    }

    /// Bounding-box test, then the nearest mask cell.
    pub fn is_on_land(&self, p: Point) -> bool {
        if !self.extent.contains(p) {
            return false;
        }
        let col = ((p.x - self.extent.tlx) / self.pixel_size).round() as usize;
        let row = ((self.extent.tly - p.y) / self.pixel_size).round() as usize;
        self.mask.is_land(row, col)
    }

    /// Land test on the cell *containing* `p` (truncating pixel lookup).
    ///
    /// Used when laying out the lure grid, which addresses cells by their
    /// top-left corner rather than by nearest centre.
    pub fn cell_containing_is_land(&self, p: Point) -> bool {
        let fx = (p.x - self.extent.tlx) / self.pixel_size;
        let fy = (self.extent.tly - p.y) / self.pixel_size;
        if fx < 0.0 || fy < 0.0 {
            return false;
        }
        self.mask.is_land(fy as usize, fx as usize)
    }

    /// Draw a uniformly distributed on-land point by rejection sampling
    /// inside the bounding box.
    ///
    /// Gives up after [`MAX_PLACEMENT_ATTEMPTS`] draws; with a positive land
    /// fraction that only happens when the mask geometry is degenerate.
    pub fn random_on_land_point(&self, rng: &mut SimRng) -> SpatialResult<Point> {
        let Extent { tlx, bry, .. } = self.extent;
        let width = self.extent.width();
        let height = self.extent.height();
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = tlx + rng.random::<f64>() * width;
            let y = bry + rng.random::<f64>() * height;
            let p = Point::new(x, y);
            if self.is_on_land(p) {
                return Ok(p);
            }
        }
        Err(SpatialError::PlacementExhausted { attempts: MAX_PLACEMENT_ATTEMPTS })
    }
}
