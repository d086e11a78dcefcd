//! Kill-trap locations and the trap CSV loader.
//!
//! # CSV format
//!
//! One row per trap; only the `x` and `y` columns (projected metres) are
//! read, any other columns are ignored:
//!
//! ```csv
//! trap_id,line,x,y
//! 1,A,1751230.5,5915020.0
//! 2,A,1751330.5,5915020.0
//! ```

use std::io::Read;
use std::path::Path;

use rstar::RTree;
use serde::Deserialize;

use stoat_core::Point;

use crate::index::IndexedPoint;
use crate::SpatialError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TrapRecord {
    x: f64,
    y: f64,
}

// ── TrapGrid ──────────────────────────────────────────────────────────────────

/// Immutable set of trap positions with a radius index.
pub struct TrapGrid {
    traps: Vec<Point>,
    index: RTree<IndexedPoint>,
}

impl TrapGrid {
    pub fn new(traps: Vec<Point>) -> Self {
        let entries = traps
            .iter()
            .enumerate()
            .map(|(i, &p)| IndexedPoint::new(p, i))
            .collect();
        Self { traps, index: RTree::bulk_load(entries) }
    }

    /// No traps deployed.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    pub fn traps(&self) -> &[Point] {
        &self.traps
    }

    /// `true` if any trap is strictly closer than `distance` to `p`.
    pub fn any_within(&self, p: Point, distance: f64) -> bool {
        self.index
            .locate_within_distance([p.x, p.y], distance * distance)
            .any(|e| p.distance(self.traps[e.index as usize]) < distance)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load trap positions from a CSV file with `x` and `y` columns.
pub fn load_traps_csv(path: &Path) -> Result<TrapGrid, SpatialError> {
    let file = std::fs::File::open(path).map_err(SpatialError::Io)?;
    load_traps_reader(file)
}

/// Like [`load_traps_csv`] but accepts any `Read` source.
pub fn load_traps_reader<R: Read>(reader: R) -> Result<TrapGrid, SpatialError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut traps = Vec::new();
    for record in csv_reader.deserialize::<TrapRecord>() {
        let record = record?;
        traps.push(Point::new(record.x, record.y));
    }
    Ok(TrapGrid::new(traps))
}
