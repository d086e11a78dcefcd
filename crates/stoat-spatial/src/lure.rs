//! Pheromone lure stations.
//!
//! Stations are laid out once per realisation on a regular grid clipped to
//! the island and never move.  They are released together, so the time since
//! the last release is one scalar for the whole field ([`ReleaseState`]).

use rstar::RTree;
use tracing::debug;

use stoat_core::{LureId, Point};

use crate::index::IndexedPoint;
use crate::{SpatialDomain, SpatialError, SpatialResult};

// ── ReleaseState ──────────────────────────────────────────────────────────────

/// Shared release clock of every station in a [`LureField`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ReleaseState {
    /// No release has happened yet (or the lure went dormant).
    #[default]
    Dormant,
    /// Lure is attracting; `days_since_release` counts whole days.
    Active { days_since_release: u32 },
}

// ── LureField ─────────────────────────────────────────────────────────────────

/// Static lure-station positions plus their shared release state.
pub struct LureField {
    stations: Vec<Point>,
    index:    RTree<IndexedPoint>,
    release:  ReleaseState,
    /// Stations go dormant once this many days have passed since the last
    /// release.  `None` keeps them active until the next release resets them.
    dormant_after_days: Option<u32>,
}

impl LureField {
    /// Build a field from explicit station positions.
    pub fn new(stations: Vec<Point>) -> Self {
        let entries = stations
            .iter()
            .enumerate()
            .map(|(i, &p)| IndexedPoint::new(p, i))
            .collect();
        Self {
            stations,
            index: RTree::bulk_load(entries),
            release: ReleaseState::Dormant,
            dormant_after_days: None,
        }
    }

    /// A field with no stations (no lure campaign).
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Lay stations on a `spacing`-metre grid and keep those whose mask cell
    /// is land.
    ///
    /// Rows start one spacing above the bottom edge and stop before the top
    /// edge; columns start at the left edge and stop before the right edge.
    /// Coordinates and spacing are truncated to whole metres.
    pub fn on_grid(domain: &SpatialDomain, spacing: f64) -> SpatialResult<Self> {
        let step = spacing as i64;
        if step < 1 {
            return Err(SpatialError::Geometry(format!("lure spacing must be >= 1 m, got {spacing}")));
        }
        let ext = domain.extent();
        let (x0, x1) = (ext.tlx as i64, ext.brx as i64);
        let (y0, y1) = ((ext.bry + spacing) as i64, ext.tly as i64);

        let mut stations = Vec::new();
        let mut y = y0;
        while y < y1 {
            let mut x = x0;
            while x < x1 {
                let p = Point::new(x as f64, y as f64);
                if domain.cell_containing_is_land(p) {
                    stations.push(p);
                }
                x += step;
            }
            y += step;
        }
        debug!(stations = stations.len(), spacing, "laid out lure grid");
        Ok(Self::new(stations))
    }

    /// Set the dormancy horizon (see [`LureField::end_of_day`]).
    pub fn with_dormancy(mut self, dormant_after_days: Option<u32>) -> Self {
        self.dormant_after_days = dormant_after_days;
        self
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Point] {
        &self.stations
    }

    #[inline]
    pub fn position(&self, station: LureId) -> Point {
        self.stations[station.index()]
    }

    /// Every station strictly closer than `radius` to `p`, with its distance,
    /// in ascending station order.
    pub fn within(&self, p: Point, radius: f64) -> Vec<(LureId, f64)> {
        let mut hits: Vec<(LureId, f64)> = self
            .index
            .locate_within_distance([p.x, p.y], radius * radius)
            .map(|e| {
                let id = LureId(e.index);
                (id, p.distance(self.stations[e.index as usize]))
            })
            .filter(|&(_, d)| d < radius)
            .collect();
        hits.sort_unstable_by_key(|&(id, _)| id);
        hits
    }

    // ── Release clock ─────────────────────────────────────────────────────

    pub fn release_state(&self) -> ReleaseState {
        self.release
    }

    /// Whole days since the last release, or `None` while dormant.
    pub fn days_since_release(&self) -> Option<u32> {
        match self.release {
            ReleaseState::Dormant => None,
            ReleaseState::Active { days_since_release } => Some(days_since_release),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.release, ReleaseState::Active { .. })
    }

    /// Fresh lure at every station.
    pub fn release(&mut self) {
        self.release = ReleaseState::Active { days_since_release: 0 };
    }

    /// Age the lure by one day.  Goes dormant once the dormancy horizon (if
    /// any) is passed.
    pub fn end_of_day(&mut self) {
        if let ReleaseState::Active { days_since_release } = self.release {
            let aged = days_since_release + 1;
            self.release = match self.dormant_after_days {
                Some(limit) if aged > limit => ReleaseState::Dormant,
                _ => ReleaseState::Active { days_since_release: aged },
            };
        }
    }
}
