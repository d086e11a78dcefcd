//! `stoat-spatial`: the island, its lure stations, and its traps.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`domain`]  | `LandMask`, `Extent`, `SpatialDomain` (land test, sampling) |
//! | [`lure`]    | `LureField` (grid stations + shared release state)          |
//! | [`traps`]   | `TrapGrid`, `load_traps_csv`, `load_traps_reader`           |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! Lure stations and traps are both held in an R-tree (via `rstar`) so
//! radius queries stay cheap for dense trap networks.

pub mod domain;
pub mod error;
pub mod lure;
pub mod traps;

mod index;


pub use domain::{Extent, LandMask, SpatialDomain, MAX_PLACEMENT_ATTEMPTS};
pub use error::{SpatialError, SpatialResult};
pub use lure::{LureField, ReleaseState};
pub use traps::{TrapGrid, load_traps_csv, load_traps_reader};
