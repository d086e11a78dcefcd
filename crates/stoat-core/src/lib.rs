//! `stoat-core`: foundational types for the stoat eradication model.
//!
//! This crate is a dependency of every other `stoat-*` crate.  It has no
//! `stoat-*` dependencies and minimal external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `Slot`, `LureId`                           |
//! | [`geo`]         | `Point`, planar distance and compass bearing          |
//! | [`time`]        | `SimDay`, `SimClock`                                  |
//! | [`rng`]         | `SimRng` and the model's sampling distributions       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{AgentId, LureId, Slot};
pub use rng::SimRng;
pub use time::{SimClock, SimDay};
