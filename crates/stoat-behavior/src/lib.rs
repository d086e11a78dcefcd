//! `stoat-behavior`: where a stoat heads each hour and how far it gets.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`context`]     | `SearchContext<'a>`, read-only view of population/ledgers/lures |
//! | [`attraction`]  | `AttractionSearch`, `AttractionParams`, `Attractor`        |
//! | [`movement`]    | `MovementModel`, `MovementParams`, `Goal`, `Step`          |
//! | [`error`]       | `BehaviorError`, `BehaviorResult<T>`                       |
//!
//! Both models are pure functions of their inputs plus the realisation RNG;
//! the scheduler in `stoat-sim` applies their results.

pub mod attraction;
pub mod context;
pub mod error;
pub mod movement;


pub use attraction::{AttractionParams, AttractionSearch, Attractor, AttractorSource};
pub use context::SearchContext;
pub use error::{BehaviorError, BehaviorResult};
pub use movement::{DEFAULT_MAX_MOVE_ATTEMPTS, Goal, MovementModel, MovementParams, Step};
