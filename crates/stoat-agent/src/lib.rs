//! `stoat-agent`: the stoat population and its interaction memory.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`agent`]       | `Agent`, `Sex`, `Maturity`, `Behavior`                    |
//! | [`population`]  | `AgentPopulation` (slot arena, births, deaths, dispersal) |
//! | [`ledger`]      | `MatingLedger`, `HabituationLedger`, `InteractionLedgers` |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types. |

pub mod agent;
pub mod error;
pub mod ledger;
pub mod population;


pub use agent::{Agent, Behavior, Maturity, Sex};
pub use error::{AgentError, AgentResult};
pub use ledger::{
    HabituationLedger, HabituationRecord, InteractionLedgers, LedgerOverflow, MatingLedger,
    MatingRecord,
};
pub use population::{AgentPopulation, DEFAULT_AGENT_CAPACITY};
