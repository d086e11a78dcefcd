//! `SearchContext`: the read-only world view an attraction search needs.

use stoat_agent::{AgentPopulation, InteractionLedgers};
use stoat_spatial::LureField;

/// Borrowed view of the realisation state consulted while an agent looks
/// for a centre of attraction.
///
/// Built by the scheduler once per agent-hour; nothing in it is mutated
/// during the search.
#[derive(Copy, Clone)]
pub struct SearchContext<'a> {
    pub population: &'a AgentPopulation,
    pub ledgers:    &'a InteractionLedgers,
    pub lures:      &'a LureField,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        population: &'a AgentPopulation,
        ledgers:    &'a InteractionLedgers,
        lures:      &'a LureField,
    ) -> Self {
        Self { population, ledgers, lures }
    }
}
