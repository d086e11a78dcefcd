//! Fixed-capacity interaction tables with day-based expiry.
//!
//! Two ledgers remember recent pairwise interactions:
//!
//! - [`MatingLedger`]: a male will not re-mate with (or be drawn towards) a
//!   female he mated with in the last `habituation_days` days.
//! - [`HabituationLedger`]: an agent ignores a lure station it interacted
//!   with in the last `habituation_days` days.
//!
//! Both are arenas of `Option` slots.  A new record takes the lowest free
//! slot; when none is free the [`LedgerOverflow`] policy decides whether the
//! realisation aborts or the interaction is dropped.  Records name agents by
//! [`AgentId`]; the population purges a dead agent's records in its death
//! cascade.

use tracing::debug;

use stoat_core::{AgentId, LureId};

use crate::{AgentError, AgentResult};

// ── Policy ────────────────────────────────────────────────────────────────────

/// What to do when a ledger has no free slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LedgerOverflow {
    /// Fail with [`AgentError::LedgerFull`].
    #[default]
    Abort,
    /// Drop the new interaction.
    Skip,
}

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatingRecord {
    pub male:   AgentId,
    pub female: AgentId,
    pub days_remaining: u32,
}

impl MatingRecord {
    /// `true` if the record names `a` and `b` in either role.
    #[inline]
    pub fn pairs(&self, a: AgentId, b: AgentId) -> bool {
        (self.male == a && self.female == b) || (self.male == b && self.female == a)
    }

    #[inline]
    pub fn involves(&self, id: AgentId) -> bool {
        self.male == id || self.female == id
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HabituationRecord {
    pub station: LureId,
    pub agent:   AgentId,
    pub days_remaining: u32,
}

// ── TtlTable ──────────────────────────────────────────────────────────────────

trait Expiring {
    fn days_remaining_mut(&mut self) -> &mut u32;
}

impl Expiring for MatingRecord {
    fn days_remaining_mut(&mut self) -> &mut u32 {
        &mut self.days_remaining
    }
}

impl Expiring for HabituationRecord {
    fn days_remaining_mut(&mut self) -> &mut u32 {
        &mut self.days_remaining
    }
}

/// Slot arena shared by both ledgers.  Slots are allocated lazily up to
/// `capacity`.
#[derive(Clone, Debug)]
struct TtlTable<R> {
    slots:    Vec<Option<R>>,
    capacity: usize,
}

impl<R: Expiring> TtlTable<R> {
    fn new(capacity: usize) -> Self {
        Self { slots: Vec::new(), capacity }
    }

    /// Store `record` in the lowest free slot.  `false` when full.
    fn insert(&mut self, record: R) -> bool {
        if let Some(free) = self.slots.iter_mut().find(|s| s.is_none()) {
            *free = Some(record);
            return true;
        }
        if self.slots.len() < self.capacity {
            self.slots.push(Some(record));
            return true;
        }
        false
    }

    fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.slots.iter().flatten()
    }

    /// Free every record matching `doomed`.  Returns how many were freed.
    fn remove_where(&mut self, doomed: impl Fn(&R) -> bool) -> usize {
        let mut removed = 0;
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(&doomed) {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }

    /// Count every record down one day; records reaching zero are freed.
    fn end_of_day(&mut self) -> usize {
        let mut expired = 0;
        for slot in &mut self.slots {
            if let Some(record) = slot {
                let days = record.days_remaining_mut();
                *days = days.saturating_sub(1);
                if *days == 0 {
                    *slot = None;
                    expired += 1;
                }
            }
        }
        expired
    }

    fn len(&self) -> usize {
        self.iter().count()
    }
}

// ── MatingLedger ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct MatingLedger {
    table: TtlTable<MatingRecord>,
}

impl MatingLedger {
    pub fn new(capacity: usize) -> Self {
        Self { table: TtlTable::new(capacity) }
    }

    /// Record that `male` mated with `female`, remembered for `days` days.
    pub fn try_record(&mut self, male: AgentId, female: AgentId, days: u32) -> AgentResult<()> {
        if male == female {
            return Err(AgentError::SelfMating(male));
        }
        if self.has_active(male, female) {
            return Err(AgentError::DuplicateMating { male, female });
        }
        if self.table.insert(MatingRecord { male, female, days_remaining: days }) {
            Ok(())
        } else {
            Err(AgentError::LedgerFull { ledger: "mating", capacity: self.table.capacity })
        }
    }

    /// `true` while a mating between `a` and `b` (either role) is remembered.
    pub fn has_active(&self, a: AgentId, b: AgentId) -> bool {
        self.table.iter().any(|r| r.pairs(a, b))
    }

    pub fn purge_agent(&mut self, id: AgentId) -> usize {
        self.table.remove_where(|r| r.involves(id))
    }

    pub fn end_of_day(&mut self) -> usize {
        self.table.end_of_day()
    }

    pub fn records(&self) -> impl Iterator<Item = &MatingRecord> + '_ {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity
    }
}

// ── HabituationLedger ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct HabituationLedger {
    table: TtlTable<HabituationRecord>,
}

impl HabituationLedger {
    pub fn new(capacity: usize) -> Self {
        Self { table: TtlTable::new(capacity) }
    }

    /// Record that `agent` interacted with `station`, remembered for `days`
    /// days.
    pub fn try_record(&mut self, station: LureId, agent: AgentId, days: u32) -> AgentResult<()> {
        if self.table.insert(HabituationRecord { station, agent, days_remaining: days }) {
            Ok(())
        } else {
            Err(AgentError::LedgerFull { ledger: "habituation", capacity: self.table.capacity })
        }
    }

    pub fn is_habituated(&self, agent: AgentId, station: LureId) -> bool {
        self.table.iter().any(|r| r.agent == agent && r.station == station)
    }

    pub fn purge_agent(&mut self, id: AgentId) -> usize {
        self.table.remove_where(|r| r.agent == id)
    }

    pub fn end_of_day(&mut self) -> usize {
        self.table.end_of_day()
    }

    pub fn records(&self) -> impl Iterator<Item = &HabituationRecord> + '_ {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity
    }
}

// ── InteractionLedgers ────────────────────────────────────────────────────────

/// Both ledgers plus the shared overflow policy.
#[derive(Clone, Debug)]
pub struct InteractionLedgers {
    pub mating:      MatingLedger,
    pub habituation: HabituationLedger,
    overflow: LedgerOverflow,
}

impl InteractionLedgers {
    /// Size the ledgers for a population of `agent_capacity` and a lure
    /// field of `stations` stations: `2 × agent_capacity` matings and one
    /// habituation per (agent, station) pair.
    pub fn new(agent_capacity: usize, stations: usize, overflow: LedgerOverflow) -> Self {
        Self {
            mating:      MatingLedger::new(agent_capacity * 2),
            habituation: HabituationLedger::new(agent_capacity * stations),
            overflow,
        }
    }

    pub fn overflow(&self) -> LedgerOverflow {
        self.overflow
    }

    /// Record a mating.  `Ok(false)` if the ledger was full and the policy
    /// is [`LedgerOverflow::Skip`].
    pub fn record_mating(&mut self, male: AgentId, female: AgentId, days: u32) -> AgentResult<bool> {
        let result = self.mating.try_record(male, female, days);
        self.apply_policy(result)
    }

    /// Record a lure interaction.  `Ok(false)` if skipped on overflow.
    pub fn record_habituation(&mut self, station: LureId, agent: AgentId, days: u32) -> AgentResult<bool> {
        let result = self.habituation.try_record(station, agent, days);
        self.apply_policy(result)
    }

    fn apply_policy(&self, result: AgentResult<()>) -> AgentResult<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(AgentError::LedgerFull { ledger, capacity }) if self.overflow == LedgerOverflow::Skip => {
                debug!(ledger, capacity, "ledger full, interaction dropped");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    #[inline]
    pub fn has_mated(&self, a: AgentId, b: AgentId) -> bool {
        self.mating.has_active(a, b)
    }

    #[inline]
    pub fn is_habituated(&self, agent: AgentId, station: LureId) -> bool {
        self.habituation.is_habituated(agent, station)
    }

    /// Forget every interaction involving `id`.
    pub fn purge_agent(&mut self, id: AgentId) {
        self.mating.purge_agent(id);
        self.habituation.purge_agent(id);
    }

    /// Count both ledgers down one day.
    pub fn end_of_day(&mut self) {
        let matings = self.mating.end_of_day();
        let habituations = self.habituation.end_of_day();
        if matings + habituations > 0 {
            debug!(matings, habituations, "interaction records expired");
        }
    }

    /// `true` if no record names `id`.
    pub fn forgets(&self, id: AgentId) -> bool {
        !self.mating.records().any(|r| r.involves(id))
            && !self.habituation.records().any(|r| r.agent == id)
    }
}
