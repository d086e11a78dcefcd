//! `AgentPopulation`: a fixed-capacity slot arena of stoats.
//!
//! # Slots vs ids
//!
//! Each live stoat occupies one [`Slot`] of the arena.  A death frees the
//! slot and a later birth may take it over, so the scheduler iterates slots
//! while everything that must survive a death (ledgers, maternal links)
//! refers to the never-reused [`AgentId`].  An `FxHashMap` keeps the
//! `AgentId → Slot` lookup O(1).
//!
//! New individuals always take the lowest free slot; only when none is free
//! does the arena grow, up to `capacity`.

use rustc_hash::FxHashMap;
use tracing::debug;

use stoat_core::{AgentId, Point, SimRng, Slot};
use stoat_spatial::SpatialDomain;

use crate::{Agent, AgentError, AgentResult, InteractionLedgers, Maturity, Sex};

/// Hard ceiling on simultaneously live stoats in the reference
/// parameterisation.
pub const DEFAULT_AGENT_CAPACITY: usize = 1000;

pub struct AgentPopulation {
    slots:    Vec<Option<Agent>>,
    capacity: usize,
    next_id:  u32,
    index:    FxHashMap<AgentId, Slot>,
}

impl AgentPopulation {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            next_id: 0,
            index: FxHashMap::default(),
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Place `n` independent adults at random on-land points.
    ///
    /// The first is female and the second male so a mating pair always
    /// exists; the rest are fair coin flips.  Every female starts pregnant,
    /// backdated by `gestation_days` so she can give birth on the first
    /// birth day.
    pub fn seed_initial(
        &mut self,
        n: u32,
        gestation_days: u32,
        domain: &SpatialDomain,
        rng: &mut SimRng,
    ) -> AgentResult<()> {
        for i in 0..n {
            let pos = domain.random_on_land_point(rng)?;
            let coin = Sex::random(rng);
            let sex = match i {
                0 => Sex::Female,
                1 => Sex::Male,
                _ => coin,
            };
            let id = self.next_agent_id();
            let mut agent = Agent::new(id, sex, pos);
            if sex == Sex::Female {
                agent.pregnant_since = Some(-(gestation_days as i32));
            }
            self.insert(agent)?;
        }
        debug!(seeded = n, "initial population placed");
        Ok(())
    }

    /// Add an independent adult at `pos`.  Returns its slot.
    pub fn spawn(&mut self, sex: Sex, pos: Point) -> AgentResult<Slot> {
        let id = self.next_agent_id();
        self.insert(Agent::new(id, sex, pos))
    }

    /// The mother in `mother` gives birth to a Poisson(`mean_litter`)
    /// litter at her position.  Clears her pregnancy.  Returns the kits'
    /// slots.
    pub fn apply_birth(&mut self, mother: Slot, mean_litter: f64, rng: &mut SimRng) -> AgentResult<Vec<Slot>> {
        let (mother_id, at) = {
            let m = self.get(mother).ok_or(AgentError::EmptySlot(mother))?;
            (m.id, m.pos)
        };
        let litter = rng.poisson(mean_litter)?;

        let mut kits = Vec::with_capacity(litter as usize);
        for _ in 0..litter {
            let sex = Sex::random(rng);
            let id = self.next_agent_id();
            let mut kit = Agent::new(id, sex, at);
            kit.maturity = Maturity::Dependent { parent: mother_id };
            kits.push(self.insert(kit)?);
        }

        if let Some(m) = self.get_mut(mother) {
            m.pregnant_since = None;
        }
        debug!(mother = %mother_id, kits = kits.len(), "birth");
        Ok(kits)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if any live dependent has `mother` as parent.
    pub fn has_dependent_offspring(&self, mother: AgentId) -> bool {
        self.iter_live().any(|(_, a)| a.is_dependent_of(mother))
    }

    /// Slots of `mother`'s live dependent daughters, in slot order.
    pub fn dependent_daughters(&self, mother: AgentId) -> Vec<Slot> {
        self.iter_live()
            .filter(|(_, a)| a.is_female() && a.is_dependent_of(mother))
            .map(|(s, _)| s)
            .collect()
    }

    #[inline]
    pub fn get(&self, slot: Slot) -> Option<&Agent> {
        self.slots.get(slot.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut Agent> {
        self.slots.get_mut(slot.index()).and_then(Option::as_mut)
    }

    #[inline]
    pub fn slot_of(&self, id: AgentId) -> Option<Slot> {
        self.index.get(&id).copied()
    }

    /// Live agents with their slots, in ascending slot order.
    pub fn iter_live(&self) -> impl Iterator<Item = (Slot, &Agent)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|a| (Slot(i as u32), a)))
    }

    /// Slots currently allocated in the arena (live or free).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Every allocated slot, `None` where free.
    pub fn slots(&self) -> &[Option<Agent>] {
        &self.slots
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn live_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_extinct(&self) -> bool {
        self.index.is_empty()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Kill the agent in `slot` together with its own dependents, and purge
    /// all of them from both ledgers.  Only direct dependents die; their
    /// dependents (if any) outlive them.  Returns the dead ids, the victim
    /// first.
    pub fn kill_and_cascade(&mut self, slot: Slot, ledgers: &mut InteractionLedgers) -> Vec<AgentId> {
        let Some(victim) = self.remove(slot) else {
            return Vec::new();
        };
        let orphans: Vec<Slot> = self
            .iter_live()
            .filter(|(_, a)| a.is_dependent_of(victim.id))
            .map(|(s, _)| s)
            .collect();
        let mut dead = Vec::with_capacity(1 + orphans.len());
        dead.push(victim.id);
        dead.extend(orphans.into_iter().filter_map(|s| self.remove(s)).map(|a| a.id));
        for &id in &dead {
            ledgers.purge_agent(id);
        }
        dead
    }

    /// Yearly dispersal: every live dependent and every live male moves to
    /// a fresh on-land point, re-anchors its home there and draws a new
    /// heading.  Afterwards every dependent is independent.
    ///
    /// Returns how many agents were relocated.
    pub fn disperse(&mut self, domain: &SpatialDomain, rng: &mut SimRng) -> AgentResult<usize> {
        let mut moved = 0;
        for agent in self.slots.iter_mut().flatten() {
            if !agent.is_independent() || agent.is_male() {
                let p = domain.random_on_land_point(rng)?;
                agent.pos = p;
                agent.home = p;
                agent.prev_bearing = rng.uniform_bearing();
                moved += 1;
            }
            agent.maturity = Maturity::Independent;
        }
        debug!(moved, "dispersal");
        Ok(moved)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn next_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Lowest free slot, else append.
    fn insert(&mut self, agent: Agent) -> AgentResult<Slot> {
        let slot = match self.slots.iter().position(Option::is_none) {
            Some(free) => free,
            None if self.slots.len() < self.capacity => {
                self.slots.push(None);
                self.slots.len() - 1
            }
            None => return Err(AgentError::CapacityExceeded { capacity: self.capacity }),
        };
        let slot = Slot(slot as u32);
        self.index.insert(agent.id, slot);
        self.slots[slot.index()] = Some(agent);
        Ok(slot)
    }

    fn remove(&mut self, slot: Slot) -> Option<Agent> {
        let agent = self.slots.get_mut(slot.index())?.take()?;
        self.index.remove(&agent.id);
        Some(agent)
    }
}
