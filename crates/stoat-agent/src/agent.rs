//! Per-individual state.

use stoat_core::{AgentId, Point, SimRng};

// ── Sex ───────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Fair coin flip.
    pub fn random(rng: &mut SimRng) -> Sex {
        if rng.random::<f64>() < 0.5 { Sex::Male } else { Sex::Female }
    }

    #[inline]
    pub fn opposite(self) -> Sex {
        match self {
            Sex::Female => Sex::Male,
            Sex::Male => Sex::Female,
        }
    }
}

// ── Maturity ──────────────────────────────────────────────────────────────────

/// Whether an individual is still bound to its mother's nest.
///
/// Dependents stay where they were born, die with their mother, and are
/// promoted to `Independent` on the yearly dispersal day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Maturity {
    #[default]
    Independent,
    Dependent { parent: AgentId },
}

// ── Behavior ──────────────────────────────────────────────────────────────────

/// Movement mode chosen for the current hour.  Recorded for traces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Behavior {
    /// Biased walk back towards the home anchor.
    #[default]
    HomeRange,
    /// Mate/lure search with directional persistence.
    Searching,
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One stoat.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:       AgentId,
    pub sex:      Sex,
    pub maturity: Maturity,
    /// Day the current pregnancy began.  May be negative for seeded females.
    pub pregnant_since: Option<i32>,
    pub pos:  Point,
    /// Home-range anchor.
    pub home: Point,
    /// Bearing of the last accepted step (radians).
    pub prev_bearing: f64,
    pub behavior: Behavior,
}

impl Agent {
    /// A fresh independent adult at `pos`, anchored there.
    pub fn new(id: AgentId, sex: Sex, pos: Point) -> Self {
        Self {
            id,
            sex,
            maturity: Maturity::Independent,
            pregnant_since: None,
            pos,
            home: pos,
            prev_bearing: 0.0,
            behavior: Behavior::HomeRange,
        }
    }

    #[inline]
    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }

    #[inline]
    pub fn is_female(&self) -> bool {
        self.sex == Sex::Female
    }

    #[inline]
    pub fn is_independent(&self) -> bool {
        self.maturity == Maturity::Independent
    }

    #[inline]
    pub fn is_pregnant(&self) -> bool {
        self.pregnant_since.is_some()
    }

    /// Mother's id while dependent.
    #[inline]
    pub fn parent(&self) -> Option<AgentId> {
        match self.maturity {
            Maturity::Independent => None,
            Maturity::Dependent { parent } => Some(parent),
        }
    }

    /// `true` if this individual is a dependent of `mother`.
    #[inline]
    pub fn is_dependent_of(&self, mother: AgentId) -> bool {
        self.parent() == Some(mother)
    }
}
