//! Side-channel knowledge about ids, accumulated across a session.
//!
//! Facts are append-only: once recorded they hold for the rest of the
//! session. A fact about an id only means something once that id is bound,
//! so transformations record facts after inserting the instruction they
//! describe.

use serde::{Deserialize, Serialize};
use shadermut_core::Id;
use shadermut_ir::Module;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fact {
    /// The value of this id may be changed freely by later transformations
    IdIsIrrelevant(Id),
    /// The value stored behind this pointer id may be changed freely
    PointeeValueIsIrrelevant(Id),
}

impl Fact {
    pub fn subject(&self) -> Id {
        match self {
            Fact::IdIsIrrelevant(id) | Fact::PointeeValueIsIrrelevant(id) => *id,
        }
    }
}

static NO_FACTS: BTreeSet<Fact> = BTreeSet::new();

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactManager {
    facts: BTreeMap<Id, BTreeSet<Fact>>,
}

impl FactManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fact established by a transformation.
    ///
    /// Recording a fact twice has no further effect.
    pub fn record(&mut self, fact: Fact) {
        self.facts.entry(fact.subject()).or_default().insert(fact);
    }

    /// Record a fact supplied from outside the engine, if it is meaningful
    /// for `module`: its subject must be bound, and a pointee fact must name
    /// a pointer.
    pub fn maybe_add_fact(&mut self, fact: Fact, module: &Module) -> bool {
        let Some(def) = module.get_def(fact.subject()) else {
            return false;
        };
        if let Fact::PointeeValueIsIrrelevant(_) = fact {
            let is_pointer = def
                .result_type
                .and_then(|ty| module.type_mgr().get_type(ty))
                .map_or(false, |ty| ty.as_pointer().is_some());
            if !is_pointer {
                return false;
            }
        }
        self.record(fact);
        true
    }

    /// Seed the store with externally supplied facts; returns how many were kept
    pub fn add_initial_facts(&mut self, facts: &[Fact], module: &Module) -> usize {
        let mut added = 0;
        for fact in facts {
            if self.maybe_add_fact(*fact, module) {
                added += 1;
            } else {
                warn!("Ignoring initial fact {:?}: not meaningful for this module", fact);
            }
        }
        added
    }

    /// All facts recorded about `id`
    pub fn query(&self, id: Id) -> &BTreeSet<Fact> {
        self.facts.get(&id).unwrap_or(&NO_FACTS)
    }

    pub fn id_is_irrelevant(&self, id: Id) -> bool {
        self.query(id).contains(&Fact::IdIsIrrelevant(id))
    }

    pub fn pointee_value_is_irrelevant(&self, id: Id) -> bool {
        self.query(id).contains(&Fact::PointeeValueIsIrrelevant(id))
    }

    /// Ids whose own value is irrelevant
    pub fn irrelevant_ids(&self) -> BTreeSet<Id> {
        self.facts()
            .filter_map(|fact| match fact {
                Fact::IdIsIrrelevant(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Every recorded fact, ordered by subject id
    pub fn facts(&self) -> impl Iterator<Item = &Fact> + '_ {
        self.facts.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.facts.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
