//! Definition/use index over a module.

use crate::module::Module;
use shadermut_core::Id;
use std::collections::HashMap;

/// Position of an instruction inside a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionLocation {
    Header(usize),
    TypeOrValue(usize),
    FunctionDef(usize),
    Parameter { function: usize, index: usize },
    Label { function: usize, block: usize },
    Body { function: usize, block: usize, index: usize },
}

#[derive(Debug, Clone, Default)]
pub struct DefUseManager {
    defs: HashMap<Id, InstructionLocation>,
    uses: HashMap<Id, Vec<InstructionLocation>>,
}

impl DefUseManager {
    pub fn build(module: &Module) -> Self {
        tracing::trace!("Building def-use analysis");
        let mut manager = Self::default();
        for (location, inst) in module.instructions() {
            if let Some(id) = inst.result_id {
                // A rebinding is a validation error; keep the first definition.
                manager.defs.entry(id).or_insert(location);
            }
            for used in inst.used_ids() {
                manager.uses.entry(used).or_default().push(location);
            }
        }
        manager
    }

    pub fn def_location(&self, id: Id) -> Option<InstructionLocation> {
        self.defs.get(&id).copied()
    }

    pub fn is_defined(&self, id: Id) -> bool {
        self.defs.contains_key(&id)
    }

    pub fn uses(&self, id: Id) -> &[InstructionLocation] {
        self.uses.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_uses(&self, id: Id) -> usize {
        self.uses(id).len()
    }

    pub fn num_defs(&self) -> usize {
        self.defs.len()
    }
}
