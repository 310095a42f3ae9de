//! Registry of module-level constants.

use crate::instruction::{Opcode, Operand};
use crate::module::Module;
use shadermut_core::Id;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantValue {
    Bool(bool),
    Scalar(Vec<u32>),
    Composite(Vec<Id>),
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub id: Id,
    pub type_id: Id,
    pub value: ConstantValue,
}

#[derive(Debug, Clone, Default)]
pub struct ConstantManager {
    constants: HashMap<Id, Constant>,
}

impl ConstantManager {
    pub fn build(module: &Module) -> Self {
        tracing::trace!("Building constant analysis");
        let mut manager = Self::default();
        for inst in module.types_values() {
            let (Some(id), Some(type_id)) = (inst.result_id, inst.result_type) else {
                continue;
            };
            let value = match inst.opcode {
                Opcode::ConstantTrue => ConstantValue::Bool(true),
                Opcode::ConstantFalse => ConstantValue::Bool(false),
                Opcode::ConstantNull => ConstantValue::Null,
                Opcode::Constant => ConstantValue::Scalar(
                    inst.operands.iter().filter_map(Operand::as_literal).collect(),
                ),
                Opcode::ConstantComposite => ConstantValue::Composite(
                    inst.operands.iter().filter_map(Operand::as_id).collect(),
                ),
                _ => continue,
            };
            manager
                .constants
                .entry(id)
                .or_insert(Constant { id, type_id, value });
        }
        manager
    }

    pub fn get_constant(&self, id: Id) -> Option<&Constant> {
        self.constants.get(&id)
    }

    /// Resolve every id to a constant; empty unless all of them resolve
    pub fn get_constants_from_ids(&self, ids: &[Id]) -> Vec<&Constant> {
        ids.iter()
            .map(|id| self.constants.get(id))
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, StorageClass};

    #[test]
    fn test_constants_are_registered() {
        let mut module = Module::new();
        module.add_type_or_value(Instruction::type_bool(Id(1)));
        module.add_type_or_value(Instruction::type_int(Id(2), 32, true));
        module.add_type_or_value(Instruction::constant_bool(Id(3), Id(1), true));
        module.add_type_or_value(Instruction::constant(Id(4), Id(2), &[17]));
        module.add_type_or_value(Instruction::type_pointer(Id(5), StorageClass::Private, Id(2)));
        module.add_type_or_value(Instruction::variable(Id(6), Id(5), StorageClass::Private, Some(Id(4))));

        let constants = module.constant_mgr();
        assert_eq!(constants.len(), 2);
        assert_eq!(constants.get_constant(Id(3)).unwrap().value, ConstantValue::Bool(true));

        let scalar = constants.get_constant(Id(4)).unwrap();
        assert_eq!(scalar.type_id, Id(2));
        assert_eq!(scalar.value, ConstantValue::Scalar(vec![17]));

        // Variables and types are not constants.
        assert!(constants.get_constant(Id(6)).is_none());
        assert!(constants.get_constant(Id(1)).is_none());
    }

    #[test]
    fn test_get_constants_from_ids_requires_all() {
        let mut module = Module::new();
        module.add_type_or_value(Instruction::type_bool(Id(1)));
        module.add_type_or_value(Instruction::constant_bool(Id(2), Id(1), false));

        let constants = module.constant_mgr();
        assert_eq!(constants.get_constants_from_ids(&[Id(2)]).len(), 1);
        assert!(constants.get_constants_from_ids(&[Id(2), Id(7)]).is_empty());
        assert!(constants.get_constants_from_ids(&[Id(1)]).is_empty());
    }
}
