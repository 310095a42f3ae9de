//! Canonical type registry.
//!
//! Every type declaration is mapped onto one canonical id per distinct
//! structural shape, so two ids name the same type exactly when their
//! canonical ids are equal. Composite shapes are keyed on the canonical ids
//! of their components, which relies on components being declared first.

use crate::instruction::{Capability, Instruction, Opcode, StorageClass};
use crate::module::Module;
use shadermut_core::Id;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerType {
    pub pointee: Id,
    pub storage_class: StorageClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Bool,
    Int { width: u32, signed: bool },
    Float { width: u32 },
    Vector { component: Id, count: u32 },
    Pointer(PointerType),
    Function { return_type: Id, params: Vec<Id> },
}

impl Type {
    /// Decode a type declaration; malformed declarations yield `None`
    pub fn from_instruction(inst: &Instruction) -> Option<Type> {
        let ty = match inst.opcode {
            Opcode::TypeVoid => Type::Void,
            Opcode::TypeBool => Type::Bool,
            Opcode::TypeInt => Type::Int {
                width: inst.literal_operand(0)?,
                signed: inst.literal_operand(1)? != 0,
            },
            Opcode::TypeFloat => Type::Float {
                width: inst.literal_operand(0)?,
            },
            Opcode::TypeVector => Type::Vector {
                component: inst.id_operand(0)?,
                count: inst.literal_operand(1)?,
            },
            Opcode::TypePointer => Type::Pointer(PointerType {
                storage_class: inst.storage_class()?,
                pointee: inst.id_operand(1)?,
            }),
            Opcode::TypeFunction => Type::Function {
                return_type: inst.id_operand(0)?,
                params: inst
                    .operands
                    .get(1..)?
                    .iter()
                    .map(|operand| operand.as_id())
                    .collect::<Option<Vec<_>>>()?,
            },
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_pointer(&self) -> Option<&PointerType> {
        match self {
            Type::Pointer(pointer) => Some(pointer),
            _ => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    /// Bit width of an int or float type
    pub fn scalar_width(&self) -> Option<u32> {
        match self {
            Type::Int { width, .. } | Type::Float { width } => Some(*width),
            _ => None,
        }
    }

    /// Returns false for int or float types of a width no consumer accepts
    pub fn has_supported_width(&self) -> bool {
        match self {
            Type::Int { width, .. } => matches!(width, 8 | 16 | 32 | 64),
            Type::Float { width } => matches!(width, 16 | 32 | 64),
            _ => true,
        }
    }

    /// Capability a module must declare to use this type
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Type::Int { width: 8, .. } => Some(Capability::Int8),
            Type::Int { width: 16, .. } => Some(Capability::Int16),
            Type::Int { width: 64, .. } => Some(Capability::Int64),
            Type::Float { width: 16 } => Some(Capability::Float16),
            Type::Float { width: 64 } => Some(Capability::Float64),
            _ => None,
        }
    }

    fn map_ids(&self, f: impl Fn(Id) -> Id) -> Type {
        match self {
            Type::Vector { component, count } => Type::Vector {
                component: f(*component),
                count: *count,
            },
            Type::Pointer(pointer) => Type::Pointer(PointerType {
                pointee: f(pointer.pointee),
                storage_class: pointer.storage_class,
            }),
            Type::Function {
                return_type,
                params,
            } => Type::Function {
                return_type: f(*return_type),
                params: params.iter().map(|param| f(*param)).collect(),
            },
            other => other.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeManager {
    types: HashMap<Id, Type>,
    canonical: HashMap<Id, Id>,
    by_shape: HashMap<Type, Id>,
}

impl TypeManager {
    pub fn build(module: &Module) -> Self {
        tracing::trace!("Building type analysis");
        let mut manager = Self::default();
        for inst in module.types_values() {
            if !inst.opcode.is_type_declaration() {
                continue;
            }
            let Some(id) = inst.result_id else { continue };
            if manager.types.contains_key(&id) {
                continue;
            }
            let Some(ty) = Type::from_instruction(inst) else { continue };
            let shape = manager.canonicalize(&ty);
            let canonical = *manager.by_shape.entry(shape).or_insert(id);
            manager.canonical.insert(id, canonical);
            manager.types.insert(id, ty);
        }
        manager
    }

    fn canonicalize(&self, ty: &Type) -> Type {
        ty.map_ids(|id| self.canonical.get(&id).copied().unwrap_or(id))
    }

    pub fn get_type(&self, id: Id) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn canonical_id(&self, id: Id) -> Option<Id> {
        self.canonical.get(&id).copied()
    }

    /// Returns true if both ids are registered types of the same shape
    pub fn is_same_type(&self, a: Id, b: Id) -> bool {
        match (self.canonical_id(a), self.canonical_id(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Look up the canonical id declaring a type of the given shape
    pub fn get_id(&self, ty: &Type) -> Option<Id> {
        self.by_shape.get(&self.canonicalize(ty)).copied()
    }

    pub fn bool_type(&self) -> Option<Id> {
        self.get_id(&Type::Bool)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_with_duplicate_types() -> Module {
        let mut module = Module::new();
        module.add_type_or_value(Instruction::type_bool(Id(1)));
        module.add_type_or_value(Instruction::type_int(Id(2), 32, true));
        module.add_type_or_value(Instruction::type_int(Id(3), 32, true));
        module.add_type_or_value(Instruction::type_pointer(Id(4), StorageClass::Private, Id(2)));
        module.add_type_or_value(Instruction::type_pointer(Id(5), StorageClass::Private, Id(3)));
        module.add_type_or_value(Instruction::type_pointer(Id(6), StorageClass::Workgroup, Id(2)));
        module
    }

    #[test]
    fn test_lookup_and_narrowing() {
        let module = module_with_duplicate_types();
        let types = module.type_mgr();

        assert_eq!(types.len(), 6);
        assert_eq!(types.bool_type(), Some(Id(1)));
        assert!(types.get_type(Id(1)).unwrap().as_pointer().is_none());

        let pointer = types.get_type(Id(6)).unwrap().as_pointer().unwrap();
        assert_eq!(pointer.storage_class, StorageClass::Workgroup);
        assert_eq!(pointer.pointee, Id(2));

        assert!(types.get_type(Id(42)).is_none());
    }

    #[test]
    fn test_duplicate_shapes_share_canonical_id() {
        let module = module_with_duplicate_types();
        let types = module.type_mgr();

        assert!(types.is_same_type(Id(2), Id(3)));
        // Pointers to structurally equal pointees are equal too.
        assert!(types.is_same_type(Id(4), Id(5)));
        assert!(!types.is_same_type(Id(4), Id(6)));
        assert!(!types.is_same_type(Id(2), Id(99)));

        let lookup = types.get_id(&Type::Pointer(PointerType {
            pointee: Id(3),
            storage_class: StorageClass::Private,
        }));
        assert_eq!(lookup, Some(Id(4)));
    }

    #[test]
    fn test_width_capabilities() {
        let int8 = Type::Int { width: 8, signed: false };
        assert!(int8.has_supported_width());
        assert_eq!(int8.required_capability(), Some(Capability::Int8));

        let float32 = Type::Float { width: 32 };
        assert!(float32.has_supported_width());
        assert_eq!(float32.required_capability(), None);

        assert!(!Type::Int { width: 24, signed: true }.has_supported_width());
        assert!(!Type::Float { width: 8 }.has_supported_width());
        assert!(Type::Bool.has_supported_width());
    }

    #[test]
    fn test_malformed_declaration_is_skipped() {
        let mut module = Module::new();
        module.add_type_or_value(Instruction::new(Opcode::TypeInt).with_result_id(Id(1)));
        assert!(module.type_mgr().get_type(Id(1)).is_none());
        assert!(module.type_mgr().is_empty());
    }
}
