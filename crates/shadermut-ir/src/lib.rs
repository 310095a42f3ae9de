//! In-memory intermediate representation for shader modules.
//!
//! This crate holds the module that transformations edit:
//! - Instructions, types, constants and functions addressed by `Id`
//! - Lazily built type, constant and def-use analyses with explicit invalidation
//! - A structural validator used to judge mutated modules

pub mod analysis;
pub mod constant_manager;
pub mod def_use;
pub mod instruction;
pub mod module;
pub mod type_manager;
pub mod validation;

pub use analysis::AnalysisSet;
pub use constant_manager::{Constant, ConstantManager, ConstantValue};
pub use def_use::{DefUseManager, InstructionLocation};
pub use instruction::{Capability, Instruction, Opcode, Operand, StorageClass};
pub use module::{BasicBlock, Function, Module};
pub use type_manager::{PointerType, Type, TypeManager};
pub use validation::validate_module;
