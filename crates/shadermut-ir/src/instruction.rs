//! Instruction set for the shader IR.

use serde::{Deserialize, Serialize};
use shadermut_core::Id;

/// Memory region of a variable or pointer type.
///
/// Discriminants match the SPIR-V encoding so raw values in persisted
/// transformations decode the same way a binary module does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum StorageClass {
    UniformConstant = 0,
    Input = 1,
    Uniform = 2,
    Output = 3,
    Workgroup = 4,
    CrossWorkgroup = 5,
    Private = 6,
    Function = 7,
    Generic = 8,
    PushConstant = 9,
    AtomicCounter = 10,
    Image = 11,
    StorageBuffer = 12,
}

impl StorageClass {
    /// Decode a raw storage class; unknown values yield `None`
    pub fn from_u32(value: u32) -> Option<Self> {
        let class = match value {
            0 => StorageClass::UniformConstant,
            1 => StorageClass::Input,
            2 => StorageClass::Uniform,
            3 => StorageClass::Output,
            4 => StorageClass::Workgroup,
            5 => StorageClass::CrossWorkgroup,
            6 => StorageClass::Private,
            7 => StorageClass::Function,
            8 => StorageClass::Generic,
            9 => StorageClass::PushConstant,
            10 => StorageClass::AtomicCounter,
            11 => StorageClass::Image,
            12 => StorageClass::StorageBuffer,
            _ => return None,
        };
        Some(class)
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Module capabilities gating optional type widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Shader,
    Float16,
    Float64,
    Int8,
    Int16,
    Int64,
}

/// IR Opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // Module header
    ExtInstImport,
    MemoryModel,
    EntryPoint,
    ExecutionMode,
    Source,
    Name,

    // Types
    TypeVoid,
    TypeBool,
    TypeInt,
    TypeFloat,
    TypeVector,
    TypePointer,
    TypeFunction,

    // Constants
    ConstantTrue,
    ConstantFalse,
    Constant,
    ConstantComposite,
    ConstantNull,
    Undef,

    // Memory
    Variable,
    Load,
    Store,

    // Functions
    Function,
    FunctionParameter,
    FunctionCall,
    Label,

    // Control flow
    Branch,
    BranchConditional,
    Return,
    ReturnValue,
    Kill,
    Unreachable,
}

impl Opcode {
    /// Returns true if this opcode declares a type
    pub fn is_type_declaration(&self) -> bool {
        matches!(
            self,
            Opcode::TypeVoid
                | Opcode::TypeBool
                | Opcode::TypeInt
                | Opcode::TypeFloat
                | Opcode::TypeVector
                | Opcode::TypePointer
                | Opcode::TypeFunction
        )
    }

    /// Returns true if this opcode declares a constant
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Opcode::ConstantTrue
                | Opcode::ConstantFalse
                | Opcode::Constant
                | Opcode::ConstantComposite
                | Opcode::ConstantNull
        )
    }

    /// Returns true if this opcode ends a basic block
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Opcode::Branch
                | Opcode::BranchConditional
                | Opcode::Return
                | Opcode::ReturnValue
                | Opcode::Kill
                | Opcode::Unreachable
        )
    }
}

/// A single instruction in the IR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub result_type: Option<Id>,
    pub result_id: Option<Id>,
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Id(Id),
    Literal(u32),
    StorageClass(StorageClass),
    String(String),
}

impl Operand {
    pub fn as_id(&self) -> Option<Id> {
        match self {
            Operand::Id(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<u32> {
        match self {
            Operand::Literal(value) => Some(*value),
            _ => None,
        }
    }
}

impl Instruction {
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            result_type: None,
            result_id: None,
            operands: Vec::new(),
        }
    }

    pub fn with_result_type(mut self, id: Id) -> Self {
        self.result_type = Some(id);
        self
    }

    pub fn with_result_id(mut self, id: Id) -> Self {
        self.result_id = Some(id);
        self
    }

    pub fn with_operand(mut self, operand: Operand) -> Self {
        self.operands.push(operand);
        self
    }

    pub fn with_operands(mut self, operands: Vec<Operand>) -> Self {
        self.operands = operands;
        self
    }

    /// Every id this instruction references, the result type included
    pub fn used_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.result_type
            .into_iter()
            .chain(self.operands.iter().filter_map(Operand::as_id))
    }

    /// The first storage class operand, if any
    pub fn storage_class(&self) -> Option<StorageClass> {
        self.operands.iter().find_map(|operand| match operand {
            Operand::StorageClass(class) => Some(*class),
            _ => None,
        })
    }

    pub fn id_operand(&self, index: usize) -> Option<Id> {
        self.operands.get(index).and_then(Operand::as_id)
    }

    pub fn literal_operand(&self, index: usize) -> Option<u32> {
        self.operands.get(index).and_then(Operand::as_literal)
    }

    pub fn ext_inst_import(result_id: Id, name: &str) -> Self {
        Self::new(Opcode::ExtInstImport)
            .with_result_id(result_id)
            .with_operand(Operand::String(name.to_string()))
    }

    pub fn entry_point(function: Id, name: &str) -> Self {
        Self::new(Opcode::EntryPoint)
            .with_operand(Operand::Id(function))
            .with_operand(Operand::String(name.to_string()))
    }

    pub fn name(target: Id, name: &str) -> Self {
        Self::new(Opcode::Name)
            .with_operand(Operand::Id(target))
            .with_operand(Operand::String(name.to_string()))
    }

    pub fn type_void(result_id: Id) -> Self {
        Self::new(Opcode::TypeVoid).with_result_id(result_id)
    }

    pub fn type_bool(result_id: Id) -> Self {
        Self::new(Opcode::TypeBool).with_result_id(result_id)
    }

    pub fn type_int(result_id: Id, width: u32, signed: bool) -> Self {
        Self::new(Opcode::TypeInt)
            .with_result_id(result_id)
            .with_operand(Operand::Literal(width))
            .with_operand(Operand::Literal(signed as u32))
    }

    pub fn type_float(result_id: Id, width: u32) -> Self {
        Self::new(Opcode::TypeFloat)
            .with_result_id(result_id)
            .with_operand(Operand::Literal(width))
    }

    pub fn type_vector(result_id: Id, component: Id, count: u32) -> Self {
        Self::new(Opcode::TypeVector)
            .with_result_id(result_id)
            .with_operand(Operand::Id(component))
            .with_operand(Operand::Literal(count))
    }

    pub fn type_pointer(result_id: Id, storage_class: StorageClass, pointee: Id) -> Self {
        Self::new(Opcode::TypePointer)
            .with_result_id(result_id)
            .with_operand(Operand::StorageClass(storage_class))
            .with_operand(Operand::Id(pointee))
    }

    pub fn type_function(result_id: Id, return_type: Id, params: &[Id]) -> Self {
        let mut inst = Self::new(Opcode::TypeFunction)
            .with_result_id(result_id)
            .with_operand(Operand::Id(return_type));
        inst.operands
            .extend(params.iter().map(|param| Operand::Id(*param)));
        inst
    }

    /// Create an `OpConstantTrue` or `OpConstantFalse`
    pub fn constant_bool(result_id: Id, bool_type: Id, value: bool) -> Self {
        let opcode = if value {
            Opcode::ConstantTrue
        } else {
            Opcode::ConstantFalse
        };
        Self::new(opcode)
            .with_result_type(bool_type)
            .with_result_id(result_id)
    }

    /// Create a scalar `OpConstant` from its literal words
    pub fn constant(result_id: Id, type_id: Id, words: &[u32]) -> Self {
        Self::new(Opcode::Constant)
            .with_result_type(type_id)
            .with_result_id(result_id)
            .with_operands(words.iter().map(|word| Operand::Literal(*word)).collect())
    }

    /// Create a global or function-local variable
    pub fn variable(
        result_id: Id,
        pointer_type: Id,
        storage_class: StorageClass,
        initializer: Option<Id>,
    ) -> Self {
        let mut inst = Self::new(Opcode::Variable)
            .with_result_type(pointer_type)
            .with_result_id(result_id)
            .with_operand(Operand::StorageClass(storage_class));
        if let Some(init) = initializer {
            inst.operands.push(Operand::Id(init));
        }
        inst
    }

    pub fn function(result_id: Id, return_type: Id, function_type: Id) -> Self {
        Self::new(Opcode::Function)
            .with_result_type(return_type)
            .with_result_id(result_id)
            .with_operand(Operand::Literal(0))
            .with_operand(Operand::Id(function_type))
    }

    pub fn label(result_id: Id) -> Self {
        Self::new(Opcode::Label).with_result_id(result_id)
    }

    pub fn return_void() -> Self {
        Self::new(Opcode::Return)
    }

    pub fn return_value(value: Id) -> Self {
        Self::new(Opcode::ReturnValue).with_operand(Operand::Id(value))
    }
}
