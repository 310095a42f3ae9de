//! Module structure for the shader IR.

use crate::analysis::AnalysisSet;
use crate::constant_manager::ConstantManager;
use crate::def_use::{DefUseManager, InstructionLocation};
use crate::instruction::{Capability, Instruction};
use crate::type_manager::TypeManager;
use shadermut_core::Id;
use std::cell::OnceCell;

/// A basic block is a label followed by instructions with no internal control flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    pub label: Instruction,
    pub instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(label_id: Id) -> Self {
        Self {
            label: Instruction::label(label_id),
            instructions: Vec::new(),
        }
    }

    pub fn with_instructions(label_id: Id, instructions: Vec<Instruction>) -> Self {
        Self {
            label: Instruction::label(label_id),
            instructions,
        }
    }

    pub fn add_instruction(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    pub fn label_id(&self) -> Option<Id> {
        self.label.result_id
    }

    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions
            .last()
            .filter(|inst| inst.opcode.is_terminator())
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }
}

/// A function: its `OpFunction` definition, parameters and basic blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub def: Instruction,
    pub params: Vec<Instruction>,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn new(def: Instruction) -> Self {
        Self {
            def,
            params: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn result_id(&self) -> Option<Id> {
        self.def.result_id
    }

    pub fn add_param(&mut self, param: Instruction) {
        self.params.push(param);
    }

    pub fn add_block(&mut self, block: BasicBlock) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Count total instructions in the function, labels excluded
    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).sum()
    }

    fn located(
        &self,
        function: usize,
    ) -> impl Iterator<Item = (InstructionLocation, &Instruction)> + '_ {
        let def = std::iter::once((InstructionLocation::FunctionDef(function), &self.def));
        let params = self
            .params
            .iter()
            .enumerate()
            .map(move |(index, inst)| (InstructionLocation::Parameter { function, index }, inst));
        let blocks = self.blocks.iter().enumerate().flat_map(move |(block, bb)| {
            std::iter::once((InstructionLocation::Label { function, block }, &bb.label)).chain(
                bb.instructions.iter().enumerate().map(move |(index, inst)| {
                    (InstructionLocation::Body { function, block, index }, inst)
                }),
            )
        });
        def.chain(params).chain(blocks)
    }
}

/// Lazily rebuilt derived analyses; an empty cell is a stale analysis
#[derive(Debug, Clone, Default)]
struct Analyses {
    def_use: OnceCell<DefUseManager>,
    types: OnceCell<TypeManager>,
    constants: OnceCell<ConstantManager>,
}

/// A complete shader module.
///
/// Insertion primitives only record instructions and bump the id bound;
/// callers that mutate a module whose analyses are in use must invalidate
/// them with [`Module::invalidate_analyses_except_for`].
#[derive(Debug, Clone)]
pub struct Module {
    capabilities: Vec<Capability>,
    header: Vec<Instruction>,
    types_values: Vec<Instruction>,
    functions: Vec<Function>,
    id_bound: u32,
    analyses: Analyses,
}

impl Module {
    pub fn new() -> Self {
        Self {
            capabilities: Vec::new(),
            header: Vec::new(),
            types_values: Vec::new(),
            functions: Vec::new(),
            id_bound: 1,
            analyses: Analyses::default(),
        }
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn add_capability(&mut self, capability: Capability) {
        if !self.has_capability(capability) {
            self.capabilities.push(capability);
        }
    }

    /// Ext-inst imports, memory model, entry points, execution modes and debug names
    pub fn header(&self) -> &[Instruction] {
        &self.header
    }

    /// Types, constants and global variables, in declaration order
    pub fn types_values(&self) -> &[Instruction] {
        &self.types_values
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn get_function(&self, index: usize) -> Option<&Function> {
        self.functions.get(index)
    }

    pub fn add_header_instruction(&mut self, inst: Instruction) {
        if let Some(id) = inst.result_id {
            self.update_id_bound(id);
        }
        self.header.push(inst);
    }

    /// Append to the types/values section
    pub fn add_type_or_value(&mut self, inst: Instruction) {
        if let Some(id) = inst.result_id {
            self.update_id_bound(id);
        }
        self.types_values.push(inst);
    }

    pub fn add_function(&mut self, function: Function) -> usize {
        let ids: Vec<Id> = function
            .located(0)
            .filter_map(|(_, inst)| inst.result_id)
            .collect();
        for id in ids {
            self.update_id_bound(id);
        }
        self.functions.push(function);
        self.functions.len() - 1
    }

    /// One past the largest id ever used
    pub fn id_bound(&self) -> u32 {
        self.id_bound
    }

    /// Raise the id bound so that `id` lies below it
    pub fn update_id_bound(&mut self, id: Id) {
        self.id_bound = self.id_bound.max(id.0.saturating_add(1));
    }

    /// Every instruction with its location, in module order
    pub fn instructions(&self) -> impl Iterator<Item = (InstructionLocation, &Instruction)> + '_ {
        let header = self
            .header
            .iter()
            .enumerate()
            .map(|(i, inst)| (InstructionLocation::Header(i), inst));
        let types_values = self
            .types_values
            .iter()
            .enumerate()
            .map(|(i, inst)| (InstructionLocation::TypeOrValue(i), inst));
        let functions = self
            .functions
            .iter()
            .enumerate()
            .flat_map(|(f, function)| function.located(f));
        header.chain(types_values).chain(functions)
    }

    pub fn instruction(&self, location: InstructionLocation) -> Option<&Instruction> {
        match location {
            InstructionLocation::Header(i) => self.header.get(i),
            InstructionLocation::TypeOrValue(i) => self.types_values.get(i),
            InstructionLocation::FunctionDef(f) => self.functions.get(f).map(|func| &func.def),
            InstructionLocation::Parameter { function, index } => {
                self.functions.get(function)?.params.get(index)
            }
            InstructionLocation::Label { function, block } => self
                .functions
                .get(function)?
                .blocks
                .get(block)
                .map(|bb| &bb.label),
            InstructionLocation::Body {
                function,
                block,
                index,
            } => self
                .functions
                .get(function)?
                .blocks
                .get(block)?
                .instructions
                .get(index),
        }
    }

    /// The instruction binding `id`, if any
    pub fn get_def(&self, id: Id) -> Option<&Instruction> {
        self.def_use_mgr()
            .def_location(id)
            .and_then(|location| self.instruction(location))
    }

    pub fn def_use_mgr(&self) -> &DefUseManager {
        self.analyses
            .def_use
            .get_or_init(|| DefUseManager::build(self))
    }

    pub fn type_mgr(&self) -> &TypeManager {
        self.analyses.types.get_or_init(|| TypeManager::build(self))
    }

    pub fn constant_mgr(&self) -> &ConstantManager {
        self.analyses
            .constants
            .get_or_init(|| ConstantManager::build(self))
    }

    /// Returns true if every analysis in `analyses` is currently built
    pub fn is_analysis_valid(&self, analyses: AnalysisSet) -> bool {
        (!analyses.contains(AnalysisSet::DEF_USE) || self.analyses.def_use.get().is_some())
            && (!analyses.contains(AnalysisSet::TYPES) || self.analyses.types.get().is_some())
            && (!analyses.contains(AnalysisSet::CONSTANTS)
                || self.analyses.constants.get().is_some())
    }

    /// Mark every analysis outside `preserved` stale
    pub fn invalidate_analyses_except_for(&mut self, preserved: AnalysisSet) {
        if !preserved.contains(AnalysisSet::DEF_USE) {
            self.analyses.def_use.take();
        }
        if !preserved.contains(AnalysisSet::TYPES) {
            self.analyses.types.take();
        }
        if !preserved.contains(AnalysisSet::CONSTANTS) {
            self.analyses.constants.take();
        }
    }

    /// Count total instructions in the module, function labels included
    pub fn total_instructions(&self) -> usize {
        self.instructions().count()
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.capabilities == other.capabilities
            && self.header == other.header
            && self.types_values == other.types_values
            && self.functions == other.functions
            && self.id_bound == other.id_bound
    }
}

impl Eq for Module {}
