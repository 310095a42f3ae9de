//! Structural validation for shader modules.

use crate::instruction::{Instruction, Opcode, StorageClass};
use crate::module::{Function, Module};
use crate::type_manager::Type;
use shadermut_core::{Error, Id, Result, ValidatorOptions};
use std::collections::HashSet;

/// Validate that a module is well-formed
pub fn validate_module(module: &Module, options: &ValidatorOptions) -> Result<()> {
    check_id_bindings(module, options)?;

    // Types and values may only reference what is declared before them.
    let mut declared: HashSet<Id> = module
        .header()
        .iter()
        .filter_map(|inst| inst.result_id)
        .collect();
    for inst in module.types_values() {
        for used in inst.used_ids() {
            if !declared.contains(&used) {
                return Err(Error::Validation(format!(
                    "{:?} {} references {} before its declaration",
                    inst.opcode,
                    describe(inst),
                    used
                )));
            }
        }
        validate_type_or_value(module, inst, options)?;
        if let Some(id) = inst.result_id {
            declared.insert(id);
        }
    }

    for (idx, func) in module.functions().iter().enumerate() {
        validate_function(func, idx)?;
    }

    Ok(())
}

fn describe(inst: &Instruction) -> String {
    inst.result_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(no result)".to_string())
}

fn check_id_bindings(module: &Module, options: &ValidatorOptions) -> Result<()> {
    if module.id_bound() > options.max_id_bound {
        return Err(Error::Validation(format!(
            "Id bound {} exceeds the limit {}",
            module.id_bound(),
            options.max_id_bound
        )));
    }

    let mut bound = HashSet::new();
    for (_, inst) in module.instructions() {
        let Some(id) = inst.result_id else { continue };
        if id.is_null() {
            return Err(Error::Validation(format!("{:?} binds the null id", inst.opcode)));
        }
        if id.0 >= module.id_bound() {
            return Err(Error::Validation(format!(
                "{} is not below the id bound {}",
                id,
                module.id_bound()
            )));
        }
        if !bound.insert(id) {
            return Err(Error::Validation(format!("{} is bound more than once", id)));
        }
    }

    for (_, inst) in module.instructions() {
        if let Some(missing) = inst.used_ids().find(|id| !bound.contains(id)) {
            return Err(Error::Validation(format!(
                "{:?} {} references unbound id {}",
                inst.opcode,
                describe(inst),
                missing
            )));
        }
    }

    Ok(())
}

fn validate_type_or_value(
    module: &Module,
    inst: &Instruction,
    options: &ValidatorOptions,
) -> Result<()> {
    let types = module.type_mgr();
    match inst.opcode {
        Opcode::TypeInt | Opcode::TypeFloat => {
            let ty = Type::from_instruction(inst).ok_or_else(|| {
                Error::Validation(format!("Malformed {:?} {}", inst.opcode, describe(inst)))
            })?;
            if !ty.has_supported_width() {
                return Err(Error::Validation(format!(
                    "Unsupported width for {:?} {}",
                    inst.opcode,
                    describe(inst)
                )));
            }
            if let Some(capability) = ty.required_capability() {
                if options.check_capabilities && !module.has_capability(capability) {
                    return Err(Error::Validation(format!(
                        "{:?} {} requires capability {:?}",
                        inst.opcode,
                        describe(inst),
                        capability
                    )));
                }
            }
        }
        Opcode::TypePointer => {
            let pointee = inst.id_operand(1).ok_or_else(|| {
                Error::Validation(format!("Malformed pointer type {}", describe(inst)))
            })?;
            if types.get_type(pointee).is_none() {
                return Err(Error::Validation(format!(
                    "Pointer type {} points to non-type {}",
                    describe(inst),
                    pointee
                )));
            }
        }
        Opcode::ConstantTrue | Opcode::ConstantFalse => {
            let is_bool = inst
                .result_type
                .and_then(|ty| types.get_type(ty))
                .map_or(false, Type::is_bool);
            if !is_bool {
                return Err(Error::Validation(format!(
                    "Boolean constant {} does not have a boolean type",
                    describe(inst)
                )));
            }
        }
        Opcode::Constant => {
            let width = inst
                .result_type
                .and_then(|ty| types.get_type(ty))
                .and_then(Type::scalar_width)
                .ok_or_else(|| {
                    Error::Validation(format!(
                        "Scalar constant {} does not have a numeric type",
                        describe(inst)
                    ))
                })?;
            let expected = ((width + 31) / 32) as usize;
            if inst.operands.len() != expected {
                return Err(Error::Validation(format!(
                    "Scalar constant {} has {} words, expected {}",
                    describe(inst),
                    inst.operands.len(),
                    expected
                )));
            }
        }
        Opcode::Variable => validate_global_variable(module, inst)?,
        _ => {}
    }
    Ok(())
}

fn validate_global_variable(module: &Module, inst: &Instruction) -> Result<()> {
    let pointer = inst
        .result_type
        .and_then(|ty| module.type_mgr().get_type(ty))
        .and_then(Type::as_pointer)
        .ok_or_else(|| {
            Error::Validation(format!(
                "Variable {} does not have a pointer type",
                describe(inst)
            ))
        })?;

    let storage_class = inst.storage_class().ok_or_else(|| {
        Error::Validation(format!("Variable {} has no storage class", describe(inst)))
    })?;
    if storage_class == StorageClass::Function {
        return Err(Error::Validation(format!(
            "Global variable {} uses the Function storage class",
            describe(inst)
        )));
    }
    if storage_class != pointer.storage_class {
        return Err(Error::Validation(format!(
            "Variable {} storage class {:?} differs from its pointer type's {:?}",
            describe(inst),
            storage_class,
            pointer.storage_class
        )));
    }

    if let Some(initializer) = inst.id_operand(1) {
        if storage_class == StorageClass::Workgroup {
            return Err(Error::Validation(format!(
                "Workgroup variable {} has an initializer",
                describe(inst)
            )));
        }
        let constant = module.constant_mgr().get_constant(initializer).ok_or_else(|| {
            Error::Validation(format!(
                "Initializer {} of variable {} is not a constant",
                initializer,
                describe(inst)
            ))
        })?;
        if !module
            .type_mgr()
            .is_same_type(constant.type_id, pointer.pointee)
        {
            return Err(Error::Validation(format!(
                "Initializer {} of variable {} does not match the pointee type",
                initializer,
                describe(inst)
            )));
        }
    }
    Ok(())
}

fn validate_function(func: &Function, idx: usize) -> Result<()> {
    // Check that function has at least one block
    if func.blocks.is_empty() {
        return Err(Error::Validation(format!(
            "Function {} has no basic blocks",
            idx
        )));
    }

    // Every block must end in a terminator, and only there
    for (block_idx, block) in func.blocks.iter().enumerate() {
        if block.terminator().is_none() {
            return Err(Error::Validation(format!(
                "Function {} block {} does not end in a terminator",
                idx, block_idx
            )));
        }
        let body = &block.instructions[..block.len() - 1];
        if body.iter().any(|inst| inst.opcode.is_terminator()) {
            return Err(Error::Validation(format!(
                "Function {} block {} has a terminator before its end",
                idx, block_idx
            )));
        }
    }

    Ok(())
}
