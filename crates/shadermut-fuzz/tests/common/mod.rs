//! Shared shader fixtures for integration tests.

#![allow(dead_code)]

use shadermut_core::{Id, ValidatorOptions};
use shadermut_fuzz::TransformationContext;
use shadermut_ir::{
    validate_module, BasicBlock, Capability, Function, Instruction, Module, StorageClass,
};

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn with_header(include_bool: bool) -> Module {
    let mut module = Module::new();
    module.add_capability(Capability::Shader);
    module.add_header_instruction(Instruction::ext_inst_import(Id(1), "GLSL.std.450"));
    module.add_header_instruction(Instruction::entry_point(Id(4), "main"));
    module.add_type_or_value(Instruction::type_void(Id(2)));
    module.add_type_or_value(Instruction::type_function(Id(3), Id(2), &[]));
    if include_bool {
        module.add_type_or_value(Instruction::type_bool(Id(6)));
    }
    module
}

fn finish(mut module: Module) -> Module {
    let mut main = Function::new(Instruction::function(Id(4), Id(2), Id(3)));
    main.add_block(BasicBlock::with_instructions(Id(5), vec![Instruction::return_void()]));
    module.add_function(main);
    module
}

/// Ids 1-6, with `%6` the boolean type
pub fn bool_shader() -> Module {
    finish(with_header(true))
}

/// Ids 1-5, no boolean type
pub fn boolless_shader() -> Module {
    finish(with_header(false))
}

/// `bool_shader` plus `%7` int32, `%8` float32, Private pointers `%9`
/// (bool), `%10` (int), `%11` (float), and a Workgroup int pointer `%12`
pub fn scalar_shader() -> Module {
    let mut module = with_header(true);
    module.add_type_or_value(Instruction::type_int(Id(7), 32, true));
    module.add_type_or_value(Instruction::type_float(Id(8), 32));
    module.add_type_or_value(Instruction::type_pointer(Id(9), StorageClass::Private, Id(6)));
    module.add_type_or_value(Instruction::type_pointer(Id(10), StorageClass::Private, Id(7)));
    module.add_type_or_value(Instruction::type_pointer(Id(11), StorageClass::Private, Id(8)));
    module.add_type_or_value(Instruction::type_pointer(Id(12), StorageClass::Workgroup, Id(7)));
    finish(module)
}

pub fn validate(module: &Module) -> shadermut_core::Result<()> {
    validate_module(module, &ValidatorOptions::default())
}

pub fn context() -> TransformationContext {
    TransformationContext::default()
}
