//! Shader fixtures for unit tests.

use crate::context::TransformationContext;
use shadermut_core::{Id, ValidatorOptions};
use shadermut_ir::{
    validate_module, BasicBlock, Capability, Function, Instruction, Module, StorageClass,
};

fn with_main(mut module: Module) -> Module {
    let mut main = Function::new(Instruction::function(Id(4), Id(2), Id(3)));
    main.add_block(BasicBlock::with_instructions(Id(5), vec![Instruction::return_void()]));
    module.add_function(main);
    module
}

fn header(module: &mut Module) {
    module.add_capability(Capability::Shader);
    module.add_header_instruction(Instruction::ext_inst_import(Id(1), "GLSL.std.450"));
    module.add_header_instruction(Instruction::entry_point(Id(4), "main"));
    module.add_header_instruction(Instruction::name(Id(4), "main"));
}

/// Ids 1-6 bound; %6 is the boolean type
pub(crate) fn shader_with_bool() -> Module {
    let mut module = Module::new();
    header(&mut module);
    module.add_type_or_value(Instruction::type_void(Id(2)));
    module.add_type_or_value(Instruction::type_bool(Id(6)));
    module.add_type_or_value(Instruction::type_function(Id(3), Id(2), &[]));
    with_main(module)
}

/// Ids 1-5 bound; no boolean type
pub(crate) fn shader_without_bool() -> Module {
    let mut module = Module::new();
    header(&mut module);
    module.add_type_or_value(Instruction::type_void(Id(2)));
    module.add_type_or_value(Instruction::type_function(Id(3), Id(2), &[]));
    with_main(module)
}

/// Scalar, pointer and constant declarations for variable tests:
///
/// - `%6` bool, `%7` float32, `%8` int32
/// - `%9`/`%10`/`%11` Private pointers to bool/float/int
/// - `%12` Workgroup, `%13` Function, `%14` Uniform pointers to int
/// - `%15` true, `%16` int 5, `%17` float 1.0
/// - `%19` Private int variable initialized to `%16`
pub(crate) fn shader_with_globals() -> Module {
    let mut module = Module::new();
    header(&mut module);
    module.add_type_or_value(Instruction::type_void(Id(2)));
    module.add_type_or_value(Instruction::type_function(Id(3), Id(2), &[]));
    module.add_type_or_value(Instruction::type_bool(Id(6)));
    module.add_type_or_value(Instruction::type_float(Id(7), 32));
    module.add_type_or_value(Instruction::type_int(Id(8), 32, true));
    module.add_type_or_value(Instruction::type_pointer(Id(9), StorageClass::Private, Id(6)));
    module.add_type_or_value(Instruction::type_pointer(Id(10), StorageClass::Private, Id(7)));
    module.add_type_or_value(Instruction::type_pointer(Id(11), StorageClass::Private, Id(8)));
    module.add_type_or_value(Instruction::type_pointer(Id(12), StorageClass::Workgroup, Id(8)));
    module.add_type_or_value(Instruction::type_pointer(Id(13), StorageClass::Function, Id(8)));
    module.add_type_or_value(Instruction::type_pointer(Id(14), StorageClass::Uniform, Id(8)));
    module.add_type_or_value(Instruction::constant_bool(Id(15), Id(6), true));
    module.add_type_or_value(Instruction::constant(Id(16), Id(8), &[5]));
    module.add_type_or_value(Instruction::constant(Id(17), Id(7), &[0x3f80_0000]));
    module.add_type_or_value(Instruction::variable(
        Id(19),
        Id(11),
        StorageClass::Private,
        Some(Id(16)),
    ));
    with_main(module)
}

pub(crate) fn new_context() -> TransformationContext {
    TransformationContext::default()
}

pub(crate) fn is_valid(module: &Module) -> bool {
    validate_module(module, &ValidatorOptions::default()).is_ok()
}

#[test]
fn fixtures_are_valid() {
    assert!(is_valid(&shader_with_bool()));
    assert!(is_valid(&shader_without_bool()));
    assert!(is_valid(&shader_with_globals()));
    assert_eq!(shader_with_bool().id_bound(), 7);
}
