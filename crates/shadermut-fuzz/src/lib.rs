//! Semantics-preserving transformations over shader modules.
//!
//! A fuzzing session owns one [`Module`](shadermut_ir::Module) and one
//! [`TransformationContext`]. Each [`Transformation`] checks its
//! preconditions against both and, when they hold, edits the module and may
//! record [facts](fact_manager::Fact) about the ids it introduced. The
//! applied transformations form a [`TransformationSequence`] that the
//! [`Replayer`] can reproduce exactly.

pub mod context;
pub mod fact_manager;
pub mod message;
pub mod replayer;
pub mod transformation;
pub mod util;

#[cfg(test)]
mod test_util;

pub use context::TransformationContext;
pub use fact_manager::{Fact, FactManager};
pub use message::{TransformationMessage, TransformationSequence};
pub use replayer::{ReplayOutcome, Replayer};
pub use transformation::{
    AddConstantBoolean, AddConstantScalar, AddGlobalVariable, AddTypeBoolean, AddTypeFloat,
    AddTypeInt, AddTypePointer, Transform, Transformation,
};
