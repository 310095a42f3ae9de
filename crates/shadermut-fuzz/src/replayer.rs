//! Applies a sequence of transformations to a module.

use crate::context::TransformationContext;
use crate::message::TransformationSequence;
use crate::transformation::{Transform, Transformation};
use shadermut_core::{Error, ReplayConfig, Result};
use shadermut_ir::{validate_module, Module};
use tracing::{debug, trace};

/// What a replay did with its input sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Transformations that were applied, in order
    pub applied: Vec<Transformation>,
    /// Number of transformations that were not applicable
    pub skipped: usize,
}

impl ReplayOutcome {
    /// The persisted form of the applied transformations.
    ///
    /// Replaying it on the same input reproduces the same module and facts.
    pub fn applied_sequence(&self) -> TransformationSequence {
        self.applied.iter().map(|t| t.to_message()).collect()
    }
}

/// Drives transformation sequences over a module
pub struct Replayer {
    config: ReplayConfig,
}

impl Replayer {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Apply each transformation that is applicable, skipping the rest.
    pub fn replay(
        &self,
        module: &mut Module,
        context: &mut TransformationContext,
        transformations: &[Transformation],
    ) -> Result<ReplayOutcome> {
        if self.config.validate_after_each {
            validate_module(module, context.validator_options())
                .map_err(|e| Error::Validation(format!("Input module is invalid: {}", e)))?;
        }

        let limit = self
            .config
            .max_transformations
            .unwrap_or(transformations.len());
        let mut outcome = ReplayOutcome::default();

        for transformation in transformations.iter().take(limit) {
            if !transformation.is_applicable(module, context) {
                trace!("Skipping inapplicable {}", transformation.name());
                outcome.skipped += 1;
                continue;
            }

            transformation.apply(module, context);

            if self.config.validate_after_each {
                validate_module(module, context.validator_options()).map_err(|e| {
                    Error::InvalidState(format!(
                        "{} produced an invalid module: {}",
                        transformation.name(),
                        e
                    ))
                })?;
            }
            outcome.applied.push(transformation.clone());
        }

        debug!(
            "Replay finished: {} applied, {} skipped, id bound {}",
            outcome.applied.len(),
            outcome.skipped,
            module.id_bound()
        );
        Ok(outcome)
    }

    /// Decode a persisted sequence and replay it.
    pub fn replay_sequence(
        &self,
        module: &mut Module,
        context: &mut TransformationContext,
        sequence: &TransformationSequence,
    ) -> Result<ReplayOutcome> {
        let transformations: Vec<Transformation> = sequence
            .transformations
            .iter()
            .cloned()
            .map(Transformation::from_message)
            .collect();
        self.replay(module, context, &transformations)
    }
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new(ReplayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact_manager::Fact;
    use crate::test_util::{is_valid, new_context, shader_with_globals, shader_without_bool};
    use crate::transformation::{
        AddConstantBoolean, AddConstantScalar, AddGlobalVariable, AddTypeBoolean, AddTypePointer,
    };
    use shadermut_core::Id;
    use shadermut_ir::{Instruction, StorageClass};

    fn bool_chain() -> Vec<Transformation> {
        vec![
            AddConstantBoolean::new(Id(10), true, false).into(),
            AddTypeBoolean::new(Id(6)).into(),
            AddConstantBoolean::new(Id(10), true, false).into(),
            AddTypePointer::new(Id(11), StorageClass::Private, Id(6)).into(),
            AddGlobalVariable::new(Id(12), Id(11), StorageClass::Private, Some(Id(10)), true)
                .into(),
            // %10 is no longer fresh
            AddConstantBoolean::new(Id(10), false, false).into(),
        ]
    }

    #[test]
    fn test_skips_inapplicable() {
        let mut module = shader_without_bool();
        let mut context = new_context();

        let outcome = Replayer::default()
            .replay(&mut module, &mut context, &bool_chain())
            .unwrap();

        assert_eq!(outcome.applied.len(), 4);
        assert_eq!(outcome.skipped, 2);
        assert_eq!(module.id_bound(), 13);
        assert!(context
            .fact_manager()
            .query(Id(12))
            .contains(&Fact::PointeeValueIsIrrelevant(Id(12))));
        assert!(is_valid(&module));
    }

    #[test]
    fn test_applied_sequence_replays_identically() {
        let mut first = shader_without_bool();
        let mut first_context = new_context();
        let replayer = Replayer::new(ReplayConfig {
            validate_after_each: true,
            max_transformations: None,
        });
        let outcome = replayer
            .replay(&mut first, &mut first_context, &bool_chain())
            .unwrap();

        let mut second = shader_without_bool();
        let mut second_context = new_context();
        let again = replayer
            .replay_sequence(&mut second, &mut second_context, &outcome.applied_sequence())
            .unwrap();

        assert_eq!(again.skipped, 0);
        assert_eq!(again.applied, outcome.applied);
        assert_eq!(first, second);
        assert_eq!(first_context.fact_manager(), second_context.fact_manager());
    }

    #[test]
    fn test_max_transformations() {
        let mut module = shader_without_bool();
        let mut context = new_context();
        let replayer = Replayer::new(ReplayConfig {
            max_transformations: Some(3),
            ..Default::default()
        });

        let outcome = replayer
            .replay(&mut module, &mut context, &bool_chain())
            .unwrap();
        assert_eq!(outcome.applied.len() + outcome.skipped, 3);
        assert_eq!(outcome.applied.len(), 2);
        assert!(module.get_def(Id(11)).is_none());
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let mut module = shader_with_globals();
        // Rebinds %16
        module.add_type_or_value(Instruction::constant(Id(16), Id(8), &[7]));
        let mut context = new_context();
        let replayer = Replayer::new(ReplayConfig {
            validate_after_each: true,
            ..Default::default()
        });

        let t: Transformation = AddConstantScalar::new(Id(100), Id(8), vec![1], false).into();
        let result = replayer.replay(&mut module, &mut context, &[t]);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(module.get_def(Id(100)).is_none());
    }

    #[test]
    fn test_empty_sequence() {
        let mut module = shader_with_globals();
        let before = module.clone();
        let outcome = Replayer::default()
            .replay_sequence(&mut module, &mut new_context(), &TransformationSequence::new())
            .unwrap();
        assert!(outcome.applied.is_empty());
        assert!(outcome.applied_sequence().is_empty());
        assert_eq!(module, before);
    }
}
