//! Persisted form of transformations.
//!
//! These records are the replayable log of a fuzzing session. Fields carry
//! raw values (storage classes as `u32`) so that a log produced by anything,
//! including a fuzzer mutating the log itself, can be decoded and then
//! rejected by the applicability check rather than by the decoder.

use serde::{Deserialize, Serialize};
use shadermut_core::{Error, Id, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTypeBooleanMessage {
    pub fresh_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTypeIntMessage {
    pub fresh_id: Id,
    pub width: u32,
    pub is_signed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTypeFloatMessage {
    pub fresh_id: Id,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTypePointerMessage {
    pub fresh_id: Id,
    pub storage_class: u32,
    pub base_type_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddConstantBooleanMessage {
    pub fresh_id: Id,
    pub is_true: bool,
    pub is_irrelevant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddConstantScalarMessage {
    pub fresh_id: Id,
    pub type_id: Id,
    pub words: Vec<u32>,
    pub is_irrelevant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddGlobalVariableMessage {
    pub fresh_id: Id,
    pub type_id: Id,
    pub storage_class: u32,
    pub initializer_id: Option<Id>,
    pub value_is_irrelevant: bool,
}

/// One persisted transformation, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationMessage {
    AddTypeBoolean(AddTypeBooleanMessage),
    AddTypeInt(AddTypeIntMessage),
    AddTypeFloat(AddTypeFloatMessage),
    AddTypePointer(AddTypePointerMessage),
    AddConstantBoolean(AddConstantBooleanMessage),
    AddConstantScalar(AddConstantScalarMessage),
    AddGlobalVariable(AddGlobalVariableMessage),
}

/// An ordered, replayable list of transformations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationSequence {
    pub transformations: Vec<TransformationMessage>,
}

impl TransformationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: TransformationMessage) {
        self.transformations.push(message);
    }

    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the sequence to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a sequence from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl FromIterator<TransformationMessage> for TransformationSequence {
    fn from_iter<I: IntoIterator<Item = TransformationMessage>>(iter: I) -> Self {
        Self {
            transformations: iter.into_iter().collect(),
        }
    }
}
