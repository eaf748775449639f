//! Data-quality findings collected by the registry

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::RecordKind;

/// Relationship field that points at another record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceField {
    /// Points at a relationship type
    TypeRef,
    /// Points at the source entity
    A,
    /// Points at the target entity
    Z,
}

impl ReferenceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceField::TypeRef => "type_ref",
            ReferenceField::A => "a",
            ReferenceField::Z => "z",
        }
    }

    /// Kind of record the field must resolve to
    pub fn target_kind(&self) -> RecordKind {
        match self {
            ReferenceField::TypeRef => RecordKind::RelationshipType,
            ReferenceField::A | ReferenceField::Z => RecordKind::Entity,
        }
    }
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single integrity violation found in the corpus.
///
/// Violations are recoverable: the registry keeps going after each one so a
/// run surfaces every problem at once.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A second record of the same kind reused an existing code
    #[error("duplicate {record_kind} found for code: {code}")]
    DuplicateIdentifier { record_kind: RecordKind, code: String },

    /// A relationship points at a type or entity that was never registered
    #[error(
        "relationship {relationship_code} has non-existent `{field}` {}: {missing_code}",
        .field.target_kind()
    )]
    DanglingReference {
        relationship_code: String,
        field: ReferenceField,
        missing_code: String,
    },
}

impl Violation {
    pub fn duplicate(record_kind: RecordKind, code: impl Into<String>) -> Self {
        Violation::DuplicateIdentifier {
            record_kind,
            code: code.into(),
        }
    }

    pub fn dangling(
        relationship_code: impl Into<String>,
        field: ReferenceField,
        missing_code: impl Into<String>,
    ) -> Self {
        Violation::DanglingReference {
            relationship_code: relationship_code.into(),
            field,
            missing_code: missing_code.into(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Violation::DuplicateIdentifier { .. })
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, Violation::DanglingReference { .. })
    }
}
