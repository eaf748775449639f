//! Record types and record batches

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of record, each with its own identifier namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Entity,
    RelationshipType,
    Relationship,
}

impl RecordKind {
    /// Human readable label used in log events and messages
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Entity => "entity",
            RecordKind::RelationshipType => "relationship type",
            RecordKind::Relationship => "relationship",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A uniquely identified node of the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier, unique among entities
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Descriptive attributes that play no part in validation
    #[serde(flatten, default)]
    pub attributes: BTreeMap<String, toml::Value>,
}

impl Entity {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: None,
            description: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A classification applied to relationships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipType {
    /// Identifier, unique among relationship types
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten, default)]
    pub attributes: BTreeMap<String, toml::Value>,
}

impl RelationshipType {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: None,
            description: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Reference from a relationship to one of its endpoint entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRef {
    pub code: String,
}

impl EntityRef {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// A directed, typed edge from `a` to `z`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Identifier, unique among relationships
    pub code: String,
    /// Code of the relationship type this edge belongs to
    pub type_ref: String,
    pub a: EntityRef,
    pub z: EntityRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten, default)]
    pub attributes: BTreeMap<String, toml::Value>,
}

impl Relationship {
    pub fn new(
        code: impl Into<String>,
        type_ref: impl Into<String>,
        a: impl Into<String>,
        z: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            type_ref: type_ref.into(),
            a: EntityRef::new(a),
            z: EntityRef::new(z),
            description: None,
            attributes: BTreeMap::new(),
        }
    }
}

/// An unordered batch of records, as decoded from one or more files
///
/// In a record file each kind is an array of tables:
///
/// ```toml
/// [[entity]]
/// code = "E1"
///
/// [[relationship_type]]
/// code = "T1"
///
/// [[relationship]]
/// code = "R1"
/// type_ref = "T1"
/// a = { code = "E1" }
/// z = { code = "E1" }
/// ```
///
/// Any other top-level key is rejected, so a misspelled kind cannot silently
/// drop its records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSet {
    #[serde(rename = "entity", default)]
    pub entities: Vec<Entity>,
    #[serde(rename = "relationship_type", default)]
    pub relationship_types: Vec<RelationshipType>,
    #[serde(rename = "relationship", default)]
    pub relationships: Vec<Relationship>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every record of `other`, keeping nothing about its origin
    pub fn extend(&mut self, other: RecordSet) {
        self.entities.extend(other.entities);
        self.relationship_types.extend(other.relationship_types);
        self.relationships.extend(other.relationships);
    }

    /// Total number of records of all kinds
    pub fn len(&self) -> usize {
        self.entities.len() + self.relationship_types.len() + self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_relationship_type(mut self, relationship_type: RelationshipType) -> Self {
        self.relationship_types.push(relationship_type);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }
}
