//! Record Registry
//!
//! Append-only index of entities, relationship types and relationships.
//! Identifier uniqueness is enforced as records are added; referential
//! integrity is checked once ingestion is complete.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::record::{Entity, RecordKind, RecordSet, Relationship, RelationshipType};
use crate::violation::{ReferenceField, Violation};

/// The main record registry
#[derive(Debug, Default)]
pub struct Registry {
    entities: HashMap<String, Entity>,
    relationship_types: HashMap<String, RelationshipType>,
    relationships: HashMap<String, Relationship>,
}

/// Counts of registered records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub entities: usize,
    pub relationship_types: usize,
    pub relationships: usize,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every record of a batch.
    ///
    /// Entities are added first, then relationship types, then relationships.
    /// A record whose code is already taken in its table is rejected and the
    /// existing entry is kept. Every record is processed; the error carries one
    /// [`Violation::DuplicateIdentifier`] per collision.
    pub fn add(&mut self, records: RecordSet) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        for entity in records.entities {
            if let Err(violation) = self.add_entity(entity) {
                violations.push(violation);
            }
        }
        for relationship_type in records.relationship_types {
            if let Err(violation) = self.add_relationship_type(relationship_type) {
                violations.push(violation);
            }
        }
        for relationship in records.relationships {
            if let Err(violation) = self.add_relationship(relationship) {
                violations.push(violation);
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Register a single entity
    pub fn add_entity(&mut self, entity: Entity) -> Result<(), Violation> {
        if let Some(existing) = self.entities.get(&entity.code) {
            error!(
                code = %entity.code,
                ?entity,
                existing_entity = ?existing,
                "Duplicate entity found"
            );
            return Err(Violation::duplicate(RecordKind::Entity, entity.code));
        }

        self.entities.insert(entity.code.clone(), entity);
        Ok(())
    }

    /// Register a single relationship type
    pub fn add_relationship_type(
        &mut self,
        relationship_type: RelationshipType,
    ) -> Result<(), Violation> {
        if let Some(existing) = self.relationship_types.get(&relationship_type.code) {
            error!(
                code = %relationship_type.code,
                ?relationship_type,
                existing_relationship_type = ?existing,
                "Duplicate relationship type found"
            );
            return Err(Violation::duplicate(
                RecordKind::RelationshipType,
                relationship_type.code,
            ));
        }

        self.relationship_types
            .insert(relationship_type.code.clone(), relationship_type);
        Ok(())
    }

    /// Register a single relationship.
    ///
    /// Only uniqueness is checked here; references are resolved by
    /// [`Registry::validate`].
    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<(), Violation> {
        if let Some(existing) = self.relationships.get(&relationship.code) {
            error!(
                code = %relationship.code,
                ?relationship,
                existing_relationship = ?existing,
                "Duplicate relationship found"
            );
            return Err(Violation::duplicate(RecordKind::Relationship, relationship.code));
        }

        self.relationships.insert(relationship.code.clone(), relationship);
        Ok(())
    }

    /// Check that every registered relationship resolves its type and both
    /// endpoints.
    ///
    /// Each relationship is checked against all three references; a single
    /// relationship can yield up to three [`Violation::DanglingReference`]s.
    /// The order of the returned violations is unspecified.
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        for relationship in self.relationships.values() {
            if !self.relationship_types.contains_key(&relationship.type_ref) {
                error!(
                    relationship = %relationship.code,
                    type_code = %relationship.type_ref,
                    "Non-existent relationship type code"
                );
                violations.push(Violation::dangling(
                    &relationship.code,
                    ReferenceField::TypeRef,
                    &relationship.type_ref,
                ));
            }

            if !self.entities.contains_key(&relationship.a.code) {
                error!(
                    relationship = %relationship.code,
                    a_entity = %relationship.a.code,
                    "Non-existent `a` entity code"
                );
                violations.push(Violation::dangling(
                    &relationship.code,
                    ReferenceField::A,
                    &relationship.a.code,
                ));
            }

            if !self.entities.contains_key(&relationship.z.code) {
                error!(
                    relationship = %relationship.code,
                    z_entity = %relationship.z.code,
                    "Non-existent `z` entity code"
                );
                violations.push(Violation::dangling(
                    &relationship.code,
                    ReferenceField::Z,
                    &relationship.z.code,
                ));
            }
        }

        debug!(
            relationships = self.relationships.len(),
            violations = violations.len(),
            "Checked relationship references"
        );

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Get an entity by code
    pub fn entity(&self, code: &str) -> Option<&Entity> {
        self.entities.get(code)
    }

    /// Get a relationship type by code
    pub fn relationship_type(&self, code: &str) -> Option<&RelationshipType> {
        self.relationship_types.get(code)
    }

    /// Get a relationship by code
    pub fn relationship(&self, code: &str) -> Option<&Relationship> {
        self.relationships.get(code)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn relationship_types(&self) -> impl Iterator<Item = &RelationshipType> {
        self.relationship_types.values()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relationship_type_count(&self) -> usize {
        self.relationship_types.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Snapshot of the table sizes
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            entities: self.entity_count(),
            relationship_types: self.relationship_type_count(),
            relationships: self.relationship_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_set(violations: Vec<Violation>) -> HashSet<Violation> {
        violations.into_iter().collect()
    }

    fn well_formed() -> RecordSet {
        RecordSet::new()
            .with_entity(Entity::new("E1"))
            .with_entity(Entity::new("E2"))
            .with_relationship_type(RelationshipType::new("T1"))
            .with_relationship(Relationship::new("R1", "T1", "E1", "E2"))
    }

    #[test]
    fn test_create_registry() {
        let registry = Registry::new();
        assert_eq!(registry.stats(), RegistryStats::default());
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_well_formed_batch() {
        let mut registry = Registry::new();

        registry.add(well_formed()).unwrap();
        registry.validate().unwrap();

        assert_eq!(
            registry.stats(),
            RegistryStats {
                entities: 2,
                relationship_types: 1,
                relationships: 1,
            }
        );
        assert!(registry.relationship("R1").is_some());
    }

    #[test]
    fn test_duplicate_entity_keeps_first() {
        let mut registry = Registry::new();
        let records = RecordSet::new()
            .with_entity(Entity::new("E1").with_name("first"))
            .with_entity(Entity::new("E1").with_name("second"));

        let violations = registry.add(records).unwrap_err();

        assert_eq!(violations, vec![Violation::duplicate(RecordKind::Entity, "E1")]);
        assert_eq!(registry.entity_count(), 1);
        assert_eq!(registry.entity("E1").unwrap().name.as_deref(), Some("first"));
    }

    #[test]
    fn test_duplicate_relationship_type_keeps_first() {
        let mut registry = Registry::new();
        let records = RecordSet::new()
            .with_relationship_type(RelationshipType::new("T1").with_name("first"))
            .with_relationship_type(RelationshipType::new("T1").with_name("second"));

        let violations = registry.add(records).unwrap_err();

        assert_eq!(
            violations,
            vec![Violation::duplicate(RecordKind::RelationshipType, "T1")]
        );
        let kept = registry.relationship_type("T1").unwrap();
        assert_eq!(kept.name.as_deref(), Some("first"));
        assert!(registry.relationship_type("T2").is_none());
    }

    #[test]
    fn test_duplicates_are_collected() {
        let mut registry = Registry::new();
        let mut records = RecordSet::new();
        for code in ["E1", "E2", "E3"] {
            records = records
                .with_entity(Entity::new(code))
                .with_entity(Entity::new(code));
        }

        let violations = registry.add(records).unwrap_err();

        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(Violation::is_duplicate));
        assert_eq!(registry.entity_count(), 3);
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut registry = Registry::new();
        let records = RecordSet::new()
            .with_entity(Entity::new("X"))
            .with_relationship_type(RelationshipType::new("X"))
            .with_relationship(Relationship::new("X", "X", "X", "X"));

        registry.add(records).unwrap();
        registry.validate().unwrap();
        assert_eq!(registry.stats().entities, 1);
        assert_eq!(registry.stats().relationship_types, 1);
        assert_eq!(registry.stats().relationships, 1);
    }

    #[test]
    fn test_duplicates_across_kinds_in_one_batch() {
        let mut registry = Registry::new();
        let records = RecordSet::new()
            .with_entity(Entity::new("E1"))
            .with_entity(Entity::new("E1"))
            .with_relationship_type(RelationshipType::new("T1"))
            .with_relationship_type(RelationshipType::new("T1"))
            .with_relationship(Relationship::new("R1", "T1", "E1", "E1"))
            .with_relationship(Relationship::new("R1", "T1", "E1", "E1"));

        let violations = as_set(registry.add(records).unwrap_err());

        let expected: HashSet<_> = [
            Violation::duplicate(RecordKind::Entity, "E1"),
            Violation::duplicate(RecordKind::RelationshipType, "T1"),
            Violation::duplicate(RecordKind::Relationship, "R1"),
        ]
        .into_iter()
        .collect();
        assert_eq!(violations, expected);
    }

    #[test]
    fn test_cross_batch_duplicate() {
        let mut registry = Registry::new();
        registry.add(well_formed()).unwrap();

        let violations = registry.add(well_formed()).unwrap_err();

        assert_eq!(violations.len(), 4);
        assert_eq!(registry.stats().entities, 2);
    }

    #[test]
    fn test_missing_relationship_type() {
        let mut registry = Registry::new();
        let records = RecordSet::new()
            .with_entity(Entity::new("E1"))
            .with_entity(Entity::new("E2"))
            .with_relationship(Relationship::new("R1", "T_missing", "E1", "E2"));
        registry.add(records).unwrap();

        let violations = registry.validate().unwrap_err();

        assert_eq!(
            violations,
            vec![Violation::dangling("R1", ReferenceField::TypeRef, "T_missing")]
        );
    }

    #[test]
    fn test_missing_endpoints_are_reported_separately() {
        let mut registry = Registry::new();
        let records = RecordSet::new()
            .with_relationship_type(RelationshipType::new("T1"))
            .with_relationship(Relationship::new("R1", "T1", "E_missing", "E_missing2"));
        registry.add(records).unwrap();

        let violations = as_set(registry.validate().unwrap_err());

        let expected: HashSet<_> = [
            Violation::dangling("R1", ReferenceField::A, "E_missing"),
            Violation::dangling("R1", ReferenceField::Z, "E_missing2"),
        ]
        .into_iter()
        .collect();
        assert_eq!(violations, expected);
    }

    #[test]
    fn test_all_three_references_dangling() {
        let mut registry = Registry::new();
        registry
            .add(RecordSet::new().with_relationship(Relationship::new("R1", "T9", "E8", "E9")))
            .unwrap();

        let violations = registry.validate().unwrap_err();

        assert_eq!(violations.len(), 3);
        let fields: HashSet<_> = violations
            .iter()
            .filter_map(|v| match v {
                Violation::DanglingReference { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(
            fields,
            [ReferenceField::TypeRef, ReferenceField::A, ReferenceField::Z]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn test_references_resolve_across_batches() {
        let mut registry = Registry::new();
        registry
            .add(RecordSet::new().with_relationship(Relationship::new("R1", "T1", "E1", "E2")))
            .unwrap();
        assert!(registry.validate().is_err());

        registry
            .add(
                RecordSet::new()
                    .with_entity(Entity::new("E1"))
                    .with_entity(Entity::new("E2"))
                    .with_relationship_type(RelationshipType::new("T1")),
            )
            .unwrap();
        registry.validate().unwrap();
    }
}
