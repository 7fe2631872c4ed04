pub mod descriptor;
pub mod tables;

use crate::resource::kind::ResourceKind;

pub use descriptor::{AttributeDescriptor, NAME, ResourceSchema, UID, ValueType};

/// Descriptor tables for every supported resource kind, built once at
/// connector construction and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Schema {
    person: ResourceSchema,
    category: ResourceSchema,
}

impl Schema {
    pub fn new() -> Self {
        Self {
            person: tables::schema_for(ResourceKind::Person),
            category: tables::schema_for(ResourceKind::Category),
        }
    }

    /// Tables supplied by the caller instead of the built-in ones.
    pub fn with_tables(person: ResourceSchema, category: ResourceSchema) -> Self {
        Self { person, category }
    }

    pub fn for_kind(&self, kind: ResourceKind) -> &ResourceSchema {
        match kind {
            ResourceKind::Person => &self.person,
            ResourceKind::Category => &self.category,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}
