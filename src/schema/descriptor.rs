use std::collections::HashMap;

use serde::Serialize;

/// Reserved logical name of the unique identifier.
pub const UID: &str = "__UID__";
/// Reserved logical name of the primary (display) name.
pub const NAME: &str = "__NAME__";

/// Declared type of a logical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Boolean,
    Integer,
    Long,
}

/// Metadata for one logical attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDescriptor {
    /// Caller-facing attribute name, unique within a table.
    pub logical_name: &'static str,
    /// Wire field name in the remote JSON.
    pub native_name: &'static str,
    pub value_type: ValueType,
    pub required: bool,
    pub creatable: bool,
    pub updatable: bool,
    pub readable: bool,
    pub multivalued: bool,
}

impl AttributeDescriptor {
    pub const fn new(
        logical_name: &'static str,
        native_name: &'static str,
        value_type: ValueType,
    ) -> Self {
        Self {
            logical_name,
            native_name,
            value_type,
            required: false,
            creatable: true,
            updatable: true,
            readable: true,
            multivalued: false,
        }
    }

    /// String attribute whose logical and native names match.
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, name, ValueType::String)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, name, ValueType::Boolean)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, name, ValueType::Integer)
    }

    pub const fn long(name: &'static str) -> Self {
        Self::new(name, name, ValueType::Long)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn not_creatable(mut self) -> Self {
        self.creatable = false;
        self
    }

    pub const fn not_updatable(mut self) -> Self {
        self.updatable = false;
        self
    }

    pub const fn not_readable(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Server-maintained attribute: readable, never written.
    pub const fn read_only(self) -> Self {
        self.not_creatable().not_updatable()
    }

    pub const fn multivalued(mut self) -> Self {
        self.multivalued = true;
        self
    }

    /// Whether the attribute may be written by the given operation.
    pub fn is_writable(&self, is_create: bool) -> bool {
        if is_create { self.creatable } else { self.updatable }
    }
}

/// Immutable, ordered attribute table for one resource type.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    identifier_native: &'static str,
    primary_name: &'static str,
    descriptors: Vec<AttributeDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl ResourceSchema {
    /// Build a table. A repeated logical name keeps its first descriptor.
    pub fn new(
        identifier_native: &'static str,
        primary_name: &'static str,
        descriptors: Vec<AttributeDescriptor>,
    ) -> Self {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            if index.contains_key(descriptor.logical_name) {
                log::warn!(
                    "duplicate logical attribute '{}' ignored",
                    descriptor.logical_name
                );
                continue;
            }
            index.insert(descriptor.logical_name, position);
        }

        Self {
            identifier_native,
            primary_name,
            descriptors,
            index,
        }
    }

    /// Native field carrying the record identifier.
    pub fn identifier_native(&self) -> &'static str {
        self.identifier_native
    }

    /// Logical name of the attribute that supplies the display name.
    pub fn primary_name(&self) -> &'static str {
        self.primary_name
    }

    /// Descriptor of the primary-name attribute, if the table declares it.
    pub fn primary_name_descriptor(&self) -> Option<&AttributeDescriptor> {
        self.descriptor(self.primary_name)
    }

    /// Look up a logical name. Unknown names yield `None`, never an error.
    pub fn descriptor(&self, logical_name: &str) -> Option<&AttributeDescriptor> {
        self.index
            .get(logical_name)
            .map(|&position| &self.descriptors[position])
    }

    /// Descriptors in declaration order, duplicates excluded.
    pub fn descriptors(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(|(position, d)| self.index.get(d.logical_name) == Some(position))
            .map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn is_readable(&self, logical_name: &str) -> bool {
        self.descriptor(logical_name).is_some_and(|d| d.readable)
    }

    pub fn is_creatable(&self, logical_name: &str) -> bool {
        self.descriptor(logical_name).is_some_and(|d| d.creatable)
    }

    pub fn is_updatable(&self, logical_name: &str) -> bool {
        self.descriptor(logical_name).is_some_and(|d| d.updatable)
    }

    pub fn is_multivalued(&self, logical_name: &str) -> bool {
        self.descriptor(logical_name).is_some_and(|d| d.multivalued)
    }

    pub fn value_type(&self, logical_name: &str) -> Option<ValueType> {
        self.descriptor(logical_name).map(|d| d.value_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResourceSchema {
        ResourceSchema::new(
            "id",
            NAME,
            vec![
                AttributeDescriptor::new(NAME, "login", ValueType::String).required(),
                AttributeDescriptor::string("login"),
                AttributeDescriptor::boolean("active").not_creatable(),
                AttributeDescriptor::string("secret").not_readable(),
                AttributeDescriptor::string("tags").multivalued(),
                AttributeDescriptor::integer("login"),
            ],
        )
    }

    #[test]
    fn lookups_follow_flags() {
        let schema = table();
        assert_eq!(schema.identifier_native(), "id");
        assert_eq!(schema.primary_name_descriptor().map(|d| d.native_name), Some("login"));
        assert!(schema.is_readable("active"));
        assert!(!schema.is_creatable("active"));
        assert!(schema.is_updatable("active"));
        assert!(!schema.is_readable("secret"));
        assert!(schema.is_multivalued("tags"));
        assert_eq!(schema.value_type("active"), Some(ValueType::Boolean));
    }

    #[test]
    fn unknown_names_are_not_errors() {
        let schema = table();
        assert!(schema.descriptor("nickname").is_none());
        assert!(!schema.is_readable("nickname"));
        assert_eq!(schema.value_type("nickname"), None);
    }

    #[test]
    fn duplicate_logical_names_keep_the_first() {
        let schema = table();
        assert_eq!(schema.len(), 5);
        assert_eq!(schema.value_type("login"), Some(ValueType::String));
        assert_eq!(schema.descriptors().count(), 5);
    }
}
