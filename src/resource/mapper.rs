use std::collections::BTreeMap;

use serde_json::Value as Json;

use crate::error::Result;
use crate::resource::codec::{to_logical_values, to_wire_value};
use crate::resource::value::{Attribute, LogicalObject, Uid, Value, WireRecord};
use crate::schema::descriptor::{ResourceSchema, UID};

/// Converts between framework attributes and wire records for one resource
/// kind, driven by that kind's descriptor table.
#[derive(Debug, Clone, Copy)]
pub struct ResourceMapper<'a> {
    schema: &'a ResourceSchema,
}

impl<'a> ResourceMapper<'a> {
    pub fn new(schema: &'a ResourceSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a ResourceSchema {
        self.schema
    }

    /// Build the JSON body for a create (`is_create`) or update request.
    ///
    /// The identifier is never written. Unknown names are dropped with a
    /// warning. An attribute without values is sent as `null` on update
    /// and omitted on create. When two logical names share a native field
    /// only the first one supplied is written.
    pub fn build_wire_record(&self, attributes: &[Attribute], is_create: bool) -> Result<WireRecord> {
        let mut record = WireRecord::new();

        for attribute in attributes {
            if attribute.name == UID {
                continue;
            }

            let Some(descriptor) = self.schema.descriptor(&attribute.name) else {
                log::warn!("ignoring unknown attribute '{}'", attribute.name);
                continue;
            };

            if descriptor.native_name == self.schema.identifier_native() {
                continue;
            }

            if !descriptor.is_writable(is_create) {
                log::debug!(
                    "attribute '{}' is not {} and was skipped",
                    attribute.name,
                    if is_create { "creatable" } else { "updatable" }
                );
                continue;
            }

            if record.contains_key(descriptor.native_name) {
                log::debug!(
                    "native field '{}' already written, '{}' skipped",
                    descriptor.native_name,
                    attribute.name
                );
                continue;
            }

            if attribute.is_empty() {
                if !is_create {
                    record.insert(descriptor.native_name.to_string(), Json::Null);
                }
                continue;
            }

            let values: Vec<&Value> = attribute.values.iter().filter(|v| !v.is_null()).collect();

            let wire = if descriptor.multivalued {
                let items = values
                    .into_iter()
                    .map(|v| to_wire_value(v, descriptor))
                    .collect::<Result<Vec<_>>>()?;
                Json::Array(items)
            } else {
                if values.len() > 1 {
                    log::warn!(
                        "attribute '{}' is single-valued, keeping the first of {} values",
                        attribute.name,
                        values.len()
                    );
                }
                to_wire_value(values[0], descriptor)?
            };

            record.insert(descriptor.native_name.to_string(), wire);
        }

        Ok(record)
    }

    /// Read a wire record into a logical object.
    ///
    /// Returns `None` when the record has no usable identifier.
    pub fn parse_wire_record(&self, record: &WireRecord) -> Option<LogicalObject> {
        let uid = self.identifier_of(record)?;

        let name = self
            .schema
            .primary_name_descriptor()
            .and_then(|d| record.get(d.native_name))
            .and_then(scalar_to_string)
            .unwrap_or_else(|| uid.value().to_string());

        let mut attributes = BTreeMap::new();
        for descriptor in self.schema.descriptors() {
            if descriptor.logical_name == self.schema.primary_name() || !descriptor.readable {
                continue;
            }
            let Some(wire) = record.get(descriptor.native_name) else {
                continue;
            };
            let values = to_logical_values(wire, descriptor);
            if !values.is_empty() {
                attributes.insert(descriptor.logical_name.to_string(), values);
            }
        }

        Some(LogicalObject::new(uid, name, attributes))
    }

    /// Identifier of a wire record, if present and scalar.
    pub fn identifier_of(&self, record: &WireRecord) -> Option<Uid> {
        let id = record
            .get(self.schema.identifier_native())
            .and_then(scalar_to_string);
        if id.is_none() {
            log::debug!(
                "record without '{}' cannot be mapped",
                self.schema.identifier_native()
            );
        }
        id.map(Uid::new)
    }
}

fn scalar_to_string(value: &Json) -> Option<String> {
    match value {
        Json::String(s) if !s.is_empty() => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::descriptor::NAME;
    use crate::schema::tables::{category_schema, person_schema};

    fn as_record(value: Json) -> WireRecord {
        match value {
            Json::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn create_skips_identifier_and_empty_values() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let attrs = vec![
            Attribute::single(UID, "42"),
            Attribute::single(NAME, "jdoe"),
            Attribute::single("surname", "Doe"),
            Attribute::empty("firstname"),
            Attribute::single("lost", false),
        ];

        let record = mapper.build_wire_record(&attrs, true).unwrap();
        assert_eq!(
            Json::Object(record),
            json!({"userid": "jdoe", "surname": "Doe", "lost": false})
        );
    }

    #[test]
    fn update_emits_null_only_for_cleared_attributes() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let attrs = vec![Attribute::empty("email"), Attribute::new("phone", vec![Value::Null])];

        let record = mapper.build_wire_record(&attrs, false).unwrap();
        assert_eq!(record.get("email"), Some(&Json::Null));
        assert_eq!(record.get("phone"), Some(&Json::Null));
        assert!(!record.contains_key("surname"));
    }

    #[test]
    fn unknown_attributes_are_dropped() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let attrs = vec![
            Attribute::single("favourite_colour", "green"),
            Attribute::single("surname", "Doe"),
        ];

        let record = mapper.build_wire_record(&attrs, true).unwrap();
        assert_eq!(Json::Object(record), json!({"surname": "Doe"}));
    }

    #[test]
    fn operation_flags_are_honoured() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let attrs = vec![
            Attribute::single("password", "s3cret"),
            Attribute::single("updated_on", "2024-01-01T00:00:00+00:00"),
        ];

        let create = mapper.build_wire_record(&attrs, true).unwrap();
        assert_eq!(Json::Object(create), json!({"password": "s3cret"}));

        let update = mapper.build_wire_record(&attrs, false).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn aliased_native_fields_keep_the_first_value() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let attrs = vec![
            Attribute::single(NAME, "first"),
            Attribute::single("userid", "second"),
        ];

        let record = mapper.build_wire_record(&attrs, true).unwrap();
        assert_eq!(Json::Object(record), json!({"userid": "first"}));

        let attrs = vec![Attribute::empty("userid"), Attribute::single(NAME, "ignored")];
        let record = mapper.build_wire_record(&attrs, false).unwrap();
        assert_eq!(Json::Object(record), json!({"userid": null}));
    }

    #[test]
    fn malformed_outbound_date_fails() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let attrs = vec![Attribute::single("date_of_birth", "1990/01/01")];

        let err = mapper.build_wire_record(&attrs, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAttributeValue);
    }

    #[test]
    fn multivalued_attributes_become_arrays() {
        let schema = category_schema();
        let mapper = ResourceMapper::new(&schema);
        let attrs = vec![Attribute::new(
            "library_limits",
            vec![Value::from("CPL"), Value::from("MPL")],
        )];

        let record = mapper.build_wire_record(&attrs, true).unwrap();
        assert_eq!(Json::Object(record), json!({"library_limits": ["CPL", "MPL"]}));
    }

    #[test]
    fn parse_requires_identifier() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let record = as_record(json!({"userid": "jdoe", "surname": "Doe"}));
        assert!(mapper.parse_wire_record(&record).is_none());

        let record = as_record(json!({"patron_id": null, "userid": "jdoe"}));
        assert!(mapper.parse_wire_record(&record).is_none());
    }

    #[test]
    fn parse_reads_name_with_identifier_fallback() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);

        let record = as_record(json!({"patron_id": 42, "userid": "jdoe"}));
        let object = mapper.parse_wire_record(&record).unwrap();
        assert_eq!(object.uid().value(), "42");
        assert_eq!(object.name(), "jdoe");
        assert_eq!(object.value("userid"), Some(&Value::from("jdoe")));

        let record = as_record(json!({"patron_id": 43, "userid": null}));
        let object = mapper.parse_wire_record(&record).unwrap();
        assert_eq!(object.name(), "43");
        assert!(object.value("userid").is_none());
    }

    #[test]
    fn parse_drops_unreadable_and_undecodable_values() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let record = as_record(json!({
            "patron_id": 7,
            "userid": "jdoe",
            "password": "hash",
            "privacy": "not-a-number",
            "lost": "1",
            "date_of_birth": "1990-01-15",
            "email": null,
            "unknown_field": "x"
        }));

        let object = mapper.parse_wire_record(&record).unwrap();
        assert!(object.value("password").is_none());
        assert!(object.value("privacy").is_none());
        assert!(object.value("email").is_none());
        assert!(object.value("unknown_field").is_none());
        assert_eq!(object.value("lost"), Some(&Value::Boolean(true)));
        assert_eq!(object.value("date_of_birth"), Some(&Value::from("1990-01-15")));
    }

    #[test]
    fn create_then_parse_round_trips() {
        let schema = person_schema();
        let mapper = ResourceMapper::new(&schema);
        let attrs = vec![
            Attribute::single(NAME, "jdoe"),
            Attribute::single("cardnumber", "C0001"),
            Attribute::single("surname", "Doe"),
            Attribute::single("date_of_birth", "1990-01-15"),
            Attribute::single("library_id", "CPL"),
            Attribute::single("category_id", "PT"),
            Attribute::single("lost", true),
            Attribute::single("privacy", 1),
            Attribute::single("password", "hidden"),
        ];

        let mut record = mapper.build_wire_record(&attrs, true).unwrap();
        record.insert("patron_id".to_string(), json!(99));
        let object = mapper.parse_wire_record(&record).unwrap();

        assert_eq!(object.name(), "jdoe");
        for attr in attrs.iter().filter(|a| a.name != NAME && schema.is_readable(&a.name)) {
            assert_eq!(object.values(&attr.name), Some(attr.values.as_slice()), "{}", attr.name);
        }
        assert!(object.value("password").is_none());
    }
}
