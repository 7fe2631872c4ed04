//! Type coercion between logical values and wire JSON.
//!
//! Outbound conversion is strict for the validated date attributes and
//! otherwise passes values through. Inbound conversion never fails: a value
//! that cannot be read against its declared type is logged and dropped so
//! one malformed upstream field does not block the whole record.

use chrono::{DateTime, NaiveDate};
use serde_json::Value as Json;

use crate::error::{ConnectorError, Result};
use crate::resource::value::Value;
use crate::schema::descriptor::{AttributeDescriptor, ValueType};
use crate::schema::tables::{INBOUND_DATE_ATTRIBUTES, OUTBOUND_DATE_ATTRIBUTES, TIMESTAMP_ATTRIBUTES};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Encode one logical value for the wire. `Value::Null` becomes JSON null.
pub fn to_wire_value(value: &Value, descriptor: &AttributeDescriptor) -> Result<Json> {
    let wire = match value {
        Value::Null => Json::Null,
        Value::String(s) => {
            if OUTBOUND_DATE_ATTRIBUTES.contains(&descriptor.logical_name) {
                validate_date(s, descriptor)?;
            }
            Json::String(s.clone())
        }
        Value::Boolean(b) => Json::Bool(*b),
        Value::Integer(i) => Json::from(*i),
        Value::Long(l) => Json::from(*l),
    };
    Ok(wire)
}

fn validate_date(value: &str, descriptor: &AttributeDescriptor) -> Result<()> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|_| ())
        .map_err(|e| ConnectorError::MalformedAttributeValue {
            attribute: descriptor.logical_name.to_string(),
            value: value.to_string(),
            message: format!("expected a YYYY-MM-DD date ({e})"),
        })
}

/// Decode one wire value. `None` means the attribute is absent, either
/// because the wire carried null or because the value was unreadable.
pub fn to_logical_value(wire: &Json, descriptor: &AttributeDescriptor) -> Option<Value> {
    if wire.is_null() {
        return None;
    }

    let decoded = match descriptor.value_type {
        ValueType::String => decode_string(wire, descriptor.logical_name),
        ValueType::Boolean => decode_boolean(wire),
        ValueType::Integer => decode_long(wire)
            .and_then(|l| i32::try_from(l).ok())
            .map(Value::Integer),
        ValueType::Long => decode_long(wire).map(Value::Long),
    };

    if decoded.is_none() {
        log::warn!(
            "dropping attribute '{}': cannot read {} as {:?}",
            descriptor.logical_name,
            wire,
            descriptor.value_type
        );
    }

    decoded
}

/// Decode a possibly multivalued wire field into a value list. Elements that
/// fail to decode are dropped individually.
pub fn to_logical_values(wire: &Json, descriptor: &AttributeDescriptor) -> Vec<Value> {
    match wire {
        Json::Array(items) if descriptor.multivalued => items
            .iter()
            .filter_map(|item| to_logical_value(item, descriptor))
            .collect(),
        _ => to_logical_value(wire, descriptor).into_iter().collect(),
    }
}

fn decode_string(wire: &Json, logical_name: &str) -> Option<Value> {
    let raw = match wire {
        Json::String(s) => s.clone(),
        Json::Number(n) => n.to_string(),
        Json::Bool(b) => b.to_string(),
        _ => return None,
    };

    if INBOUND_DATE_ATTRIBUTES.contains(&logical_name) {
        return normalize_date(&raw).map(Value::String);
    }
    if TIMESTAMP_ATTRIBUTES.contains(&logical_name) {
        return normalize_timestamp(&raw).map(Value::String);
    }
    Some(Value::String(raw))
}

/// Accepts a bare date or a full date-time and re-emits `YYYY-MM-DD`.
fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date.format(DATE_FORMAT).to_string());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive().format(DATE_FORMAT).to_string())
}

fn normalize_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.to_rfc3339())
}

fn decode_boolean(wire: &Json) -> Option<Value> {
    let b = match wire {
        Json::Bool(b) => *b,
        Json::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => true,
            "0" | "false" => false,
            _ => return None,
        },
        Json::Number(n) => match n.as_i64() {
            Some(1) => true,
            Some(0) => false,
            _ => return None,
        },
        _ => return None,
    };
    Some(Value::Boolean(b))
}

fn decode_long(wire: &Json) -> Option<i64> {
    match wire {
        Json::Number(n) => n.as_i64(),
        Json::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::descriptor::AttributeDescriptor as A;

    #[test]
    fn outbound_dates_are_validated() {
        let dob = A::string("date_of_birth");
        assert_eq!(
            to_wire_value(&Value::from("1990-01-15"), &dob).ok(),
            Some(json!("1990-01-15"))
        );

        let err = to_wire_value(&Value::from("15/01/1990"), &dob).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedAttributeValue);
        let message = err.to_string();
        assert!(message.contains("15/01/1990"));
        assert!(message.contains("date_of_birth"));

        let expiry = A::new("expiry_date", "enrolment_period_date", ValueType::String);
        assert!(to_wire_value(&Value::from("2030-02-30"), &expiry).is_err());
    }

    #[test]
    fn outbound_scalars_pass_through() {
        let any = A::string("surname");
        assert_eq!(to_wire_value(&Value::from("not a date"), &any).ok(), Some(json!("not a date")));
        assert_eq!(to_wire_value(&Value::from(true), &A::boolean("lost")).ok(), Some(json!(true)));
        assert_eq!(to_wire_value(&Value::from(7), &A::integer("privacy")).ok(), Some(json!(7)));
        assert_eq!(
            to_wire_value(&Value::from(9_000_000_000_i64), &A::long("checkouts_count")).ok(),
            Some(json!(9_000_000_000_i64))
        );
        assert_eq!(to_wire_value(&Value::Null, &any).ok(), Some(Json::Null));
    }

    #[test]
    fn inbound_null_is_absent() {
        assert_eq!(to_logical_value(&Json::Null, &A::string("surname")), None);
    }

    #[test]
    fn inbound_dates_and_timestamps_are_normalized() {
        let enrolled = A::string("date_enrolled");
        assert_eq!(
            to_logical_value(&json!("2021-03-04"), &enrolled),
            Some(Value::from("2021-03-04"))
        );
        assert_eq!(
            to_logical_value(&json!("2021-03-04T10:11:12+02:00"), &enrolled),
            Some(Value::from("2021-03-04"))
        );

        let updated = A::string("updated_on");
        assert_eq!(
            to_logical_value(&json!("2024-05-06T07:08:09Z"), &updated),
            Some(Value::from("2024-05-06T07:08:09+00:00"))
        );
        assert_eq!(to_logical_value(&json!("yesterday"), &updated), None);
        assert_eq!(to_logical_value(&json!("04/03/2021"), &enrolled), None);
    }

    #[test]
    fn inbound_booleans_accept_strings() {
        let lost = A::boolean("lost");
        assert_eq!(to_logical_value(&json!(true), &lost), Some(Value::Boolean(true)));
        assert_eq!(to_logical_value(&json!("1"), &lost), Some(Value::Boolean(true)));
        assert_eq!(to_logical_value(&json!("FALSE"), &lost), Some(Value::Boolean(false)));
        assert_eq!(to_logical_value(&json!("0"), &lost), Some(Value::Boolean(false)));
        assert_eq!(to_logical_value(&json!(1), &lost), Some(Value::Boolean(true)));
        assert_eq!(to_logical_value(&json!("maybe"), &lost), None);
        assert_eq!(to_logical_value(&json!({"a": 1}), &lost), None);
    }

    #[test]
    fn inbound_numbers_accept_decimal_strings() {
        let privacy = A::integer("privacy");
        assert_eq!(to_logical_value(&json!(2), &privacy), Some(Value::Integer(2)));
        assert_eq!(to_logical_value(&json!("12"), &privacy), Some(Value::Integer(12)));
        assert_eq!(to_logical_value(&json!("twelve"), &privacy), None);
        assert_eq!(to_logical_value(&json!(5_000_000_000_i64), &privacy), None);

        let count = A::long("checkouts_count");
        assert_eq!(
            to_logical_value(&json!("5000000000"), &count),
            Some(Value::Long(5_000_000_000))
        );
        assert_eq!(to_logical_value(&json!(1.5), &count), None);
    }

    #[test]
    fn multivalued_fields_decode_each_element() {
        let limits = A::string("library_limits").multivalued();
        assert_eq!(
            to_logical_values(&json!(["CPL", null, "MPL"]), &limits),
            vec![Value::from("CPL"), Value::from("MPL")]
        );
        assert_eq!(to_logical_values(&json!("CPL"), &limits), vec![Value::from("CPL")]);
        assert!(to_logical_values(&Json::Null, &limits).is_empty());
    }
}
