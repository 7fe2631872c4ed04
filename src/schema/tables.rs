//! Attribute tables for the two provisioned resource types.
//!
//! `__NAME__` shares its native field with a kind-specific attribute
//! (`userid` for patrons, `category_name` for categories). On write the
//! first of the two supplied by the caller wins; on read both are filled
//! from the same field.

use crate::resource::kind::ResourceKind;
use crate::schema::descriptor::{AttributeDescriptor as A, NAME, ResourceSchema, ValueType};

/// Logical names validated as `YYYY-MM-DD` before being sent.
pub const OUTBOUND_DATE_ATTRIBUTES: [&str; 2] = ["date_of_birth", "expiry_date"];

/// Logical names normalised to `YYYY-MM-DD` when read.
pub const INBOUND_DATE_ATTRIBUTES: [&str; 4] =
    ["date_of_birth", "date_enrolled", "expiry_date", "date_renewed"];

/// Logical names normalised to ISO-8601 date-times with offset when read.
pub const TIMESTAMP_ATTRIBUTES: [&str; 2] = ["updated_on", "last_seen"];

/// Descriptor table for a resource kind.
pub fn schema_for(kind: ResourceKind) -> ResourceSchema {
    match kind {
        ResourceKind::Person => person_schema(),
        ResourceKind::Category => category_schema(),
    }
}

pub fn person_schema() -> ResourceSchema {
    ResourceSchema::new(
        "patron_id",
        NAME,
        vec![
            A::new(NAME, "userid", ValueType::String).required(),
            A::string("userid"),
            A::string("cardnumber"),
            A::string("surname"),
            A::string("firstname"),
            A::string("preferred_name"),
            A::string("title"),
            A::string("other_name"),
            A::string("initials"),
            A::string("email"),
            A::string("secondary_email"),
            A::string("phone"),
            A::string("mobile"),
            A::string("address"),
            A::string("address2"),
            A::string("city"),
            A::string("state"),
            A::string("postal_code"),
            A::string("country"),
            A::string("library_id").required(),
            A::string("category_id").required(),
            A::string("date_of_birth"),
            A::string("date_enrolled"),
            A::string("expiry_date"),
            A::string("date_renewed").read_only(),
            A::string("gender"),
            A::string("lang"),
            A::string("staff_notes"),
            A::string("opac_notes"),
            A::string("password").not_updatable().not_readable(),
            A::boolean("lost"),
            A::boolean("incorrect_address"),
            A::boolean("autorenew_checkouts"),
            A::boolean("protected"),
            A::boolean("restricted").read_only(),
            A::integer("privacy"),
            A::integer("sms_provider_id"),
            A::integer("login_attempts").read_only(),
            A::long("checkouts_count").read_only(),
            A::string("updated_on").read_only(),
            A::string("last_seen").read_only(),
        ],
    )
}

pub fn category_schema() -> ResourceSchema {
    ResourceSchema::new(
        "patron_category_id",
        NAME,
        vec![
            A::new(NAME, "name", ValueType::String).required(),
            A::new("category_name", "name", ValueType::String),
            A::string("description"),
            A::string("category_type"),
            A::integer("enrolment_period"),
            A::new("expiry_date", "enrolment_period_date", ValueType::String),
            A::integer("upper_age_limit"),
            A::integer("min_age"),
            A::string("enrolment_fee"),
            A::boolean("reset_password"),
            A::boolean("change_password"),
            A::boolean("can_be_guarantee"),
            A::boolean("hidden_in_opac"),
            A::boolean("overdue_notice_required"),
            A::string("library_limits").multivalued(),
        ],
    )
}
