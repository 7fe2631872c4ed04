//! Search filters received from the provisioning framework.
//!
//! Only equality on a handful of attributes can be pushed down to the remote
//! API. Anything else translates to "no filter" and the search becomes a
//! full scan, leaving the framework to filter the results itself.

use crate::resource::client::SearchCriteria;
use crate::resource::kind::ResourceKind;
use crate::resource::value::Value;
use crate::schema::descriptor::{NAME, ResourceSchema, UID};

/// Filter expression as sent by the framework.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals { attribute: String, value: Value },
    StartsWith { attribute: String, value: String },
    Contains { attribute: String, value: String },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn equals(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// How a search is executed against the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Point lookup of one identifier.
    ById(String),
    /// Collection search; empty criteria is a full scan.
    Criteria(SearchCriteria),
}

fn searchable(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Person => &[NAME, "userid", "email", "cardnumber"],
        ResourceKind::Category => &[NAME, "category_name"],
    }
}

/// Translate an optional framework filter into a remote query.
pub fn translate(kind: ResourceKind, schema: &ResourceSchema, filter: Option<&Filter>) -> Query {
    let Some(filter) = filter else {
        return Query::Criteria(SearchCriteria::new());
    };

    let Filter::Equals { attribute, value } = filter else {
        log::debug!("filter {filter:?} cannot be pushed down, running an unfiltered search");
        return Query::Criteria(SearchCriteria::new());
    };

    let Some(value) = value_as_string(value) else {
        log::debug!("filter value for '{attribute}' is not a scalar, running an unfiltered search");
        return Query::Criteria(SearchCriteria::new());
    };

    if attribute == UID {
        return Query::ById(value);
    }

    if !searchable(kind).contains(&attribute.as_str()) {
        log::debug!("'{attribute}' is not searchable on {kind}, running an unfiltered search");
        return Query::Criteria(SearchCriteria::new());
    }

    match schema.descriptor(attribute) {
        Some(descriptor) => Query::Criteria(SearchCriteria::new().with(descriptor.native_name, value)),
        None => Query::Criteria(SearchCriteria::new()),
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Long(l) => Some(l.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Null => None,
    }
}
