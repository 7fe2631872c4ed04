use crate::error::{ConnectorError, Result};

/// Versioned path prefix shared by every endpoint of the remote API.
pub const API_PREFIX: &str = "/api/v1";

/// Resource types the connector can provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Person (patron) records.
    Person,
    /// Membership-category records.
    Category,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Person, ResourceKind::Category];

    /// Resolve the object-class tag sent by the provisioning framework.
    pub fn from_object_class(object_class: &str) -> Result<Self> {
        match object_class.trim().to_ascii_lowercase().as_str() {
            "__account__" | "person" | "patron" => Ok(ResourceKind::Person),
            "__group__" | "category" | "patron_category" => Ok(ResourceKind::Category),
            _ => Err(ConnectorError::UnsupportedOperation {
                message: format!("object class '{object_class}' is not supported"),
            }),
        }
    }

    /// Label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Person => "patron",
            ResourceKind::Category => "patron category",
        }
    }

    /// Collection path below the service address.
    pub fn base_path(self) -> &'static str {
        match self {
            ResourceKind::Person => "/api/v1/patrons",
            ResourceKind::Category => "/api/v1/patron_categories",
        }
    }

    /// Key under which a wrapped search response carries its array.
    pub fn collection_key(self) -> &'static str {
        match self {
            ResourceKind::Person => "patrons",
            ResourceKind::Category => "patron_categories",
        }
    }

    fn already_exists_markers(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Person => &[
                "already exists",
                "duplicate",
                "cardnumber already in use",
                "userid already",
            ],
            ResourceKind::Category => &["already exists", "duplicate", "category code"],
        }
    }

    /// True when a 400 response body reports a uniqueness conflict.
    pub fn is_already_exists_message(self, body: &str) -> bool {
        let body = body.to_ascii_lowercase();
        self.already_exists_markers()
            .iter()
            .any(|marker| body.contains(marker))
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// HTTP verb issued against a resource, as seen by the error classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Search,
    Create,
    Update,
    Delete,
}

impl Verb {
    /// True for verbs addressing a single record by identifier.
    pub fn is_point_target(self) -> bool {
        matches!(self, Verb::Get | Verb::Update | Verb::Delete)
    }

    pub fn method(self) -> reqwest::Method {
        match self {
            Verb::Get | Verb::Search => reqwest::Method::GET,
            Verb::Create => reqwest::Method::POST,
            Verb::Update => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}
