/// Generic HTTP access to one resource collection.
pub mod client;
/// Logical value <-> wire JSON coercion.
pub mod codec;
/// Supported resource kinds and their endpoints.
pub mod kind;
/// Attribute <-> wire record mapping.
pub mod mapper;
pub(crate) mod parse;
/// Logical value model.
pub mod value;

pub use client::{ResourceClient, SearchCriteria, SearchRequest};
pub use kind::{ResourceKind, Verb};
pub use mapper::ResourceMapper;
pub use value::{Attribute, LogicalObject, Uid, Value, WireRecord};
