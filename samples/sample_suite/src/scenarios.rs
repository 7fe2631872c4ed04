pub mod connection;
pub mod search;
