/// Client-credentials grant request and static header helpers.
pub mod credentials;
/// Token cache and request authorization.
pub mod token;

pub use token::{CredentialProvider, TokenProvider};
