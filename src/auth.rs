//! Auth-domain models: methods, credentials, and token types.

pub mod credentials;
pub mod method;
pub mod token;

pub use credentials::*;
pub use method::*;
pub use token::{access::*, secret::*};
