//! Signed bearer tokens binding a user to a session.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::{JwtDecoder, TokenError};
pub use encoder::JwtEncoder;
