//! # Codec
//!
//! The typed attribute encoding carried by change-stream images and a serde
//! bridge between those images and plain Rust records.
//!
//! Images arrive as maps of attribute name to a single-key tagged value
//! (`{"S": "..."}`, `{"N": "42"}`, `{"M": {...}}`, ...). [`unmarshal`] turns
//! such a map into any [`serde::de::DeserializeOwned`] type; [`marshal`] goes
//! the other way.
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use sluice_codec::{AttributeMap, marshal, unmarshal};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct User {
//!     id: u64,
//!     username: String,
//! }
//!
//! # fn main() -> Result<(), sluice_codec::CodecError> {
//! let image: AttributeMap = serde_json::from_str(
//!     r#"{"id": {"N": "100"}, "username": {"S": "MEMEME"}}"#,
//! )?;
//! let user: User = unmarshal(&image)?;
//! assert_eq!(user, User { id: 100, username: "MEMEME".to_owned() });
//! assert_eq!(marshal(&user)?, image);
//! # Ok(())
//! # }
//! ```

mod convert;
mod error;
mod value;

pub use convert::{marshal, unmarshal};
pub use error::{CodecError, CodecErrorExt};
pub use value::{AttributeMap, AttributeValue};
