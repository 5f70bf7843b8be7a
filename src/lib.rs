// Trellis - fluent record validation for Rust
//
// Re-exports the validation core at the crate root and the logging crate
// under `trellis::log`.

//! Fluent, path-addressed record validation.
//!
//! ```
//! use trellis::{FieldValue, Record, Validator};
//!
//! #[derive(Record)]
//! #[record(crate = "trellis", rename_all = "PascalCase")]
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! let mut user = User { name: "John Doe".to_string(), age: 33 };
//! let mut v = Validator::new(&mut user);
//! v.field("Name").is_string().min_length(3);
//! v.field("Age").is_int().custom(|age| age.as_int().is_some_and(|n| n % 2 == 0));
//!
//! assert_eq!(v.errors()[0].message, "Age custom validation is invalid");
//! ```

pub use trellis_validation::*;

pub use trellis_log as log;
