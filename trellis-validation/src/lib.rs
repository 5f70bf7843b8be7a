//! Fluent, path-addressed validation for Trellis
//!
//! Rules are chained per field, every rule runs, and every failure is
//! collected on the [`Validator`]. Fields are addressed by dotted path
//! (`"address.city"`) and resolved at runtime through the [`Record`] and
//! [`Reflect`] traits, which `#[derive(Record)]` implements.
//!
//! # Examples
//!
//! ## Checking a record
//!
//! ```
//! use trellis_validation::{Record, Validator};
//!
//! #[derive(Record)]
//! struct User {
//!     name: String,
//!     email: String,
//!     age: i32,
//! }
//!
//! let mut user = User {
//!     name: "J".to_string(),
//!     email: "newmail@mail.com".to_string(),
//!     age: 30,
//! };
//!
//! let mut v = Validator::new(&mut user);
//! v.field("name").is_string().min_length(3).max_length(50);
//! v.field("email").is_string().is_email();
//! v.field("age").is_int().min(18).max(60);
//!
//! assert_eq!(v.errors().len(), 1);
//! assert_eq!(v.errors()[0].message, "name must be at least 3 characters long");
//! ```
//!
//! ## Rewriting a nested field
//!
//! ```
//! use trellis_validation::{FieldValue, Record, Validator};
//!
//! #[derive(Record)]
//! struct Address {
//!     city: String,
//! }
//!
//! #[derive(Record)]
//! struct Customer {
//!     address: Option<Box<Address>>,
//! }
//!
//! let mut customer = Customer {
//!     address: Some(Box::new(Address { city: "lisbon".to_string() })),
//! };
//!
//! let mut v = Validator::new(&mut customer);
//! v.field("address.city")
//!     .transform(|city| match city {
//!         FieldValue::String(s) => FieldValue::String(s.to_uppercase()),
//!         other => other,
//!     })
//!     .is_alpha();
//! assert!(!v.has_errors());
//! assert_eq!(customer.address.unwrap().city, "LISBON");
//! ```
//!
//! ## Using a rule directly
//!
//! ```
//! use trellis_validation::{FieldValue, IsPositive, MinLength};
//!
//! assert!(MinLength(3).validate(&FieldValue::from("abc"), "name").is_ok());
//! assert!(IsPositive::validate(&FieldValue::Int(-1), "count").is_err());
//! ```

// Lets the derive's `::trellis_validation::` paths resolve inside this crate.
extern crate self as trellis_validation;

pub mod access;
mod errors;
mod field;
mod rules;
mod traits;
mod validator;
mod value;

pub use access::{FieldPath, read, write};
pub use errors::*;
pub use field::*;
pub use rules::*;
pub use traits::*;
pub use validator::*;
pub use value::*;

#[cfg(feature = "derive")]
pub use trellis_macro::Record;
