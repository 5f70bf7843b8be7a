// Procedural macros for Trellis
// `#[derive(Record)]` turns a struct into a field registry that the
// validation core can walk by dotted path.

use proc_macro::TokenStream;

mod naming;
mod record;

/// Implements `Record` and `Reflect` for a struct.
///
/// Every field becomes addressable by name and must itself implement
/// `Reflect` (primitives, `String`, `Option`, `Box`, `Vec` and other derived
/// records do).
///
/// Container attributes:
/// - `#[record(rename_all = "PascalCase")]` (also `camelCase`,
///   `snake_case`, `lowercase`, `UPPERCASE`)
/// - `#[record(crate = "path::to::trellis_validation")]`
///
/// Field attributes:
/// - `#[record(rename = "Name")]`
/// - `#[record(skip)]`
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    record::record_derive_impl(input)
}
