//! Field name casing for `rename_all`.

use proc_macro2::Span;
use syn::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    PascalCase,
    CamelCase,
    SnakeCase,
    LowerCase,
    UpperCase,
}

impl RenameRule {
    pub fn parse(value: &str, span: Span) -> Result<Self, Error> {
        match value {
            "PascalCase" => Ok(RenameRule::PascalCase),
            "camelCase" => Ok(RenameRule::CamelCase),
            "snake_case" => Ok(RenameRule::SnakeCase),
            "lowercase" => Ok(RenameRule::LowerCase),
            "UPPERCASE" => Ok(RenameRule::UpperCase),
            other => Err(Error::new(
                span,
                format!(
                    "unknown rename_all rule: \"{}\"\n\
                     hint: use one of \"PascalCase\", \"camelCase\", \"snake_case\", \"lowercase\", \"UPPERCASE\"",
                    other
                ),
            )),
        }
    }

    /// Apply the rule to a snake_case Rust field name.
    pub fn apply(&self, field: &str) -> String {
        match self {
            RenameRule::SnakeCase => field.to_string(),
            RenameRule::LowerCase => field.replace('_', "").to_lowercase(),
            RenameRule::UpperCase => field.replace('_', "").to_uppercase(),
            RenameRule::PascalCase => pascal(field),
            RenameRule::CamelCase => {
                let pascal = pascal(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
        }
    }
}

fn pascal(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
