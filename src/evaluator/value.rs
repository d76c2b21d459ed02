use crate::ast::Type;

use super::error::RuntimeError;

/// Result of evaluating an expression: the value as text plus its type, so
/// operators like `+` and `<` can dispatch without re-deriving types.
/// Integers render as decimal text and booleans as `"true"`/`"false"`,
/// matching the symbol table's uniform text values.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Evaluated {
    pub(super) ty: Type,
    pub(super) text: String,
}

impl Evaluated {
    pub(super) fn int(value: i64) -> Self {
        Self {
            ty: Type::Int,
            text: value.to_string(),
        }
    }

    pub(super) fn bool_value(value: bool) -> Self {
        Self {
            ty: Type::Bool,
            text: if value { "true" } else { "false" }.to_string(),
        }
    }

    pub(super) fn string(text: impl Into<String>) -> Self {
        Self {
            ty: Type::String,
            text: text.into(),
        }
    }

    pub(super) fn is_true(&self) -> bool {
        self.text == "true"
    }

    pub(super) fn as_int(&self) -> Result<i64, RuntimeError> {
        parse_int(&self.text)
    }
}

pub(super) fn parse_int(text: &str) -> Result<i64, RuntimeError> {
    text.parse().map_err(|_| RuntimeError::IntConversion {
        value: text.to_string(),
    })
}
