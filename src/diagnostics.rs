use std::fmt;

use crate::token::Position;

/// Category tag for a reported problem; selects the `<Kind>Error` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Semantic,
    Runtime,
    Io,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            Self::Lexical => "Lexical",
            Self::Syntax => "Syntax",
            Self::Semantic => "Semantic",
            Self::Runtime => "Runtime",
            Self::Io => "IO",
        }
    }
}

/// A single positioned diagnostic, rendered as
/// `<Kind>Error::Row <R>::Column <C>::<message>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub position: Position,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
        }
    }

    pub fn lexical(position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Lexical, position, message)
    }

    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Syntax, position, message)
    }

    pub fn semantic(position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Semantic, position, message)
    }

    pub fn runtime(position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Runtime, position, message)
    }

    /// File-level problems have no source position; row 0 marks that, since
    /// real rows are 1-indexed.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Io, Position::default(), message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Error::{}::{}",
            self.kind.label(),
            self.position,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_the_wire_format() {
        let diagnostic = Diagnostic::semantic(
            Position::new(2, 5),
            "Variable x already defined in this scope!",
        );
        assert_eq!(
            diagnostic.to_string(),
            "SemanticError::Row 2::Column 5::Variable x already defined in this scope!"
        );
    }

    #[test]
    fn io_diagnostics_have_no_source_position() {
        let diagnostic = Diagnostic::io("missing source file argument");
        assert_eq!(
            diagnostic.to_string(),
            "IOError::Row 0::Column 0::missing source file argument"
        );
    }
}
