use crate::span::Span;
use crate::types::Ty;
use thiserror::Error;

/// Errors reported by the type-checking pass.
///
/// The checker stops at the first failure and propagates it; a caller that
/// wants multi-error reporting wraps each top-level class check on its own.
/// Variants are structured (expected/actual types, names, spans) so callers
/// can format their own messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: Ty, actual: Ty, span: Span },

    #[error("condition must be Bool, found {actual}")]
    ConditionNotBool { actual: Ty, span: Span },

    #[error("undefined identifier '{name}'")]
    UnboundIdentifier { name: String, span: Span },

    #[error("unknown method '{name}'")]
    UnboundMethod { name: String, span: Span },

    #[error("duplicate declaration of '{name}'")]
    DuplicateDeclaration { name: String, span: Span },

    #[error("duplicate case branch for type {ty}")]
    DuplicateCaseType { ty: Ty, span: Span },

    #[error("cannot inherit from {ty}")]
    InvalidInheritance { ty: Ty, span: Span },

    #[error("wrong number of arguments: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize, span: Span },

    #[error("type {ty} has no registered ancestor")]
    BrokenHierarchy { ty: Ty, span: Span },

    #[error("inheritance cycle through {ty}")]
    CyclicInheritance { ty: Ty, span: Span },
}

impl TypeError {
    /// The primary span the error points at.
    pub fn span(&self) -> Span {
        match self {
            TypeError::TypeMismatch { span, .. }
            | TypeError::ConditionNotBool { span, .. }
            | TypeError::UnboundIdentifier { span, .. }
            | TypeError::UnboundMethod { span, .. }
            | TypeError::DuplicateDeclaration { span, .. }
            | TypeError::DuplicateCaseType { span, .. }
            | TypeError::InvalidInheritance { span, .. }
            | TypeError::ArityMismatch { span, .. }
            | TypeError::BrokenHierarchy { span, .. }
            | TypeError::CyclicInheritance { span, .. } => *span,
        }
    }

    pub(crate) fn with_span(self, span: Span) -> Self {
        match self {
            TypeError::TypeMismatch { expected, actual, .. } => {
                TypeError::TypeMismatch { expected, actual, span }
            }
            TypeError::ConditionNotBool { actual, .. } => TypeError::ConditionNotBool { actual, span },
            TypeError::UnboundIdentifier { name, .. } => TypeError::UnboundIdentifier { name, span },
            TypeError::UnboundMethod { name, .. } => TypeError::UnboundMethod { name, span },
            TypeError::DuplicateDeclaration { name, .. } => {
                TypeError::DuplicateDeclaration { name, span }
            }
            TypeError::DuplicateCaseType { ty, .. } => TypeError::DuplicateCaseType { ty, span },
            TypeError::InvalidInheritance { ty, .. } => TypeError::InvalidInheritance { ty, span },
            TypeError::ArityMismatch { expected, found, .. } => {
                TypeError::ArityMismatch { expected, found, span }
            }
            TypeError::BrokenHierarchy { ty, .. } => TypeError::BrokenHierarchy { ty, span },
            TypeError::CyclicInheritance { ty, .. } => TypeError::CyclicInheritance { ty, span },
        }
    }
}

/// Render a TypeError with ariadne for nice terminal output.
pub fn render_error(source: &str, err: &TypeError) {
    use ariadne::{Label, Report, ReportKind, Source};

    let span = err.span();
    Report::build(ReportKind::Error, (), span.start)
        .with_message("type error")
        .with_label(
            Label::new(span.start..span.end)
                .with_message(err.to_string()),
        )
        .finish()
        .eprint(Source::from(source))
        .unwrap();
}
