//! The failure taxonomy (spec §7), hand-rolled the way the teacher's own
//! leaf crates implement their error types (no `thiserror`).

use core::fmt;

/// A failure recorded by a value operation or the expression evaluator.
///
/// Individual operations never panic on malformed input or domain errors
/// (division by zero, non-integer powers, ...); they record the first
/// [`Error`] encountered and keep returning a usable sentinel value so
/// that chained expressions don't crash. The evaluator surfaces the first
/// failure together with the source position it occurred at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An intermediate value would exceed the configured `max_length`.
    NumberTooLong,
    /// Division with a zero divisor.
    DivisionByZero,
    /// `^` with a non-integer or negative right-hand side.
    PowerNotPositiveInteger,
    /// The evaluator expected a value but found an operator or end of input.
    MissingOperand,
    /// Stray characters between operands.
    MissingOperator,
    /// A close bracket without a matching open bracket.
    TooManyCloseBrackets,
    /// An open bracket without a matching close bracket at end of input.
    UnclosedBrackets,
    /// Generic propagation from a nested failure.
    Error,
}

impl Error {
    /// The message text as used in spec §7 (without the `!!` prefix the
    /// evaluator and CLI add when rendering a failed result as a string).
    pub const fn message(&self) -> &'static str {
        match self {
            Error::NumberTooLong => "Number too long",
            Error::DivisionByZero => "Division by zero",
            Error::PowerNotPositiveInteger => "Power must be positive integer",
            Error::MissingOperand => "Missing operand",
            Error::MissingOperator => "Missing/unknown operator",
            Error::TooManyCloseBrackets => "Too many close brackets",
            Error::UnclosedBrackets => "Unclosed brackets",
            Error::Error => "Error",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_spec_taxonomy() {
        assert_eq!(Error::DivisionByZero.message(), "Division by zero");
        assert_eq!(
            Error::PowerNotPositiveInteger.message(),
            "Power must be positive integer"
        );
    }
}
