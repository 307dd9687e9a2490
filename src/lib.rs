//! `stringdecimal`: arbitrary-precision decimal arithmetic on textual
//! number representations.
//!
//! This crate is the facade over [`stringdecimal_core`]: it re-exports the
//! rational value type and the parser/formatter, and adds the one thing
//! the core crate deliberately doesn't own — the infix expression
//! evaluator (`eval`), which drives the core's arithmetic through a small
//! operator-precedence engine.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod eval;

pub use stringdecimal_base::{Config, Discarded, Error, RoundingMode, Sign};
pub use stringdecimal_core::{
    format, parse, sd_abs_cmp, sd_add, sd_cmp, sd_div, sd_mul, sd_sub, FormatOptions, FormatPolicy,
    ParseOptions, Sd,
};

pub use eval::{evaluate, EvalOptions};
