//! `stringdecimal-core`: the arbitrary-precision decimal kernel.
//!
//! This crate holds the layered representation described by the crate's
//! specification — an unsigned magnitude ([`mag::Mag`]), the signed
//! primitives built on it ([`signed::SignedMag`]), the deferred-division
//! rational value ([`sd::Sd`]), and the textual parser/formatter pair
//! ([`parse`], [`format`]). `stringdecimal` (the facade crate) re-exports
//! the parts of this surface meant for everyday use; this crate is usable
//! standalone by anything that wants the kernel without the expression
//! evaluator.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod format;
mod mag;
mod parse;
mod sd;
mod signed;

pub use format::{format, FormatOptions, FormatPolicy};
pub use mag::Mag;
pub use parse::{parse, ParseOptions};
pub use sd::{sd_abs_cmp, sd_add, sd_cmp, sd_div, sd_mul, sd_sub, Sd};
pub use signed::{sadd, scmp, sdiv, smul, srnd, ssub, SignedMag};

pub use stringdecimal_base::{Config, Discarded, Error, RoundingMode, Sign};

static_assertions::assert_impl_all!(Sd: Clone, Send, Sync);
