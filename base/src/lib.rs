//! Common trait, configuration and error definitions shared by the
//! `stringdecimal` crates.
//!
//! This crate plays the same role for `stringdecimal` that `dashu-base`
//! plays for `dashu`: it has no opinion on *how* big numbers are
//! represented, only on the vocabulary ([`Sign`], [`RoundingMode`],
//! [`Config`], [`Error`]) that the representation-owning crates
//! (`stringdecimal-core`) and the evaluator (`stringdecimal`) share.

#![cfg_attr(not(feature = "std"), no_std)]

mod config;
mod error;
mod round;
mod sign;

pub use config::Config;
pub use error::Error;
pub use round::{Discarded, RoundingMode};
pub use sign::Sign;
