//! The infix expression evaluator (spec §4.G, §6.4): wires the operator
//! tables from the precedence table onto [`driver::run`], with [`Sd`]
//! itself as the driver's value type.

mod driver;

use core::cmp::Ordering;

use driver::{BarOp, BinaryOp, Callbacks, Tables, TernaryOp, UnaryOp};

use crate::{format, parse, sd_add, sd_cmp, sd_div, sd_mul, sd_sub, Config, Error, FormatOptions, ParseOptions, Sd};

/// Options threaded through a single [`evaluate`] call: parsing toggles for
/// the literals embedded in the expression, and (via [`ParseOptions::config`])
/// the shared comma/point/length configuration a length-limit check at the
/// parse and final-result boundary is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    pub parse: ParseOptions,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions { parse: ParseOptions::default() }
    }
}

fn op_negate(mut v: Sd) -> Sd {
    v.neg_i();
    v
}

fn op_abs(mut v: Sd) -> Sd {
    v.abs_i();
    v
}

fn op_not(v: Sd) -> Sd {
    match v.failure() {
        Some(e) => Sd::failed(e.clone()),
        None if v.is_zero() => Sd::one(),
        None => Sd::zero(),
    }
}

fn op_add(l: Sd, r: Sd) -> Sd {
    sd_add(&l, &r)
}

fn op_sub(l: Sd, r: Sd) -> Sd {
    sd_sub(&l, &r)
}

fn op_mul(l: Sd, r: Sd) -> Sd {
    sd_mul(&l, &r)
}

fn op_div(l: Sd, r: Sd) -> Sd {
    sd_div(&l, &r)
}

fn op_pow(l: Sd, r: Sd) -> Sd {
    l.pow(&r)
}

/// The failure either operand already carries, left operand first — the
/// same precedence [`Sd`]'s own binary operations already use.
fn propagated(l: &Sd, r: &Sd) -> Option<Error> {
    l.failure().or(r.failure()).cloned()
}

fn bool_result(l: &Sd, r: &Sd, truth: bool) -> Sd {
    match propagated(l, r) {
        Some(e) => Sd::failed(e),
        None if truth => Sd::one(),
        None => Sd::zero(),
    }
}

fn op_eq(l: Sd, r: Sd) -> Sd {
    let truth = sd_cmp(&l, &r) == Ordering::Equal;
    bool_result(&l, &r, truth)
}

fn op_ne(l: Sd, r: Sd) -> Sd {
    let truth = sd_cmp(&l, &r) != Ordering::Equal;
    bool_result(&l, &r, truth)
}

fn op_lt(l: Sd, r: Sd) -> Sd {
    let truth = sd_cmp(&l, &r) == Ordering::Less;
    bool_result(&l, &r, truth)
}

fn op_le(l: Sd, r: Sd) -> Sd {
    let truth = sd_cmp(&l, &r) != Ordering::Greater;
    bool_result(&l, &r, truth)
}

fn op_gt(l: Sd, r: Sd) -> Sd {
    let truth = sd_cmp(&l, &r) == Ordering::Greater;
    bool_result(&l, &r, truth)
}

fn op_ge(l: Sd, r: Sd) -> Sd {
    let truth = sd_cmp(&l, &r) != Ordering::Less;
    bool_result(&l, &r, truth)
}

/// `&&` short-circuits to the left operand unchanged when it's falsy,
/// otherwise yields the right operand unchanged (spec §4.G) — note this
/// isn't coerced to a boolean, so e.g. `3 && 5` is `5`, not `1`.
fn op_and(l: Sd, r: Sd) -> Sd {
    if l.is_zero() {
        l
    } else {
        r
    }
}

/// `||`: mirror of [`op_and`].
fn op_or(l: Sd, r: Sd) -> Sd {
    if !l.is_zero() {
        l
    } else {
        r
    }
}

/// `cond ? then : else`. A missing middle operand (`cond ?: else`) returns
/// `cond` itself when `cond` is truthy, matching the driver's `None` for an
/// elided branch (spec §4.G).
fn op_ternary(a: Sd, b: Option<Sd>, c: Sd) -> Sd {
    if let Some(e) = a.failure() {
        return Sd::failed(e.clone());
    }
    if !a.is_zero() {
        match b {
            Some(v) => v,
            None => a,
        }
    } else {
        c
    }
}

const UNARY_OPS: &[UnaryOp<Sd>] = &[
    // Both minus glyphs negate as a prefix operator, matching the binary
    // `+`/`-`/`−` row — the table lists only the ASCII hyphen here, but a
    // worked scenario negates with `−` directly under `|…|`, so the two
    // glyphs are kept interchangeable in both roles.
    UnaryOp { symbols: &["-", "−"], level: 14, apply: op_negate },
    UnaryOp { symbols: &["!", "¬"], level: 14, apply: op_not },
];

const BINARY_OPS: &[BinaryOp<Sd>] = &[
    BinaryOp { symbols: &["^"], level: 14, apply: op_pow },
    BinaryOp { symbols: &["*", "×"], level: 13, apply: op_mul },
    BinaryOp { symbols: &["/", "÷"], level: 13, apply: op_div },
    BinaryOp { symbols: &["+"], level: 12, apply: op_add },
    BinaryOp { symbols: &["-", "−"], level: 12, apply: op_sub },
    BinaryOp { symbols: &[">=", "≥"], level: 10, apply: op_ge },
    BinaryOp { symbols: &["<=", "≤"], level: 10, apply: op_le },
    BinaryOp { symbols: &["!=", "≠"], level: 10, apply: op_ne },
    BinaryOp { symbols: &[">", "≰"], level: 10, apply: op_gt },
    BinaryOp { symbols: &["<", "≱"], level: 10, apply: op_lt },
    BinaryOp { symbols: &["==", "="], level: 9, apply: op_eq },
    BinaryOp { symbols: &["&&", "∧"], level: 5, apply: op_and },
    BinaryOp { symbols: &["||", "∨"], level: 4, apply: op_or },
];

const BAR_OP: BarOp<Sd> = BarOp { open: "|", close: "|", level: 14, apply: op_abs };

const TERNARY_OPS: &[TernaryOp<Sd>] = &[TernaryOp { open: "?", close: ":", level: 3, apply: op_ternary }];

const TABLES: Tables<Sd> = Tables { unary: UNARY_OPS, binary: BINARY_OPS, bar: Some(BAR_OP), ternary: TERNARY_OPS };

/// Maps one of the driver's fixed fail messages back onto the failure
/// taxonomy so the evaluator's result is an ordinary [`Sd`] rather than a
/// side-channel error.
fn error_from_message(message: &str) -> Error {
    match message {
        "Missing operand" => Error::MissingOperand,
        "Missing/unknown operator" => Error::MissingOperator,
        "Too many close brackets" => Error::TooManyCloseBrackets,
        "Unclosed brackets" => Error::UnclosedBrackets,
        _ => Error::Error,
    }
}

fn text_length(v: &Sd, config: &Config) -> usize {
    let opts = FormatOptions { config: *config, ..FormatOptions::default() };
    format(v, &opts).chars().count()
}

struct Context<'a> {
    opts: &'a EvalOptions,
    error: Option<Error>,
}

impl<'a> Context<'a> {
    fn enforce_length(&self, v: Sd) -> Sd {
        if self.opts.parse.config.exceeds(text_length(&v, &self.opts.parse.config)) {
            Sd::failed(Error::NumberTooLong)
        } else {
            v
        }
    }
}

impl<'a> Callbacks<Sd> for Context<'a> {
    fn parse_operand(&mut self, s: &str) -> (Option<Sd>, usize) {
        let (value, consumed) = parse(s, &self.opts.parse);
        if consumed == 0 {
            return (None, 0);
        }
        #[cfg(feature = "std")]
        log::trace!("evaluator parsed operand, {consumed} bytes consumed");
        (Some(self.enforce_length(value)), consumed)
    }

    fn finalise(&mut self, v: Sd) -> Sd {
        self.enforce_length(v)
    }

    fn fail(&mut self, message: &'static str, pos: usize) {
        #[cfg(feature = "std")]
        log::debug!("evaluator failed at byte {pos}: {message}");
        self.error = Some(error_from_message(message));
    }
}

/// Evaluates an infix expression (spec §4.G) to a single [`Sd`]. Failures —
/// malformed input, an unmatched bracket, division by zero, a non-integer
/// power — never panic; they come back as a value whose [`Sd::failure`] is
/// set, exactly as if an arithmetic operation itself had failed.
pub fn evaluate(s: &str, opts: &EvalOptions) -> Sd {
    let mut ctx = Context { opts, error: None };
    match driver::run(&TABLES, &mut ctx, s) {
        Some(v) => v,
        None => Sd::failed(ctx.error.unwrap_or(Error::Error)),
    }
}
