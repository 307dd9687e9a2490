//! Generic operator-precedence driver (spec §6.4).
//!
//! Modelled directly on `xparse.c`'s stack machine: a running bracket
//! `level` that jumps by 20 per nesting depth, an operand stack, and an
//! operator stack where `addop` drains any pending operator whose level is
//! `>=` the incoming one before pushing (the usual precedence-climbing
//! trick) — except prefix unary operators, which always push unconditionally
//! (mirrored here as `args < 0` in the C, a plain `push_prefix` here).
//!
//! The driver is generic over a context `C` and value `V` so the arithmetic
//! core never has to know about parsing; the parent [`eval`](super) module
//! supplies the concrete operator tables and callbacks for `Sd`.

use alloc::vec::Vec;

/// The four callbacks the original C driver takes as function pointers
/// (spec §6.4): parse an operand, finalise the lone surviving value,
/// dispose of a value that didn't make it into the result, and record a
/// failure. `dispose` has a default no-op body — the C driver needs it to
/// explicitly `free()` abandoned operands, but here that's just `Drop`
/// running when a `V` goes out of scope, so the trait keeps the method for
/// shape parity without requiring every implementor to write a body.
pub trait Callbacks<V> {
    /// Parses a single operand off the front of `s`, returning the value
    /// and the number of bytes consumed. `None` means "no operand here".
    fn parse_operand(&mut self, s: &str) -> (Option<V>, usize);
    /// Post-processes the single surviving value before it's returned.
    fn finalise(&mut self, v: V) -> V {
        v
    }
    /// Called on an operand value that was popped off the stack but not
    /// used in the final result (e.g. the losing side of an `&&`).
    fn dispose(&mut self, _v: V) {}
    /// Records a failure message at a byte offset into the input.
    fn fail(&mut self, message: &'static str, pos: usize);
}

/// A prefix unary operator: any of `symbols` at an operand position applies
/// `apply` to the operand that follows.
pub struct UnaryOp<V> {
    pub symbols: &'static [&'static str],
    pub level: i32,
    pub apply: fn(V) -> V,
}

/// A left-associative binary operator.
pub struct BinaryOp<V> {
    pub symbols: &'static [&'static str],
    pub level: i32,
    pub apply: fn(V, V) -> V,
}

/// A paired bracket that also transforms its contents on close (the
/// `|…|` absolute-value brackets): `open` groups exactly like `(` (bumps
/// the level by the same amount as a parenthesis) and additionally pushes
/// `apply` as a pending prefix operator at `level`, the precedence it
/// would have as a plain prefix unary op; `close` groups like `)`.
pub struct BarOp<V> {
    pub open: &'static str,
    pub close: &'static str,
    pub level: i32,
    pub apply: fn(V) -> V,
}

/// The level a bracket pair (`(`...`)`, or `|`...`|`) bumps the running
/// nesting level by — large enough that nothing outside the bracket can
/// interact with an operator still pending inside it.
const BRACKET_LEVEL: i32 = 20;

/// The `? … :` ternary: `open` marks the branch point, `close` promotes it
/// to a full 3-argument operator once the middle operand has been seen.
/// When the token at `close`'s position is `close` itself with no operand
/// in between, `apply` receives `None` for the middle operand — "a missing
/// middle operand returns the condition itself" (spec §4.G).
pub struct TernaryOp<V> {
    pub open: &'static str,
    pub close: &'static str,
    pub level: i32,
    pub apply: fn(V, Option<V>, V) -> V,
}

/// The operator tables threaded through a single [`run`] call.
pub struct Tables<V: 'static> {
    pub unary: &'static [UnaryOp<V>],
    pub binary: &'static [BinaryOp<V>],
    pub bar: Option<BarOp<V>>,
    pub ternary: &'static [TernaryOp<V>],
}

enum OpKind<V> {
    Unary(fn(V) -> V),
    Binary(fn(V, V) -> V),
    Ternary(fn(V, Option<V>, V) -> V),
}

struct StackOp<V> {
    level: i32,
    args: u8, // 0 = ternary open marker (not yet promoted), 1, 2, or 3
    kind: OpKind<V>,
}

/// Longest-match-first lookup: tries every symbol in `symbols` against the
/// front of `s` and returns the longest one that matches. Operator tables
/// must list a symbol that is a prefix of another (`>` / `>=`) in either
/// order — this function does the ordering work instead of relying on
/// table order, unlike the original C (spec note carried from
/// `original_source/xparse.c`'s "must be listed after it" comment).
fn match_longest<'a>(symbols: &[&'a str], s: &str) -> Option<&'a str> {
    symbols.iter().filter(|sym| s.starts_with(**sym)).max_by_key(|sym| sym.len()).copied()
}

/// Runs the operator-precedence parse described above over `input`,
/// returning the single resulting value, or `None` if `cb.fail` was called.
pub fn run<V, C: Callbacks<V>>(tables: &Tables<V>, cb: &mut C, input: &str) -> Option<V> {
    let mut level: i32 = 0;
    let mut operators: Vec<StackOp<V>> = Vec::new();
    let mut operands: Vec<Option<V>> = Vec::new();
    let mut pos = 0usize;
    let mut failed = false;

    macro_rules! fail {
        ($msg:expr) => {{
            cb.fail($msg, pos);
            failed = true;
            break;
        }};
    }

    let operate = |operators: &mut Vec<StackOp<V>>, operands: &mut Vec<Option<V>>, cb: &mut C| -> Result<(), &'static str> {
        let op = operators.pop().ok_or("Missing operator")?;
        if operands.len() < op.args as usize {
            return Err("Missing args");
        }
        let result = match op.kind {
            OpKind::Unary(f) => {
                let a = operands.pop().unwrap().ok_or("Missing operand")?;
                f(a)
            }
            OpKind::Binary(f) => {
                let b = operands.pop().unwrap().ok_or("Missing operand")?;
                let a = operands.pop().unwrap().ok_or("Missing operand")?;
                f(a, b)
            }
            OpKind::Ternary(f) => {
                let c = operands.pop().unwrap().ok_or("Missing operand")?;
                let b = operands.pop().unwrap();
                let a = operands.pop().unwrap().ok_or("Missing operand")?;
                f(a, b, c)
            }
        };
        operands.push(Some(result));
        Ok(())
    };

    // Drains pending operators whose level is >= `new_level`, mirroring
    // `addop`'s "clear stack of pending ops" loop. Prefix unary operators
    // are pushed without going through this (they never block on lower
    // operators; they're the thing *being* evaluated first).
    let drain_to =
        |operators: &mut Vec<StackOp<V>>, operands: &mut Vec<Option<V>>, cb: &mut C, new_level: i32| -> Result<(), &'static str> {
            while let Some(top) = operators.last() {
                if top.level >= new_level && top.args != 0 {
                    operate(operators, operands, cb)?;
                } else {
                    break;
                }
            }
            Ok(())
        };

    'outer: while pos < input.len() && !failed {
        let rest = &input[pos..];
        if rest.starts_with("!!") {
            fail!("Error");
        }

        // Prefix operators and open brackets.
        loop {
            let rest = &input[pos..];
            if let Some(stripped) = rest.strip_prefix('(') {
                level += 20;
                pos += rest.len() - stripped.len();
                continue;
            }
            if let Some(bar) = &tables.bar {
                if rest.starts_with(bar.open) {
                    let op_level = level + bar.level;
                    level += BRACKET_LEVEL;
                    pos += bar.open.len();
                    operators.push(StackOp { level: op_level, args: 1, kind: OpKind::Unary(bar.apply) });
                    continue;
                }
            }
            if let Some(c) = rest.chars().next() {
                if c.is_whitespace() {
                    pos += c.len_utf8();
                    continue;
                }
            }
            if let Some(sym) = match_longest_unary(tables.unary, rest) {
                pos += sym.0.len();
                operators.push(StackOp { level: level + sym.1, args: 1, kind: OpKind::Unary(sym.2) });
                continue;
            }
            break;
        }
        if failed {
            break;
        }

        let was = pos;
        let mut missing_middle = false;
        for t in tables.ternary {
            if input[pos..].starts_with(t.close) {
                missing_middle = true;
                break;
            }
        }

        if missing_middle {
            operands.push(None);
        } else {
            let (value, consumed) = cb.parse_operand(&input[pos..]);
            match value {
                Some(v) if consumed > 0 => {
                    pos += consumed;
                    operands.push(Some(v));
                }
                _ => fail!("Missing operand"),
            }
        }
        if failed {
            break;
        }

        // Postfix operators and close brackets.
        loop {
            let rest = &input[pos..];
            if let Some(bar) = &tables.bar {
                if rest.starts_with(bar.close) && level > 0 {
                    pos += bar.close.len();
                    level -= BRACKET_LEVEL;
                    continue;
                }
            }
            if let Some(stripped) = rest.strip_prefix(')') {
                if level == 0 {
                    fail!("Too many close brackets");
                }
                level -= BRACKET_LEVEL;
                pos += rest.len() - stripped.len();
                continue;
            }
            if let Some(c) = rest.chars().next() {
                if c.is_whitespace() {
                    pos += c.len_utf8();
                    continue;
                }
            }
            break;
        }
        if failed {
            break;
        }

        if pos >= input.len() {
            if level != 0 {
                fail!("Unclosed brackets");
            }
            break; // clean exit after the last operand
        }

        let rest = &input[pos..];

        if let Some(sym) = match_longest_binary(tables.binary, rest) {
            if drain_to(&mut operators, &mut operands, cb, level + sym.1).is_err() {
                fail!("Missing/unknown operator");
            }
            pos += sym.0.len();
            operators.push(StackOp { level: level + sym.1, args: 2, kind: OpKind::Binary(sym.2) });
            continue;
        }

        for t in tables.ternary {
            if rest.starts_with(t.open) {
                pos += t.open.len();
                operators.push(StackOp { level: level + t.level, args: 0, kind: OpKind::Ternary(t.apply) });
                continue 'outer;
            }
        }
        for t in tables.ternary {
            if rest.starts_with(t.close) {
                let target = level + t.level;
                loop {
                    let Some(top) = operators.last() else { break };
                    if top.level > target || (top.level == target && top.args == 3) {
                        if operate(&mut operators, &mut operands, cb).is_err() {
                            fail!("Missing/unknown operator");
                        }
                        if failed {
                            break;
                        }
                    } else {
                        break;
                    }
                }
                if failed {
                    break;
                }
                if let Some(top) = operators.last_mut() {
                    if top.level == target && top.args == 0 {
                        top.args = 3;
                        pos += t.close.len();
                        continue 'outer;
                    }
                }
                fail!("Missing/unknown operator");
            }
        }
        if failed {
            break;
        }

        fail!("Missing/unknown operator");
    }

    if !failed {
        while !operators.is_empty() {
            if operate(&mut operators, &mut operands, cb).is_err() {
                cb.fail("Missing/unknown operator", pos);
                failed = true;
                break;
            }
        }
    }

    if failed {
        for v in operands.into_iter().flatten() {
            cb.dispose(v);
        }
        return None;
    }

    if operands.len() != 1 {
        cb.fail("Missing/unknown operator", pos);
        return None;
    }
    match operands.pop().unwrap() {
        Some(v) => Some(cb.finalise(v)),
        None => {
            cb.fail("Missing operand", pos);
            None
        }
    }
}

fn match_longest_unary<'a, V>(table: &'a [UnaryOp<V>], s: &str) -> Option<(&'a str, i32, fn(V) -> V)> {
    table
        .iter()
        .filter_map(|op| match_longest(op.symbols, s).map(|sym| (sym, op.level, op.apply)))
        .max_by_key(|(sym, ..)| sym.len())
}

fn match_longest_binary<'a, V>(table: &'a [BinaryOp<V>], s: &str) -> Option<(&'a str, i32, fn(V, V) -> V)> {
    table
        .iter()
        .filter_map(|op| match_longest(op.symbols, s).map(|sym| (sym, op.level, op.apply)))
        .max_by_key(|(sym, ..)| sym.len())
}
