//! The textual parser (spec §4.E, §6.2): turns a decimal literal into an
//! [`Sd`], tracking how many fractional digits were literally written.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use stringdecimal_base::Config;

use crate::mag::Mag;
use crate::sd::Sd;
use crate::signed::SignedMag;

/// Toggles for the parser's optional grammar extensions, alongside the
/// shared [`Config`] (comma/point characters, max length). Mirrors the
/// CLI's `--no-comma`/`--no-frac`/`--no-si`/`--no-ieee` switches (spec
/// §6.5) as a plain options struct rather than threading four booleans
/// through every call (spec §9's "option-argument pattern" note).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub config: Config,
    /// Accept thousands-grouping commas in the integer part.
    pub comma: bool,
    /// Accept a trailing Unicode vulgar-fraction glyph (`½`, `⅓`, ...).
    pub fraction_glyphs: bool,
    /// Accept a trailing SI magnitude suffix (`k`, `M`, `m`, `%`, ...).
    pub si: bool,
    /// Accept a trailing IEC binary-magnitude suffix (`Ki`, `Mi`, ...).
    pub binary: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { config: Config::default(), comma: true, fraction_glyphs: true, si: true, binary: true }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DigitFamily {
    Ascii,
    Superscript,
    Subscript,
    CircledLight,
    CircledHeavy,
}

fn digit_value(c: char, family: DigitFamily) -> Option<u8> {
    match family {
        DigitFamily::Ascii => c.to_digit(10).map(|d| d as u8),
        DigitFamily::Superscript => match c {
            '⁰' => Some(0),
            '¹' => Some(1),
            '²' => Some(2),
            '³' => Some(3),
            '⁴' => Some(4),
            '⁵' => Some(5),
            '⁶' => Some(6),
            '⁷' => Some(7),
            '⁸' => Some(8),
            '⁹' => Some(9),
            _ => None,
        },
        DigitFamily::Subscript => {
            let v = c as u32;
            if (0x2080..=0x2089).contains(&v) {
                Some((v - 0x2080) as u8)
            } else {
                None
            }
        }
        DigitFamily::CircledLight => match c {
            '⓪' => Some(0),
            '①'..='⑨' => Some((c as u32 - '①' as u32 + 1) as u8),
            _ => None,
        },
        DigitFamily::CircledHeavy => match c {
            '⓿' => Some(0),
            '❶'..='❾' => Some((c as u32 - '❶' as u32 + 1) as u8),
            _ => None,
        },
    }
}

/// Which digit family (if any) `c` belongs to, trying ASCII first.
fn detect_family(c: char) -> Option<DigitFamily> {
    for family in [
        DigitFamily::Ascii,
        DigitFamily::Superscript,
        DigitFamily::Subscript,
        DigitFamily::CircledLight,
        DigitFamily::CircledHeavy,
    ] {
        if digit_value(c, family).is_some() {
            return Some(family);
        }
    }
    None
}

/// Vulgar-fraction glyph → (numerator, denominator).
fn fraction_glyph(c: char) -> Option<(u64, u64)> {
    Some(match c {
        '½' => (1, 2),
        '⅓' => (1, 3),
        '⅔' => (2, 3),
        '¼' => (1, 4),
        '¾' => (3, 4),
        '⅕' => (1, 5),
        '⅖' => (2, 5),
        '⅗' => (3, 5),
        '⅘' => (4, 5),
        '⅙' => (1, 6),
        '⅚' => (5, 6),
        '⅐' => (1, 7),
        '⅛' => (1, 8),
        '⅜' => (3, 8),
        '⅝' => (5, 8),
        '⅞' => (7, 8),
        '⅑' => (1, 9),
        '⅒' => (1, 10),
        _ => return None,
    })
}

/// SI magnitude suffix (longest-match-first order matters: `"da"` before
/// a bare `"d"` would never be reached since `"d"` alone is also valid,
/// so the two-letter tokens are checked first by the caller).
fn si_exponent(token: &str) -> Option<i64> {
    Some(match token {
        "Y" => 24,
        "Z" => 21,
        "E" => 18,
        "P" => 15,
        "T" => 12,
        "G" => 9,
        "M" => 6,
        "k" => 3,
        "h" => 2,
        "da" => 1,
        "d" => -1,
        "c" => -2,
        "m" => -3,
        "μ" | "µ" | "u" | "mc" => -6,
        "n" => -9,
        "p" => -12,
        "f" => -15,
        "a" => -18,
        "z" => -21,
        "y" => -24,
        "%" => -2,
        "‰" => -3,
        "‱" => -4,
        _ => return None,
    })
}

const BINARY_SUFFIXES: &[(&str, u32)] = &[("Ki", 1), ("Mi", 2), ("Gi", 3), ("Ti", 4), ("Pi", 5), ("Ei", 6)];

struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Cursor { s, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.rest().chars();
        it.next();
        it.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

/// Parses a leading decimal literal out of `s`, returning the value and
/// the number of bytes consumed. Unparsed trailing characters (including
/// a complete parse failure) are never an error at this layer — the
/// caller (the evaluator, or a direct user) decides what to do with the
/// rest of the string and the resulting `places`/`failure` state.
pub fn parse(s: &str, opts: &ParseOptions) -> (Sd, usize) {
    let mut cur = Cursor::new(s);

    let negative = match cur.peek() {
        Some('-') | Some('⁻') | Some('₋') => {
            cur.bump();
            true
        }
        Some('+') | Some('⁺') | Some('₊') => {
            cur.bump();
            false
        }
        _ => false,
    };

    let family = cur.peek().filter(|&c| c != opts.config.point_char).and_then(detect_family);

    let active_family = family.unwrap_or(DigitFamily::Ascii);
    let mut digits: Vec<u8> = Vec::new();
    let mut places: i64 = 0;
    let mut saw_any_digit = false;

    // Integer part (with optional thousands grouping; grouping only
    // applies to plain ASCII digits).
    loop {
        match cur.peek() {
            Some(c) if digit_value(c, active_family).is_some() => {
                digits.push(digit_value(c, active_family).unwrap());
                saw_any_digit = true;
                cur.bump();
            }
            Some(c) if c == opts.config.comma_char
                && opts.comma
                && active_family == DigitFamily::Ascii
                && grouping_ok(&cur) =>
            {
                cur.bump();
            }
            _ => break,
        }
    }

    // Fractional part.
    if cur.peek() == Some(opts.config.point_char) {
        let save = cur.pos;
        cur.bump();
        let mut any = false;
        loop {
            match cur.peek() {
                Some(c) if digit_value(c, active_family).is_some() => {
                    digits.push(digit_value(c, active_family).unwrap());
                    places += 1;
                    saw_any_digit = true;
                    any = true;
                    cur.bump();
                }
                _ => break,
            }
        }
        if !any {
            // A lone point with nothing after it is not part of the number.
            cur.pos = save;
        }
    }

    if !saw_any_digit {
        return (Sd::failed(stringdecimal_base::Error::MissingOperand), 0);
    }

    // mag of the first stored digit = (number of integer digits - 1),
    // i.e. the usual "most significant digit's exponent" — but the digit
    // vector currently holds *all* digits (integer + fractional), so mag
    // is simply (len - 1 - places) before any leading/trailing zero trim.
    let mag = digits.len() as i64 - 1 - places;
    let mut value_mag = Mag::from_raw(mag, digits);

    // Exponent.
    if matches!(cur.peek(), Some('e') | Some('E')) {
        let save = cur.pos;
        cur.bump();
        let exp_neg = match cur.peek() {
            Some('-') => {
                cur.bump();
                true
            }
            Some('+') => {
                cur.bump();
                false
            }
            _ => false,
        };
        let mut exp: i64 = 0;
        let mut any = false;
        while let Some(c) = cur.peek() {
            if let Some(d) = c.to_digit(10) {
                exp = exp * 10 + d as i64;
                any = true;
                cur.bump();
            } else {
                break;
            }
        }
        if any {
            value_mag = value_mag.shift10(if exp_neg { -exp } else { exp });
        } else {
            cur.pos = save;
        }
    }

    let mut value = Sd::from_raw(SignedMag::new(value_mag, negative), None, places, None);

    // Suffix: vulgar fraction, binary magnitude, or SI magnitude.
    if let Some(c) = cur.peek() {
        if opts.fraction_glyphs {
            if let Some((num, den)) = fraction_glyph(c) {
                cur.bump();
                let frac = Sd::from_raw(
                    SignedMag::new(Mag::from_u64(num), false),
                    Some(Mag::from_u64(den)),
                    0,
                    None,
                );
                value = crate::sd::sd_add(&value, &frac);
                return (value, cur.pos);
            }
        }
        if opts.binary {
            if let (Some(c1), Some(c2)) = (Some(c), cur.peek2()) {
                let token: String = [c1, c2].iter().collect();
                if let Some((_, exp)) = BINARY_SUFFIXES.iter().find(|(t, _)| *t == token) {
                    cur.bump();
                    cur.bump();
                    let mut multiplier = Sd::from_i64(1);
                    let step = Sd::from_i64(1024);
                    for _ in 0..*exp {
                        multiplier = crate::sd::sd_mul(&multiplier, &step);
                    }
                    value = crate::sd::sd_mul(&value, &multiplier);
                    return (value, cur.pos);
                }
            }
        }
        if opts.si {
            // Longest match first: two-letter tokens ("da") before
            // single-letter ones, so "da" isn't swallowed as "d" + "a".
            if let Some(c2) = cur.peek2() {
                let two: String = [c, c2].iter().collect();
                if let Some(exp) = si_exponent(&two) {
                    cur.bump();
                    cur.bump();
                    value.shift10_i(exp);
                    return (value, cur.pos);
                }
            }
            let one = c.to_string();
            if let Some(exp) = si_exponent(&one) {
                cur.bump();
                value.shift10_i(exp);
                return (value, cur.pos);
            }
        }
    }

    (value, cur.pos)
}

/// Whether a comma at the cursor's current position is a valid
/// thousands-grouping separator: exactly three ASCII digits follow, and
/// a fourth digit does not.
fn grouping_ok(cur: &Cursor<'_>) -> bool {
    let mut chars = cur.rest().chars();
    chars.next(); // the comma itself
    let next3: Vec<char> = chars.by_ref().take(3).collect();
    if next3.len() != 3 || !next3.iter().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !matches!(chars.next(), Some(c) if c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_default(s: &str) -> (Sd, usize) {
        parse(s, &ParseOptions::default())
    }

    #[test]
    fn bare_zero_is_zero() {
        let (v, n) = parse_default("0");
        assert!(v.is_zero());
        assert_eq!(n, 1);
    }

    #[test]
    fn zero_point_zero_is_zero() {
        let (v, _) = parse_default("0.0");
        assert!(v.is_zero());
    }

    #[test]
    fn leading_point_parses_as_fraction() {
        let (v, n) = parse_default(".5");
        assert_eq!(v, Sd::from_raw(SignedMag::new(Mag::from_raw(-1, vec![5]), false), None, 1, None));
        assert_eq!(n, 2);
    }

    #[test]
    fn scientific_notation() {
        let (v, _) = parse_default("1e3");
        assert_eq!(v, Sd::from_raw(SignedMag::new(Mag::from_raw(3, vec![1]), false), None, 0, None));
    }

    #[test]
    fn comma_grouping_matches_scenario_ten() {
        let (v, n) = parse_default("1,234.50");
        let expected = Sd::from_raw(SignedMag::new(Mag::from_raw(3, vec![1, 2, 3, 4, 5]), false), None, 2, None);
        assert_eq!(v, expected);
        assert_eq!(v.places(), 2);
        assert_eq!(n, "1,234.50".len());
    }

    #[test]
    fn nocomma_stops_at_the_comma() {
        let mut opts = ParseOptions::default();
        opts.comma = false;
        let (v, n) = parse("1,234.50", &opts);
        assert_eq!(v, Sd::from_i64(1));
        assert_eq!(n, 1);
    }

    #[test]
    fn binary_suffix_matches_scenario_eleven() {
        let (v, _) = parse_default("2Ki");
        assert_eq!(v, Sd::from_i64(2048));
    }

    #[test]
    fn si_milli_suffix_matches_scenario_eleven() {
        let (v, _) = parse_default("2m");
        assert_eq!(v, Sd::from_raw(SignedMag::new(Mag::from_raw(-3, vec![2]), false), None, 0, None));
    }

    #[test]
    fn vulgar_fraction_matches_scenario_eleven() {
        let (v, _) = parse_default("½");
        let expected = crate::sd::sd_div(&Sd::from_i64(1), &Sd::from_i64(2));
        assert_eq!(v, expected);
    }
}
