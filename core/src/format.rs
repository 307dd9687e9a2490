//! The formatter (spec §4.F): renders an [`Sd`] back to text under one of
//! seven layout policies.

use alloc::format;
use alloc::string::String;

use stringdecimal_base::{Config, RoundingMode};

use crate::sd::Sd;
use crate::signed::{sdiv, srnd, SignedMag};

/// Layout policy (spec §4.F table; single-character tags match the
/// original CLI's `-f` flag values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatPolicy {
    /// `-` Cap quotient at `places` fractional digits for divisions;
    /// natural for plain values.
    Limit,
    /// `=` Always exactly `places` fractional digits (pad or round).
    Exact,
    /// `+` Enough digits to cover the denominator plus `places` extra.
    Extra,
    /// `*` `input.places + places` digits, then round to `places`.
    Input,
    /// `>` `input.places + places` digits, no final rounding.
    Max,
    /// `e` Scientific notation.
    Exp,
    /// `/` `num/den`, or the integer if the division is exact.
    Rational,
}

/// Options bundle for [`format`] (spec §9's "option-argument pattern").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub policy: FormatPolicy,
    pub places: i64,
    pub round: RoundingMode,
    pub grouping: bool,
    pub config: Config,
}

impl Default for FormatOptions {
    /// `EXTRA` at 3 places is the documented default when no options are
    /// given at all (spec §4.F).
    fn default() -> Self {
        FormatOptions {
            policy: FormatPolicy::Extra,
            places: 3,
            round: RoundingMode::default(),
            grouping: false,
            config: Config::default(),
        }
    }
}

/// Render `value` to text under `opts`.
pub fn format(value: &Sd, opts: &FormatOptions) -> String {
    if let Some(err) = value.failure() {
        return format!("!!{err}");
    }
    match opts.policy {
        FormatPolicy::Limit => format_limit(value, opts),
        FormatPolicy::Exact => format_exact(value, opts),
        FormatPolicy::Extra => format_extra(value, opts),
        FormatPolicy::Input => format_input(value, opts),
        FormatPolicy::Max => format_max(value, opts),
        FormatPolicy::Exp => format_exp(value, opts),
        FormatPolicy::Rational => format_rational(value, opts),
    }
}

fn resolve_quotient(value: &Sd, places: i64, round: RoundingMode) -> SignedMag {
    match value.denominator() {
        None => value.numerator().clone(),
        Some(den) => match sdiv(value.numerator(), &SignedMag::new(den.clone(), false), places, round) {
            Ok((q, _)) => q,
            Err(_) => SignedMag::zero(),
        },
    }
}

fn format_limit(value: &Sd, opts: &FormatOptions) -> String {
    match value.denominator() {
        Some(_) => {
            let q = resolve_quotient(value, opts.places, opts.round);
            render_plain(&q, None, &opts.config, opts.grouping)
        }
        None => render_plain(value.numerator(), None, &opts.config, opts.grouping),
    }
}

fn format_exact(value: &Sd, opts: &FormatOptions) -> String {
    let q = match value.denominator() {
        Some(_) => resolve_quotient(value, opts.places, opts.round),
        None => srnd(value.numerator(), opts.places, opts.round),
    };
    render_plain(&q, Some(opts.places), &opts.config, opts.grouping)
}

fn format_extra(value: &Sd, opts: &FormatOptions) -> String {
    match value.denominator() {
        Some(den) => {
            let div_places = den.digits().len() as i64 + opts.places;
            let q = resolve_quotient(value, div_places, opts.round);
            render_plain(&q, None, &opts.config, opts.grouping)
        }
        None => render_plain(value.numerator(), None, &opts.config, opts.grouping),
    }
}

fn format_input(value: &Sd, opts: &FormatOptions) -> String {
    let wide_places = value.places() + opts.places;
    let wide = resolve_quotient(value, wide_places, opts.round);
    let narrowed = srnd(&wide, opts.places, opts.round);
    render_plain(&narrowed, None, &opts.config, opts.grouping)
}

fn format_max(value: &Sd, opts: &FormatOptions) -> String {
    let wide_places = value.places() + opts.places;
    let wide = resolve_quotient(value, wide_places, opts.round);
    render_plain(&wide, None, &opts.config, opts.grouping)
}

fn format_exp(value: &Sd, opts: &FormatOptions) -> String {
    let resolved = resolve_quotient(value, value.places() + opts.places, opts.round);
    if resolved.is_zero() {
        let body = render_plain(&resolved, Some(opts.places), &opts.config, false);
        return format!("{body}e0");
    }
    let mut exponent = resolved.magnitude().mag();
    let mut mantissa = srnd(&resolved.shift10(-exponent), opts.places, opts.round);
    if mantissa.magnitude().mag() > 0 {
        exponent += 1;
        mantissa = srnd(&resolved.shift10(-exponent), opts.places, opts.round);
    }
    let body = render_plain(&mantissa, Some(opts.places), &opts.config, false);
    format!("{body}e{exponent}")
}

fn format_rational(value: &Sd, opts: &FormatOptions) -> String {
    match value.denominator() {
        None => render_plain(value.numerator(), None, &opts.config, opts.grouping),
        Some(den) => {
            match sdiv(value.numerator(), &SignedMag::new(den.clone(), false), 0, RoundingMode::Truncate) {
                Ok((q, r)) if r.is_zero() => render_plain(&q, None, &opts.config, opts.grouping),
                _ => {
                    let num_text = render_plain(value.numerator(), None, &opts.config, false);
                    let den_text = render_plain(&SignedMag::new(den.clone(), false), None, &opts.config, false);
                    format!("{num_text}/{den_text}")
                }
            }
        }
    }
}

/// Render a signed magnitude as plain decimal text: optional `-`, grouped
/// integer digits, and (if `force_places` is given, or the value has a
/// natural fractional part) a point plus fractional digits.
fn render_plain(v: &SignedMag, force_places: Option<i64>, cfg: &Config, grouping: bool) -> String {
    let mag = v.magnitude();
    let mut out = String::new();
    if v.is_negative() {
        out.push('-');
    }
    let top = mag.mag().max(0);
    for p in (0..=top).rev() {
        if grouping && p < top && (p + 1) % 3 == 0 {
            out.push(cfg.comma_char);
        }
        out.push((b'0' + mag.digit_at_position(p)) as char);
    }
    let lsb = match force_places {
        Some(p) => -p,
        None => mag.lsb_exponent().min(0),
    };
    if lsb < 0 {
        out.push(cfg.point_char);
        for p in (lsb..0).rev() {
            out.push((b'0' + mag.digit_at_position(p)) as char);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mag::Mag;

    fn v(mag: i64, digits: &[u8], neg: bool) -> Sd {
        Sd::from_raw(SignedMag::new(Mag::from_raw(mag, digits.to_vec()), neg), None, 0, None)
    }

    #[test]
    fn limit_renders_plain_value_naturally() {
        let opts = FormatOptions::default();
        assert_eq!(format(&v(2, &[3, 1, 4], false), &opts), "314");
    }

    #[test]
    fn limit_shows_natural_fraction() {
        let opts = FormatOptions::default();
        assert_eq!(format(&v(-1, &[5], false), &opts), "0.5");
    }

    #[test]
    fn exact_pads_to_requested_width() {
        let opts = FormatOptions { policy: FormatPolicy::Exact, places: 2, ..FormatOptions::default() };
        assert_eq!(format(&v(0, &[1], false), &opts), "1.00");
    }

    #[test]
    fn exact_rounds_matches_scenario_two() {
        let a = v(0, &[1], false); // 1
        let b = v(-1, &[3], false); // 0.3
        let diff = crate::sd::sd_sub(&a, &b);
        let opts = FormatOptions { policy: FormatPolicy::Exact, places: 2, ..FormatOptions::default() };
        assert_eq!(format(&diff, &opts), "0.70");
    }

    #[test]
    fn eval_one_third_five_places_matches_scenario_four() {
        let third = crate::sd::sd_div(&Sd::from_i64(1), &Sd::from_i64(3));
        let opts = FormatOptions {
            policy: FormatPolicy::Limit,
            places: 5,
            round: RoundingMode::Banker,
            ..FormatOptions::default()
        };
        assert_eq!(format(&third, &opts), "0.33333");
    }

    #[test]
    fn rational_policy_matches_scenario_five() {
        let third = crate::sd::sd_div(&Sd::from_i64(1), &Sd::from_i64(3));
        let two_thirds_reduced = crate::sd::sd_div(&Sd::from_i64(6), &Sd::from_i64(3));
        let opts = FormatOptions { policy: FormatPolicy::Rational, ..FormatOptions::default() };
        assert_eq!(format(&third, &opts), "1/3");
        assert_eq!(format(&two_thirds_reduced, &opts), "2");
    }

    #[test]
    fn negative_value_renders_with_leading_minus() {
        let opts = FormatOptions::default();
        assert_eq!(format(&v(0, &[5], true), &opts), "-5");
    }

    #[test]
    fn grouping_inserts_commas_every_three_digits() {
        let opts = FormatOptions { grouping: true, ..FormatOptions::default() };
        assert_eq!(format(&v(6, &[1, 2, 3, 4, 5, 6, 7], false), &opts), "1,234,567");
    }

    #[test]
    fn failure_renders_with_bang_bang_prefix() {
        let bad = crate::sd::sd_div(&Sd::from_i64(1), &Sd::from_i64(0));
        let opts = FormatOptions::default();
        assert_eq!(format(&bad, &opts), "!!Division by zero");
    }
}
