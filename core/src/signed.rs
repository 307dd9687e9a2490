//! The signed layer: [`SignedMag`] and the arithmetic primitives that give
//! [`Mag`] a sign (spec §4.C).

use alloc::vec;
use core::cmp::Ordering;

use stringdecimal_base::{Discarded, Error, RoundingMode, Sign};

use crate::mag::{uadd, ucmp, umul, usub, Mag};

/// A signed decimal magnitude: `Mag` plus a sign, with the invariant that
/// zero is always positive (spec S1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedMag {
    mag: Mag,
    neg: bool,
}

impl SignedMag {
    pub fn zero() -> Self {
        SignedMag { mag: Mag::zero(), neg: false }
    }

    pub fn one() -> Self {
        SignedMag { mag: Mag::one(), neg: false }
    }

    /// Build from a magnitude and a sign, enforcing S1.
    pub fn new(mag: Mag, neg: bool) -> Self {
        let neg = neg && !mag.is_zero();
        SignedMag { mag, neg }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mag.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.neg
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        Sign::of(self.neg)
    }

    #[inline]
    pub fn magnitude(&self) -> &Mag {
        &self.mag
    }

    pub fn negated(&self) -> Self {
        SignedMag { mag: self.mag.clone(), neg: !self.neg && !self.mag.is_zero() }
    }

    pub fn abs(&self) -> Self {
        SignedMag { mag: self.mag.clone(), neg: false }
    }

    pub fn shift10(&self, k: i64) -> Self {
        SignedMag { mag: self.mag.shift10(k), neg: self.neg }
    }
}

/// Signed compare (spec §4.C `scmp`).
pub fn scmp(a: &SignedMag, b: &SignedMag) -> Ordering {
    match (a.neg, b.neg) {
        (false, false) => ucmp(&a.mag, &b.mag, 0),
        (true, true) => ucmp(&a.mag, &b.mag, 0).reverse(),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

/// Signed add (spec §4.C `sadd`). Same-sign operands add magnitudes and
/// keep the sign; opposite-sign operands subtract the smaller magnitude
/// from the larger and take its sign, collapsing to positive zero on an
/// exact cancellation (S1).
pub fn sadd(a: &SignedMag, b: &SignedMag) -> SignedMag {
    if a.neg == b.neg {
        let mag = uadd(&a.mag, &b.mag, 0);
        let neg = a.neg && !mag.is_zero();
        return SignedMag { mag, neg };
    }
    match ucmp(&a.mag, &b.mag, 0) {
        Ordering::Equal => SignedMag::zero(),
        Ordering::Greater => SignedMag { mag: usub(&a.mag, &b.mag, 0), neg: a.neg },
        Ordering::Less => SignedMag { mag: usub(&b.mag, &a.mag, 0), neg: b.neg },
    }
}

/// Signed subtract: `a + (-b)`.
pub fn ssub(a: &SignedMag, b: &SignedMag) -> SignedMag {
    sadd(a, &b.negated())
}

/// Signed multiply (spec §4.C `smul`): magnitudes multiply, signs XOR.
pub fn smul(a: &SignedMag, b: &SignedMag) -> SignedMag {
    let mag = umul(&a.mag, &b.mag);
    let neg = !mag.is_zero() && (a.neg != b.neg);
    SignedMag { mag, neg }
}

/// Signed division with rounding and remainder (spec §4.C `sdiv`).
///
/// The rounding mode is adjusted for the result's sign before the
/// magnitude-only division runs (see [`RoundingMode::for_sign`] and the
/// note on [`crate::mag::udiv`]); the remainder's sign is the dividend's
/// sign, flipped if rounding bumped the quotient.
pub fn sdiv(
    a: &SignedMag,
    b: &SignedMag,
    places: i64,
    round: RoundingMode,
) -> Result<(SignedMag, SignedMag), Error> {
    if b.mag.is_zero() {
        return Err(Error::DivisionByZero);
    }
    let result_neg = a.neg != b.neg;
    let mode = round.for_sign(result_neg);
    let (qmag, rmag, bumped) =
        crate::mag::udiv(&a.mag, &b.mag, places, mode).expect("divisor checked non-zero above");
    let quotient = SignedMag::new(qmag, result_neg);
    let remainder = SignedMag::new(rmag, a.neg != bumped);
    Ok((quotient, remainder))
}

/// Round a signed magnitude to `places` fractional decimal places (spec
/// §4.C `srnd`), applying `round` as the tie-breaking rule.
///
/// Padding a value with *fewer* fractional digits than `places` up to the
/// requested width is a formatting concern, not a representation one —
/// see DESIGN.md for why this crate doesn't keep a non-normalised `Mag`
/// around just to remember trailing zeros; `Sd::places` carries that
/// information instead.
pub fn srnd(a: &SignedMag, places: i64, round: RoundingMode) -> SignedMag {
    let truncated = truncate(&a.mag, places);
    if truncated.mag.is_zero() && a.mag.is_zero() {
        return SignedMag::zero();
    }

    let discarded_tail = usub(&a.mag, &truncated.mag, 0);
    let half = Mag::from_raw(-places - 1, vec![5]);
    let discarded = if discarded_tail.is_zero() {
        Discarded::Zero
    } else {
        match ucmp(&discarded_tail, &half, 0) {
            Ordering::Less => Discarded::LessThanHalf,
            Ordering::Equal => Discarded::ExactlyHalf,
            Ordering::Greater => Discarded::MoreThanHalf,
        }
    };
    let lsb_odd = truncated.mag.digits().last().map_or(false, |d| d % 2 == 1);

    let mode = round.for_sign(a.neg);
    let final_mag = if mode.bump(discarded, lsb_odd) {
        uadd(&truncated.mag, &Mag::one(), -places)
    } else {
        truncated.mag
    };
    SignedMag::new(final_mag, a.neg)
}

/// Drop digits below decimal position `-places`, returning a normalised
/// magnitude. Internal helper for [`srnd`].
struct Truncated {
    mag: Mag,
}

fn truncate(m: &Mag, places: i64) -> Truncated {
    if m.is_zero() {
        return Truncated { mag: Mag::zero() };
    }
    let lsb = m.lsb_exponent();
    if lsb >= -places {
        return Truncated { mag: m.clone() };
    }
    let drop = (-places - lsb) as usize;
    let keep = m.digits().len().saturating_sub(drop);
    if keep == 0 {
        return Truncated { mag: Mag::zero() };
    }
    Truncated { mag: Mag::from_raw(m.mag(), m.digits()[..keep].to_vec()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(mag: i64, digits: &[u8]) -> SignedMag {
        SignedMag::new(Mag::from_raw(mag, digits.to_vec()), false)
    }

    fn neg(mag: i64, digits: &[u8]) -> SignedMag {
        SignedMag::new(Mag::from_raw(mag, digits.to_vec()), true)
    }

    #[test]
    fn sadd_opposite_signs_cancel_to_positive_zero() {
        let a = pos(0, &[5]);
        let b = neg(0, &[5]);
        let r = sadd(&a, &b);
        assert!(r.is_zero());
        assert!(!r.is_negative());
    }

    #[test]
    fn sadd_opposite_signs_takes_larger_operands_sign() {
        let a = pos(1, &[1, 0]); // 10
        let b = neg(0, &[3]); // -3
        let r = sadd(&a, &b);
        assert!(!r.is_negative());
        assert_eq!(r.magnitude(), &Mag::from_raw(0, vec![7]));
    }

    #[test]
    fn ssub_is_add_of_negation() {
        let a = pos(0, &[5]);
        let b = pos(0, &[3]);
        let r = ssub(&a, &b);
        assert_eq!(r.magnitude(), &Mag::from_raw(0, vec![2]));
        assert!(!r.is_negative());
    }

    #[test]
    fn smul_xors_signs() {
        let a = neg(0, &[4]);
        let b = pos(0, &[5]);
        let r = smul(&a, &b);
        assert!(r.is_negative());
        assert_eq!(r.magnitude(), &Mag::from_raw(1, vec![2, 0]));
    }

    #[test]
    fn smul_zero_result_is_positive() {
        let r = smul(&SignedMag::zero(), &pos(3, &[9, 9]));
        assert!(!r.is_negative());
    }

    #[test]
    fn sdiv_by_zero_errors() {
        assert_eq!(
            sdiv(&SignedMag::one(), &SignedMag::zero(), 2, RoundingMode::Banker).unwrap_err(),
            Error::DivisionByZero
        );
    }

    #[test]
    fn sdiv_negative_divisor_flips_quotient_sign() {
        let a = pos(1, &[1, 0]); // 10
        let b = neg(0, &[4]); // -4
        let (q, _r) = sdiv(&a, &b, 2, RoundingMode::Banker).unwrap();
        assert!(q.is_negative());
        assert_eq!(q.magnitude(), &Mag::from_raw(0, vec![2, 5])); // -2.50
    }

    #[test]
    fn srnd_truncates_and_bumps() {
        let v = pos(-1, &[1, 2, 5]); // 0.125
        let rounded = srnd(&v, 2, RoundingMode::Banker);
        assert_eq!(rounded.magnitude(), &Mag::from_raw(-2, vec![1, 2])); // 0.12
    }

    #[test]
    fn srnd_with_small_value_below_cutoff_only_bumps_when_due() {
        let v = pos(-4, &[3]); // 0.0003
        let truncate_only = srnd(&v, 2, RoundingMode::Round);
        assert!(truncate_only.is_zero());
        let round_up = srnd(&v, 2, RoundingMode::Up);
        assert_eq!(round_up.magnitude(), &Mag::from_raw(-2, vec![1])); // 0.01
    }

    #[test]
    fn srnd_negative_value_uses_swapped_floor_ceiling() {
        let v = neg(-1, &[1, 5]); // -0.15
        let floored = srnd(&v, 1, RoundingMode::Floor);
        // Floor on a negative value rounds away from zero (towards -inf).
        assert_eq!(floored.magnitude(), &Mag::from_raw(-1, vec![2])); // -0.2
        assert!(floored.is_negative());
    }
}
