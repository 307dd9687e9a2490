//! The rational value [`Sd`] — the public arithmetic type (spec §4.D).

use alloc::vec;
use core::cmp::Ordering;
use core::ops::{Add, Div, Mul, Sub};

use stringdecimal_base::{Error, RoundingMode, Sign};

use crate::mag::{ucmp, umul, Mag};
use crate::signed::{sadd, scmp, sdiv, smul, srnd, ssub, SignedMag};

/// A rational value held as `num / den` (or just `num` when `den` is
/// `None`), deferring division so that chains of `+ - * /` stay exact
/// until something actually asks for a formatted result.
///
/// `failure` is sticky: once set, it survives further operations (spec
/// §7's propagation policy) so that a chained expression never panics —
/// it just keeps carrying the first error it hit.
#[derive(Debug, Clone)]
pub struct Sd {
    num: SignedMag,
    den: Option<Mag>,
    places: i64,
    failure: Option<Error>,
}

struct Crossed {
    l_num: SignedMag,
    r_num: SignedMag,
    den: Option<Mag>,
}

fn effective_den(d: &Option<Mag>) -> Mag {
    d.clone().unwrap_or_else(Mag::one)
}

/// Cross-multiply helper (spec §4.D "Cross"): puts `l` and `r` over a
/// common denominator, skipping the multiplication when the denominators
/// already agree (including when both are implicitly `1`).
fn cross(l: &Sd, r: &Sd) -> Crossed {
    if l.den.is_none() && r.den.is_none() {
        return Crossed { l_num: l.num.clone(), r_num: r.num.clone(), den: None };
    }
    let ld = effective_den(&l.den);
    let rd = effective_den(&r.den);
    if ucmp(&ld, &rd, 0) == Ordering::Equal {
        return Crossed { l_num: l.num.clone(), r_num: r.num.clone(), den: Some(ld) };
    }
    let l_num = SignedMag::new(umul(l.num.magnitude(), &rd), l.num.is_negative());
    let r_num = SignedMag::new(umul(r.num.magnitude(), &ld), r.num.is_negative());
    Crossed { l_num, r_num, den: Some(umul(&ld, &rd)) }
}

fn combine_failure(l: &Sd, r: &Sd) -> Option<Error> {
    l.failure.clone().or_else(|| r.failure.clone())
}

impl Sd {
    pub fn zero() -> Self {
        Sd { num: SignedMag::zero(), den: None, places: 0, failure: None }
    }

    pub fn one() -> Self {
        Sd { num: SignedMag::one(), den: None, places: 0, failure: None }
    }

    pub fn from_i64(n: i64) -> Self {
        let mag = Mag::from_u64(n.unsigned_abs());
        Sd { num: SignedMag::new(mag, n < 0), den: None, places: 0, failure: None }
    }

    /// Constructs through a textual rendering at 32 significant digits
    /// (spec §9 open question ii — exactness beyond that isn't promised).
    pub fn from_f64(f: f64) -> Self {
        if f == 0.0 {
            return Sd::zero();
        }
        let rendered = alloc::format!("{f:.32e}");
        crate::parse::parse(&rendered, &crate::parse::ParseOptions::default()).0
    }

    pub(crate) fn from_raw(num: SignedMag, den: Option<Mag>, places: i64, failure: Option<Error>) -> Self {
        Sd { num, den, places, failure }.tidy()
    }

    /// Builds a value that carries `err` as its sticky failure (spec §7):
    /// the evaluator uses this to turn a driver-level failure (a missing
    /// operand, an unclosed bracket, a length-limit breach caught at the
    /// parse boundary) into an ordinary [`Sd`] that renders as `!!message`.
    pub fn failed(err: Error) -> Self {
        Sd { num: SignedMag::zero(), den: None, places: 0, failure: Some(err) }
    }

    pub(crate) fn numerator(&self) -> &SignedMag {
        &self.num
    }

    pub(crate) fn denominator(&self) -> Option<&Mag> {
        self.den.as_ref()
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_neg(&self) -> bool {
        self.num.is_negative()
    }

    pub fn is_pos(&self) -> bool {
        !self.num.is_zero() && !self.num.is_negative()
    }

    pub fn places(&self) -> i64 {
        self.places
    }

    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    pub fn set_places(&mut self, places: i64) -> &mut Self {
        self.places = places;
        self
    }

    /// Restores invariants T1 (sign lives on `num`, `den` never negative —
    /// automatic here, `Mag` has no sign) and T2 (a power-of-ten
    /// denominator is absorbed into `num`'s magnitude).
    fn tidy(mut self) -> Self {
        if let Some(den) = &self.den {
            if let Some(k) = den.as_power_of_ten() {
                self.num = self.num.shift10(-k);
                self.den = None;
            }
        }
        self
    }

    pub fn neg_i(&mut self) -> &mut Self {
        self.num = self.num.negated();
        self
    }

    pub fn abs_i(&mut self) -> &mut Self {
        self.num = self.num.abs();
        self
    }

    /// Swaps numerator and denominator, moving any sign to the new
    /// numerator. A missing denominator is treated as an implicit `1`.
    pub fn inv_i(&mut self) -> &mut Self {
        if self.num.is_zero() {
            self.failure = Some(Error::DivisionByZero);
            return self;
        }
        let old_den = self.den.take().unwrap_or_else(Mag::one);
        let old_num_mag = self.num.magnitude().clone();
        let neg = self.num.is_negative();
        self.num = SignedMag::new(old_den, neg);
        self.den = Some(old_num_mag);
        *self = core::mem::replace(self, Sd::zero()).tidy();
        self
    }

    pub fn shift10_i(&mut self, k: i64) -> &mut Self {
        self.num = self.num.shift10(k);
        self
    }

    /// Rounds to `places` fractional digits (spec §4.C `srnd`, lifted to
    /// the rational layer). A pending denominator is resolved first.
    pub fn rnd(&self, places: i64, round: RoundingMode) -> Sd {
        if let Some(failure) = &self.failure {
            return Sd::failed(failure.clone());
        }
        let num = match &self.den {
            None => srnd(&self.num, places, round),
            Some(den) => match sdiv(&self.num, &SignedMag::new(den.clone(), false), places, round) {
                Ok((q, _)) => q,
                Err(e) => return Sd::failed(e),
            },
        };
        Sd { num, den: None, places, failure: None }
    }

    /// The remainder-surfacing division entry point (supplemented
    /// feature: the original always produced a remainder alongside the
    /// quotient).
    pub fn div_rem(&self, other: &Sd, places: i64, round: RoundingMode) -> (Sd, Sd) {
        if other.is_zero() {
            let f = Sd::failed(Error::DivisionByZero);
            return (f.clone(), f);
        }
        match sdiv(&self.num, &other.num, places, round) {
            Ok((q, r)) => (
                Sd { num: q, den: None, places, failure: combine_failure(self, other) },
                Sd { num: r, den: None, places, failure: combine_failure(self, other) },
            ),
            Err(e) => (Sd::failed(e.clone()), Sd::failed(e)),
        }
    }

    /// `r` must be a non-negative integer; binary exponentiation squares
    /// the base and multiplies into the accumulator per set bit (spec
    /// §4.D `sd_pow`).
    pub fn pow(&self, r: &Sd) -> Sd {
        if let Some(f) = combine_failure(self, r) {
            return Sd::failed(f);
        }
        let exponent = match r.as_nonnegative_integer() {
            Some(n) => n,
            None => return Sd::failed(Error::PowerNotPositiveInteger),
        };
        let mut result = Sd::one();
        let mut base = self.clone();
        let mut n = exponent;
        while n > 0 {
            if n & 1 == 1 {
                result = sd_mul(&result, &base);
            }
            n >>= 1;
            if n > 0 {
                base = sd_mul(&base, &base);
            }
        }
        result
    }

    /// Resolves to a non-negative integer exponent, or `None` if `self`
    /// is negative or has a non-zero fractional remainder.
    fn as_nonnegative_integer(&self) -> Option<u64> {
        if self.num.is_negative() {
            return None;
        }
        match &self.den {
            None => self.num.magnitude().to_u64(),
            Some(den) => {
                let (q, r) = sdiv(&self.num, &SignedMag::new(den.clone(), false), 0, RoundingMode::Truncate).ok()?;
                if !r.is_zero() {
                    return None;
                }
                q.magnitude().to_u64()
            }
        }
    }
}

/// `sd_add` (spec §4.D): cross-multiplies onto a common denominator when
/// needed, then adds numerators.
pub fn sd_add(l: &Sd, r: &Sd) -> Sd {
    if let Some(f) = combine_failure(l, r) {
        return Sd::failed(f);
    }
    let Crossed { l_num, r_num, den } = cross(l, r);
    Sd::from_raw(sadd(&l_num, &r_num), den, l.places.max(r.places), None)
}

/// `sd_sub`: add with the right-hand sign flipped.
pub fn sd_sub(l: &Sd, r: &Sd) -> Sd {
    if let Some(f) = combine_failure(l, r) {
        return Sd::failed(f);
    }
    let Crossed { l_num, r_num, den } = cross(l, r);
    Sd::from_raw(ssub(&l_num, &r_num), den, l.places.max(r.places), None)
}

/// `sd_mul`: cancels a numerator against the other side's denominator
/// when they match exactly (this is what keeps e.g. `(1/3) * 3` exact
/// instead of leaving an un-reduced `3/3`); otherwise multiplies
/// numerators and denominators outright.
pub fn sd_mul(l: &Sd, r: &Sd) -> Sd {
    if let Some(f) = combine_failure(l, r) {
        return Sd::failed(f);
    }
    if let Some(rden) = &r.den {
        if ucmp(l.num.magnitude(), rden, 0) == Ordering::Equal {
            let sign = l.num.sign() * r.num.sign();
            let num = SignedMag::new(r.num.magnitude().clone(), sign.is_negative());
            return Sd::from_raw(num, l.den.clone(), l.places.max(r.places), None);
        }
    }
    if let Some(lden) = &l.den {
        if ucmp(r.num.magnitude(), lden, 0) == Ordering::Equal {
            let sign = l.num.sign() * r.num.sign();
            let num = SignedMag::new(l.num.magnitude().clone(), sign.is_negative());
            return Sd::from_raw(num, r.den.clone(), l.places.max(r.places), None);
        }
    }
    let num = smul(&l.num, &r.num);
    let den = match (&l.den, &r.den) {
        (None, None) => None,
        (Some(a), None) => Some(a.clone()),
        (None, Some(b)) => Some(b.clone()),
        (Some(a), Some(b)) => Some(umul(a, b)),
    };
    Sd::from_raw(num, den, l.places.max(r.places), None)
}

/// `sd_div`: a zero-denominator divisor fails outright. With no
/// denominator on either side this constructs a new rational directly;
/// otherwise the divisor is inverted and multiplied in.
pub fn sd_div(l: &Sd, r: &Sd) -> Sd {
    if let Some(f) = combine_failure(l, r) {
        return Sd::failed(f);
    }
    if r.num.is_zero() {
        return Sd::failed(Error::DivisionByZero);
    }
    if l.den.is_none() && r.den.is_none() {
        let sign = l.num.sign() * r.num.sign();
        let num = SignedMag::new(l.num.magnitude().clone(), sign.is_negative());
        return Sd::from_raw(num, Some(r.num.magnitude().clone()), l.places.max(r.places), None);
    }
    let mut r_inv = r.clone();
    r_inv.inv_i();
    sd_mul(l, &r_inv)
}

/// `sd_cmp`: cross then compare signed values.
pub fn sd_cmp(l: &Sd, r: &Sd) -> Ordering {
    let Crossed { l_num, r_num, .. } = cross(l, r);
    scmp(&l_num, &r_num)
}

/// `sd_abs_cmp`: cross then compare magnitudes only.
pub fn sd_abs_cmp(l: &Sd, r: &Sd) -> Ordering {
    let Crossed { l_num, r_num, .. } = cross(l, r);
    ucmp(l_num.magnitude(), r_num.magnitude(), 0)
}

impl PartialEq for Sd {
    fn eq(&self, other: &Self) -> bool {
        sd_cmp(self, other) == Ordering::Equal
    }
}

impl Eq for Sd {}

impl PartialOrd for Sd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(sd_cmp(self, other))
    }
}

impl Ord for Sd {
    fn cmp(&self, other: &Self) -> Ordering {
        sd_cmp(self, other)
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $func:path) => {
        impl $trait<Sd> for Sd {
            type Output = Sd;
            fn $method(self, rhs: Sd) -> Sd {
                $func(&self, &rhs)
            }
        }
        impl $trait<&Sd> for Sd {
            type Output = Sd;
            fn $method(self, rhs: &Sd) -> Sd {
                $func(&self, rhs)
            }
        }
        impl $trait<Sd> for &Sd {
            type Output = Sd;
            fn $method(self, rhs: Sd) -> Sd {
                $func(self, &rhs)
            }
        }
        impl $trait<&Sd> for &Sd {
            type Output = Sd;
            fn $method(self, rhs: &Sd) -> Sd {
                $func(self, rhs)
            }
        }
    };
}

forward_binop!(Add, add, sd_add);
forward_binop!(Sub, sub, sd_sub);
forward_binop!(Mul, mul, sd_mul);
forward_binop!(Div, div, sd_div);

#[cfg(feature = "num-traits")]
impl num_traits::Zero for Sd {
    fn zero() -> Self {
        Sd::zero()
    }

    fn is_zero(&self) -> bool {
        Sd::is_zero(self)
    }
}

#[cfg(feature = "num-traits")]
impl num_traits::One for Sd {
    fn one() -> Self {
        Sd::one()
    }
}

/// Serialises through the `EXTRA` textual form and reparses it, so the
/// wire format is just the number as written (spec §6.1's round-trip
/// text, not the internal numerator/denominator split).
#[cfg(feature = "serde")]
impl serde::Serialize for Sd {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let opts = crate::format::FormatOptions::default();
        serializer.serialize_str(&crate::format::format(self, &opts))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Sd {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = alloc::string::String::deserialize(deserializer)?;
        let (value, _consumed) = crate::parse::parse(&s, &crate::parse::ParseOptions::default());
        if let Some(err) = value.failure() {
            return Err(serde::de::Error::custom(err));
        }
        Ok(value)
    }
}
