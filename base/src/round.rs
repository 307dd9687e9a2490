//! The six rounding modes shared by [division][crate] and the standalone
//! round operation (spec §4.C).

/// How much of the discarded tail remains once a value is truncated to the
/// requested number of places. This is the sign-agnostic input to
/// [`RoundingMode::bump`] — the caller always normalises sign first via
/// [`RoundingMode::for_sign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discarded {
    /// All discarded digits are zero: the value was already exact.
    Zero,
    /// The discarded tail is strictly less than half a unit in the last
    /// kept place.
    LessThanHalf,
    /// The discarded tail is exactly half a unit in the last kept place.
    ExactlyHalf,
    /// The discarded tail is strictly more than half a unit in the last
    /// kept place.
    MoreThanHalf,
}

impl Discarded {
    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, Discarded::Zero)
    }
}

/// One of the six rounding modes a division or a standalone round can be
/// asked to apply.
///
/// # Examples
/// ```
/// use stringdecimal_base::RoundingMode;
/// assert_eq!(RoundingMode::from_char('B'), Some(RoundingMode::Banker));
/// assert_eq!(RoundingMode::default(), RoundingMode::Banker);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// `T` — towards zero, never bump.
    Truncate,
    /// `U` — always away from zero if any discarded digit is non-zero.
    Up,
    /// `F` — towards `-inf`.
    Floor,
    /// `C` — towards `+inf`.
    Ceiling,
    /// `R` — away from zero iff the first discarded digit is `>= 5`.
    Round,
    /// `B` — half-to-even ("banker's rounding"); the default.
    Banker,
}

impl Default for RoundingMode {
    /// Banker's rounding is the default when no mode is given (spec §4.C).
    #[inline]
    fn default() -> Self {
        RoundingMode::Banker
    }
}

impl RoundingMode {
    /// Single-character tag used by the original textual API (`-r` CLI
    /// flag, `sd_round_t` enum values).
    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            RoundingMode::Truncate => 'T',
            RoundingMode::Up => 'U',
            RoundingMode::Floor => 'F',
            RoundingMode::Ceiling => 'C',
            RoundingMode::Round => 'R',
            RoundingMode::Banker => 'B',
        }
    }

    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'T' | 't' => Some(RoundingMode::Truncate),
            'U' | 'u' => Some(RoundingMode::Up),
            'F' | 'f' => Some(RoundingMode::Floor),
            'C' | 'c' => Some(RoundingMode::Ceiling),
            'R' | 'r' => Some(RoundingMode::Round),
            'B' | 'b' => Some(RoundingMode::Banker),
            _ => None,
        }
    }

    /// Floor and Ceiling swap under a sign flip so that the half-logic in
    /// [`Self::bump`] can be expressed without caring about the value's
    /// sign — it always sees "discarded tail above/below half", and the
    /// direction relative to `-inf`/`+inf` is folded in here.
    #[inline]
    pub const fn for_sign(self, negative: bool) -> Self {
        if !negative {
            return self;
        }
        match self {
            RoundingMode::Floor => RoundingMode::Ceiling,
            RoundingMode::Ceiling => RoundingMode::Floor,
            other => other,
        }
    }

    /// Decide whether to bump the kept digits up by one unit, given how
    /// much was discarded and whether the kept least-significant digit is
    /// odd. `self` must already have been passed through [`Self::for_sign`]
    /// for the value's actual sign.
    #[inline]
    pub const fn bump(self, discarded: Discarded, lsb_odd: bool) -> bool {
        use Discarded::*;
        match self {
            RoundingMode::Truncate => false,
            RoundingMode::Floor => false,
            RoundingMode::Up | RoundingMode::Ceiling => !discarded.is_zero(),
            RoundingMode::Round => matches!(discarded, ExactlyHalf | MoreThanHalf),
            RoundingMode::Banker => match discarded {
                MoreThanHalf => true,
                ExactlyHalf => lsb_odd,
                _ => false,
            },
        }
    }
}
