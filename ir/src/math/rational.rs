use snafu::{OptionExt, ensure};

use crate::error::{RationalOverflowSnafu, Result, ZeroDenominatorSnafu};

use super::arith::gcd_wide;

/// Exact rational number with a rounding direction.
///
/// The fraction is always stored reduced with a strictly positive
/// denominator. `apply_to` multiplies an integer by the fraction and rounds
/// with floor (default) or ceil semantics, exactly as the integer expression
/// printed by [`super::LinearCoefficient::generate_string`] would.
#[derive(Debug, Clone, Copy)]
pub struct RationalNumber {
    num: i64,
    den: i64,
    ceil: bool,
}

impl RationalNumber {
    /// Floor-rounded `num / den`.
    pub fn new(num: i64, den: i64) -> Result<Self> {
        Self::with_rounding(num, den, false)
    }

    /// Ceil-rounded `num / den`.
    pub fn with_ceil(num: i64, den: i64) -> Result<Self> {
        Self::with_rounding(num, den, true)
    }

    pub fn with_rounding(num: i64, den: i64, ceil: bool) -> Result<Self> {
        ensure!(den != 0, ZeroDenominatorSnafu { num });
        Self::reduced(num as i128, den as i128, ceil)
    }

    /// Reduce `num / den` computed on 128 bits; fails when the reduced
    /// fraction does not fit back in 64 bits.
    fn reduced(num: i128, den: i128, ceil: bool) -> Result<Self> {
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd_wide(num.unsigned_abs(), den.unsigned_abs()).max(1) as i128;
        let (num, den) = (num / g, den / g);
        let narrow = |n: i128| i64::try_from(n).ok();
        let (num, den) = narrow(num).zip(narrow(den)).context(RationalOverflowSnafu { num, den })?;
        Ok(Self { num, den, ceil })
    }

    pub const fn integer(n: i64) -> Self {
        Self { num: n, den: 1, ceil: false }
    }

    pub const fn one() -> Self {
        Self::integer(1)
    }

    pub const fn numerator(&self) -> i64 {
        self.num
    }

    pub const fn denominator(&self) -> i64 {
        self.den
    }

    pub const fn is_ceil(&self) -> bool {
        self.ceil
    }

    /// `floor(x * num / den)`, or `ceil(..)` for ceil-rounded numbers.
    pub fn apply_to(&self, x: i64) -> i64 {
        let p = x as i128 * self.num as i128;
        let d = self.den as i128;
        let q = if self.ceil { -((-p).div_euclid(d)) } else { p.div_euclid(d) };
        q as i64
    }

    /// Product, reduced. Keeps the rounding direction of `self`.
    pub fn multiply_by(&self, other: &RationalNumber) -> Result<RationalNumber> {
        Self::reduced(self.num as i128 * other.num as i128, self.den as i128 * other.den as i128, self.ceil)
    }

    /// Quotient, reduced. Fails when `other` is zero.
    pub fn divide_by(&self, other: &RationalNumber) -> Result<RationalNumber> {
        ensure!(other.num != 0, ZeroDenominatorSnafu { num: self.num });
        Self::reduced(self.num as i128 * other.den as i128, self.den as i128 * other.num as i128, self.ceil)
    }

    /// Structural identity, including the rounding direction.
    pub fn is_same(&self, other: &RationalNumber) -> bool {
        self.num == other.num && self.den == other.den && self.ceil == other.ceil
    }

    pub const fn is_one(&self) -> bool {
        self.num == self.den
    }

    pub const fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub const fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub const fn is_strictly_positive(&self) -> bool {
        self.num > 0
    }

    pub const fn is_strictly_negative(&self) -> bool {
        self.num < 0
    }
}

/// Value equality by cross multiplication; the rounding direction is ignored.
impl PartialEq for RationalNumber {
    fn eq(&self, other: &Self) -> bool {
        self.num as i128 * other.den as i128 == other.num as i128 * self.den as i128
    }
}

impl Eq for RationalNumber {}

impl From<i64> for RationalNumber {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl std::fmt::Display for RationalNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else if self.ceil {
            write!(f, "ceil({}/{})", self.num, self.den)
        } else {
            write!(f, "floor({}/{})", self.num, self.den)
        }
    }
}
