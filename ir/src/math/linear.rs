use crate::error::Result;

use super::RationalNumber;

/// Affine transform `a * (x + b)` with an exact rational `a`.
///
/// Used to express tile, block and pixel coordinates as functions of a loop
/// index. [`Self::generate_string`] prints the same computation with integer
/// `+`, `*` and `/` only, so compile-time predictions and emitted code agree.
/// The printed division truncates like C; it matches [`Self::apply_to`] when
/// `(x + b) * a_num` is non-negative, which holds for every coordinate the
/// scheduler produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearCoefficient {
    offset: i64,
    factor: RationalNumber,
}

impl LinearCoefficient {
    /// `floor(num/den * (x + offset))`.
    pub fn new(offset: i64, num: i64, den: i64) -> Result<Self> {
        Ok(Self { offset, factor: RationalNumber::new(num, den)? })
    }

    /// `ceil(num/den * (x + offset))`.
    pub fn with_ceil(offset: i64, num: i64, den: i64) -> Result<Self> {
        Ok(Self { offset, factor: RationalNumber::with_ceil(num, den)? })
    }

    pub const fn from_parts(offset: i64, factor: RationalNumber) -> Self {
        Self { offset, factor }
    }

    pub const fn identity() -> Self {
        Self { offset: 0, factor: RationalNumber::one() }
    }

    /// `k * x` for an integer `k`.
    pub const fn scale(k: i64) -> Self {
        Self { offset: 0, factor: RationalNumber::integer(k) }
    }

    /// `x + b`.
    pub const fn shift(b: i64) -> Self {
        Self { offset: b, factor: RationalNumber::one() }
    }

    pub const fn offset(&self) -> i64 {
        self.offset
    }

    pub const fn factor(&self) -> &RationalNumber {
        &self.factor
    }

    pub const fn is_neutral(&self) -> bool {
        self.offset == 0 && self.factor.is_one()
    }

    pub fn apply_to(&self, x: i64) -> i64 {
        self.factor.apply_to(x + self.offset)
    }

    /// Integer C expression computing `apply_to(x)`.
    pub fn generate_string(&self, x: &str) -> String {
        if self.is_neutral() {
            return x.to_string();
        }

        let shifted = match self.offset {
            0 => format!("({x})"),
            b if b < 0 => format!("(({x})-{})", -b),
            b => format!("(({x})+{b})"),
        };

        let num = self.factor.numerator();
        let den = self.factor.denominator();
        let scaled = if num == 1 { shifted } else { format!("({shifted}*{num})") };

        if den == 1 {
            scaled
        } else if self.factor.is_ceil() {
            format!("(({scaled}+{})/{den})", den - 1)
        } else {
            format!("({scaled}/{den})")
        }
    }
}

impl Default for LinearCoefficient {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Display for LinearCoefficient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*(x{:+})", self.factor, self.offset)
    }
}
