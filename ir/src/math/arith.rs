//! Integer helpers shared by the rational types and the tiling passes.

/// Greatest common divisor, recursive Euclid.
///
/// `gcd(x, 0) == x`, so `gcd(0, 0) == 0`.
pub fn gcd(a: u64, b: u64) -> u64 {
    if a < b {
        return gcd(b, a);
    }
    if b == 0 { a } else { gcd(b, a % b) }
}

/// [`gcd`] over 128-bit operands, for intermediate rational products.
pub fn gcd_wide(a: u128, b: u128) -> u128 {
    if b == 0 { a } else { gcd_wide(b, a % b) }
}

/// Least common multiple; zero when either side is zero.
pub fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// Signed convenience wrapper over [`lcm`] for grain vectors, which are
/// stored as `i64` but always positive.
pub fn lcm_i64(a: i64, b: i64) -> i64 {
    lcm(a.unsigned_abs(), b.unsigned_abs()) as i64
}

pub const fn clamp_to_positive(x: i64) -> i64 {
    if x < 0 { 0 } else { x }
}

/// `floor(n / d)` for `d > 0`.
pub const fn floor_div(n: i64, d: i64) -> i64 {
    n.div_euclid(d)
}

/// `ceil(n / d)` for `d > 0`.
pub const fn ceil_div(n: i64, d: i64) -> i64 {
    -((-n).div_euclid(d))
}
