use test_case::test_case;

use crate::error::Error;
use crate::math::{RationalNumber, gcd, lcm};

#[test]
fn test_apply_floor() {
    let r = RationalNumber::new(2, 3).unwrap();
    assert_eq!(r.apply_to(10), 6);
}

#[test]
fn test_apply_ceil() {
    let r = RationalNumber::with_ceil(2, 3).unwrap();
    assert_eq!(r.apply_to(10), 7);
}

#[test]
fn test_apply_negative_rounds_toward_minus_infinity() {
    let r = RationalNumber::new(1, 2).unwrap();
    assert_eq!(r.apply_to(-3), -2);
    let r = RationalNumber::with_ceil(1, 2).unwrap();
    assert_eq!(r.apply_to(-3), -1);
}

#[test_case(4, -6, -2, 3; "negative denominator")]
#[test_case(-4, -6, 2, 3; "both negative")]
#[test_case(12, 4, 3, 1; "integer")]
#[test_case(0, 7, 0, 1; "zero")]
#[test_case(5, 7, 5, 7; "already reduced")]
fn test_normalization(num: i64, den: i64, exp_num: i64, exp_den: i64) {
    let r = RationalNumber::new(num, den).unwrap();
    assert_eq!((r.numerator(), r.denominator()), (exp_num, exp_den));
}

#[test]
fn test_zero_denominator_rejected() {
    assert!(matches!(RationalNumber::new(3, 0), Err(Error::ZeroDenominator { num: 3 })));
}

#[test]
fn test_multiply_and_divide_reduce() {
    let a = RationalNumber::new(2, 3).unwrap();
    let b = RationalNumber::new(3, 4).unwrap();
    let p = a.multiply_by(&b).unwrap();
    assert_eq!((p.numerator(), p.denominator()), (1, 2));

    let q = a.divide_by(&b).unwrap();
    assert_eq!((q.numerator(), q.denominator()), (8, 9));

    let zero = RationalNumber::integer(0);
    assert!(a.divide_by(&zero).is_err());
}

#[test]
fn test_wide_intermediates_reduce_back() {
    let big = RationalNumber::new(i64::MAX, 3).unwrap();
    let shrink = RationalNumber::new(3, i64::MAX).unwrap();
    assert!(big.multiply_by(&shrink).unwrap().is_one());

    let min = RationalNumber::new(i64::MIN, -2).unwrap();
    assert_eq!((min.numerator(), min.denominator()), (1 << 62, 1));
}

#[test]
fn test_out_of_range_rejected() {
    assert!(matches!(RationalNumber::new(i64::MIN, -1), Err(Error::RationalOverflow { .. })));
    let big = RationalNumber::integer(i64::MAX);
    assert!(matches!(big.multiply_by(&RationalNumber::integer(2)), Err(Error::RationalOverflow { .. })));
    assert!(matches!(big.divide_by(&RationalNumber::new(1, 2).unwrap()), Err(Error::RationalOverflow { .. })));
}

#[test]
fn test_equality_ignores_rounding_but_is_same_does_not() {
    let floor = RationalNumber::new(1, 2).unwrap();
    let ceil = RationalNumber::with_ceil(2, 4).unwrap();
    assert_eq!(floor, ceil);
    assert!(!floor.is_same(&ceil));
    assert!(floor.is_same(&RationalNumber::new(3, 6).unwrap()));
}

#[test]
fn test_predicates() {
    assert!(RationalNumber::new(3, 3).unwrap().is_one());
    assert!(RationalNumber::new(-1, 5).unwrap().is_strictly_negative());
    assert!(RationalNumber::new(1, -5).unwrap().is_strictly_negative());
    assert!(RationalNumber::new(2, 5).unwrap().is_strictly_positive());
    assert!(!RationalNumber::integer(0).is_strictly_positive());
    assert!(RationalNumber::new(6, 3).unwrap().is_integer());
}

#[test_case(RationalNumber::integer(4), "4"; "integer")]
#[test_case(RationalNumber::new(1, 3).unwrap(), "floor(1/3)"; "floor")]
#[test_case(RationalNumber::with_ceil(4, 6).unwrap(), "ceil(2/3)"; "ceil")]
fn test_display(r: RationalNumber, expected: &str) {
    assert_eq!(r.to_string(), expected);
}

#[test_case(12, 18, 6)]
#[test_case(7, 0, 7)]
#[test_case(0, 7, 7)]
#[test_case(0, 0, 0)]
#[test_case(17, 5, 1)]
fn test_gcd(a: u64, b: u64, expected: u64) {
    assert_eq!(gcd(a, b), expected);
}

#[test]
fn test_lcm_with_zero() {
    assert_eq!(lcm(0, 5), 0);
    assert_eq!(lcm(4, 6), 12);
}
