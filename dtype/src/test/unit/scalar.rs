use std::str::FromStr;

use proptest::prelude::*;
use test_case::test_case;

use crate::{PrecisionClass, ScalarType};

#[test_case(ScalarType::UChar, 1; "uchar")]
#[test_case(ScalarType::Short, 2; "short")]
#[test_case(ScalarType::Half, 2; "half")]
#[test_case(ScalarType::Float, 4; "float")]
#[test_case(ScalarType::Double, 8; "double")]
#[test_case(ScalarType::ULong, 8; "ulong")]
fn test_bytes(ty: ScalarType, expected: usize) {
    assert_eq!(ty.bytes(), expected);
}

#[test_case("unsigned char", ScalarType::UChar; "long_unsigned_spelling")]
#[test_case("uchar", ScalarType::UChar; "short_unsigned_spelling")]
#[test_case("double", ScalarType::Double; "double")]
fn test_parse_c_names(name: &str, expected: ScalarType) {
    assert_eq!(ScalarType::from_str(name).unwrap(), expected);
}

#[test]
fn test_unknown_name_rejected() {
    assert!(ScalarType::from_str("float4").is_err());
}

#[test]
fn test_precision_classes() {
    assert_eq!(ScalarType::Int.precision(), PrecisionClass::Integer);
    assert_eq!(ScalarType::Long.precision(), PrecisionClass::Long);
    assert_eq!(ScalarType::Half.precision(), PrecisionClass::Float);
    assert_eq!(ScalarType::Double.precision(), PrecisionClass::Double);
}

proptest! {
    #[test]
    fn c_style_parses_back(ty in ScalarType::any_generator()) {
        prop_assert_eq!(ScalarType::from_str(ty.c_style()).unwrap(), ty);
    }

    #[test]
    fn signedness_is_exclusive(ty in ScalarType::int_generator()) {
        prop_assert!(ty.is_signed() != ty.is_unsigned());
        prop_assert!(!ty.is_float());
    }
}
