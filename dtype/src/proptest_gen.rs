use crate::*;
use proptest::prelude::*;
use strum::VariantArray;

#[rustfmt::skip]
impl ScalarType {
    pub fn int_generator() -> impl Strategy<Value = Self> {
        prop_oneof![
            Just(ScalarType::Char), Just(ScalarType::UChar), Just(ScalarType::Short), Just(ScalarType::UShort),
            Just(ScalarType::Int), Just(ScalarType::UInt), Just(ScalarType::Long), Just(ScalarType::ULong),
        ]
    }

    pub fn float_generator() -> impl Strategy<Value = Self> {
        prop_oneof![Just(ScalarType::Half), Just(ScalarType::Float), Just(ScalarType::Double)]
    }

    pub fn any_generator() -> impl Strategy<Value = Self> {
        proptest::sample::select(ScalarType::VARIANTS)
    }
}
