// src/common/validation.rs
//
// Regras do `validator` para campos Decimal (o `range` embutido só conhece primitivos).

use rust_decimal::Decimal;
use validator::ValidationError;

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative").with_message("must_be_non_negative".into()));
    }
    Ok(())
}

// 0 a 100, inclusive
pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percentage").with_message("must_be_between_0_and_100".into()));
    }
    Ok(())
}
