//! payment.rs
//!
//! Локальная форма оплаты. Платёжного шлюза нет: форма только проверяется,
//! и при успешной проверке бронь оформляется. Данные карты нигде не сохраняются.

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

// MM/YY, месяц 01..12
static EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid expiry regex"));

#[derive(Deserialize, Validate)]
pub struct PaymentForm {
    #[validate(custom(function = "validate_card_holder"))]
    pub card_holder: String,
    #[validate(custom(function = "validate_card_number"))]
    pub card_number: String,
    #[validate(regex(path = *EXPIRY, message = "Expiry must be in MM/YY format"))]
    pub expiry: String,
    #[validate(custom(function = "validate_cvv"))]
    pub cvv: String,
}

// Номер карты и CVV не должны попадать в логи
impl fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentForm")
            .field("card_holder", &self.card_holder)
            .field("card_number", &"****")
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_card_holder(value: &str) -> Result<(), ValidationError> {
    let valid = value.chars().count() >= 3
        && value.chars().all(|c| c.is_alphabetic() || c.is_whitespace());
    if !valid {
        return Err(field_error("card_holder", "Name should be at least 3 letters"));
    }
    Ok(())
}

fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    if value.len() != 16 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error("card_number", "Card number must be 16 digits"));
    }
    Ok(())
}

fn validate_cvv(value: &str) -> Result<(), ValidationError> {
    if value.len() != 3 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error("cvv", "CVV must be 3 digits"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PaymentForm {
        PaymentForm {
            card_holder: "Ravi Kumar".to_string(),
            card_number: "4111111111111111".to_string(),
            expiry: "08/27".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_card() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn reports_each_broken_field() {
        let broken = PaymentForm {
            card_holder: "R2".to_string(),
            card_number: "4111 1111".to_string(),
            expiry: "13/27".to_string(),
            cvv: "12a".to_string(),
        };
        let errors = broken.validate().unwrap_err();
        let fields = errors.field_errors();
        for name in ["card_holder", "card_number", "expiry", "cvv"] {
            assert!(fields.contains_key(name), "{name} should be reported");
        }
    }

    #[test]
    fn expiry_requires_two_digit_month_and_year() {
        for expiry in ["1/27", "00/27", "08/2027", "0827"] {
            let mut f = form();
            f.expiry = expiry.to_string();
            assert!(f.validate().is_err(), "{expiry} should be rejected");
        }
    }

    #[test]
    fn debug_masks_card_data() {
        let rendered = format!("{:?}", form());
        assert!(!rendered.contains("4111111111111111"));
        assert!(!rendered.contains("123"));
    }
}
