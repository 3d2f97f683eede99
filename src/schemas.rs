use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{
    validate_amount, validate_card_expiry, validate_card_number, validate_cvv, validate_required,
    Validate, ValidationResult,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    #[schema(example = "4111111111111111")]
    pub card_number: String,
    #[schema(example = "12/30")]
    pub card_expiry: String,
    #[schema(example = "123")]
    pub cvv: String,
    #[schema(value_type = String, example = "10.00")]
    pub amount: BigDecimal,
}

impl Validate for AuthorizeRequest {
    fn validate(&self) -> ValidationResult {
        validate_card_number(&self.card_number)?;
        validate_card_expiry(&self.card_expiry)?;
        validate_cvv(&self.cvv)?;
        validate_amount(&self.amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub transaction_id: String,
}

impl Validate for TransactionRequest {
    fn validate(&self) -> ValidationResult {
        validate_required("transactionId", &self.transaction_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authorize_request_accepts_numeric_and_string_amounts() {
        for amount in [json!(10.5), json!("10.50")] {
            let request: AuthorizeRequest = serde_json::from_value(json!({
                "cardNumber": "4111111111111111",
                "cardExpiry": "12/30",
                "cvv": "123",
                "amount": amount,
            }))
            .unwrap();
            assert!(request.validate().is_ok());
        }
    }

    #[test]
    fn test_authorize_request_reports_first_bad_field() {
        let request = AuthorizeRequest {
            card_number: "4111111111111111".to_string(),
            card_expiry: "12/30".to_string(),
            cvv: "1".to_string(),
            amount: BigDecimal::from(10),
        };
        assert_eq!(request.validate().unwrap_err().field, "cvv");
    }

    #[test]
    fn test_blank_transaction_id_rejected() {
        let request = TransactionRequest {
            transaction_id: "  ".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
