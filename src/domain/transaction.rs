//! Transaction domain entity and its lifecycle state machine.
//! Framework-agnostic; adapters map it to storage rows and the HTTP view.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use super::card::mask_card_number;
use super::decision::Decision;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Authorized,
    Captured,
    Refunded,
    Declined,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Authorized => "AUTHORIZED",
            TransactionStatus::Captured => "CAPTURED",
            TransactionStatus::Refunded => "REFUNDED",
            TransactionStatus::Declined => "DECLINED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTHORIZED" => Ok(TransactionStatus::Authorized),
            "CAPTURED" => Ok(TransactionStatus::Captured),
            "REFUNDED" => Ok(TransactionStatus::Refunded),
            "DECLINED" => Ok(TransactionStatus::Declined),
            other => Err(format!("unknown transaction status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Authorize,
    Capture,
    Refund,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Authorize => "AUTHORIZE",
            TransactionType::Capture => "CAPTURE",
            TransactionType::Refund => "REFUND",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AUTHORIZE" => Ok(TransactionType::Authorize),
            "CAPTURE" => Ok(TransactionType::Capture),
            "REFUND" => Ok(TransactionType::Refund),
            other => Err(format!("unknown transaction type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transaction must be in {required} status to {operation}")]
pub struct TransitionError {
    pub required: TransactionStatus,
    pub actual: TransactionStatus,
    pub operation: &'static str,
}

/// A transaction that has not been assigned a surrogate id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_id: String,
    pub card_number_masked: String,
    pub card_expiry: String,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    pub transaction_type: TransactionType,
    pub response_code: String,
    pub response_message: String,
    pub authorization_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTransaction {
    /// Builds the authorization record. Only the masked card number is kept.
    pub fn authorization(
        transaction_id: String,
        card_number: &str,
        card_expiry: String,
        amount: BigDecimal,
        decision: &Decision,
        now: DateTime<Utc>,
    ) -> Self {
        let (status, authorization_code) = match decision {
            Decision::Approved { authorization_code } => {
                (TransactionStatus::Authorized, Some(authorization_code.clone()))
            }
            Decision::Declined { .. } => (TransactionStatus::Declined, None),
        };

        Self {
            transaction_id,
            card_number_masked: mask_card_number(card_number),
            card_expiry,
            amount,
            status,
            transaction_type: TransactionType::Authorize,
            response_code: decision.response_code().to_string(),
            response_message: decision.response_message().to_string(),
            authorization_code,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(self, id: i64) -> Transaction {
        Transaction {
            id,
            transaction_id: self.transaction_id,
            card_number_masked: self.card_number_masked,
            card_expiry: self.card_expiry,
            amount: self.amount,
            status: self.status,
            transaction_type: self.transaction_type,
            response_code: self.response_code,
            response_message: self.response_message,
            authorization_code: self.authorization_code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Persisted transaction record.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub transaction_id: String,
    pub card_number_masked: String,
    pub card_expiry: String,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    pub transaction_type: TransactionType,
    pub response_code: String,
    pub response_message: String,
    pub authorization_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// AUTHORIZED -> CAPTURED.
    pub fn capture(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(
            TransactionStatus::Authorized,
            TransactionStatus::Captured,
            TransactionType::Capture,
            "Captured",
            "capture",
            now,
        )
    }

    /// CAPTURED -> REFUNDED.
    pub fn refund(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(
            TransactionStatus::Captured,
            TransactionStatus::Refunded,
            TransactionType::Refund,
            "Refunded",
            "refund",
            now,
        )
    }

    fn transition(
        &mut self,
        required: TransactionStatus,
        next: TransactionStatus,
        transaction_type: TransactionType,
        message: &str,
        operation: &'static str,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if self.status != required {
            return Err(TransitionError {
                required,
                actual: self.status,
                operation,
            });
        }

        self.status = next;
        self.transaction_type = transaction_type;
        self.response_code = "00".to_string();
        self.response_message = message.to_string();
        self.updated_at = now;
        Ok(())
    }

    pub fn to_view(&self) -> TransactionView {
        TransactionView {
            id: self.id,
            transaction_id: self.transaction_id.clone(),
            masked_card_number: self.card_number_masked.clone(),
            amount: self.amount.clone(),
            status: self.status,
            transaction_type: self.transaction_type,
            response_code: self.response_code.clone(),
            response_message: self.response_message.clone(),
            authorization_code: self.authorization_code.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Client-safe representation returned by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: i64,
    pub transaction_id: String,
    #[schema(example = "**** **** **** 1111")]
    pub masked_card_number: String,
    #[schema(value_type = String, example = "10.00")]
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub response_code: String,
    pub response_message: String,
    pub authorization_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
