//! Authorization decisions: validation outcome plus the simulated random decline.

use std::sync::Arc;

use super::card::CardCheck;
use crate::simulation::GatewaySimulator;

/// Rolls strictly below this value (out of 100) are declined.
pub const RANDOM_DECLINE_THRESHOLD: u32 = 10;

pub const APPROVED_CODE: &str = "00";
pub const RANDOM_DECLINE_CODE: &str = "DECLINED";

/// Fixed reason-code to message table for declines.
pub fn decline_message(code: &str) -> &'static str {
    match code {
        "INVALID_CARD" => "Invalid card number",
        "EXPIRED" => "Card expired",
        _ => "Transaction declined",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approved { authorization_code: String },
    Declined { response_code: String },
}

impl Decision {
    fn declined(code: &str) -> Self {
        Decision::Declined {
            response_code: code.to_string(),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved { .. })
    }

    pub fn response_code(&self) -> &str {
        match self {
            Decision::Approved { .. } => APPROVED_CODE,
            Decision::Declined { response_code } => response_code,
        }
    }

    pub fn response_message(&self) -> &'static str {
        match self {
            Decision::Approved { .. } => "Approved",
            Decision::Declined { response_code } => decline_message(response_code),
        }
    }
}

#[derive(Clone)]
pub struct DecisionEngine {
    simulator: Arc<dyn GatewaySimulator>,
}

impl DecisionEngine {
    pub fn new(simulator: Arc<dyn GatewaySimulator>) -> Self {
        Self { simulator }
    }

    /// A failed card check never consumes a random draw.
    pub fn decide(&self, check: CardCheck) -> Decision {
        if check != CardCheck::Ok {
            return Decision::declined(check.code());
        }

        if self.simulator.decline_roll() < RANDOM_DECLINE_THRESHOLD {
            return Decision::declined(RANDOM_DECLINE_CODE);
        }

        let code = self.simulator.authorization_code() % 1_000_000;
        Decision::Approved {
            authorization_code: format!("{code:06}"),
        }
    }
}
