pub mod card;
pub mod decision;
pub mod transaction;

pub use card::{mask_card_number, CardCheck, CardValidator, YearMonth};
pub use decision::{Decision, DecisionEngine};
pub use transaction::{
    NewTransaction, Transaction, TransactionStatus, TransactionType, TransactionView,
    TransitionError,
};
