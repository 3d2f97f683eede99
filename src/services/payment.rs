use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::domain::card::card_suffix;
use crate::domain::{
    CardValidator, DecisionEngine, NewTransaction, Transaction, TransactionView, YearMonth,
};
use crate::error::AppError;
use crate::ports::{ResponseCache, TransactionRepository};
use crate::schemas::AuthorizeRequest;
use crate::simulation::{Clock, GatewaySimulator};

pub const HISTORY_LIMIT: usize = 20;

/// Authorize / capture / refund lifecycle over the transaction store.
///
/// Mutating operations run on a detached task: once started they complete and persist even if the
/// caller goes away. Each begins with the simulated gateway delay, which `interrupt_delays` cuts
/// short without aborting the operation.
///
/// The by-id response cache is only filled by `get_transaction` and only emptied by `clear_cache`.
/// Capture and refund do not evict the entry for the id they mutate, so a cached view may be stale.
#[derive(Clone)]
pub struct PaymentService {
    repository: Arc<dyn TransactionRepository>,
    cache: Arc<dyn ResponseCache>,
    validator: Arc<CardValidator>,
    decisions: DecisionEngine,
    simulator: Arc<dyn GatewaySimulator>,
    clock: Arc<dyn Clock>,
    delays_interrupted: Arc<AtomicBool>,
    delay_interrupt: Arc<Notify>,
}

impl PaymentService {
    pub fn new(
        repository: Arc<dyn TransactionRepository>,
        cache: Arc<dyn ResponseCache>,
        validator: CardValidator,
        simulator: Arc<dyn GatewaySimulator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            cache,
            validator: Arc::new(validator),
            decisions: DecisionEngine::new(simulator.clone()),
            simulator,
            clock,
            delays_interrupted: Arc::new(AtomicBool::new(false)),
            delay_interrupt: Arc::new(Notify::new()),
        }
    }

    pub fn repository(&self) -> &Arc<dyn TransactionRepository> {
        &self.repository
    }

    /// Ends every simulated delay in progress and skips all later ones. Used on shutdown.
    pub fn interrupt_delays(&self) {
        self.delays_interrupted.store(true, Ordering::SeqCst);
        self.delay_interrupt.notify_waiters();
    }

    /// Always records a transaction: approvals become AUTHORIZED, everything else DECLINED.
    pub async fn authorize(&self, request: AuthorizeRequest) -> Result<TransactionView, AppError> {
        let service = self.clone();
        run_to_completion(async move { service.authorize_now(request).await }).await
    }

    pub async fn capture(&self, transaction_id: &str) -> Result<TransactionView, AppError> {
        let service = self.clone();
        let transaction_id = transaction_id.to_string();
        run_to_completion(async move {
            tracing::info!("Processing capture for transaction: {}", transaction_id);
            service.simulate_processing_delay().await;

            let mut tx = service.load(&transaction_id).await?;
            tx.capture(service.clock.now())?;
            let tx = service.repository.update(&tx).await?;

            tracing::info!("Capture successful: {}", tx.transaction_id);
            Ok::<_, AppError>(tx.to_view())
        })
        .await
    }

    pub async fn refund(&self, transaction_id: &str) -> Result<TransactionView, AppError> {
        let service = self.clone();
        let transaction_id = transaction_id.to_string();
        run_to_completion(async move {
            tracing::info!("Processing refund for transaction: {}", transaction_id);
            service.simulate_processing_delay().await;

            let mut tx = service.load(&transaction_id).await?;
            tx.refund(service.clock.now())?;
            let tx = service.repository.update(&tx).await?;

            tracing::info!("Refund successful: {}", tx.transaction_id);
            Ok::<_, AppError>(tx.to_view())
        })
        .await
    }

    pub async fn get_transaction(&self, id: i64) -> Result<TransactionView, AppError> {
        if let Some(view) = self.cache.get(id).await {
            tracing::debug!("Cache hit for transaction {}", id);
            return Ok(view);
        }

        tracing::info!("Fetching transaction by ID: {}", id);
        let view = self
            .repository
            .find_by_id(id)
            .await?
            .map(|tx| tx.to_view())
            .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;

        self.cache.put(id, view.clone()).await;
        Ok(view)
    }

    pub async fn history(&self) -> Result<Vec<TransactionView>, AppError> {
        tracing::info!("Fetching transaction history");
        let recent = self.repository.find_recent(HISTORY_LIMIT).await?;
        Ok(recent.iter().map(Transaction::to_view).collect())
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        tracing::info!("Cache cleared");
    }

    async fn authorize_now(&self, request: AuthorizeRequest) -> Result<TransactionView, AppError> {
        let AuthorizeRequest {
            card_number,
            card_expiry,
            amount,
            ..
        } = request;
        tracing::info!(
            "Processing authorization for card ending in {}",
            card_suffix(&card_number)
        );

        self.simulate_processing_delay().await;

        let now = self.clock.now();
        let check = self
            .validator
            .check(&card_number, &card_expiry, YearMonth::of(now));
        let decision = self.decisions.decide(check);

        let record = NewTransaction::authorization(
            Uuid::new_v4().to_string(),
            &card_number,
            card_expiry,
            amount,
            &decision,
            now,
        );

        let tx = self.repository.insert(record).await?;
        if decision.is_approved() {
            tracing::info!("Authorization successful: {}", tx.transaction_id);
        } else {
            tracing::info!(
                "Transaction declined: {} - {}",
                tx.transaction_id,
                tx.response_message
            );
        }

        Ok(tx.to_view())
    }

    async fn load(&self, transaction_id: &str) -> Result<Transaction, AppError> {
        self.repository
            .find_by_transaction_id(transaction_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", transaction_id)))
    }

    async fn simulate_processing_delay(&self) {
        let delay = self.simulator.processing_delay();
        if delay.is_zero() {
            return;
        }

        // Created before the flag check so an interrupt in between is not missed.
        let interrupted = self.delay_interrupt.notified();
        if self.delays_interrupted.load(Ordering::SeqCst) {
            tracing::debug!("Simulated processing delay skipped");
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = interrupted => {
                tracing::debug!("Simulated processing delay interrupted");
            }
        }
    }
}

async fn run_to_completion<T, F>(operation: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, AppError>> + Send + 'static,
{
    tokio::spawn(operation)
        .await
        .map_err(|e| AppError::Internal(format!("payment task failed: {}", e)))?
}
