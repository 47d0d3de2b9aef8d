//! # Checkout Simulator
//!
//! Walks one payment method through its staged pseudo-protocol and clears
//! the cart when the simulated payment goes through.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──checkout()──► Processing ──draw < rate──► Success              │
//! │    ▲  │                     │                 order_complete = true     │
//! │    │  │ validation error    │ draw ≥ rate            │ 1500 ms          │
//! │    │  └──► Idle + message   ▼                        ▼                  │
//! │    │                      Failed                cart cleared            │
//! │    │                        │                        │                  │
//! │    └──────── retry() ───────┘   start_new_order() ◄──┘                  │
//! │                                  (new order id, back to Idle)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stages
//! ```text
//!   Card    "Processing Visa ending in 1111..."
//!           600 ms  "Verifying card details..."
//!           800 ms  "Authorizing payment..."
//!           600 ms  draw
//!
//!   Wallet  "Connecting to Mobile Wallet..."            (still Idle)
//!           1200 ms "Opening secure payment window..."   (Processing)
//!           800 ms  "Authorizing transfer of ₹3998 to <merchant>..."
//!           1000 ms draw
//!
//!   COD     "Verifying delivery address..."
//!           800 ms  "Checking delivery availability..."
//!           800 ms  "Placing order..."
//!           600 ms  draw
//! ```
//!
//! Progress is published on a `watch` channel after every stage. The
//! simulator is a single actor: every transition takes `&mut self`, so two
//! attempts can never interleave. Dropping a `checkout()` future part way
//! through leaves the cart untouched; the snapshot keeps whatever stage it
//! had reached and [`CheckoutSimulator::reset`] returns it to `Idle`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Days;
use stepstyle_core::validation::{validate_card, validate_cod_address, CardDetails, ValidatedCard};
use stepstyle_core::{
    DeliveryInfo, Money, PaymentMethod, PaymentStatus, Transaction, TransactionStatus,
};
use stepstyle_store::CartStore;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clock::{Clock, Delay, NoDelay, SystemClock, TokioDelay};
use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::outcome::{scale, OutcomeSource, RngOutcome};

// =============================================================================
// Stage Timing
// =============================================================================

const CARD_VERIFY_DELAY: Duration = Duration::from_millis(600);
const CARD_AUTHORIZE_DELAY: Duration = Duration::from_millis(800);
const CARD_DECISION_DELAY: Duration = Duration::from_millis(600);

const WALLET_CONNECT_DELAY: Duration = Duration::from_millis(1200);
const WALLET_AUTHORIZE_DELAY: Duration = Duration::from_millis(800);
const WALLET_DECISION_DELAY: Duration = Duration::from_millis(1000);

const COD_AVAILABILITY_DELAY: Duration = Duration::from_millis(800);
const COD_PLACE_DELAY: Duration = Duration::from_millis(800);
const COD_DECISION_DELAY: Duration = Duration::from_millis(600);

/// Pause between a successful payment and the order-complete screen.
pub const ORDER_COMPLETE_DELAY: Duration = Duration::from_millis(1500);

pub const WALLET_LABEL: &str = "Mobile Wallet";
pub const COD_LABEL: &str = "Cash on Delivery";

const GATEWAY_ERROR: &str = "Payment gateway error. Please try again later.";
const WALLET_FAILED: &str =
    "Mobile Wallet transaction failed. The payment app returned an error code. Please try again.";
const COD_FAILED: &str = "Unable to place a Cash on Delivery order for your address. Please verify your address or try a different payment method.";

// =============================================================================
// Requests and Snapshots
// =============================================================================

/// What the shopper submitted on the payment form.
#[derive(Debug, Clone)]
pub enum PaymentRequest {
    Card(CardDetails),
    Wallet,
    CashOnDelivery { address: String },
}

impl PaymentRequest {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentRequest::Card(_) => PaymentMethod::Card,
            PaymentRequest::Wallet => PaymentMethod::Wallet,
            PaymentRequest::CashOnDelivery { .. } => PaymentMethod::CashOnDelivery,
        }
    }
}

/// Everything a checkout page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSnapshot {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Stage text while processing, the error after a failure, else empty.
    pub message: String,
    pub transaction: Option<Transaction>,
    pub order_complete: bool,
    /// `STEP-XXXX-XXXX`, fixed for the whole checkout session.
    pub order_id: String,
}

impl CheckoutSnapshot {
    fn new(order_id: String) -> Self {
        CheckoutSnapshot {
            method: PaymentMethod::default(),
            status: PaymentStatus::Idle,
            message: String::new(),
            transaction: None,
            order_complete: false,
            order_id,
        }
    }
}

// =============================================================================
// Simulator
// =============================================================================

#[derive(Debug)]
pub struct CheckoutSimulator {
    config: CheckoutConfig,
    cart: CartStore,
    clock: Arc<dyn Clock>,
    delay: Arc<dyn Delay>,
    outcome: Arc<dyn OutcomeSource>,
    state: watch::Sender<CheckoutSnapshot>,
}

impl CheckoutSimulator {
    /// A simulator on the system clock, real pauses (unless
    /// `fast_checkout`) and random outcomes.
    pub fn new(cart: CartStore, config: CheckoutConfig) -> Self {
        let delay: Arc<dyn Delay> = if config.timing.fast_checkout {
            Arc::new(NoDelay)
        } else {
            Arc::new(TokioDelay)
        };
        let outcome: Arc<dyn OutcomeSource> = Arc::new(RngOutcome);
        let (state, _) = watch::channel(CheckoutSnapshot::new(generate_order_id(outcome.as_ref())));

        CheckoutSimulator {
            config,
            cart,
            clock: Arc::new(SystemClock),
            delay,
            outcome,
            state,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// Replaces the outcome source and redraws the order id from it.
    pub fn with_outcome(mut self, outcome: Arc<dyn OutcomeSource>) -> Self {
        self.outcome = outcome;
        let order_id = generate_order_id(self.outcome.as_ref());
        self.state.send_modify(|s| s.order_id = order_id);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CheckoutSnapshot {
        self.state.borrow().clone()
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Switches payment method. Abandons a failed attempt.
    pub fn select_method(&mut self, method: PaymentMethod) -> CheckoutResult<()> {
        let current = self.snapshot();
        if current.order_complete || current.status == PaymentStatus::Processing {
            return Err(CheckoutError::invalid_state("change payment method", current.status));
        }

        self.state.send_modify(|s| {
            s.method = method;
            s.status = PaymentStatus::Idle;
            s.message.clear();
        });
        debug!(%method, "Payment method selected");
        Ok(())
    }

    /// Leaves `Failed` for `Idle` so the shopper can try again.
    pub fn retry(&mut self) -> CheckoutResult<()> {
        let status = self.snapshot().status;
        if status != PaymentStatus::Failed {
            return Err(CheckoutError::invalid_state("retry", status));
        }

        self.state.send_modify(|s| {
            s.status = PaymentStatus::Idle;
            s.message.clear();
        });
        Ok(())
    }

    /// Leaves the order-complete screen and starts a fresh order.
    pub fn start_new_order(&mut self) -> CheckoutResult<String> {
        let current = self.snapshot();
        if !current.order_complete {
            return Err(CheckoutError::invalid_state("start a new order", current.status));
        }

        let order_id = generate_order_id(self.outcome.as_ref());
        self.state
            .send_replace(CheckoutSnapshot::new(order_id.clone()));
        info!(order_id = %order_id, "Started new order");
        Ok(order_id)
    }

    /// Forces the machine back to `Idle`, e.g. after an abandoned attempt.
    /// The order id is kept.
    pub fn reset(&mut self) {
        self.state.send_modify(|s| {
            s.status = PaymentStatus::Idle;
            s.message.clear();
            s.transaction = None;
            s.order_complete = false;
        });
    }

    /// Runs one checkout attempt to a terminal state.
    ///
    /// ## Returns
    /// - `Ok(snapshot)` once the attempt reached `Success` (with the order
    ///   complete) or `Failed`
    /// - `Err(Validation)` when the form was rejected; the snapshot stays
    ///   `Idle` and carries the same message
    /// - `Err(InvalidState)` unless the machine was `Idle`; nothing changes
    /// - `Err(EmptyCart)` when there is nothing to pay for
    pub async fn checkout(&mut self, request: PaymentRequest) -> CheckoutResult<CheckoutSnapshot> {
        let current = self.snapshot();
        if current.status != PaymentStatus::Idle || current.order_complete {
            return Err(CheckoutError::invalid_state("check out", current.status));
        }

        let method = request.method();
        self.state.send_modify(|s| {
            s.method = method;
            s.message.clear();
        });

        let cart = self.cart.load().await?;
        if cart.is_empty() {
            return Err(self.reject(CheckoutError::EmptyCart));
        }
        let amount = cart.total_with_shipping(self.config.shipping());

        info!(%method, amount = %amount, order_id = %current.order_id, "Checkout started");

        match request {
            PaymentRequest::Card(details) => {
                let card = validate_card(&details, self.clock.today())
                    .map_err(|e| self.reject(e.into()))?;
                self.run_card(card, amount).await?;
            }
            PaymentRequest::Wallet => self.run_wallet(amount).await?,
            PaymentRequest::CashOnDelivery { address } => {
                let pincode = validate_cod_address(&address).map_err(|e| self.reject(e.into()))?;
                self.run_cod(pincode, amount).await?;
            }
        }

        Ok(self.snapshot())
    }

    // =========================================================================
    // Method Protocols
    // =========================================================================

    async fn run_card(&mut self, card: ValidatedCard, amount: Money) -> CheckoutResult<()> {
        let timestamp = self.clock.now();
        let id = generate_transaction_id(PaymentMethod::Card, self.outcome.as_ref());

        self.stage(
            PaymentStatus::Processing,
            format!("Processing {} ending in {}...", card.network, card.last_four),
        );
        self.pause(CARD_VERIFY_DELAY).await;
        self.message("Verifying card details...");
        self.pause(CARD_AUTHORIZE_DELAY).await;
        self.message("Authorizing payment...");
        self.pause(CARD_DECISION_DELAY).await;

        let mut transaction = Transaction {
            id,
            amount,
            timestamp,
            method: card.method_label(),
            status: TransactionStatus::Processing,
            extra: None,
        };

        if self.succeeds(PaymentMethod::Card) {
            transaction.status = TransactionStatus::Successful;
            self.complete(transaction).await
        } else {
            transaction.status = TransactionStatus::Failed;
            let message = if self.outcome.draw() > 0.5 {
                format!(
                    "{} declined. Please check your details or try another payment method.",
                    card.network
                )
            } else {
                GATEWAY_ERROR.to_string()
            };
            self.fail(transaction, message);
            Ok(())
        }
    }

    async fn run_wallet(&mut self, amount: Money) -> CheckoutResult<()> {
        self.message("Connecting to Mobile Wallet...");
        self.pause(WALLET_CONNECT_DELAY).await;

        self.stage(PaymentStatus::Processing, "Opening secure payment window...");
        let timestamp = self.clock.now();
        let id = generate_transaction_id(PaymentMethod::Wallet, self.outcome.as_ref());
        self.pause(WALLET_AUTHORIZE_DELAY).await;

        let mut transaction = Transaction {
            id,
            amount,
            timestamp,
            method: WALLET_LABEL.to_string(),
            status: TransactionStatus::Processing,
            extra: None,
        };
        let message = format!(
            "Authorizing transfer of {} to {}...",
            amount.compact(),
            self.config.merchant_id()
        );
        let pending = transaction.clone();
        self.state.send_modify(|s| {
            s.message = message;
            s.transaction = Some(pending);
        });
        self.pause(WALLET_DECISION_DELAY).await;

        if self.succeeds(PaymentMethod::Wallet) {
            transaction.status = TransactionStatus::Successful;
            self.complete(transaction).await
        } else {
            transaction.status = TransactionStatus::Failed;
            self.fail(transaction, WALLET_FAILED.to_string());
            Ok(())
        }
    }

    async fn run_cod(&mut self, pincode: String, amount: Money) -> CheckoutResult<()> {
        let mut transaction = Transaction {
            id: generate_transaction_id(PaymentMethod::CashOnDelivery, self.outcome.as_ref()),
            amount,
            timestamp: self.clock.now(),
            method: COD_LABEL.to_string(),
            status: TransactionStatus::Processing,
            extra: None,
        };
        let pending = transaction.clone();
        self.state.send_modify(|s| {
            s.status = PaymentStatus::Processing;
            s.message = "Verifying delivery address...".to_string();
            s.transaction = Some(pending);
        });

        self.pause(COD_AVAILABILITY_DELAY).await;
        self.message("Checking delivery availability...");
        self.pause(COD_PLACE_DELAY).await;
        self.message("Placing order...");
        self.pause(COD_DECISION_DELAY).await;

        if self.succeeds(PaymentMethod::CashOnDelivery) {
            let days = scale(self.outcome.draw(), 3, 5);
            let estimated_delivery = self
                .clock
                .today()
                .checked_add_days(Days::new(days))
                .unwrap_or(chrono::NaiveDate::MAX);
            transaction.status = TransactionStatus::Confirmed;
            transaction.extra = Some(DeliveryInfo {
                pincode,
                estimated_delivery,
            });
            self.complete(transaction).await
        } else {
            transaction.status = TransactionStatus::Failed;
            self.fail(transaction, COD_FAILED.to_string());
            Ok(())
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn succeeds(&self, method: PaymentMethod) -> bool {
        self.outcome.draw() < self.config.success_rate(method)
    }

    /// Records a rejection message while staying `Idle`.
    fn reject(&self, err: CheckoutError) -> CheckoutError {
        let message = err.to_string();
        debug!(error = %message, "Checkout rejected");
        self.state.send_modify(|s| s.message = message);
        err
    }

    async fn complete(&mut self, transaction: Transaction) -> CheckoutResult<()> {
        info!(
            transaction_id = %transaction.id,
            amount = %transaction.amount,
            method = %transaction.method,
            "Payment succeeded"
        );
        // The order stands once paid, even if the hold below is cut short
        // or the cart cannot be cleared.
        self.state.send_modify(|s| {
            s.status = PaymentStatus::Success;
            s.message.clear();
            s.transaction = Some(transaction);
            s.order_complete = true;
        });
        info!(order_id = %self.snapshot().order_id, "Order complete");

        self.pause(ORDER_COMPLETE_DELAY).await;
        if let Err(e) = self.cart.clear().await {
            warn!(error = %e, "Order placed but the cart could not be cleared");
            return Err(e.into());
        }
        Ok(())
    }

    fn fail(&mut self, transaction: Transaction, message: String) {
        warn!(
            transaction_id = %transaction.id,
            method = %transaction.method,
            reason = %message,
            "Payment failed"
        );
        self.state.send_modify(|s| {
            s.status = PaymentStatus::Failed;
            s.message = message;
            s.transaction = Some(transaction);
        });
    }

    fn stage(&self, status: PaymentStatus, message: impl Into<String>) {
        let message = message.into();
        debug!(?status, message = %message, "Checkout stage");
        self.state.send_modify(|s| {
            s.status = status;
            s.message = message;
        });
    }

    fn message(&self, message: &str) {
        debug!(message = %message, "Checkout stage");
        self.state.send_modify(|s| s.message = message.to_string());
    }

    async fn pause(&self, duration: Duration) {
        self.delay.sleep(duration).await;
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// `CRD`/`GPAY`/`COD` followed by a number in `[100000000, 999999999]`.
pub fn generate_transaction_id(method: PaymentMethod, source: &dyn OutcomeSource) -> String {
    format!(
        "{}{}",
        method.transaction_prefix(),
        scale(source.id_draw(), 100_000_000, 900_000_000)
    )
}

/// `STEP-XXXX-XXXX`, each group in `[1000, 9999]`.
pub fn generate_order_id(source: &dyn OutcomeSource) -> String {
    format!(
        "STEP-{}-{}",
        scale(source.id_draw(), 1000, 9000),
        scale(source.id_draw(), 1000, 9000)
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
