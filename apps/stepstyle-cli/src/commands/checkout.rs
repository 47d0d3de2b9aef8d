//! # Checkout Commands
//!
//! Each command runs one payment attempt against the current cart. Stage
//! messages stream to stderr while the attempt runs; the receipt (or the
//! failure) is the command's output.
//!
//! ```text
//!   stepstyle checkout card --number .. --expiry MM/YY --cvv .. --name ..
//!   stepstyle checkout wallet
//!   stepstyle checkout cod --address "12 MG Road, Bengaluru 560001"
//! ```

use stepstyle_checkout::{CheckoutSimulator, CheckoutSnapshot, PaymentRequest};
use stepstyle_core::validation::CardDetails;
use stepstyle_core::{PaymentStatus, Transaction};
use tokio::sync::watch;
use tracing::debug;

use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::AppState;

pub async fn card(state: &AppState, details: CardDetails) -> CliResult<String> {
    run(state.simulator(), PaymentRequest::Card(details)).await
}

pub async fn wallet(state: &AppState) -> CliResult<String> {
    run(state.simulator(), PaymentRequest::Wallet).await
}

pub async fn cod(state: &AppState, address: String) -> CliResult<String> {
    run(state.simulator(), PaymentRequest::CashOnDelivery { address }).await
}

async fn run(mut simulator: CheckoutSimulator, request: PaymentRequest) -> CliResult<String> {
    let progress = tokio::spawn(print_progress(simulator.subscribe()));

    let result = simulator.checkout(request).await;
    drop(simulator);
    if let Err(e) = progress.await {
        debug!(error = %e, "Progress printer stopped");
    }

    let snapshot = result?;
    match snapshot.status {
        PaymentStatus::Success => Ok(receipt(&snapshot)),
        _ => Err(failure(&snapshot)),
    }
}

/// Prints each new stage message until the simulator goes away.
async fn print_progress(mut rx: watch::Receiver<CheckoutSnapshot>) {
    let mut last = String::new();
    while rx.changed().await.is_ok() {
        let message = rx.borrow_and_update().message.clone();
        if !message.is_empty() && message != last {
            eprintln!("  {message}");
            last = message;
        }
    }
}

fn receipt(snapshot: &CheckoutSnapshot) -> String {
    let mut lines = vec![
        "Order placed".to_string(),
        format!("Order:        {}", snapshot.order_id),
    ];
    if let Some(txn) = &snapshot.transaction {
        lines.extend(transaction_rows(txn));
        if let Some(delivery) = &txn.extra {
            lines.push(format!(
                "Delivery:     pincode {}, expected by {}",
                delivery.pincode,
                delivery.estimated_delivery.format("%a, %d %b %Y")
            ));
        }
    }
    lines.join("\n")
}

fn failure(snapshot: &CheckoutSnapshot) -> CliError {
    let mut lines = vec![format!("Payment failed: {}", snapshot.message)];
    if let Some(txn) = &snapshot.transaction {
        lines.extend(transaction_rows(txn));
    }
    CliError::new(ErrorCode::Checkout, lines.join("\n"))
}

fn transaction_rows(txn: &Transaction) -> [String; 3] {
    [
        format!("Transaction:  {}", txn.id),
        format!("Method:       {}", txn.method),
        format!("Amount:       {}", txn.amount),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stepstyle_checkout::ScriptedOutcome;

    use super::*;
    use crate::commands::{cart, fixtures};

    fn visa() -> CardDetails {
        CardDetails {
            number: "4111 1111 1111 1111".to_string(),
            expiry: "12/39".to_string(),
            cvv: "123".to_string(),
            name: "Asha Rao".to_string(),
        }
    }

    fn scripted(state: &AppState, outcome: ScriptedOutcome) -> CheckoutSimulator {
        state.simulator().with_outcome(Arc::new(outcome))
    }

    #[tokio::test]
    async fn test_card_receipt_clears_cart() {
        let state = fixtures::state();
        cart::add(&state, 1, Some(8), None).await.unwrap();

        let sim = scripted(&state, ScriptedOutcome::always_succeed());
        let out = run(sim, PaymentRequest::Card(visa())).await.unwrap();

        assert!(out.starts_with("Order placed\nOrder:        STEP-5500-5500"));
        assert!(out.contains("Transaction:  CRD550000000"));
        assert!(out.contains("Method:       Visa Card (****1111)"));
        assert!(out.contains("Amount:       ₹3498.00"));
        assert_eq!(cart::show(&state).await.unwrap(), "Your cart is empty");
    }

    #[tokio::test]
    async fn test_cod_receipt_has_delivery() {
        let state = fixtures::state();
        cart::add(&state, 19, None, None).await.unwrap();

        let sim = scripted(&state, ScriptedOutcome::always_succeed());
        let request = PaymentRequest::CashOnDelivery {
            address: "12 MG Road, Indiranagar, Bengaluru 560038".to_string(),
        };
        let out = run(sim, request).await.unwrap();

        assert!(out.contains("Transaction:  COD550000000"));
        assert!(out.contains("Delivery:     pincode 560038, expected by"));
    }

    #[tokio::test]
    async fn test_failure_keeps_cart() {
        let state = fixtures::state();
        cart::add(&state, 1, Some(8), None).await.unwrap();

        let sim = scripted(&state, ScriptedOutcome::always_fail());
        let err = run(sim, PaymentRequest::Wallet).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Checkout);
        assert!(err.message.starts_with("Payment failed: "));
        assert!(err.message.contains("Transaction:  GPAY550000000"));
        assert!(cart::show(&state).await.unwrap().contains("Air Glide"));
    }

    #[tokio::test]
    async fn test_rejected_before_processing() {
        let state = fixtures::state();

        let err = wallet(&state).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Checkout);
        assert_eq!(err.message, "Your cart is empty");

        cart::add(&state, 1, Some(8), None).await.unwrap();
        let err = cod(&state, "Bengaluru".to_string()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);

        let expired = CardDetails {
            expiry: "01/20".to_string(),
            ..visa()
        };
        let err = card(&state, expired).await.unwrap_err();
        assert_eq!(err.message, "Your card has expired");
    }
}
