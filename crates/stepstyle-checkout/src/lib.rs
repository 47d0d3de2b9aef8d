//! # stepstyle-checkout: Mock Payment Engine
//!
//! There is no payment gateway behind StepStyle. "Paying" walks the chosen
//! method through a few timed stages, rolls a die against the method's
//! success rate and, on success, empties the cart.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CheckoutSimulator                               │
//! │                                                                         │
//! │   PaymentRequest ──► validate (stepstyle-core) ──► stages ──► draw      │
//! │                                                      │          │       │
//! │        Clock ────────────────────────────────────────┤          │       │
//! │        Delay ────────────────────────────────────────┘          │       │
//! │        OutcomeSource ───────────────────────────────────────────┘       │
//! │                                                                         │
//! │   watch::Receiver<CheckoutSnapshot> ◄── every stage                     │
//! │   CartStore::clear() ◄── success + 1500 ms                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = CheckoutConfig::load_or_default(None);
//! let mut sim = CheckoutSimulator::new(store.carts(), config);
//! let mut progress = sim.subscribe();
//!
//! let snapshot = sim.checkout(PaymentRequest::Wallet).await?;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod outcome;
pub mod simulator;

pub use clock::{Clock, Delay, FixedClock, NoDelay, SystemClock, TokioDelay};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use outcome::{OutcomeSource, RngOutcome, ScriptedOutcome};
pub use simulator::{CheckoutSimulator, CheckoutSnapshot, PaymentRequest};
