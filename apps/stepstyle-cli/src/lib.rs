//! # StepStyle CLI
//!
//! Command-line storefront over the StepStyle crates. Every invocation opens
//! the persisted state, runs one command and prints its result.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stepstyle [--db PATH | --memory] [--catalog PATH] [--config PATH]      │
//! │            [--fast] <group> <command>                                   │
//! │                                                                         │
//! │  catalog   list [--category C] | show ID | categories | images ID       │
//! │  cart      add ID [--size S] [--color C] | set ID SIZE QTY |            │
//! │            remove ID SIZE | show | clear                                │
//! │  wishlist  toggle ID | show | move ID                                   │
//! │  checkout  card .. | wallet | cod --address A                           │
//! │  auth      login | otp [--code C] | register | reset | logout | whoami  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit status: 0 on success, 2 invalid input, 3 not found, 4 refused by a
//! storefront rule, 5 checkout failed, 1 anything else.

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stepstyle_core::validation::CardDetails;
use tracing_subscriber::EnvFilter;

pub use error::{CliError, CliResult, ErrorCode};
pub use state::{AppState, StateOptions};

#[derive(Debug, Parser)]
#[command(name = "stepstyle")]
#[command(author, version, about = "StepStyle storefront")]
pub struct Cli {
    /// SQLite database file (defaults to STEPSTYLE_DB_PATH or the data dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Keep all state in memory for this invocation
    #[arg(long, global = true, conflicts_with = "db")]
    pub memory: bool,

    /// Product catalog JSON file
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Checkout settings TOML file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip the simulated checkout pauses
    #[arg(long, global = true)]
    pub fast: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage saved products
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Pay for the cart
    Checkout {
        #[command(subcommand)]
        method: CheckoutMethod,
    },
    /// Sign in and out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    /// List products
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Show { id: u32 },
    /// List categories
    Categories,
    /// Show the image fallback chains of a product
    Images { id: u32 },
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Add a product
    Add {
        id: u32,
        /// UK size; required for products with sizes
        #[arg(short, long)]
        size: Option<u32>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Set a line's quantity (0 removes it)
    Set { id: u32, size: u32, quantity: u32 },
    /// Remove a line
    Remove { id: u32, size: u32 },
    /// Show the cart with totals
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum WishlistAction {
    /// Save or unsave a product
    Toggle { id: u32 },
    /// List saved products
    Show,
    /// Move a saved product to the cart
    Move { id: u32 },
}

#[derive(Debug, Subcommand)]
pub enum CheckoutMethod {
    /// Pay by credit or debit card
    Card {
        #[arg(long)]
        number: String,
        /// MM/YY
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvv: String,
        /// Cardholder name
        #[arg(long)]
        name: String,
    },
    /// Pay with a mobile wallet
    Wallet,
    /// Cash on delivery
    Cod {
        /// Delivery address including a 6-digit pincode
        #[arg(long)]
        address: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Sign in with a password
    Login {
        /// Email or 10-digit phone number
        identifier: String,
        #[arg(short, long)]
        password: String,
    },
    /// Request a one-time code, or sign in with one
    Otp {
        identifier: String,
        #[arg(long)]
        code: Option<String>,
    },
    /// Create an account, confirming it with a one-time code
    Register {
        #[arg(short, long)]
        name: String,
        identifier: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        confirm: String,
        /// Code from `auth otp`
        #[arg(long)]
        otp: String,
    },
    /// Choose a new password, confirming it with a one-time code
    Reset {
        identifier: String,
        /// Code from `auth otp`
        #[arg(long)]
        otp: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in shopper
    Whoami,
}

impl Cli {
    pub fn state_options(&self) -> StateOptions {
        StateOptions {
            database: self.db.clone(),
            in_memory: self.memory,
            catalog: self.catalog.clone(),
            config: self.config.clone(),
            fast_checkout: self.fast,
        }
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Logs go to stderr so command output stays clean. `RUST_LOG` overrides.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,stepstyle=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens state and runs the parsed command.
pub async fn run(cli: Cli) -> CliResult<String> {
    let state = AppState::open(&cli.state_options()).await?;
    dispatch(&state, cli.command).await
}

pub async fn dispatch(state: &AppState, command: Command) -> CliResult<String> {
    use commands::{auth, cart, catalog, checkout, wishlist};

    match command {
        Command::Catalog { action } => match action {
            CatalogAction::List { category } => catalog::list(state, category.as_deref()).await,
            CatalogAction::Show { id } => catalog::show(state, id).await,
            CatalogAction::Categories => catalog::categories(state).await,
            CatalogAction::Images { id } => catalog::images(state, id).await,
        },
        Command::Cart { action } => match action {
            CartAction::Add { id, size, color } => cart::add(state, id, size, color).await,
            CartAction::Set { id, size, quantity } => cart::set(state, id, size, quantity).await,
            CartAction::Remove { id, size } => cart::remove(state, id, size).await,
            CartAction::Show => cart::show(state).await,
            CartAction::Clear => cart::clear(state).await,
        },
        Command::Wishlist { action } => match action {
            WishlistAction::Toggle { id } => wishlist::toggle(state, id).await,
            WishlistAction::Show => wishlist::show(state).await,
            WishlistAction::Move { id } => wishlist::move_to_cart(state, id).await,
        },
        Command::Checkout { method } => match method {
            CheckoutMethod::Card {
                number,
                expiry,
                cvv,
                name,
            } => {
                let details = CardDetails {
                    number,
                    expiry,
                    cvv,
                    name,
                };
                checkout::card(state, details).await
            }
            CheckoutMethod::Wallet => checkout::wallet(state).await,
            CheckoutMethod::Cod { address } => checkout::cod(state, address).await,
        },
        Command::Auth { action } => match action {
            AuthAction::Login {
                identifier,
                password,
            } => auth::login(state, &identifier, &password).await,
            AuthAction::Otp { identifier, code } => {
                auth::otp(state, &identifier, code.as_deref()).await
            }
            AuthAction::Register {
                name,
                identifier,
                password,
                confirm,
                otp,
            } => auth::register(state, &name, &identifier, &password, &confirm, &otp).await,
            AuthAction::Reset {
                identifier,
                otp,
                password,
                confirm,
            } => auth::reset_password(state, &identifier, &otp, &password, &confirm).await,
            AuthAction::Logout => auth::logout(state).await,
            AuthAction::Whoami => auth::whoami(state).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stepstyle").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["cart", "show", "--memory", "--fast"]);
        let options = cli.state_options();
        assert!(options.in_memory);
        assert!(options.fast_checkout);
        assert!(options.database.is_none());
    }

    #[test]
    fn test_db_conflicts_with_memory() {
        let result = Cli::try_parse_from(["stepstyle", "--db", "x.db", "--memory", "cart", "show"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dispatch_cart_flow() {
        let state = fixtures::state();

        let add = parse(&["cart", "add", "1", "--size", "9", "--color", "Black"]);
        let out = dispatch(&state, add.command).await.unwrap();
        assert!(out.starts_with("Added Air Glide (UK 9, Black) x1"));

        let show = parse(&["cart", "show"]);
        let out = dispatch(&state, show.command).await.unwrap();
        assert!(out.contains("₹3498.00"));
    }

    #[tokio::test]
    async fn test_dispatch_account_flows() {
        let state = fixtures::state();

        let register = parse(&[
            "auth", "register", "9876543210", "--name", "Ravi", "--password", "secret1",
            "--confirm", "secret1", "--otp", "123456",
        ]);
        let out = dispatch(&state, register.command).await.unwrap();
        assert_eq!(out, "Account created for Ravi. You can now sign in.");

        let reset = parse(&[
            "auth", "reset", "9876543210", "--otp", "654321", "--password", "newpass",
            "--confirm", "newpass",
        ]);
        let out = dispatch(&state, reset.command).await.unwrap();
        assert_eq!(out, "Password updated. You can now sign in.");

        let missing_otp = Cli::try_parse_from([
            "stepstyle", "auth", "register", "x@y.co", "-n", "Ravi", "-p", "secret1",
            "--confirm", "secret1",
        ]);
        assert!(missing_otp.is_err());
    }

    #[tokio::test]
    async fn test_run_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("products.json");
        std::fs::write(&catalog, fixtures::CATALOG).unwrap();
        let config = dir.path().join("checkout.toml");

        let cli = Cli::try_parse_from([
            "stepstyle",
            "--memory",
            "--catalog",
            catalog.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "catalog",
            "categories",
        ])
        .unwrap();
        assert_eq!(run(cli).await.unwrap(), "Running\nCasual");
    }
}
