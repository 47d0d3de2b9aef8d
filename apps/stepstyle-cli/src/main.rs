//! StepStyle CLI.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! stepstyle catalog list --category Running
//!
//! # Add a pair in UK 8 and review the cart
//! stepstyle cart add 3 --size 8
//! stepstyle cart show
//!
//! # Pay cash on delivery, skipping the simulated pauses
//! stepstyle --fast checkout cod --address "12 MG Road, Bengaluru 560001"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::Parser;
use stepstyle_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.code.exit_code());
        }
    }
}
