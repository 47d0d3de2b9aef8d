//! Cart commands.

use stepstyle_core::Money;

use super::format_line;
use crate::error::CliResult;
use crate::state::AppState;

pub async fn add(
    state: &AppState,
    id: u32,
    size: Option<u32>,
    color: Option<String>,
) -> CliResult<String> {
    let product = state.product(id).await?;
    let carts = state.store.carts();
    let line = carts.add(&product, size, color).await?;
    let badge = carts.line_count().await?;

    Ok(format!("Added {}\nCart: {} item(s)", format_line(&line), badge))
}

/// Sets a line's quantity; zero removes it.
pub async fn set(state: &AppState, id: u32, size: u32, quantity: u32) -> CliResult<String> {
    state.store.carts().set_quantity(id, size, quantity).await?;
    show(state).await
}

pub async fn remove(state: &AppState, id: u32, size: u32) -> CliResult<String> {
    if state.store.carts().remove(id, size).await? {
        show(state).await
    } else {
        Ok("Nothing to remove".to_string())
    }
}

pub async fn clear(state: &AppState) -> CliResult<String> {
    state.store.carts().clear().await?;
    Ok("Cart cleared".to_string())
}

pub async fn show(state: &AppState) -> CliResult<String> {
    let cart = state.store.carts().load().await?;
    if cart.is_empty() {
        return Ok("Your cart is empty".to_string());
    }

    let shipping = state.checkout.shipping();
    let mut out: Vec<String> = cart.lines().iter().map(format_line).collect();
    out.push(String::new());
    out.push(summary_row("Subtotal", cart.subtotal()));
    out.push(summary_row("Shipping", shipping));
    out.push(summary_row("Total", cart.total_with_shipping(shipping)));
    Ok(out.join("\n"))
}

fn summary_row(label: &str, amount: Money) -> String {
    format!("{label:<10}{:>12}", amount.to_string())
}
