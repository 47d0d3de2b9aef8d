//! Wishlist commands.

use super::{format_line, format_product};
use crate::error::CliResult;
use crate::state::AppState;

pub async fn toggle(state: &AppState, id: u32) -> CliResult<String> {
    let product = state.product(id).await?;
    let wishlist = state.store.wishlist();
    let saved = wishlist.toggle(&product).await?;
    let count = wishlist.count().await?;

    let verb = if saved { "Saved" } else { "Removed" };
    Ok(format!("{verb} {}\nWishlist: {count} item(s)", product.name))
}

pub async fn show(state: &AppState) -> CliResult<String> {
    let entries = state.store.wishlist().entries().await?;
    if entries.is_empty() {
        return Ok("Your wishlist is empty".to_string());
    }
    Ok(entries.iter().map(format_product).collect::<Vec<_>>().join("\n"))
}

pub async fn move_to_cart(state: &AppState, id: u32) -> CliResult<String> {
    let carts = state.store.carts();
    let line = state.store.wishlist().move_to_cart(id, &carts).await?;
    Ok(format!("Moved to cart: {}", format_line(&line)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let state = fixtures::state();
        assert!(toggle(&state, 1).await.unwrap().starts_with("Saved Air Glide"));
        assert!(show(&state).await.unwrap().contains("Air Glide"));
        assert!(toggle(&state, 1).await.unwrap().starts_with("Removed Air Glide"));
        assert_eq!(show(&state).await.unwrap(), "Your wishlist is empty");
    }

    #[tokio::test]
    async fn test_move_to_cart() {
        let state = fixtures::state();
        toggle(&state, 1).await.unwrap();

        let out = move_to_cart(&state, 1).await.unwrap();
        assert_eq!(out, "Moved to cart: Air Glide (UK 7, Red) x1  ₹2999.00");
        assert_eq!(show(&state).await.unwrap(), "Your wishlist is empty");

        let err = move_to_cart(&state, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_out_of_stock_stays_saved() {
        let state = fixtures::state();
        toggle(&state, 2).await.unwrap();

        let err = move_to_cart(&state, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Rejected);
        assert!(show(&state).await.unwrap().contains("Street Low"));
    }
}
