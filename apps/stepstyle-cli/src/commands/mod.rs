//! # Commands
//!
//! One module per subcommand group. Every command returns the text to print
//! so the same functions back the binary and the tests.
//!
//! - [`catalog`] - Browse products, categories and image fallbacks
//! - [`cart`] - Add, update, remove and review cart lines
//! - [`wishlist`] - Save products and move them to the cart
//! - [`checkout`] - Run the mock payment flow
//! - [`auth`] - Mock sign-in, OTP, registration and password reset

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use stepstyle_core::{CartLine, Product};

/// `Air Glide (UK 8, Red) x2  ₹5998.00`
pub(crate) fn format_line(line: &CartLine) -> String {
    let mut options = Vec::new();
    if line.selected_size != 0 {
        options.push(format!("UK {}", line.selected_size));
    }
    if !line.selected_color.is_empty() {
        options.push(line.selected_color.clone());
    }

    let mut out = line.name.clone();
    if !options.is_empty() {
        out.push_str(&format!(" ({})", options.join(", ")));
    }
    out.push_str(&format!(" x{}  {}", line.quantity, line.line_total()));
    out
}

/// `#3  Court Classic  ₹2999.00  Casual`
pub(crate) fn format_product(product: &Product) -> String {
    let mut out = format!(
        "#{:<3} {}  {}  {}",
        product.id,
        product.name,
        product.unit_price(),
        product.category
    );
    if !product.in_stock {
        out.push_str("  (out of stock)");
    }
    out
}
