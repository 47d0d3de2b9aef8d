//! Catalog browsing.

use stepstyle_core::images::{card_fallback, detail_slides, home_image_path, ImageResolver, PLACEHOLDER_IMAGE};
use tracing::debug;

use super::format_product;
use crate::error::CliResult;
use crate::state::AppState;

/// Upper bound on simulated failures per chain; both chains end well before.
const MAX_FALLBACK_STEPS: usize = 16;

pub async fn list(state: &AppState, category: Option<&str>) -> CliResult<String> {
    let catalog = state.catalog().await;
    let products: Vec<_> = match category {
        Some(category) => catalog.by_category(category),
        None => catalog.products().iter().collect(),
    };
    debug!(count = products.len(), ?category, "catalog list");

    if products.is_empty() {
        return Ok("No products found".to_string());
    }
    Ok(products
        .into_iter()
        .map(format_product)
        .collect::<Vec<_>>()
        .join("\n"))
}

pub async fn categories(state: &AppState) -> CliResult<String> {
    let catalog = state.catalog().await;
    Ok(catalog.categories().join("\n"))
}

pub async fn show(state: &AppState, id: u32) -> CliResult<String> {
    let product = state.product(id).await?;

    let mut lines = vec![format_product(&product)];
    if !product.description.is_empty() {
        lines.push(product.description.clone());
    }
    if product.has_sizes() {
        let sizes: Vec<String> = product.sizes.iter().map(|s| format!("UK {s}")).collect();
        lines.push(format!("Sizes: {}", sizes.join(", ")));
    }
    if !product.colors.is_empty() {
        lines.push(format!("Colors: {}", product.colors.join(", ")));
    }
    lines.push(format!("Image: {}", home_image_path(product.id, &product.image_path)));
    lines.push(format!("Gallery: {}", detail_slides(&product).join(", ")));
    Ok(lines.join("\n"))
}

/// Prints the paths tried if every image of product `id` failed to load:
/// the card chain for its main image and the gallery chain for its first
/// slide.
pub async fn images(state: &AppState, id: u32) -> CliResult<String> {
    let product = state.product(id).await?;

    let mut card = vec![format!("{}/HomeProduct.webp", product.image_path)];
    while card.len() < MAX_FALLBACK_STEPS {
        let Some(last) = card.last() else { break };
        if last == PLACEHOLDER_IMAGE {
            break;
        }
        let next = card_fallback(&product.image_path, last);
        card.push(next);
    }

    let mut resolver = ImageResolver::new();
    let mut gallery = detail_slides(&product).into_iter().take(1).collect::<Vec<_>>();
    while gallery.len() < MAX_FALLBACK_STEPS {
        let Some(last) = gallery.last() else { break };
        if last == PLACEHOLDER_IMAGE {
            break;
        }
        let next = resolver.on_error(last);
        gallery.push(next);
    }

    Ok(format!(
        "Card:    {}\nGallery: {}",
        card.join(" -> "),
        gallery.join(" -> ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_list_and_filter() {
        let state = fixtures::state();

        let all = list(&state, None).await.unwrap();
        assert_eq!(all.lines().count(), 3);
        assert!(all.contains("Street Low  ₹1999.00  Casual  (out of stock)"));

        let running = list(&state, Some("Running")).await.unwrap();
        assert_eq!(running.lines().count(), 2);

        let none = list(&state, Some("Formal")).await.unwrap();
        assert_eq!(none, "No products found");
    }

    #[tokio::test]
    async fn test_categories_first_seen_order() {
        let state = fixtures::state();
        assert_eq!(categories(&state).await.unwrap(), "Running\nCasual");
    }

    #[tokio::test]
    async fn test_show_product() {
        let state = fixtures::state();
        let out = show(&state, 19).await.unwrap();
        assert!(out.contains("Image: /images/Product19/HomeProduct.jpeg"));
        assert!(out.contains("/images/Product19/Slide3.webp"));
        assert!(!out.contains("Sizes"));

        let err = show(&state, 404).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_image_chains_end_on_placeholder() {
        let state = fixtures::state();
        let out = images(&state, 1).await.unwrap();
        let mut lines = out.lines();

        let card = lines.next().unwrap();
        assert!(card.ends_with(PLACEHOLDER_IMAGE));
        assert_eq!(card.matches(" -> ").count(), 4);

        let gallery = lines.next().unwrap();
        assert!(gallery.starts_with("Gallery: /images/Product1/Slide-1.webp -> /images/Product1/Slide-1.jpg"));
        assert!(gallery.contains("/images/Product1/HomeProduct.webp"));
        assert!(gallery.ends_with(PLACEHOLDER_IMAGE));
    }
}
