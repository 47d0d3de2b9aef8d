//! # Image Fallback Resolution
//!
//! Product images ship in mixed formats, so any given path may 404. This
//! module decides which path to try next after a load failure.
//!
//! ## Detail Page Rotation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /images/Product3/Slide-2.webp  ✗                                       │
//! │        │                                                                │
//! │        ▼  next extension                                                │
//! │  .webp ──► .jpg ──► .jpeg ──► .png ──► (.webp again)                    │
//! │                                           │                             │
//! │                                           ▼  candidate already failed   │
//! │                          /images/Product3/HomeProduct.webp              │
//! │                                           │                             │
//! │                                           ▼  that failed too            │
//! │                          /images/Empty-cart.jpg  (terminal)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product cards use a shorter chain (`.webp → .jpeg → .jpg → .png →
//! placeholder`) that needs no memory of earlier failures.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::Product;

/// Shown when nothing else loads.
pub const PLACEHOLDER_IMAGE: &str = "/images/Empty-cart.jpg";

/// Extension order for detail-page images. Wraps around.
const DETAIL_ROTATION: [&str; 4] = [".webp", ".jpg", ".jpeg", ".png"];

/// Extension order for product-card images. Does not wrap.
const CARD_ROTATION: [&str; 4] = [".webp", ".jpeg", ".jpg", ".png"];

static PRODUCT_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Product[0-9]+").expect("Invalid regex"));

// =============================================================================
// Known Image Layout
// =============================================================================

/// Extension of a product's `HomeProduct` image as shipped.
pub fn home_image_extension(product_id: u32) -> &'static str {
    match product_id {
        1 | 16 | 19 => ".jpeg",
        2..=9 => ".webp",
        17 | 20 => ".png",
        _ => ".jpg",
    }
}

/// Primary image used by product cards, cart lines and the wishlist.
pub fn home_image_path(product_id: u32, image_path: &str) -> String {
    format!("{}/HomeProduct{}", image_path, home_image_extension(product_id))
}

/// The four images of a product detail page, main image last.
///
/// Several products ship slides in non-default formats; Product19 also names
/// its third slide `Slide3` with no dash.
pub fn detail_slides(product: &Product) -> Vec<String> {
    let (s1, s2, s3, home) = match product.id {
        1 | 16 => (".webp", ".webp", ".webp", ".jpeg"),
        2 => (".webp", ".webp", ".jpg", ".webp"),
        3 => (".webp", ".jpg", ".jpg", ".webp"),
        17 | 20 => (".webp", ".webp", ".webp", ".png"),
        19 => (".png", ".jpeg", ".webp", ".jpeg"),
        _ => (".webp", ".webp", ".webp", ".webp"),
    };
    let third = if product.id == 19 { "Slide3" } else { "Slide-3" };
    let base = &product.image_path;

    vec![
        format!("{base}/Slide-1{s1}"),
        format!("{base}/Slide-2{s2}"),
        format!("{base}/{third}{s3}"),
        format!("{base}/HomeProduct{home}"),
    ]
}

// =============================================================================
// Product Card Fallback
// =============================================================================

/// Next path to try after a product card image at `failed` fails.
///
/// Walks `HomeProduct` through the card rotation under `base_path`; after
/// `.png` (or for an unrecognised extension) returns the placeholder.
pub fn card_fallback(base_path: &str, failed: &str) -> String {
    let current = CARD_ROTATION.iter().position(|ext| failed.ends_with(ext));
    match current {
        Some(idx) if idx + 1 < CARD_ROTATION.len() => {
            format!("{}/HomeProduct{}", base_path, CARD_ROTATION[idx + 1])
        }
        _ => PLACEHOLDER_IMAGE.to_string(),
    }
}

// =============================================================================
// Detail Image Resolver
// =============================================================================

/// Remembers which paths have failed and picks the next one to try.
///
/// One resolver per rendered gallery. Every call either moves to an untried
/// path or lands on [`PLACEHOLDER_IMAGE`], so a gallery converges after a
/// bounded number of errors.
#[derive(Debug, Default, Clone)]
pub struct ImageResolver {
    failed: HashSet<String>,
}

impl ImageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `src` failed to load and returns the replacement.
    pub fn on_error(&mut self, src: &str) -> String {
        if src == PLACEHOLDER_IMAGE || self.failed.contains(src) {
            return PLACEHOLDER_IMAGE.to_string();
        }

        let (stem, current) = split_extension(src);
        let next_ext = match current {
            Some(idx) => DETAIL_ROTATION[(idx + 1) % DETAIL_ROTATION.len()],
            None => DETAIL_ROTATION[0],
        };
        let candidate = format!("{stem}{next_ext}");

        self.failed.insert(src.to_string());

        if candidate == src || self.failed.contains(&candidate) {
            self.product_fallback(src)
        } else {
            candidate
        }
    }

    pub fn has_failed(&self, src: &str) -> bool {
        self.failed.contains(src)
    }

    /// Forgets all failures, e.g. when a new product is shown.
    pub fn reset(&mut self) {
        self.failed.clear();
    }

    fn product_fallback(&self, src: &str) -> String {
        PRODUCT_DIR_RE
            .find(src)
            .map(|m| format!("/images/{}/HomeProduct.webp", m.as_str()))
            .filter(|home| !self.failed.contains(home))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
    }
}

/// Splits a known image extension off `src` (case-insensitive).
fn split_extension(src: &str) -> (&str, Option<usize>) {
    let lower = src.to_ascii_lowercase();
    for (idx, ext) in DETAIL_ROTATION.iter().enumerate() {
        if lower.ends_with(ext) {
            return (&src[..src.len() - ext.len()], Some(idx));
        }
    }
    (src, None)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32) -> Product {
        Product {
            id,
            name: String::new(),
            description: String::new(),
            price: 0,
            image_path: format!("/images/Product{id}"),
            category: String::new(),
            in_stock: true,
            colors: vec![],
            sizes: vec![],
        }
    }

    #[test]
    fn test_rotation_then_home_then_placeholder() {
        let mut r = ImageResolver::new();
        let start = "/images/Product3/Slide-2.webp";

        assert_eq!(r.on_error(start), "/images/Product3/Slide-2.jpg");
        assert_eq!(r.on_error("/images/Product3/Slide-2.jpg"), "/images/Product3/Slide-2.jpeg");
        assert_eq!(r.on_error("/images/Product3/Slide-2.jpeg"), "/images/Product3/Slide-2.png");
        // .webp already failed
        assert_eq!(r.on_error("/images/Product3/Slide-2.png"), "/images/Product3/HomeProduct.webp");
    }

    #[test]
    fn test_always_terminates_on_placeholder() {
        let mut r = ImageResolver::new();
        let mut src = "/images/Product7/Slide-1.png".to_string();
        let mut steps = 0;
        while src != PLACEHOLDER_IMAGE {
            src = r.on_error(&src);
            steps += 1;
            assert!(steps < 20, "resolver did not converge");
        }
        assert_eq!(r.on_error(PLACEHOLDER_IMAGE), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_unknown_extension_starts_at_webp() {
        let mut r = ImageResolver::new();
        assert_eq!(r.on_error("/images/Product5/Slide-1"), "/images/Product5/Slide-1.webp");
        assert_eq!(r.on_error("/images/Product5/Slide-1.GIF"), "/images/Product5/Slide-1.GIF.webp");
    }

    #[test]
    fn test_path_without_product_falls_to_placeholder() {
        let mut r = ImageResolver::new();
        for ext in [".webp", ".jpg", ".jpeg"] {
            r.on_error(&format!("/images/banner{ext}"));
        }
        assert_eq!(r.on_error("/images/banner.png"), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_repeat_failure_is_terminal() {
        let mut r = ImageResolver::new();
        r.on_error("/images/Product1/Slide-1.webp");
        assert!(r.has_failed("/images/Product1/Slide-1.webp"));
        assert_eq!(r.on_error("/images/Product1/Slide-1.webp"), PLACEHOLDER_IMAGE);
        r.reset();
        assert!(!r.has_failed("/images/Product1/Slide-1.webp"));
    }

    #[test]
    fn test_card_fallback_chain() {
        let base = "/images/Product2";
        assert_eq!(card_fallback(base, "/images/Product2/HomeProduct.webp"), "/images/Product2/HomeProduct.jpeg");
        assert_eq!(card_fallback(base, "/images/Product2/HomeProduct.jpeg"), "/images/Product2/HomeProduct.jpg");
        assert_eq!(card_fallback(base, "/images/Product2/HomeProduct.jpg"), "/images/Product2/HomeProduct.png");
        assert_eq!(card_fallback(base, "/images/Product2/HomeProduct.png"), PLACEHOLDER_IMAGE);
        assert_eq!(card_fallback(base, "/images/Product2/HomeProduct.gif"), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_home_extension_table() {
        assert_eq!(home_image_path(1, "/images/Product1"), "/images/Product1/HomeProduct.jpeg");
        assert_eq!(home_image_extension(5), ".webp");
        assert_eq!(home_image_extension(12), ".jpg");
        assert_eq!(home_image_extension(17), ".png");
        assert_eq!(home_image_extension(18), ".jpg");
        assert_eq!(home_image_extension(99), ".jpg");
    }

    #[test]
    fn test_detail_slides() {
        assert_eq!(
            detail_slides(&product(19)),
            vec![
                "/images/Product19/Slide-1.png",
                "/images/Product19/Slide-2.jpeg",
                "/images/Product19/Slide3.webp",
                "/images/Product19/HomeProduct.jpeg",
            ]
        );
        assert_eq!(detail_slides(&product(3))[1], "/images/Product3/Slide-2.jpg");
        assert_eq!(detail_slides(&product(2))[2], "/images/Product2/Slide-3.jpg");
        assert_eq!(detail_slides(&product(8))[3], "/images/Product8/HomeProduct.webp");
    }
}
