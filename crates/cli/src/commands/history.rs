//! Browsing history commands.
//!
//! # Usage
//!
//! ```bash
//! amz history add -p 64f1c2 --category Shirts
//! amz history show
//! amz history clear
//! ```

use amazona_core::ViewedProduct;
use amazona_storefront::BrowsingHistoryStore;

use super::CommandError;

/// Print viewed products, most recent first.
#[allow(clippy::print_stdout)]
pub async fn show(store: &BrowsingHistoryStore) {
    let products = store.products().await;
    if products.is_empty() {
        println!("No products viewed yet.");
        return;
    }
    for (position, product) in products.iter().enumerate() {
        println!("{:>2}. {} ({})", position + 1, product.id, product.category);
    }
}

/// Record a product view.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the history could not be persisted.
pub async fn add(
    store: &BrowsingHistoryStore,
    product: &str,
    category: &str,
) -> Result<(), CommandError> {
    store.add_item(ViewedProduct::new(product, category)).await?;
    show(store).await;
    Ok(())
}

/// Forget every viewed product.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the empty history could not be persisted.
pub async fn clear(store: &BrowsingHistoryStore) -> Result<(), CommandError> {
    store.clear().await?;
    #[allow(clippy::print_stdout)]
    {
        println!("History cleared.");
    }
    Ok(())
}
