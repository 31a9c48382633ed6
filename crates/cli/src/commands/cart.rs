//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! amz cart show
//!
//! # Add two units of a product
//! amz cart add -p 64f1c2 --name "Classic Tee" --price 19.90 --stock 5 -c Red -s M -q 2
//!
//! # Change or remove a line
//! amz cart update -p 64f1c2 -c Red -s M -q 3
//! amz cart remove -p 64f1c2 -c Red -s M
//!
//! # Checkout selections
//! amz cart delivery 0
//! amz cart payment PayPal
//! ```

use amazona_core::{AVAILABLE_DELIVERY_DATES, Cart, ClientId, LineItem, ProductId, format_price};
use amazona_storefront::CartStore;
use rust_decimal::Decimal;

use super::CommandError;

/// The `(product, color, size)` selection a command operates on.
#[derive(Debug, Clone)]
pub struct Selection {
    pub product: String,
    pub color: String,
    pub size: String,
}

/// Catalog details supplied when adding a product.
#[derive(Debug, Clone)]
pub struct Offer {
    pub name: String,
    pub slug: Option<String>,
    pub category: String,
    pub image: String,
    pub price: Decimal,
    pub stock: u32,
}

impl Selection {
    /// A line item carrying only this selection's key.
    ///
    /// Update and remove match stored lines by key, so the remaining fields
    /// are never read.
    fn key_item(&self) -> LineItem {
        self.line_item(&Offer {
            name: String::new(),
            slug: None,
            category: String::new(),
            image: String::new(),
            price: Decimal::ZERO,
            stock: 0,
        })
    }

    fn line_item(&self, offer: &Offer) -> LineItem {
        LineItem {
            client_id: ClientId::generate(),
            product_id: ProductId::new(self.product.as_str()),
            name: offer.name.clone(),
            slug: offer.slug.clone().unwrap_or_else(|| slugify(&offer.name)),
            category: offer.category.clone(),
            image: offer.image.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            quantity: 1,
            count_in_stock: offer.stock,
            unit_price: offer.price,
        }
    }
}

/// Print the committed cart.
pub async fn show(store: &CartStore) {
    print_cart(&store.cart().await);
}

/// Add `quantity` units of the selection.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the cart rejected or failed to commit the change.
pub async fn add(
    store: &CartStore,
    selection: &Selection,
    offer: &Offer,
    quantity: u32,
) -> Result<(), CommandError> {
    let item = selection.line_item(offer);
    let client_id = store.add_item(&item, quantity).await?;
    tracing::info!(%client_id, "Added to cart");
    print_cart(&store.cart().await);
    Ok(())
}

/// Set the quantity of the selection's line.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the cart rejected or failed to commit the change.
pub async fn update(
    store: &CartStore,
    selection: &Selection,
    quantity: u32,
) -> Result<(), CommandError> {
    store.update_item(&selection.key_item(), quantity).await?;
    print_cart(&store.cart().await);
    Ok(())
}

/// Remove the selection's line.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the change could not be committed.
pub async fn remove(store: &CartStore, selection: &Selection) -> Result<(), CommandError> {
    store.remove_item(&selection.key_item()).await?;
    print_cart(&store.cart().await);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the empty cart could not be persisted.
pub async fn clear(store: &CartStore) -> Result<(), CommandError> {
    store.clear().await?;
    #[allow(clippy::print_stdout)]
    {
        println!("Cart cleared.");
    }
    Ok(())
}

/// Choose a delivery option by position.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the option is rejected or the change
/// could not be committed.
pub async fn delivery(store: &CartStore, index: usize) -> Result<(), CommandError> {
    let cart = store.set_delivery_date(index).await?;
    print_cart(&cart);
    Ok(())
}

/// Record the payment method.
///
/// # Errors
///
/// Returns `CommandError::Cart` if the change could not be persisted.
pub async fn payment(store: &CartStore, method: &str) -> Result<(), CommandError> {
    store.set_payment_method(method).await?;
    print_cart(&store.cart().await);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty.");
    } else {
        for item in &cart.items {
            println!(
                "  {} x {:<30} {}/{}  {}",
                item.quantity,
                item.name,
                item.color,
                item.size,
                format_price(item.unit_price)
            );
        }
        println!();
    }

    println!("Items ({}):   {}", cart.item_count(), format_price(cart.items_price));
    if let Some(shipping) = cart.shipping_price {
        println!("Shipping:    {}", format_price(shipping));
    }
    if let Some(tax) = cart.tax_price {
        println!("Tax:         {}", format_price(tax));
    }
    println!("Total:       {}", format_price(cart.total_price));

    if let Some(option) = cart
        .delivery_date_index
        .and_then(|index| AVAILABLE_DELIVERY_DATES.get(index))
    {
        println!("Delivery:    {}", option.name);
    }
    if let Some(date) = cart.expected_delivery_date {
        println!("Arrives:     {}", date.format("%A, %B %-d"));
    }
    if let Some(method) = &cart.payment_method {
        println!("Payment:     {method}");
    }
}

fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
