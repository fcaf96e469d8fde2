//! Catalog listing.

use combo_console_core::ProductFilter;

use super::{CommandError, Context};

/// List catalog products matching a name search and optional category.
pub async fn list(
    ctx: &Context,
    search: String,
    category: Option<String>,
) -> Result<(), CommandError> {
    let products = ctx.client.fetch_products().await?;
    let filter = ProductFilter::new(search, category);
    let matching = filter.available(&products, &[]);

    tracing::info!("{} of {} products", matching.len(), products.len());
    for product in matching {
        let list_price = product
            .original_price
            .filter(|original| *original != product.price)
            .map(|original| format!(" (was {original})"))
            .unwrap_or_default();
        tracing::info!(
            "  {:<12} {:<40} {:>16}{}  {:<14} stock {}",
            product.sku.as_str(),
            product.name,
            product.price.to_string(),
            list_price,
            product.category,
            product.stock
        );
    }
    Ok(())
}
