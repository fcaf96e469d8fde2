//! Combo commands.

use combo_console::{ComboCreator, ComboManager, ConsoleError, SuggestionFilter};
use combo_console_core::{Combo, ComboId, ComboStatus, ComboSummary, Sku, StatusFilter, Suggestion};

use super::{CommandError, Context};

/// Field and line changes requested by `combos edit`.
#[derive(Debug, Default)]
pub struct Edits {
    pub name: Option<String>,
    pub note: Option<String>,
    pub status: Option<ComboStatus>,
    pub add: Vec<Sku>,
    pub remove: Vec<Sku>,
    pub inc: Vec<Sku>,
    pub dec: Vec<Sku>,
}

fn manager(ctx: &Context) -> ComboManager {
    ComboManager::from_client(&ctx.client, ctx.config.created_by.clone())
}

fn suggestion_filter(params: &[String]) -> Result<SuggestionFilter, CommandError> {
    params
        .iter()
        .map(|param| {
            SuggestionFilter::parse_pair(param).ok_or_else(|| {
                CommandError::InvalidArgument(format!("expected key=value, got '{param}'"))
            })
        })
        .collect()
}

fn log_summary(summary: &ComboSummary) {
    tracing::info!(
        "  {} products, {} units, total {}",
        summary.line_count,
        summary.total_quantity,
        summary.total_value
    );
    if let Some(percent) = summary.discount_percent().filter(|p| *p > 0.0) {
        tracing::info!(
            "  list value {}, saving {} ({percent:.1}%)",
            summary.original_value,
            summary.savings()
        );
    }
    if !summary.categories.is_empty() {
        tracing::info!("  categories: {}", summary.categories.join(", "));
    }
}

fn log_combo_row(combo: &Combo) {
    let summary = combo.summary();
    tracing::info!(
        "{:<10} {:<32} {:<7} {:>16}  {}",
        combo.id.as_str(),
        combo.name,
        combo.status.as_str(),
        summary.total_value.to_string(),
        combo.product_names()
    );
}

fn log_combo_detail(combo: &Combo) {
    tracing::info!("{} [{}] {}", combo.id, combo.status, combo.name);
    if !combo.note.is_empty() {
        tracing::info!("  {}", combo.note);
    }
    if let Some(created_on) = combo.created_on() {
        tracing::info!("  created {created_on} by {}", combo.created_by);
    }
    for line in &combo.items {
        tracing::info!(
            "  {:<12} {:<40} x{:<3} {:>16}",
            line.sku().as_str(),
            line.product.name,
            line.quantity(),
            line.line_total().to_string()
        );
    }
    log_summary(&combo.summary());
}

fn log_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        tracing::info!("No suggestions");
        return;
    }
    for (index, suggestion) in suggestions.iter().enumerate() {
        tracing::info!("#{index} {}", suggestion.name);
        if !suggestion.rationale.is_empty() {
            tracing::info!("   {}", suggestion.rationale);
        }
        for item in &suggestion.items {
            let marker = if item.in_existing_combo { " (in a combo)" } else { "" };
            tracing::info!(
                "   {:<12} {:<40} {:>16}  sold {} in 30d{marker}",
                item.sku.as_str(),
                item.name,
                item.price.to_string(),
                item.sales_30d
            );
        }
    }
}

/// List combos passing a search and status filter.
pub async fn list(ctx: &Context, search: String, status: StatusFilter) -> Result<(), CommandError> {
    let mut manager = manager(ctx);
    let total = manager.refresh().await?;
    manager.set_search(search);
    manager.set_status_filter(status);

    let visible = manager.visible();
    tracing::info!("{} of {total} combos ({status})", visible.len());
    for combo in visible {
        log_combo_row(combo);
    }
    Ok(())
}

/// Show one combo with its lines and totals.
pub async fn show(ctx: &Context, id: &ComboId) -> Result<(), CommandError> {
    let mut manager = manager(ctx);
    manager.refresh().await?;
    let combo = manager
        .get(id)
        .ok_or_else(|| ConsoleError::NotFound(format!("combo {id}")))?;
    log_combo_detail(combo);
    Ok(())
}

/// Create a combo from catalog SKUs.
pub async fn create(
    ctx: &Context,
    name: String,
    note: String,
    skus: &[Sku],
) -> Result<(), CommandError> {
    let mut creator = ComboCreator::from_client(&ctx.client, ctx.config.created_by.clone());
    creator.load_catalog().await?;
    creator.set_name(name);
    creator.set_note(note);
    for sku in skus {
        creator.add_sku(sku)?;
    }

    let combo = creator.submit().await?;
    log_combo_detail(&combo);
    Ok(())
}

/// List suggestions for the given filter entries.
pub async fn suggest(ctx: &Context, params: &[String]) -> Result<(), CommandError> {
    let filter = suggestion_filter(params)?;
    let mut creator = ComboCreator::from_client(&ctx.client, ctx.config.created_by.clone());
    let suggestions = creator.fetch_suggestions(&filter).await?;
    log_suggestions(suggestions);
    Ok(())
}

/// Create a combo from the suggestion at `index`.
pub async fn adopt(
    ctx: &Context,
    index: usize,
    params: &[String],
    name: Option<String>,
) -> Result<(), CommandError> {
    let filter = suggestion_filter(params)?;
    let mut creator = ComboCreator::from_client(&ctx.client, ctx.config.created_by.clone());
    creator.fetch_suggestions(&filter).await?;
    creator.apply_suggestion(index)?;
    if let Some(name) = name {
        creator.set_name(name);
    }

    let combo = creator.submit().await?;
    log_combo_detail(&combo);
    Ok(())
}

/// Apply field and line edits to a combo and save it.
pub async fn edit(ctx: &Context, id: &ComboId, edits: Edits) -> Result<(), CommandError> {
    let mut manager = manager(ctx);
    manager.refresh().await?;
    let mut session = manager.begin_edit(id)?;

    if let Some(name) = edits.name {
        session.set_name(name);
    }
    if let Some(note) = edits.note {
        session.set_note(note);
    }
    if let Some(status) = edits.status {
        session.set_status(status);
    }

    if !edits.add.is_empty() {
        let products = ctx.client.fetch_products().await?;
        for sku in &edits.add {
            let product = products
                .iter()
                .find(|product| &product.sku == sku)
                .ok_or_else(|| ConsoleError::NotFound(format!("product {sku}")))?;
            session.add_product(product);
        }
    }
    for sku in &edits.inc {
        session.change_quantity(sku, 1);
    }
    for sku in &edits.dec {
        session.change_quantity(sku, -1);
    }
    for sku in &edits.remove {
        session.remove_product(sku);
    }

    let combo = manager.save(&session).await?;
    log_combo_detail(&combo);
    Ok(())
}

/// Flip a combo between active and paused.
pub async fn toggle(ctx: &Context, id: &ComboId) -> Result<(), CommandError> {
    let mut manager = manager(ctx);
    manager.refresh().await?;
    let combo = manager.toggle_status(id).await?;
    tracing::info!("{} is now {}", combo.name, combo.status);
    Ok(())
}

/// Delete a combo.
pub async fn delete(ctx: &Context, id: &ComboId) -> Result<(), CommandError> {
    let mut manager = manager(ctx);
    manager.delete(id).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_suggestion_filter_from_params() {
        let filter =
            suggestion_filter(&["category=Audio".to_string(), "limit=3".to_string()]).unwrap();
        assert_eq!(filter.get("category"), Some(&json!("Audio")));
        assert_eq!(filter.get("limit"), Some(&json!(3)));
    }

    #[test]
    fn test_suggestion_filter_rejects_bare_word() {
        let err = suggestion_filter(&["category".to_string()]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }
}
