//! Catalog browsing and stock commands.

use std::io::{self, Write};

use techsphere_core::{Category, ProductId};
use techsphere_storefront::catalog::{CatalogQuery, CatalogSource, SortOrder};
use techsphere_storefront::error::AppError;
use techsphere_storefront::state::AppState;

use super::{CURRENCY, CliError, product_row};

/// List products matching the filters.
pub async fn list(
    state: &AppState,
    category: Option<Category>,
    search: String,
    sort: SortOrder,
) -> Result<(), CliError> {
    let catalog = state.catalog().load().await;
    let query = CatalogQuery {
        category,
        search,
        sort,
    };
    let products = query.apply(catalog.products());

    let mut out = io::stdout().lock();
    if catalog.source() == CatalogSource::Fallback {
        writeln!(out, "(catálogo offline: exibindo produtos de demonstração)")?;
    }
    if products.is_empty() {
        writeln!(out, "Nenhum produto encontrado.")?;
        return Ok(());
    }
    for product in products {
        product_row(&mut out, product)?;
    }
    Ok(())
}

/// Show one product in detail.
pub async fn show(state: &AppState, id: &ProductId) -> Result<(), CliError> {
    let product = state
        .catalog()
        .product(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", product.name)?;
    writeln!(out, "  Categoria: {}", product.category.display_name())?;
    writeln!(out, "  Preço:     {}", product.price.format(CURRENCY))?;
    if let Some(old) = product.old_price.filter(|_| product.is_on_sale()) {
        writeln!(out, "  De:        {}", old.format(CURRENCY))?;
    }
    writeln!(
        out,
        "  Estoque:   {} ({})",
        product.stock,
        product.stock_status().label()
    )?;
    writeln!(
        out,
        "  Avaliação: {:.1} ({} avaliações)",
        product.rating, product.reviews
    )?;
    if !product.description.is_empty() {
        writeln!(out, "  {}", product.description)?;
    }
    Ok(())
}

/// Set a product's stock on the catalog service.
pub async fn set_stock(state: &AppState, id: &ProductId, stock: u32) -> Result<(), CliError> {
    if !state.catalog().update_stock(id, stock).await {
        return Err(AppError::Internal(format!("catalog service rejected stock update for {id}")).into());
    }
    writeln!(io::stdout().lock(), "Estoque de {id} atualizado para {stock}.")?;
    Ok(())
}
