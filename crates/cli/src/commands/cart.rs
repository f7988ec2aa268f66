//! Cart commands.

use std::io::{self, Write};

use rust_decimal::Decimal;

use techsphere_core::ProductId;
use techsphere_storefront::cart::{CartStore, Notice};
use techsphere_storefront::error::AppError;
use techsphere_storefront::state::AppState;
use techsphere_storefront::storage::FileSlotStore;

use super::{CURRENCY, CliError, print_notice};

fn open(state: &AppState) -> CartStore<FileSlotStore> {
    CartStore::load(state.slots().clone()).with_discount(state.config().discount)
}

/// Show cart lines and totals.
pub fn show(state: &AppState) -> Result<(), CliError> {
    let store = open(state);
    let mut out = io::stdout().lock();

    if store.cart().is_empty() {
        writeln!(out, "Seu carrinho está vazio.")?;
        return Ok(());
    }

    for line in store.cart().lines() {
        writeln!(
            out,
            "{:>4}  {:<42} {:>3} x {:>14} = {:>14}",
            line.product.id,
            line.product.name,
            line.quantity,
            line.product.price.format(CURRENCY),
            CURRENCY.format_amount(line.line_total()),
        )?;
    }

    let totals = store.totals();
    writeln!(out)?;
    writeln!(out, "Itens:     {}", totals.item_count)?;
    writeln!(out, "Subtotal:  {}", CURRENCY.format_amount(totals.subtotal))?;
    if totals.discount > Decimal::ZERO {
        writeln!(out, "Desconto:  {}", CURRENCY.format_amount(-totals.discount))?;
    }
    writeln!(out, "Total:     {}", CURRENCY.format_amount(totals.total))?;
    Ok(())
}

/// Add `quantity` units of a product.
pub async fn add(state: &AppState, id: &ProductId, quantity: u32) -> Result<(), CliError> {
    let catalog = state.catalog().load().await;
    let product = match catalog.get(id) {
        Some(product) => product.clone(),
        None => state
            .catalog()
            .product(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?,
    };

    let mut store = open(state);
    let mut out = io::stdout().lock();
    match store.add_item(&product, quantity, &catalog) {
        Ok(_) => {
            print_notice(&mut out, &Notice::added(&product, quantity))?;
            Ok(())
        }
        Err(e) => {
            print_notice(&mut out, &Notice::from_cart_error(&e))?;
            Err(AppError::from(e).into())
        }
    }
}

/// Remove a product's line.
pub fn remove(state: &AppState, id: &ProductId) -> Result<(), CliError> {
    let mut store = open(state);
    let mut out = io::stdout().lock();
    match store.remove_item(id) {
        Some(line) => writeln!(out, "{} removido do carrinho.", line.product.name)?,
        None => writeln!(out, "{id} não está no carrinho.")?,
    }
    Ok(())
}

/// Change a line's quantity by `delta`.
pub async fn update(state: &AppState, id: &ProductId, delta: i64) -> Result<(), CliError> {
    let catalog = state.catalog().load().await;
    let mut store = open(state);
    let mut out = io::stdout().lock();

    match store.update_quantity(id, delta, &catalog) {
        Ok(Some(line)) => {
            writeln!(out, "{}: {} un.", line.product.name, line.quantity)?;
            Ok(())
        }
        Ok(None) if store.line(id).is_some() => {
            writeln!(out, "{id} não consta no catálogo atual; quantidade mantida.")?;
            Ok(())
        }
        Ok(None) => {
            writeln!(out, "{id} não está no carrinho.")?;
            Ok(())
        }
        Err(e) => {
            print_notice(&mut out, &Notice::from_cart_error(&e))?;
            Err(AppError::from(e).into())
        }
    }
}

/// Empty the cart.
pub fn clear(state: &AppState) -> Result<(), CliError> {
    open(state).clear();
    writeln!(io::stdout().lock(), "Carrinho esvaziado.")?;
    Ok(())
}
