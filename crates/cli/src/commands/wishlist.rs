//! Wishlist commands.

use std::io::{self, Write};

use techsphere_core::ProductId;
use techsphere_storefront::state::AppState;
use techsphere_storefront::wishlist::Wishlist;

use super::{CliError, product_row};

/// Show wishlisted products that the catalog knows about.
pub async fn show(state: &AppState) -> Result<(), CliError> {
    let wishlist = Wishlist::load(state.slots().clone());
    if wishlist.is_empty() {
        writeln!(io::stdout().lock(), "Sua lista de desejos está vazia.")?;
        return Ok(());
    }

    let catalog = state.catalog().load().await;
    let mut out = io::stdout().lock();
    for id in wishlist.ids() {
        match catalog.get(id) {
            Some(product) => product_row(&mut out, product)?,
            None => writeln!(out, "{id:>4}  (indisponível no catálogo)")?,
        }
    }
    Ok(())
}

/// Add or remove a product.
pub fn toggle(state: &AppState, id: &ProductId) -> Result<(), CliError> {
    let mut wishlist = Wishlist::load(state.slots().clone());
    let added = wishlist.toggle(id);

    let mut out = io::stdout().lock();
    if added {
        writeln!(out, "{id} adicionado à lista de desejos.")?;
    } else {
        writeln!(out, "{id} removido da lista de desejos.")?;
    }
    Ok(())
}
