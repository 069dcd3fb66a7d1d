//! Wishlist commands.

use std::io::Write;

use alfath_core::ProductId;
use alfath_storefront::error::add_breadcrumb;
use alfath_storefront::state::AppState;

use super::{find_product, write_product_line};
use crate::CliError;

/// `alfath wishlist show`
pub fn show(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    let items = state.wishlist().items();
    if items.is_empty() {
        writeln!(out, "قائمة الأمنيات فارغة")?;
        return Ok(());
    }
    for product in &items {
        write_product_line(out, product)?;
    }
    Ok(())
}

/// `alfath wishlist add <id>`
pub async fn add(state: &AppState, out: &mut impl Write, id: ProductId) -> Result<(), CliError> {
    let product = find_product(state, id).await?;
    let name = product.name.clone();
    state.wishlist().add_item(product);
    add_breadcrumb("wishlist", "Saved product", Some(&[("product_id", id.to_string().as_str())]));
    writeln!(out, "تمت إضافة {name} إلى قائمة الأمنيات")?;
    Ok(())
}

/// `alfath wishlist remove <id>`
pub fn remove(state: &AppState, out: &mut impl Write, id: ProductId) -> Result<(), CliError> {
    if !state.wishlist().contains(id) {
        writeln!(out, "المنتج غير موجود في قائمة الأمنيات")?;
        return Ok(());
    }
    state.wishlist().remove_item(id);
    add_breadcrumb("wishlist", "Removed product", Some(&[("product_id", id.to_string().as_str())]));
    writeln!(out, "تمت إزالة المنتج من قائمة الأمنيات")?;
    Ok(())
}

/// `alfath wishlist toggle <id>`
pub async fn toggle(state: &AppState, out: &mut impl Write, id: ProductId) -> Result<(), CliError> {
    if state.wishlist().contains(id) {
        return remove(state, out, id);
    }
    add(state, out, id).await
}

/// `alfath wishlist clear`
pub fn clear(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    state.wishlist().clear();
    add_breadcrumb("wishlist", "Cleared wishlist", None);
    writeln!(out, "تم إفراغ قائمة الأمنيات")?;
    Ok(())
}

/// `alfath wishlist to-cart`
pub fn to_cart(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    let added = state.wishlist().add_all_to_cart(state.cart());
    add_breadcrumb("wishlist", "Moved to cart", Some(&[("added", added.to_string().as_str())]));
    writeln!(out, "تمت إضافة {added} منتج إلى السلة")?;
    Ok(())
}
