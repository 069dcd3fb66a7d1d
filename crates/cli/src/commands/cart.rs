//! Cart commands.

use std::io::Write;

use alfath_core::{Price, ProductId};
use alfath_storefront::error::add_breadcrumb;
use alfath_storefront::state::AppState;

use super::find_product;
use crate::CliError;

const NOT_IN_CART: &str = "المنتج غير موجود في السلة";

/// `alfath cart show`
pub fn show(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    let lines = state.cart().lines();
    if lines.is_empty() {
        writeln!(out, "سلة التسوق فارغة")?;
        return Ok(());
    }

    for line in &lines {
        writeln!(
            out,
            "#{:<4} {} × {}  = {}",
            line.product.id,
            line.product.name,
            line.quantity,
            Price::egp(line.line_total())
        )?;
    }

    let summary = state.checkout_summary();
    writeln!(out, "عدد المنتجات: {}", summary.totals.item_count)?;
    writeln!(out, "المجموع الفرعي: {}", Price::egp(summary.totals.subtotal))?;
    if !summary.totals.discount.is_zero() {
        writeln!(out, "الخصم: -{}", Price::egp(summary.totals.discount))?;
    }
    writeln!(out, "الإجمالي: {}", summary.totals.total_price())?;
    writeln!(out, "رسوم التوصيل: {}", Price::egp(summary.delivery_fee))?;
    writeln!(out, "الإجمالي مع التوصيل: {}", summary.grand_total_price())?;
    Ok(())
}

/// `alfath cart add <id>`
pub async fn add(
    state: &AppState,
    out: &mut impl Write,
    id: ProductId,
    quantity: u32,
) -> Result<(), CliError> {
    let product = find_product(state, id).await?;
    let name = product.name.clone();
    state.cart().add_item(product, quantity);
    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[
            ("product_id", id.to_string().as_str()),
            ("quantity", quantity.to_string().as_str()),
        ]),
    );
    writeln!(
        out,
        "تمت إضافة {name} إلى السلة (الكمية: {})",
        state.cart().quantity_of(id)
    )?;
    Ok(())
}

/// `alfath cart remove <id>`
pub fn remove(state: &AppState, out: &mut impl Write, id: ProductId) -> Result<(), CliError> {
    if !state.cart().contains(id) {
        writeln!(out, "{NOT_IN_CART}")?;
        return Ok(());
    }
    state.cart().remove_item(id);
    add_breadcrumb("cart", "Removed product", Some(&[("product_id", id.to_string().as_str())]));
    writeln!(out, "تمت إزالة المنتج من السلة")?;
    Ok(())
}

/// `alfath cart set <id> <quantity>`
pub fn set_quantity(
    state: &AppState,
    out: &mut impl Write,
    id: ProductId,
    quantity: u32,
) -> Result<(), CliError> {
    if !state.cart().contains(id) {
        writeln!(out, "{NOT_IN_CART}")?;
        return Ok(());
    }
    state.cart().update_quantity(id, quantity);
    add_breadcrumb(
        "cart",
        "Changed quantity",
        Some(&[
            ("product_id", id.to_string().as_str()),
            ("quantity", quantity.to_string().as_str()),
        ]),
    );
    writeln!(out, "الكمية الآن: {}", state.cart().quantity_of(id))?;
    Ok(())
}

/// `alfath cart clear`
pub fn clear(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    state.cart().clear();
    add_breadcrumb("cart", "Cleared cart", None);
    writeln!(out, "تم إفراغ السلة")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use alfath_storefront::config::StorefrontConfig;
    use alfath_storefront::storage::MemoryStore;

    use super::*;

    fn state() -> AppState {
        let url = url::Url::parse("http://127.0.0.1:9/api").unwrap();
        AppState::with_storage(StorefrontConfig::for_api(url), Arc::new(MemoryStore::new())).unwrap()
    }

    fn seed_product(state: &AppState) {
        let product = state
            .catalog()
            .fallback_catalog()
            .product(ProductId::new(1))
            .unwrap();
        state.cart().add_item(product, 2);
    }

    #[test]
    fn test_remove_absent_product_says_so() {
        let state = state();
        seed_product(&state);

        let mut out = Vec::new();
        remove(&state, &mut out, ProductId::new(2)).unwrap();

        assert_eq!(String::from_utf8(out).unwrap().trim(), NOT_IN_CART);
        assert_eq!(state.cart().total_item_count(), 2);
    }

    #[test]
    fn test_remove_present_product() {
        let state = state();
        seed_product(&state);

        let mut out = Vec::new();
        remove(&state, &mut out, ProductId::new(1)).unwrap();

        assert_eq!(String::from_utf8(out).unwrap().trim(), "تمت إزالة المنتج من السلة");
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_set_quantity_on_absent_product_says_so() {
        let state = state();

        let mut out = Vec::new();
        set_quantity(&state, &mut out, ProductId::new(1), 3).unwrap();

        assert_eq!(String::from_utf8(out).unwrap().trim(), NOT_IN_CART);
        assert!(state.cart().is_empty());
    }
}
