//! Catalog browsing commands.

use std::io::Write;

use alfath_core::{Product, ProductId};
use alfath_storefront::catalog::{
    ProductQuery, Sourced, filter_categories, subcategory_label, subcategory_product_count,
};
use alfath_storefront::state::AppState;

use super::{find_product, write_origin, write_product_line};
use crate::CliError;

/// `alfath products`
pub async fn products(
    state: &AppState,
    out: &mut impl Write,
    query: &ProductQuery,
) -> Result<(), CliError> {
    let listing = state.catalog().products().await;
    print_listing(out, listing, query)
}

/// Narrow `listing` with `query` and print it.
pub fn print_listing(
    out: &mut impl Write,
    listing: Sourced<Vec<Product>>,
    query: &ProductQuery,
) -> Result<(), CliError> {
    write_origin(out, &listing.origin)?;
    let products = query.apply(&listing.value);
    if products.is_empty() {
        writeln!(out, "لا توجد منتجات")?;
        return Ok(());
    }
    for product in &products {
        write_product_line(out, product)?;
    }
    writeln!(out, "{} منتج", products.len())?;
    Ok(())
}

/// `alfath product <id>`
pub async fn product(state: &AppState, out: &mut impl Write, id: ProductId) -> Result<(), CliError> {
    let product = find_product(state, id).await?;

    write_product_line(out, &product)?;
    writeln!(out, "{}", product.description)?;
    writeln!(out, "الماركة: {}", product.brand)?;
    match &product.sub_category {
        Some(sub) => writeln!(out, "الفئة: {} / {sub}", product.category)?,
        None => writeln!(out, "الفئة: {}", product.category)?,
    }
    if let Some(pct) = product.discount_percentage {
        writeln!(out, "خصم {pct}%")?;
    }
    for (name, value) in product.specifications() {
        writeln!(out, "  {name}: {value}")?;
    }
    Ok(())
}

/// `alfath categories`
pub async fn categories(state: &AppState, out: &mut impl Write, search: &str) -> Result<(), CliError> {
    let listing = state.catalog().categories().await;
    write_origin(out, &listing.origin)?;

    for category in filter_categories(&listing.value, search) {
        writeln!(out, "{} - {}", category.name, category.description)?;
        for sub in &category.subcategories {
            writeln!(
                out,
                "  {} ({})",
                subcategory_label(sub),
                subcategory_product_count(sub.id())
            )?;
        }
    }
    Ok(())
}
