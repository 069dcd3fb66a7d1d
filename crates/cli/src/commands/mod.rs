//! Command implementations.
//!
//! Each command writes its human-readable output to the given writer and
//! leaves error reporting to `main`.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod signup;
pub mod wishlist;

use std::io::Write;

use alfath_core::{Price, Product, ProductId};
use alfath_storefront::catalog::Origin;
use alfath_storefront::error::AppError;
use alfath_storefront::state::AppState;

use crate::CliError;

/// Look up a product, from the backend or the seed catalog.
async fn find_product(state: &AppState, id: ProductId) -> Result<Product, CliError> {
    state
        .catalog()
        .product(id)
        .await
        .value
        .ok_or_else(|| AppError::NotFound(format!("المنتج رقم {id}")).into())
}

/// Tell the user when a listing comes from the offline catalog.
fn write_origin(out: &mut impl Write, origin: &Origin) -> std::io::Result<()> {
    match origin {
        Origin::Remote => Ok(()),
        Origin::Fallback { .. } => {
            writeln!(out, "(الخادم غير متاح، يتم عرض بيانات احتياطية)")
        }
    }
}

/// One summary line per product.
fn write_product_line(out: &mut impl Write, product: &Product) -> std::io::Result<()> {
    write!(
        out,
        "#{:<4} {}  {}",
        product.id,
        product.name,
        Price::egp(product.price)
    )?;
    if product.original_price.is_some_and(|orig| orig > product.price) {
        write!(out, " (بدلاً من {})", Price::egp(product.list_price()))?;
    }
    write!(out, "  ★{:.1} ({})", product.rating, product.reviews)?;
    if !product.in_stock {
        write!(out, "  [غير متوفر]")?;
    }
    writeln!(out)
}
