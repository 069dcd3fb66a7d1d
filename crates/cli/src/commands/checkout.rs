//! Checkout command.

use std::io::Write;

use alfath_storefront::checkout::DeliveryInfo;
use alfath_storefront::error::AppError;
use alfath_storefront::state::AppState;

use crate::CliError;

/// `alfath checkout`
pub async fn checkout(
    state: &AppState,
    out: &mut impl Write,
    info: &DeliveryInfo,
) -> Result<(), CliError> {
    let summary = state.checkout_summary();
    let order = state.place_order(info).await.map_err(AppError::from)?;

    writeln!(out, "تم تأكيد طلبك")?;
    writeln!(out, "رقم الطلب: {}", order.id)?;
    writeln!(out, "الحالة: {}", order.status.label())?;
    writeln!(out, "الإجمالي: {}", summary.grand_total_price())?;
    writeln!(out, "طريقة الدفع: الدفع عند الاستلام")?;
    Ok(())
}
