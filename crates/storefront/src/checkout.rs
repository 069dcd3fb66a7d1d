//! Cash-on-delivery checkout.

use alfath_core::{CartLine, CartTotals, DeliveryAddress, Order, OrderItem, PaymentMethod, Price};
use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, OrderRequest};
use crate::error::add_breadcrumb;
use crate::stores::CartStore;

const MISSING_FIELDS_MESSAGE: &str = "يرجى ملء جميع الحقول المطلوبة";
const EMPTY_CART_MESSAGE: &str = "سلة التسوق فارغة";
const SUBMISSION_FAILED_MESSAGE: &str = "حدث خطأ في إرسال الطلب. يرجى المحاولة مرة أخرى.";

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    /// Names of the required delivery fields left blank.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Order submission failed: {0}")]
    Submission(#[from] ApiError),
}

impl CheckoutError {
    /// Localized message suitable for showing to the customer.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyCart => EMPTY_CART_MESSAGE,
            Self::MissingFields(_) => MISSING_FIELDS_MESSAGE,
            Self::Submission(_) => SUBMISSION_FAILED_MESSAGE,
        }
    }
}

/// Where and to whom the order is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryInfo {
    pub full_name: String,
    pub phone: String,
    /// Street address.
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
}

impl DeliveryInfo {
    /// Required fields that are empty or whitespace-only.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` naming every blank required field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }

    fn to_address(&self) -> DeliveryAddress {
        DeliveryAddress {
            street: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: non_blank(self.postal_code.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Order summary shown before the customer confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub totals: CartTotals,
    pub delivery_fee: Decimal,
    /// Discounted cart total plus the delivery fee.
    pub grand_total: Decimal,
}

impl CheckoutSummary {
    #[must_use]
    pub fn compute(lines: &[CartLine], delivery_fee: Decimal) -> Self {
        let totals = CartTotals::from_lines(lines);
        Self {
            totals,
            delivery_fee,
            grand_total: totals.total + delivery_fee,
        }
    }

    #[must_use]
    pub const fn grand_total_price(&self) -> Price {
        Price::egp(self.grand_total)
    }
}

/// Submit the current cart as a cash-on-delivery order.
///
/// On success the cart is cleared and the created order returned: the one the
/// backend echoed back, or a locally built pending order when it only
/// acknowledged the submission. On failure the cart is left untouched.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart`, `CheckoutError::MissingFields`, or
/// `CheckoutError::Submission` if the backend rejects the order.
#[instrument(skip_all, fields(city = %info.city))]
pub async fn place_order(
    api: &ApiClient,
    cart: &CartStore,
    info: &DeliveryInfo,
    delivery_fee: Decimal,
) -> Result<Order, CheckoutError> {
    let lines = cart.lines();
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    info.validate()?;

    let summary = CheckoutSummary::compute(&lines, delivery_fee);
    let request = OrderRequest {
        customer_name: info.full_name.trim().to_string(),
        phone: info.phone.trim().to_string(),
        address: info.to_address(),
        items: lines.iter().map(OrderItem::from).collect(),
        notes: non_blank(info.notes.as_deref()),
        payment_method: PaymentMethod::Cash,
        total_amount: summary.grand_total,
    };

    let created = api.create_order(&request).await.map_err(|e| {
        warn!(error = %e, "Order submission failed, cart kept");
        CheckoutError::Submission(e)
    })?;

    let order = created.unwrap_or_else(|| {
        Order::pending(request.items, summary.grand_total, request.address, Utc::now())
    });

    cart.clear();
    info!(order_id = %order.id, total = %order.total_amount, "Order placed");
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order.id.as_str())]));
    Ok(order)
}
