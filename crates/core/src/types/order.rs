//! Orders created at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, UserId};
use super::status::{OrderStatus, PaymentMethod};
use crate::pricing::CartLine;

/// A `{productId, quantity}` pair as posted to the order endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            quantity: line.quantity,
        }
    }
}

/// Delivery address as posted with an order and echoed back by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl std::fmt::Display for DeliveryAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.street, self.city)
    }
}

/// A submitted order.
///
/// Only `Pending` orders are ever created locally; the backend owns every
/// later status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default = "Utc::now")]
    pub order_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default, alias = "address", skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl Order {
    /// Build a pending order locally, used when the backend accepts a
    /// submission without echoing the created order.
    #[must_use]
    pub fn pending(
        items: Vec<OrderItem>,
        total_amount: Decimal,
        delivery_address: DeliveryAddress,
        placed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::local_id(placed_at),
            user_id: None,
            items,
            total_amount,
            status: OrderStatus::Pending,
            order_date: placed_at,
            delivery_date: None,
            delivery_address: Some(delivery_address),
            payment_method: PaymentMethod::Cash,
            tracking_number: None,
        }
    }

    /// Locally generated order id: `ORD-` followed by the unix time in millis.
    #[must_use]
    pub fn local_id(placed_at: DateTime<Utc>) -> OrderId {
        OrderId::new(format!("ORD-{}", placed_at.timestamp_millis()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_local_id_uses_millis() {
        let placed_at = DateTime::from_timestamp_millis(1_718_000_000_123).unwrap();
        assert_eq!(Order::local_id(placed_at).as_str(), "ORD-1718000000123");
    }

    #[test]
    fn test_pending_order_defaults() {
        let placed_at = DateTime::from_timestamp_millis(0).unwrap();
        let address = DeliveryAddress {
            street: "15 Nile St".to_string(),
            city: "Cairo".to_string(),
            postal_code: None,
        };
        let order = Order::pending(vec![], Decimal::from(20), address, placed_at);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, PaymentMethod::Cash);
        assert!(order.tracking_number.is_none());
    }

    #[test]
    fn test_server_order_with_mongo_id() {
        let order: Order = serde_json::from_str(
            r#"{"_id": "665f", "totalAmount": 145, "status": "confirmed"}"#,
        )
        .unwrap();
        assert_eq!(order.id.as_str(), "665f");
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.total_amount, Decimal::from(145));
    }

    #[test]
    fn test_server_order_echoing_posted_items() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "_id": "SRV-1",
            "items": [{"productId": 101, "quantity": 2}, {"productId": 102, "quantity": 1}],
            "totalAmount": 145.0,
            "status": "pending",
            "paymentMethod": "cash",
            "deliveryAddress": {"street": "15 Nile St", "city": "Cairo", "postalCode": "11511"}
        }))
        .unwrap();

        assert_eq!(order.id.as_str(), "SRV-1");
        assert_eq!(
            order.items,
            [
                OrderItem {
                    product_id: ProductId::new(101),
                    quantity: 2
                },
                OrderItem {
                    product_id: ProductId::new(102),
                    quantity: 1
                },
            ]
        );
        let address = order.delivery_address.unwrap();
        assert_eq!(address.postal_code.as_deref(), Some("11511"));
        assert_eq!(address.to_string(), "15 Nile St, Cairo");
    }
}
