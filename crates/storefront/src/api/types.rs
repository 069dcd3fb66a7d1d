//! Wire types for the storefront REST API.

use alfath_core::{DeliveryAddress, OrderItem, PaymentMethod};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::ApiError;
use crate::account::ContactIdentifier;

/// Standard `{success, data, message}` response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// The payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unsuccessful` if `success` is false or `data` is
    /// missing.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Unsuccessful(self.failure_message()));
        }
        self.data
            .ok_or_else(|| ApiError::Unsuccessful("response carried no data".to_string()))
    }

    pub(crate) fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "success flag was false".to_string())
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub phone: String,
    pub address: DeliveryAddress,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// Body of `POST /signup`.
///
/// Serializes the contact as either an `email` or a `phone` field. `Debug`
/// never prints the password.
pub struct SignupRequest {
    pub username: String,
    pub password: SecretString,
    pub contact: ContactIdentifier,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("contact", &self.contact)
            .finish()
    }
}

impl Serialize for SignupRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SignupRequest", 3)?;
        state.serialize_field("username", &self.username)?;
        state.serialize_field("password", self.password.expose_secret())?;
        match &self.contact {
            ContactIdentifier::Email(email) => state.serialize_field("email", email)?,
            ContactIdentifier::Phone(phone) => state.serialize_field("phone", phone)?,
        }
        state.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alfath_core::ProductId;
    use serde_json::json;

    #[test]
    fn test_envelope_success() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"success": true, "data": [1, 2]})).unwrap();
        assert_eq!(envelope.into_data().unwrap(), [1, 2]);
    }

    #[test]
    fn test_envelope_failure_flag() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"success": false, "data": [1], "message": "down"}))
                .unwrap();
        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.to_string(), "Unsuccessful response: down");
    }

    #[test]
    fn test_envelope_missing_data() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert!(matches!(
            envelope.into_data(),
            Err(ApiError::Unsuccessful(_))
        ));
    }

    #[test]
    fn test_order_request_shape() {
        let request = OrderRequest {
            customer_name: "أحمد".to_string(),
            phone: "01012345678".to_string(),
            address: DeliveryAddress {
                street: "شارع النيل".to_string(),
                city: "القاهرة".to_string(),
                postal_code: None,
            },
            items: vec![OrderItem {
                product_id: ProductId::new(1),
                quantity: 2,
            }],
            notes: None,
            payment_method: PaymentMethod::Cash,
            total_amount: Decimal::from(110),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "customerName": "أحمد",
                "phone": "01012345678",
                "address": {"street": "شارع النيل", "city": "القاهرة"},
                "items": [{"productId": 1, "quantity": 2}],
                "paymentMethod": "cash",
                "totalAmount": 110.0
            })
        );
    }

    #[test]
    fn test_signup_request_contact_field() {
        let request = SignupRequest {
            username: "sara".to_string(),
            password: SecretString::from("hunter22"),
            contact: ContactIdentifier::Phone("01012345678".to_string()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["phone"], "01012345678");
        assert!(value.get("email").is_none());
        assert_eq!(value["password"], "hunter22");
        assert!(!format!("{request:?}").contains("hunter22"));
    }
}
