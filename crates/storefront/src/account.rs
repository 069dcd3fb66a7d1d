//! Customer sign-up.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, SignupRequest};
use crate::error::add_breadcrumb;

const MIN_USERNAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex")
});

/// Egyptian mobile numbers with optional `+2`/`2` prefix, or any E.164 number.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+?2)?01[0-9]{9}$|^\+?[1-9]\d{1,14}$").expect("Invalid regex")
});

/// How the customer can be reached: the single identifier field of the
/// sign-up form, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactIdentifier {
    Email(String),
    Phone(String),
}

impl ContactIdentifier {
    /// Classify a raw identifier, trimming surrounding whitespace.
    ///
    /// Returns `None` when it is neither an email address nor a phone number.
    #[must_use]
    pub fn classify(raw: &str) -> Option<Self> {
        let value = raw.trim();
        if EMAIL_RE.is_match(value) {
            Some(Self::Email(value.to_string()))
        } else if PHONE_RE.is_match(value) {
            Some(Self::Phone(value.to_string()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(v) | Self::Phone(v) => v,
        }
    }
}

/// Errors that can occur during sign-up.
#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Username must be at least 2 characters")]
    UsernameTooShort,

    #[error("Not a valid email address or phone number: {0}")]
    InvalidContact(String),

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// HTTP 400.
    #[error("Backend rejected the sign-up data")]
    InvalidData,

    /// HTTP 409.
    #[error("Account already exists")]
    AlreadyExists,

    /// HTTP 422.
    #[error("Sign-up data incomplete")]
    Incomplete,

    #[error("Sign-up request failed: {0}")]
    Request(#[source] ApiError),
}

impl SignupError {
    /// Localized message suitable for showing to the customer.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::UsernameTooShort => "اسم المستخدم يجب أن يكون حرفين على الأقل",
            Self::InvalidContact(_) => "يرجى إدخال بريد إلكتروني أو رقم هاتف صحيح",
            Self::PasswordTooShort => "كلمة المرور يجب أن تكون 6 أحرف على الأقل",
            Self::PasswordMismatch => "كلمتا المرور غير متطابقتين",
            Self::InvalidData => "البيانات المدخلة غير صحيحة. يرجى التحقق من المعلومات.",
            Self::AlreadyExists => "هذا البريد الإلكتروني أو اسم المستخدم مستخدم بالفعل.",
            Self::Incomplete => "البيانات غير مكتملة أو غير صحيحة.",
            Self::Request(_) => "حدث خطأ في إنشاء الحساب. يرجى المحاولة مرة أخرى.",
        }
    }
}

impl From<ApiError> for SignupError {
    fn from(err: ApiError) -> Self {
        match err.status() {
            Some(400) => Self::InvalidData,
            Some(409) => Self::AlreadyExists,
            Some(422) => Self::Incomplete,
            _ => Self::Request(err),
        }
    }
}

/// The sign-up form as entered.
pub struct SignupForm {
    pub username: String,
    /// Email address or phone number.
    pub contact: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl SignupForm {
    /// Validate the form and build the request body.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, checking username, contact,
    /// password length, then confirmation.
    pub fn validate(&self) -> Result<SignupRequest, SignupError> {
        let username = self.username.trim();
        if username.chars().count() < MIN_USERNAME_CHARS {
            return Err(SignupError::UsernameTooShort);
        }

        let contact = ContactIdentifier::classify(&self.contact)
            .ok_or_else(|| SignupError::InvalidContact(self.contact.trim().to_string()))?;

        let password = self.password.expose_secret();
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(SignupError::PasswordTooShort);
        }
        if password != self.confirm_password.expose_secret() {
            return Err(SignupError::PasswordMismatch);
        }

        Ok(SignupRequest {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
            contact,
        })
    }
}

/// Validate `form` and register the account.
///
/// # Errors
///
/// Returns a validation variant of `SignupError` before any request is made,
/// or the backend's rejection mapped by HTTP status.
#[instrument(skip_all)]
pub async fn sign_up(api: &ApiClient, form: &SignupForm) -> Result<(), SignupError> {
    let request = form.validate()?;
    api.signup(&request).await.map_err(|e| {
        warn!(error = %e, "Sign-up rejected");
        SignupError::from(e)
    })?;
    info!(username = %request.username, "Account created");
    add_breadcrumb("account", "Account created", None);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(username: &str, contact: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            contact: contact.to_string(),
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm),
        }
    }

    #[test]
    fn test_classify_contact() {
        assert_eq!(
            ContactIdentifier::classify(" sara@example.com "),
            Some(ContactIdentifier::Email("sara@example.com".to_string()))
        );
        assert_eq!(
            ContactIdentifier::classify("01012345678"),
            Some(ContactIdentifier::Phone("01012345678".to_string()))
        );
        assert_eq!(
            ContactIdentifier::classify("+201012345678"),
            Some(ContactIdentifier::Phone("+201012345678".to_string()))
        );
        assert!(ContactIdentifier::classify("+14155550100").is_some());
        assert_eq!(ContactIdentifier::classify("sara@"), None);
        assert_eq!(ContactIdentifier::classify("0123"), None);
    }

    #[test]
    fn test_valid_form_builds_request() {
        let request = form("sara", "sara@example.com", "secret1", "secret1")
            .validate()
            .unwrap();
        assert_eq!(request.username, "sara");
        assert_eq!(request.contact.as_str(), "sara@example.com");
    }

    #[test]
    fn test_validation_failures() {
        assert!(matches!(
            form("s", "sara@example.com", "secret1", "secret1").validate(),
            Err(SignupError::UsernameTooShort)
        ));
        assert!(matches!(
            form("sara", "not-a-contact", "secret1", "secret1").validate(),
            Err(SignupError::InvalidContact(_))
        ));
        assert!(matches!(
            form("sara", "01012345678", "abc", "abc").validate(),
            Err(SignupError::PasswordTooShort)
        ));
        assert!(matches!(
            form("sara", "01012345678", "secret1", "secret2").validate(),
            Err(SignupError::PasswordMismatch)
        ));
    }

    #[test]
    fn test_status_mapping() {
        let status = |code| ApiError::Status {
            status: code,
            message: String::new(),
        };
        assert!(matches!(SignupError::from(status(400)), SignupError::InvalidData));
        assert!(matches!(SignupError::from(status(409)), SignupError::AlreadyExists));
        assert!(matches!(SignupError::from(status(422)), SignupError::Incomplete));
        assert!(matches!(SignupError::from(status(500)), SignupError::Request(_)));
        assert_eq!(
            SignupError::AlreadyExists.user_message(),
            "هذا البريد الإلكتروني أو اسم المستخدم مستخدم بالفعل."
        );
    }
}
