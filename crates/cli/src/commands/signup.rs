//! Sign-up command.

use std::io::Write;

use alfath_storefront::account::SignupForm;
use alfath_storefront::error::AppError;
use alfath_storefront::state::AppState;

use crate::CliError;

/// `alfath signup`
pub async fn signup(state: &AppState, out: &mut impl Write, form: &SignupForm) -> Result<(), CliError> {
    state.sign_up(form).await.map_err(AppError::from)?;
    writeln!(out, "تم إنشاء الحساب بنجاح!")?;
    Ok(())
}
