use crate::error::WishlistError;
use crate::server::router::WishlistState;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use subtle::ConstantTimeEq;

/// Request bodies that carry the admin password.
pub trait AdminGated {
    fn admin_password(&self) -> Option<&str>;
}

/// JSON body that has passed the admin password check.
///
/// Rejections, in order:
/// - no admin password configured on the server => 500
/// - malformed JSON or missing/empty password => 400
/// - password mismatch => 403
///
/// Handlers run their own validation only after this extractor succeeds, so nothing
/// reaches a store without authorization.
pub struct AdminJson<T>(pub T);

impl<T> FromRequest<WishlistState> for AdminJson<T>
where
    T: DeserializeOwned + AdminGated + Send,
{
    type Rejection = WishlistError;

    async fn from_request(req: Request, state: &WishlistState) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_password.as_deref() else {
            return Err(WishlistError::ServerMisconfigured("ADMIN_PASSWORD"));
        };
        let Json(body) = Json::<T>::from_request(req, &()).await?;
        verify_admin_password(expected, body.admin_password())?;
        Ok(AdminJson(body))
    }
}

pub(crate) fn verify_admin_password(
    expected: &str,
    supplied: Option<&str>,
) -> Result<(), WishlistError> {
    let Some(supplied) = supplied.filter(|p| !p.is_empty()) else {
        return Err(WishlistError::bad_request("Admin password is required."));
    };
    if supplied.as_bytes().ct_eq(expected.as_bytes()).into() {
        Ok(())
    } else {
        Err(WishlistError::Forbidden)
    }
}
