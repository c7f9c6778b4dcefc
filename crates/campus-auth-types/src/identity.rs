//! Gateway-injected identity header extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

use campus_domain::id::AccountId;

/// Header the gateway sets to the authenticated account's UUID.
pub const ACCOUNT_ID_HEADER: &str = "x-campus-account-id";

/// Caller identity injected by the gateway via `x-campus-account-id`.
///
/// Returns 401 if the header is absent or not a UUID. Role checks happen in
/// use cases against the stored profile, never against request data.
#[derive(Debug, Clone, Copy)]
pub struct IdentityHeaders {
    pub account_id: AccountId,
}

impl IdentityHeaders {
    fn parse(parts: &Parts) -> Option<AccountId> {
        parts
            .headers
            .get(ACCOUNT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<AccountId>().ok())
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Values are read synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let account_id = Self::parse(parts);
        async move {
            match account_id {
                Some(account_id) => Ok(Self { account_id }),
                None => {
                    tracing::debug!("rejecting request without valid identity header");
                    Err(StatusCode::UNAUTHORIZED)
                }
            }
        }
    }
}
