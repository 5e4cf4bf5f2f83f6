//! Caller resolution - turns the bearer credential into a `Subject`.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::Future;
use std::pin::Pin;

use newsroom_core::domain::Subject;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The caller of the current request, resolved once per request.
///
/// A missing, malformed, or rejected credential yields an anonymous caller;
/// the lifecycle engine decides whether anonymity is acceptable.
/// ```ignore
/// async fn handler(caller: Caller) -> impl Responder {
///     match caller.subject() { ... }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Caller(pub Option<Subject>);

impl Caller {
    pub fn subject(&self) -> Option<&Subject> {
        self.0.as_ref()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.identity.clone());
        let token = bearer_token(req);

        Box::pin(async move {
            let Some(identity) = identity else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("Server configuration error".to_string()));
            };

            let subject = match token {
                Some(token) => identity.authenticate(&token).await,
                None => None,
            };
            if let Some(subject) = &subject {
                tracing::debug!(subject_id = %subject.id, role = %subject.role, "Caller resolved");
            }

            Ok(Caller(subject))
        })
    }
}
