use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::SessionClaims;
use crate::error::AppError;

/// The verified session for the current request.
///
/// `AuthMiddleware` runs the renewal protocol and inserts this value into
/// request extensions; handlers receive it through `FromRequest`. `renewed`
/// carries the replacement access credential when the presented one had
/// expired — every protected response echoes it back so the client can swap
/// tokens without re-authenticating.
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: SessionClaims,
    pub renewed: Option<String>,
}

impl FromRequest for Session {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Session>().cloned() {
            Some(session) => ready(Ok(session)),
            None => {
                // Only reachable when a handler takes `Session` on a route
                // outside the authenticated scope.
                let err = AppError::Unauthorized(
                    "No session in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::SessionClaims;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            claims: SessionClaims::new(
                Uuid::new_v4(),
                "mika@example.com",
                "Mika Tan",
                false,
                "owl.png",
            ),
            renewed: None,
        }
    }

    #[actix_rt::test]
    async fn test_session_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(session());

        let mut payload = Payload::None;
        let extracted = Session::from_request(&req, &mut payload).await;
        assert!(extracted.is_ok());
        assert_eq!(extracted.unwrap().claims.user_email, "mika@example.com");
    }

    #[actix_rt::test]
    async fn test_session_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();
        // No session inserted into extensions.

        let mut payload = Payload::None;
        let result = Session::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let err = result.unwrap_err();
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
