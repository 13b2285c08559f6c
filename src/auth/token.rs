use crate::config::Config;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, errors::ErrorKind, Algorithm, DecodingKey,
    EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Marker distinguishing the two credential classes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Application claims embedded in an access credential.
///
/// The expiry timestamp is not part of this struct; the authority wraps and
/// strips it internally so callers can never smuggle their own `exp` in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub user_uuid: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub push_notif: bool,
    pub user_avatar: String,
    pub token_type: TokenKind,
}

impl SessionClaims {
    pub fn new(
        user_uuid: Uuid,
        user_email: impl Into<String>,
        user_name: impl Into<String>,
        push_notif: bool,
        user_avatar: impl Into<String>,
    ) -> Self {
        Self {
            user_uuid,
            user_email: user_email.into(),
            user_name: user_name.into(),
            push_notif,
            user_avatar: user_avatar.into(),
            token_type: TokenKind::Access,
        }
    }
}

/// Wire form of an access credential: the session claims plus the expiry
/// the authority stamps on at issuance.
#[derive(Debug, Serialize, Deserialize)]
struct AccessEnvelope {
    #[serde(flatten)]
    claims: SessionClaims,
    exp: usize,
}

/// Wire form of a refresh credential. Deliberately carries no user claims:
/// it only proves the session was valid recently.
#[derive(Debug, Serialize, Deserialize)]
struct RefreshEnvelope {
    token_type: TokenKind,
    exp: usize,
}

/// Verification failure categories, kept distinct all the way to the HTTP
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature checks out but the expiry timestamp is in the past.
    Expired,
    /// Malformed token, wrong algorithm, tampered payload.
    Invalid,
    /// The refresh credential itself failed during renewal. Terminal for the
    /// session: the caller must re-authenticate with a full login.
    SessionExpired,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token has expired"),
            TokenError::Invalid => write!(f, "invalid token"),
            TokenError::SessionExpired => write!(f, "invalid session"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues, verifies, and silently renews signed, time-bounded credentials.
///
/// Stateless: validity is determined entirely by the HMAC signature and the
/// embedded expiry, never by server-side session storage. The signing secret
/// is injected at construction; nothing here touches the environment.
/// Issuer and verifier are assumed to observe a consistent wall clock —
/// expiry is checked with zero leeway.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::hours(config.access_token_ttl_hours),
            Duration::days(config.refresh_token_ttl_days),
        )
    }

    /// Mints an access credential embedding `claims` plus an expiry at the
    /// configured access TTL.
    pub fn issue_access(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        self.issue_access_with_ttl(claims, self.access_ttl)
    }

    pub fn issue_access_with_ttl(
        &self,
        claims: &SessionClaims,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let envelope = AccessEnvelope {
            claims: claims.clone(),
            exp: (Utc::now() + ttl).timestamp() as usize,
        };
        encode(&Header::default(), &envelope, &self.encoding_key)
    }

    /// Mints a refresh credential: `{token_type: "refresh"}` plus an expiry
    /// at the configured refresh TTL. Created once at login and never
    /// rotated on renewal.
    pub fn issue_refresh(&self) -> Result<String, JwtError> {
        self.issue_refresh_with_ttl(self.refresh_ttl)
    }

    pub fn issue_refresh_with_ttl(&self, ttl: Duration) -> Result<String, JwtError> {
        let envelope = RefreshEnvelope {
            token_type: TokenKind::Refresh,
            exp: (Utc::now() + ttl).timestamp() as usize,
        };
        encode(&Header::default(), &envelope, &self.encoding_key)
    }

    /// Full signature+expiry check of a single access credential.
    pub fn verify_access(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<AccessEnvelope>(token, &self.decoding_key, &self.validation())
            .map(|data| data.claims.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    /// The renewal protocol.
    ///
    /// 1. If the access credential passes a full check, return its claims
    ///    with no renewal — the refresh credential is not even looked at.
    /// 2. If the access credential fails on signature or expiry, fully check
    ///    the refresh credential. If that also fails the session is
    ///    exhausted and the caller must log in again. Otherwise recover the
    ///    stale access claims structurally (no signature or expiry check)
    ///    and mint a fresh access credential from them at the default TTL.
    /// 3. Any other decode failure is reported as an invalid token.
    ///
    /// The renewed credential carries the stale claims verbatim; it does not
    /// re-derive them from the store. A claims-affecting profile change is
    /// therefore only reflected after a full re-login.
    pub fn verify(
        &self,
        refresh_token: &str,
        access_token: &str,
    ) -> Result<(SessionClaims, Option<String>), TokenError> {
        match decode::<AccessEnvelope>(access_token, &self.decoding_key, &self.validation()) {
            Ok(data) => Ok((data.claims.claims, None)),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature | ErrorKind::InvalidSignature => {
                    self.check_refresh(refresh_token)?;
                    let claims = self.recover_stale_claims(access_token)?;
                    let renewed = self.issue_access(&claims).map_err(|_| TokenError::Invalid)?;
                    Ok((claims, Some(renewed)))
                }
                _ => Err(TokenError::Invalid),
            },
        }
    }

    /// Full check of a refresh credential, including its class marker. Any
    /// failure here is terminal for the session.
    fn check_refresh(&self, token: &str) -> Result<(), TokenError> {
        let data = decode::<RefreshEnvelope>(token, &self.decoding_key, &self.validation())
            .map_err(|_| TokenError::SessionExpired)?;
        if data.claims.token_type != TokenKind::Refresh {
            return Err(TokenError::SessionExpired);
        }
        Ok(())
    }

    /// Decodes an access credential's payload trusting it structurally only:
    /// signature and expiry checks are disabled. Only reachable after the
    /// paired refresh credential has passed a full check.
    fn recover_stale_claims(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.leeway = 0;
        decode::<AccessEnvelope>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.claims)
            .map_err(|_| TokenError::Invalid)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> TokenAuthority {
        TokenAuthority::new("unit-test-secret", Duration::hours(1), Duration::days(7))
    }

    fn claims() -> SessionClaims {
        SessionClaims::new(
            Uuid::new_v4(),
            "dana@example.com",
            "Dana Reyes",
            true,
            "fox.png",
        )
    }

    /// Replaces the last character of the token's signature segment with a
    /// different base64 character.
    fn tamper_signature(token: &str) -> String {
        let flipped = if token.ends_with('A') { "B" } else { "A" };
        format!("{}{}", &token[..token.len() - 1], flipped)
    }

    #[test]
    fn access_round_trip() {
        let authority = authority();
        let claims = claims();
        let token = authority.issue_access(&claims).unwrap();
        let decoded = authority.verify_access(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn expired_access_is_reported_expired() {
        let authority = authority();
        let token = authority
            .issue_access_with_ttl(&claims(), Duration::hours(-2))
            .unwrap();
        assert_eq!(authority.verify_access(&token), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_signature_is_reported_invalid() {
        let authority = authority();
        let token = authority.issue_access(&claims()).unwrap();
        assert_eq!(
            authority.verify_access(&tamper_signature(&token)),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn wrong_secret_is_reported_invalid() {
        let authority = authority();
        let other = TokenAuthority::new("another-secret", Duration::hours(1), Duration::days(7));
        let token = other.issue_access(&claims()).unwrap();
        assert_eq!(authority.verify_access(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_is_reported_invalid() {
        let authority = authority();
        assert_eq!(
            authority.verify_access("not.a.token"),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn valid_access_needs_no_renewal() {
        let authority = authority();
        let claims = claims();
        let refresh = authority.issue_refresh().unwrap();
        let access = authority.issue_access(&claims).unwrap();

        let (decoded, renewed) = authority.verify(&refresh, &access).unwrap();
        assert_eq!(decoded, claims);
        assert!(renewed.is_none());
    }

    #[test]
    fn expired_access_renews_with_claims_carried_over() {
        let authority = authority();
        let claims = claims();
        let refresh = authority.issue_refresh().unwrap();
        let access = authority
            .issue_access_with_ttl(&claims, Duration::hours(-2))
            .unwrap();

        let (decoded, renewed) = authority.verify(&refresh, &access).unwrap();
        assert_eq!(decoded, claims);

        // The replacement credential independently verifies as non-expired
        // and carries the same claims.
        let renewed = renewed.expect("expired access should have been renewed");
        assert_eq!(authority.verify_access(&renewed).unwrap(), claims);
    }

    #[test]
    fn tampered_access_with_valid_refresh_still_renews() {
        // Invalid-signature access falls back to the refresh credential the
        // same way an expired one does; the payload is recovered
        // structurally once the refresh credential has vouched for the
        // session.
        let authority = authority();
        let claims = claims();
        let refresh = authority.issue_refresh().unwrap();
        let access = tamper_signature(&authority.issue_access(&claims).unwrap());

        let (decoded, renewed) = authority.verify(&refresh, &access).unwrap();
        assert_eq!(decoded, claims);
        assert!(renewed.is_some());
    }

    #[test]
    fn both_expired_exhausts_the_session() {
        let authority = authority();
        let refresh = authority
            .issue_refresh_with_ttl(Duration::hours(-1))
            .unwrap();
        let access = authority
            .issue_access_with_ttl(&claims(), Duration::hours(-2))
            .unwrap();

        assert_eq!(
            authority.verify(&refresh, &access),
            Err(TokenError::SessionExpired)
        );
    }

    #[test]
    fn tampered_refresh_exhausts_the_session() {
        let authority = authority();
        let refresh = tamper_signature(&authority.issue_refresh().unwrap());
        let access = authority
            .issue_access_with_ttl(&claims(), Duration::hours(-2))
            .unwrap();

        assert_eq!(
            authority.verify(&refresh, &access),
            Err(TokenError::SessionExpired)
        );
    }

    #[test]
    fn access_credential_cannot_stand_in_for_refresh() {
        // An access token presented in the refresh slot fails the class
        // marker check even though its signature and expiry are fine.
        let authority = authority();
        let fake_refresh = authority.issue_access(&claims()).unwrap();
        let access = authority
            .issue_access_with_ttl(&claims(), Duration::hours(-2))
            .unwrap();

        assert_eq!(
            authority.verify(&fake_refresh, &access),
            Err(TokenError::SessionExpired)
        );
    }

    #[test]
    fn refresh_credential_grants_no_operation_authority() {
        // A refresh token has no session claims, so it can never pass as an
        // access credential.
        let authority = authority();
        let refresh = authority.issue_refresh().unwrap();
        assert_eq!(authority.verify_access(&refresh), Err(TokenError::Invalid));
    }
}
