//! Identity issued by the external identity provider.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use chrono::NaiveDateTime;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

/// Claims carried by the identity cookie.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    #[serde(default)]
    pub last_login_at: Option<NaiveDateTime>,
    pub exp: usize,
}

/// Header details about the signed-in user.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CurrentUser {
    pub display_name: String,
    pub last_login_at: Option<NaiveDateTime>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn current_user(&self) -> CurrentUser {
        let display_name = if self.name.trim().is_empty() {
            self.email.clone()
        } else {
            self.name.trim().to_string()
        };
        CurrentUser {
            display_name,
            last_login_at: self.last_login_at,
        }
    }

    /// Signs the claims into a token the extractor accepts.
    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req
        .get_identity()
        .map_err(|_| actix_web::error::ErrorUnauthorized("authentication required"))?;
    let token = identity
        .id()
        .map_err(|_| actix_web::error::ErrorUnauthorized("authentication required"))?;

    let config = req.app_data::<web::Data<ServerConfig>>().ok_or_else(|| {
        log::error!("ServerConfig is not registered as application data");
        actix_web::error::ErrorInternalServerError("server misconfigured")
    })?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected identity token: {err}");
        actix_web::error::ErrorUnauthorized("authentication required")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            roles: vec!["advisors".to_string()],
            last_login_at: None,
            exp: 4_102_444_800,
        }
    }

    #[test]
    fn token_round_trips_with_shared_secret() {
        let token = user().to_jwt("secret").expect("signed");

        assert_eq!(AuthenticatedUser::from_jwt(&token, "secret").ok(), Some(user()));
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut anonymous = user();
        anonymous.name = "  ".to_string();

        assert_eq!(anonymous.current_user().display_name, "jane@example.com");
        assert_eq!(user().current_user().display_name, "Jane");
    }
}
