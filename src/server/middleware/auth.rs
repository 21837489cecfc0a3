use axum::http::{header, HeaderMap};
use entity::sea_orm_active_enums::AccountRole;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::server::{
    data::account::AccountRepository,
    error::{auth::AuthError, AppError},
};

pub enum Permission {
    Admin,
    Patient,
}

/// Bearer token claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID.
    pub sub: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: usize,
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    jwt_secret: &'a str,
    headers: &'a HeaderMap,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, jwt_secret: &'a str, headers: &'a HeaderMap) -> Self {
        Self {
            db,
            jwt_secret,
            headers,
        }
    }

    /// Authenticates the request and checks every listed permission.
    ///
    /// An empty permission list only requires a valid token for an existing account.
    ///
    /// # Returns
    /// - `Ok(account)` - Authenticated account holding every permission
    /// - `Err(AuthError::MissingToken | InvalidToken | AccountNotFound)` - Not authenticated
    /// - `Err(AuthError::AccessDenied)` - Authenticated but lacking a permission
    pub async fn require(
        &self,
        permissions: &[Permission],
    ) -> Result<entity::account::Model, AppError> {
        let account_id = self.account_id()?;

        let Some(account) = AccountRepository::new(self.db)
            .find_by_id(account_id)
            .await?
        else {
            return Err(AuthError::AccountNotFound(account_id).into());
        };

        for permission in permissions {
            match permission {
                Permission::Admin => {
                    if account.role != AccountRole::Admin {
                        return Err(AuthError::AccessDenied(
                            account_id,
                            "Account attempted an admin-only operation without the admin role"
                                .to_string(),
                        )
                        .into());
                    }
                }
                Permission::Patient => {
                    if account.role != AccountRole::Patient {
                        return Err(AuthError::AccessDenied(
                            account_id,
                            "Account attempted a patient-only operation without the patient role"
                                .to_string(),
                        )
                        .into());
                    }
                }
            }
        }

        Ok(account)
    }

    /// Extracts and validates the bearer token, returning the account ID it names.
    fn account_id(&self) -> Result<i32, AuthError> {
        let token = self
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        data.claims.sub.parse::<i32>().map_err(|_| {
            AuthError::InvalidToken(format!(
                "subject '{}' is not an account id",
                data.claims.sub
            ))
        })
    }
}
