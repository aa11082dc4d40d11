//! User / Admin Repository
//!
//! Persisted records carry the argon2 password hash; only the public
//! projections in `shared` ever cross the repository boundary outward.

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::error::{AppError, ErrorCode};
use shared::models::{AdminSignupRequest, SignupRequest, UserPublic};

use super::{BaseRepository, RepoError, RepoResult, new_record_key, now_millis, strip_table_prefix};

/// Registration stops once this many admin accounts exist
pub const ADMIN_ACCOUNT_LIMIT: i64 = 2;

/// Faculty user as stored, hash included
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: i64,
}

impl UserRecord {
    pub fn into_public(self) -> UserPublic {
        UserPublic {
            id: self.id.unwrap_or_default(),
            name: self.name,
            phone: self.phone,
            email: self.email,
            department: self.department,
            room_number: self.room_number,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// Admin account as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_active() -> bool {
    true
}

/// Hash a password using argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(hash: &str, password: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn hash_error(err: argon2::password_hash::Error) -> RepoError {
    RepoError::Database(format!("password hashing failed: {}", err))
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Register a faculty user; phone (and email, when given) must be
    /// unique
    pub async fn create(&self, data: SignupRequest) -> RepoResult<UserRecord> {
        if data.name.trim().is_empty() || data.phone.trim().is_empty() {
            return Err(RepoError::Validation("name and phone are required".into()));
        }
        if data.password.len() < 6 {
            return Err(RepoError::Validation(
                "password must be at least 6 characters".into(),
            ));
        }

        if self.find_by_phone(&data.phone).await?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::PhoneExists,
                format!("phone {} is already registered", data.phone),
            )
            .into());
        }
        if let Some(email) = &data.email {
            if self.find_by_email(email).await?.is_some() {
                return Err(AppError::with_message(
                    ErrorCode::EmailExists,
                    format!("email {} is already registered", email),
                )
                .into());
            }
        }

        let record = UserRecord {
            id: None,
            name: data.name,
            phone: data.phone,
            email: data.email,
            department: data.department,
            room_number: data.room_number,
            password_hash: hash_password(&data.password).map_err(hash_error)?,
            is_active: true,
            created_at: now_millis(),
        };

        let key = new_record_key();
        self.base
            .db()
            .query("CREATE type::thing('user', $key) CONTENT $data RETURN NONE")
            .bind(("key", key.clone()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("failed to create user".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<UserRecord>> {
        let key = strip_table_prefix("user", id).to_string();
        let users: Vec<UserRecord> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('user', $key)")
            .bind(("key", key))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<UserRecord>> {
        let users: Vec<UserRecord> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM user WHERE phone = $phone")
            .bind(("phone", phone.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let users: Vec<UserRecord> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Authenticate by phone + password
    pub async fn authenticate(&self, phone: &str, password: &str) -> RepoResult<UserRecord> {
        let user = self
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::invalid_credentials())?;
        if !user.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled).into());
        }
        if !verify_password(&user.password_hash, password).map_err(hash_error)? {
            return Err(AppError::invalid_credentials().into());
        }
        Ok(user)
    }

    /// All faculty users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<UserRecord>> {
        let users: Vec<UserRecord> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM user ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(users)
    }
}

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn count(&self) -> RepoResult<i64> {
        #[derive(Deserialize)]
        struct Count {
            count: i64,
        }
        let counts: Vec<Count> = self
            .base
            .db()
            .query("SELECT count() AS count FROM admin GROUP ALL")
            .await?
            .take(0)?;
        Ok(counts.into_iter().next().map(|c| c.count).unwrap_or(0))
    }

    /// Register an admin; only [`ADMIN_ACCOUNT_LIMIT`] accounts may
    /// exist
    pub async fn create(&self, data: AdminSignupRequest) -> RepoResult<AdminRecord> {
        if data.name.trim().is_empty() || data.email.trim().is_empty() {
            return Err(RepoError::Validation("name and email are required".into()));
        }
        if data.password.len() < 6 {
            return Err(RepoError::Validation(
                "password must be at least 6 characters".into(),
            ));
        }

        if self.count().await? >= ADMIN_ACCOUNT_LIMIT {
            return Err(AppError::new(ErrorCode::AdminLimitReached).into());
        }
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::EmailExists,
                format!("email {} is already registered", data.email),
            )
            .into());
        }

        let record = AdminRecord {
            id: None,
            name: data.name,
            email: data.email,
            password_hash: hash_password(&data.password).map_err(hash_error)?,
            is_active: true,
            created_at: now_millis(),
        };

        let key = new_record_key();
        self.base
            .db()
            .query("CREATE type::thing('admin', $key) CONTENT $data RETURN NONE")
            .bind(("key", key.clone()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("failed to create admin".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<AdminRecord>> {
        let key = strip_table_prefix("admin", id).to_string();
        let admins: Vec<AdminRecord> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('admin', $key)")
            .bind(("key", key))
            .await?
            .take(0)?;
        Ok(admins.into_iter().next())
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<AdminRecord>> {
        let admins: Vec<AdminRecord> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM admin WHERE email = $email")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Authenticate by email + password
    pub async fn authenticate(&self, email: &str, password: &str) -> RepoResult<AdminRecord> {
        let admin = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::invalid_credentials())?;
        if !admin.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled).into());
        }
        if !verify_password(&admin.password_hash, password).map_err(hash_error)? {
            return Err(AppError::invalid_credentials().into());
        }
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("secret123").unwrap();
        assert!(verify_password(&hash, "secret123").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }
}
