//! # User Repository
//!
//! Accounts, self-registration and credential checks.
//!
//! ## Registration
//! ```text
//! BEGIN
//!   SELECT COUNT(*) FROM users      → 0 ? admin : user
//!   INSERT INTO users (..., role)   → UNIQUE(username) or Duplicate
//! COMMIT
//! ```
//!
//! Counting and inserting share a transaction so two first registrations
//! cannot both become admin.

use chrono::Utc;
use sqlx::SqlitePool;
use stockroom_core::auth::{hash_password, role_for_new_account, verify_password};
use stockroom_core::forms::{Registration, UserDraft};
use stockroom_core::{CoreError, User};
use tracing::{debug, info, warn};

use super::like;
use crate::error::{on_duplicate, DbError, DbResult};

const SELECT_USER: &str = "SELECT id, first_name, last_name, username, password_hash, role,
        created_at, updated_at, is_active
     FROM users";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Registers an account. The first account ever created is the admin.
    ///
    /// ## Returns
    /// * `Ok(User)` - The new account
    /// * `Err(DbError::UniqueViolation)` - Username taken
    pub async fn register(&self, registration: &Registration) -> DbResult<User> {
        debug!(username = %registration.username, "Registering account");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        let role = role_for_new_account(existing);

        let id = sqlx::query(
            "INSERT INTO users (
                first_name, last_name, username, password_hash, role, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .bind(&registration.first_name)
        .bind(&registration.last_name)
        .bind(&registration.username)
        .bind(hash_password(&registration.password))
        .bind(role)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(on_duplicate("Username", &registration.username))?
        .last_insert_rowid();

        tx.commit().await?;

        info!(id, username = %registration.username, role = %role, "Account registered");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Checks credentials.
    ///
    /// Unknown usernames, wrong passwords and deactivated accounts all fail
    /// the same way, with `InvalidCredentials`.
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<User> {
        let user = self.find_by_username(username.trim()).await?;

        match user {
            Some(user) if user.is_active && verify_password(password, &user.password_hash) => {
                debug!(user_id = user.id, "Credentials accepted");
                Ok(user)
            }
            _ => {
                warn!(username = %username, "Login rejected");
                Err(CoreError::InvalidCredentials.into())
            }
        }
    }

    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = ?1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Lists accounts where any text column contains `search`, by id.
    pub async fn list(&self, search: &str) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "{SELECT_USER}
             WHERE first_name LIKE ?1 OR last_name LIKE ?1 OR username LIKE ?1 OR role LIKE ?1
             ORDER BY id"
        ))
        .bind(like(search))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Creates an account from the admin screen.
    ///
    /// ## Returns
    /// * `Err(DbError::Internal)` - Draft carries no password
    /// * `Err(DbError::UniqueViolation)` - Username taken
    pub async fn insert(&self, draft: &UserDraft) -> DbResult<User> {
        debug!(username = %draft.username, role = %draft.role, "Inserting user");

        let password = draft
            .password
            .as_deref()
            .ok_or_else(|| DbError::Internal("new account without a password".to_string()))?;

        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO users (
                first_name, last_name, username, password_hash, role, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.username)
        .bind(hash_password(password))
        .bind(draft.role)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(on_duplicate("Username", &draft.username))?
        .last_insert_rowid();

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Updates an account. The password hash changes only when the draft
    /// carries a new password.
    pub async fn update(&self, id: i64, draft: &UserDraft) -> DbResult<User> {
        debug!(id = %id, "Updating user");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE users SET
                first_name = ?2,
                last_name = ?3,
                username = ?4,
                password_hash = COALESCE(?5, password_hash),
                role = ?6,
                is_active = ?7,
                updated_at = ?8
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.username)
        .bind(draft.password.as_deref().map(hash_password))
        .bind(draft.role)
        .bind(draft.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(on_duplicate("Username", &draft.username))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Counts all accounts, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockroom_core::auth::hash_password;
    use stockroom_core::forms::{RegistrationForm, UserForm};
    use stockroom_core::{CoreError, Role};

    fn registration(username: &str) -> RegistrationForm {
        RegistrationForm {
            first_name: "Ada".into(),
            last_name: "Okafor".into(),
            username: username.into(),
            password: "secret".into(),
        }
    }

    #[tokio::test]
    async fn test_first_registration_is_admin() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let first = repo.register(&registration("ada").validate().unwrap()).await.unwrap();
        let second = repo.register(&registration("ben").validate().unwrap()).await.unwrap();

        assert_eq!(first.role, Role::Admin);
        assert_eq!(second.role, Role::User);
        assert_eq!(first.password_hash, hash_password("secret"));

        let err = repo.register(&registration("ada").validate().unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "ada"));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        let ada = repo.register(&registration("ada").validate().unwrap()).await.unwrap();

        assert_eq!(repo.authenticate("ada", "secret").await.unwrap().id, ada.id);

        for (username, password) in [("ada", "wrong"), ("nobody", "secret")] {
            let err = repo.authenticate(username, password).await.unwrap_err();
            assert!(matches!(err, DbError::Core(CoreError::InvalidCredentials)));
        }
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_log_in() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();
        let ada = repo.register(&registration("ada").validate().unwrap()).await.unwrap();

        let form = UserForm {
            first_name: "Ada".into(),
            last_name: "Okafor".into(),
            username: "ada".into(),
            password: String::new(),
            role: "admin".into(),
            is_active: false,
        };
        repo.update(ada.id, &form.validate_update().unwrap()).await.unwrap();

        let err = repo.authenticate("ada", "secret").await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_update_rehashes_only_new_password() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let form = UserForm {
            first_name: "Ben".into(),
            last_name: "Ito".into(),
            username: "ben".into(),
            password: "first".into(),
            role: "user".into(),
            is_active: true,
        };
        let ben = repo.insert(&form.validate_new().unwrap()).await.unwrap();

        let keep = UserForm {
            last_name: "Ito-Park".into(),
            password: String::new(),
            ..form.clone()
        };
        let kept = repo.update(ben.id, &keep.validate_update().unwrap()).await.unwrap();
        assert_eq!(kept.last_name, "Ito-Park");
        assert_eq!(kept.password_hash, hash_password("first"));

        let change = UserForm {
            password: "second".into(),
            ..form
        };
        repo.update(ben.id, &change.validate_update().unwrap()).await.unwrap();
        assert!(repo.authenticate("ben", "second").await.is_ok());

        // list matches on role
        assert_eq!(repo.list("user").await.unwrap().len(), 1);

        repo.delete(ben.id).await.unwrap();
        assert!(matches!(repo.delete(ben.id).await, Err(DbError::NotFound { .. })));
    }
}
