//! User Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Address, User};
use crate::utils::time::now_rfc3339;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

/// Field bundle for user creation (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
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

    /// Create a user. The unique email index turns races between two
    /// concurrent registrations into a Duplicate error.
    pub async fn create(&self, data: NewUser) -> RepoResult<User> {
        let result = self
            .base
            .db()
            .query(
                r#"
                CREATE user SET
                    name          = $name,
                    email         = $email,
                    password      = $password,
                    is_admin      = $is_admin,
                    profile_image = NONE,
                    phone_number  = NONE,
                    addresses     = [],
                    created_at    = $now
                RETURN AFTER
                "#,
            )
            .bind(("name", data.name))
            .bind(("email", data.email.clone()))
            .bind(("password", data.password_hash))
            .bind(("is_admin", data.is_admin))
            .bind(("now", now_rfc3339()))
            .await?
            .check();

        let mut response = match result {
            Ok(response) => response,
            Err(e) => {
                let msg = e.to_string().to_lowercase();
                if msg.contains("unique") || msg.contains("already exists") {
                    return Err(RepoError::Duplicate("User already exists".to_string()));
                }
                return Err(e.into());
            }
        };

        let created: Vec<User> = response.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = make_record_id(USER_TABLE, id);
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Partial profile update; addresses replaced wholesale when present
    pub async fn update_profile(
        &self,
        id: &str,
        name: Option<String>,
        email: Option<String>,
        password_hash: Option<String>,
        profile_image: Option<String>,
        phone_number: Option<String>,
        addresses: Option<Vec<Address>>,
    ) -> RepoResult<User> {
        let thing = make_record_id(USER_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if name.is_some() { set_parts.push("name = $name"); }
        if email.is_some() { set_parts.push("email = $email"); }
        if password_hash.is_some() { set_parts.push("password = $password"); }
        if profile_image.is_some() { set_parts.push("profile_image = $profile_image"); }
        if phone_number.is_some() { set_parts.push("phone_number = $phone_number"); }
        if addresses.is_some() { set_parts.push("addresses = $addresses"); }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = name { query = query.bind(("name", v)); }
        if let Some(v) = email { query = query.bind(("email", v)); }
        if let Some(v) = password_hash { query = query.bind(("password", v)); }
        if let Some(v) = profile_image { query = query.bind(("profile_image", v)); }
        if let Some(v) = phone_number { query = query.bind(("phone_number", v)); }
        if let Some(v) = addresses { query = query.bind(("addresses", v)); }

        let users: Vec<User> = query.await?.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn count_all(&self) -> RepoResult<i64> {
        let count: Option<i64> = self
            .base
            .db()
            .query("(SELECT count() AS total FROM user GROUP ALL)[0].total ?? 0")
            .await?
            .take(0)?;
        Ok(count.unwrap_or(0))
    }
}
