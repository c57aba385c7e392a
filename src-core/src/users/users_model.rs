use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_NAME_LENGTH;
use crate::dates::{self, timestamp_format};
use crate::errors::{Error, Result};

/// Database model for users
#[derive(Queryable, Selectable, Identifiable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Domain model for a user. The password hash never leaves the
/// credentials path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        User {
            id: db.id,
            name: db.name,
            email: db.email,
            created_at: dates::from_storage(&db.created_at),
            updated_at: dates::from_storage(&db.updated_at),
        }
    }
}

/// Stored login material for one account.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl From<UserDB> for UserCredentials {
    fn from(db: UserDB) -> Self {
        UserCredentials {
            password_hash: db.password_hash.clone(),
            user: User::from(db),
        }
    }
}

/// Input model for registering a user. The caller hashes the password
/// before it reaches this layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Name is required".to_string()));
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(Error::Validation("Name is too long".to_string()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') || email.len() > 255 {
            return Err(Error::Validation("A valid email is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NewUser {
        NewUser {
            name: "Avery".to_string(),
            email: "avery@example.com".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn rejects_blank_name_and_bad_email() {
        let mut input = base();
        input.name = "   ".to_string();
        assert!(input.validate().is_err());

        let mut input = base();
        input.email = "not-an-email".to_string();
        assert!(input.validate().is_err());
    }
}
