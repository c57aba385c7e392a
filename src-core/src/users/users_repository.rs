use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::dates;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::users;
use crate::users::users_model::{NewUser, UserDB};
use crate::users::users_traits::UserRepositoryTrait;

pub struct UserRepository {
    pool: Arc<DbPool>,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        UserRepository { pool }
    }
}

impl UserRepositoryTrait for UserRepository {
    fn insert(&self, new_user: NewUser) -> Result<UserDB> {
        let mut conn = get_connection(&self.pool)?;

        let now = dates::to_storage(Utc::now());
        let row = UserDB {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email.trim().to_lowercase(),
            password_hash: new_user.password_hash,
            created_at: now.clone(),
            updated_at: now,
        };

        Ok(diesel::insert_into(users::table)
            .values(&row)
            .returning(users::all_columns)
            .get_result(&mut conn)?)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<UserDB>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .find(id)
            .first::<UserDB>(&mut conn)
            .optional()?;
        Ok(row)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserDB>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .first::<UserDB>(&mut conn)
            .optional()?;
        Ok(row)
    }
}
