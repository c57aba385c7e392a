use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::users::users_model::{NewUser, User, UserCredentials};
use crate::users::users_traits::{UserRepositoryTrait, UserServiceTrait};

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        UserService { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;

        // Friendlier than surfacing the unique constraint violation.
        if self.repository.find_by_email(&new_user.email)?.is_some() {
            return Err(Error::Validation(
                "Email is already registered".to_string(),
            ));
        }

        let db = self.repository.insert(new_user)?;
        Ok(User::from(db))
    }

    fn get(&self, id: &str) -> Result<User> {
        self.repository
            .find_by_id(id)?
            .map(User::from)
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    fn credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        Ok(self
            .repository
            .find_by_email(email)?
            .map(UserCredentials::from))
    }
}
