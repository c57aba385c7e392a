use async_trait::async_trait;

use crate::errors::Result;
use crate::users::users_model::{NewUser, User, UserCredentials, UserDB};

/// Trait for user repository operations
pub trait UserRepositoryTrait: Send + Sync {
    fn insert(&self, new_user: NewUser) -> Result<UserDB>;
    fn find_by_id(&self, id: &str) -> Result<Option<UserDB>>;
    fn find_by_email(&self, email: &str) -> Result<Option<UserDB>>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    fn get(&self, id: &str) -> Result<User>;
    fn credentials(&self, email: &str) -> Result<Option<UserCredentials>>;
}
