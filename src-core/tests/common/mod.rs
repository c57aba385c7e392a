use std::sync::Arc;

use tempfile::TempDir;

use ledgerly_core::db::{self, DbPool};
use ledgerly_core::users::{NewUser, UserRepository, UserRepositoryTrait};

/// Fresh migrated database in a temporary directory. Keep the struct
/// alive for the duration of the test; dropping it removes the files.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

pub fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = dir
        .path()
        .join("app.db")
        .to_string_lossy()
        .into_owned();

    let db_path = db::init(&db_path).expect("failed to initialize database");
    let pool = db::create_pool(&db_path).expect("failed to create pool");
    db::run_migrations(&pool).expect("failed to run migrations");

    TestDb { pool, _dir: dir }
}

pub fn seed_user(pool: &Arc<DbPool>, email: &str) -> String {
    let repository = UserRepository::new(pool.clone());
    let user = repository
        .insert(NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "argon2-hash".to_string(),
        })
        .expect("failed to seed user");
    user.id
}
