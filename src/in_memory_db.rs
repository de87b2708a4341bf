use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;

use crate::domain::db::DbResult;
use crate::domain::{NewUser, User, UserId};

#[derive(Default, Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct Db {
    users: Arc<Mutex<Vec<User>>>,
}

pub fn init_db() -> Db {
    Db::default()
}

impl Db {
    fn users(&self) -> DbResult<MutexGuard<'_, Vec<User>>> {
        Ok(self
            .users
            .lock()
            .map_err(|e| anyhow!("user table poisoned: {e}"))?)
    }

    /// Number of stored records for `email`. Used by tests to observe
    /// duplicate registrations.
    pub fn count_by_email(&self, email: &str) -> DbResult<usize> {
        Ok(self.users()?.iter().filter(|u| u.email == email).count())
    }
}

impl crate::domain::db::Db for Db {
    fn create(&self, user: NewUser) -> DbResult<User> {
        let mut users = self.users()?;
        let user = user.with_id(UserId(users.len() as u64));
        users.push(user.clone());
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(self.users()?.iter().find(|u| u.email == email).cloned())
    }
}
