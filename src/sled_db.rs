use std::path::Path;

use anyhow::Context;

use crate::domain::db::DbResult;
use crate::domain::{NewUser, User, UserId};

const USERS_TREE: &str = "users";

/// User documents stored as JSON in a sled tree, keyed by big-endian ids so
/// iteration follows insertion order.
#[derive(Clone)]
pub struct Db {
    db: sled::Db,
    users: sled::Tree,
}

pub fn open(path: impl AsRef<Path>) -> DbResult<Db> {
    let path = path.as_ref();
    let db = sled::open(path).with_context(|| format!("opening {}", path.display()))?;
    Db::from_sled(db)
}

/// A throwaway database removed when the last handle is dropped.
pub fn temporary() -> DbResult<Db> {
    let db = sled::Config::new()
        .temporary(true)
        .open()
        .context("opening temporary database")?;
    Db::from_sled(db)
}

impl Db {
    fn from_sled(db: sled::Db) -> DbResult<Self> {
        let users = db.open_tree(USERS_TREE).context("opening users tree")?;
        Ok(Self { db, users })
    }
}

impl crate::domain::db::Db for Db {
    fn create(&self, user: NewUser) -> DbResult<User> {
        let id = self.db.generate_id().context("generating user id")?;
        let user = user.with_id(UserId(id));
        let doc = serde_json::to_vec(&user).context("serializing user")?;

        self.users
            .insert(id.to_be_bytes(), doc)
            .context("inserting user")?;
        self.users.flush().context("flushing users")?;

        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        for entry in self.users.iter() {
            let (_, doc) = entry.context("reading users")?;
            let user: User = serde_json::from_slice(&doc).context("deserializing user")?;
            if user.email == email {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}
