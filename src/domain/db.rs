use super::{NewUser, User};

pub type DbResult<T = ()> = Result<T, DbError>;

#[derive(thiserror::Error, Debug)]
#[error("Db Error: {inner}")]
pub struct DbError {
    #[from]
    inner: anyhow::Error,
}

/// Document store holding user records.
///
/// Emails are not unique: `create` never checks for an existing record and
/// `find_by_email` returns the earliest record stored for that email.
pub trait Db {
    fn create(&self, user: NewUser) -> DbResult<User>;
    fn find_by_email(&self, email: &str) -> DbResult<Option<User>>;
}
