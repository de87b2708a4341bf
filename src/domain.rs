use serde::{Deserialize, Serialize};
use uuid::Uuid;

use self::db::{Db, DbError};
use self::session::{SessionToken, SessionTokens, TokenError};

pub mod db;
pub mod session;

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: EncodedPassword,
    pub age: u32,
}

#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: EncodedPassword,
    pub age: u32,
}

impl NewUser {
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password: self.password,
            age: self.age,
        }
    }
}

/// What a client gets to see of a user. Never includes the password hash.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub age: u32,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            age: user.age,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Debug))]
pub struct EncodedPassword(String);

impl EncodedPassword {
    pub fn verify(&self, entered_password: &EnteredPassword) -> Result<bool, argon2::Error> {
        argon2::verify_encoded(self.0.as_str(), entered_password.0.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(PartialEq, Clone, Deserialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Debug))]
pub struct EnteredPassword(String);

impl EnteredPassword {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn encode(&self) -> Result<EncodedPassword, argon2::Error> {
        let salt = Uuid::new_v4();
        let encoded = argon2::hash_encoded(
            self.0.as_bytes(),
            salt.as_bytes(),
            &argon2::Config::default(),
        )?;
        Ok(EncodedPassword(encoded))
    }
}

/// Body of `POST /create`.
#[derive(Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: EnteredPassword,
    pub age: u32,
}

/// Body of `POST /login`.
#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: EnteredPassword,
}

#[derive(thiserror::Error, Debug)]
pub enum RegisterError {
    #[error("Failed to process password")]
    HashError(#[from] argon2::Error),
    #[error("{0}")]
    DbError(#[from] DbError),
    #[error("{0}")]
    TokenError(#[from] TokenError),
}

/// Hashes the password, stores the new user and signs a session token for it.
///
/// An existing user with the same email is not detected; both records are
/// kept.
pub fn register(
    db: &impl Db,
    tokens: &SessionTokens,
    registration: Registration,
) -> Result<(User, SessionToken), RegisterError> {
    let Registration {
        username,
        email,
        password,
        age,
    } = registration;

    let user = db.create(NewUser {
        username,
        email,
        password: password.encode()?,
        age,
    })?;
    let token = tokens.issue(&user.email)?;

    Ok((user, token))
}

#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error("No user registered with that email")]
    NotRegistered,
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Failed to process password")]
    HashError(#[from] argon2::Error),
    #[error("{0}")]
    DbError(#[from] DbError),
    #[error("{0}")]
    TokenError(#[from] TokenError),
}

impl LoginError {
    /// Whether the login was refused because of what the client sent, as
    /// opposed to a failure on our side.
    pub fn is_rejection(&self) -> bool {
        matches!(self, LoginError::NotRegistered | LoginError::InvalidCredentials)
    }
}

pub fn login(
    db: &impl Db,
    tokens: &SessionTokens,
    credentials: &Credentials,
) -> Result<SessionToken, LoginError> {
    let user = db
        .find_by_email(&credentials.email)?
        .ok_or(LoginError::NotRegistered)?;

    if user.password.verify(&credentials.password)? {
        Ok(tokens.issue(&user.email)?)
    } else {
        Err(LoginError::InvalidCredentials)
    }
}
