pub mod api;
pub mod config;
pub mod domain;
pub mod in_memory_db;
pub mod sled_db;

pub use domain::{
    db, login, register, session, Credentials, EncodedPassword, EnteredPassword, LoginError,
    NewUser, PublicUser, RegisterError, Registration, User, UserId,
};
