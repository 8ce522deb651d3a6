pub mod user;

pub use user::{Locks, User};
