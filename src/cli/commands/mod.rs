pub mod seed;
pub mod token;
pub mod user;
