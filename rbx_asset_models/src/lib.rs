pub mod asset;
pub mod id;
pub mod operation;
pub mod user;
