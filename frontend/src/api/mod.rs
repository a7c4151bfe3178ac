mod chat;
pub mod client;
mod leave;
mod policy;
pub mod types;
mod user;

pub use client::*;
pub use types::*;
