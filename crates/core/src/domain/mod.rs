pub mod account;
pub mod conversation;
pub mod profile;
pub mod recommendation;
pub mod template;
