pub mod chat;
pub mod input;
pub mod status;
