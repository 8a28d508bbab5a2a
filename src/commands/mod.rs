pub mod common;
pub mod dos;
pub mod info;
