pub mod admin;
pub mod comments;
pub mod composer;
pub mod error;
pub mod oauth;
pub mod repos;
