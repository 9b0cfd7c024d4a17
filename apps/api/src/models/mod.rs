pub mod keys;
pub mod platform;
pub mod post;
