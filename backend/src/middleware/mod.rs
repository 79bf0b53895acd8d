//! Request middleware

pub mod auth;

pub use auth::{session_cookie, session_middleware, session_token, CurrentUser};
