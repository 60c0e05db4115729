//! Utility functions and helpers.

pub mod cookies;

pub use cookies::{clear_session_cookie, session_cookie, CookieOptions};
