//! Session cookie header values.

use crate::config::{SESSION_COOKIE_NAME, SESSION_COOKIE_PATH};

/// Attributes shared by every session cookie the server sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CookieOptions {
    /// Adds `Secure`, restricting the cookie to HTTPS
    pub secure: bool,
}

/// `Set-Cookie` value carrying a session token for `max_age_secs` seconds.
pub fn session_cookie(token: &str, max_age_secs: i64, options: CookieOptions) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path={}; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME,
        token,
        SESSION_COOKIE_PATH,
        max_age_secs.max(0)
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(options: CookieOptions) -> String {
    session_cookie("", 0, options)
}
