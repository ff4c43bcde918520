//! Session cookie helpers

use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

use crate::error::ApiError;
use crate::store::{Principal, Session, SessionId, SessionStore, UserId};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "gohire_session";

/// Read the session id from the request cookies, if present.
pub fn get_session_id(cookies: &Cookies) -> Option<SessionId> {
    cookies
        .get(SESSION_COOKIE)
        .map(|c| SessionId(c.value().to_string()))
}

/// Attach the session cookie to the response.
pub fn set_session_cookie(cookies: &Cookies, session: &Session) {
    let mut cookie = Cookie::new(SESSION_COOKIE, session.id.0.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookies.add(cookie);
}

/// Remove the session cookie from the browser.
pub fn clear_session_cookie(cookies: &Cookies) {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.make_removal();
    cookies.add(cookie);
}

/// Resolve the current session or fail with `NotAuthenticated`.
pub fn current_session<S: SessionStore>(sessions: &S, cookies: &Cookies) -> Result<Session, ApiError> {
    let session_id = get_session_id(cookies).ok_or(ApiError::NotAuthenticated)?;
    sessions.get(&session_id)?.ok_or(ApiError::NotAuthenticated)
}

/// Require an applicant session; admins do not pass.
pub fn require_applicant<S: SessionStore>(
    sessions: &S,
    cookies: &Cookies,
) -> Result<(Session, UserId), ApiError> {
    let session = current_session(sessions, cookies)?;
    match session.principal {
        Principal::Applicant { user_id } => Ok((session, user_id)),
        Principal::Admin { .. } => Err(ApiError::NotAuthenticated),
    }
}

/// Require an admin session; applicants do not pass.
pub fn require_admin<S: SessionStore>(
    sessions: &S,
    cookies: &Cookies,
) -> Result<(Session, String), ApiError> {
    let session = current_session(sessions, cookies)?;
    match session.principal.clone() {
        Principal::Admin { email } => Ok((session, email)),
        Principal::Applicant { .. } => Err(ApiError::NotAuthenticated),
    }
}
