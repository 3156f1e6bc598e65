use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub(crate) const SESSION_COOKIE: &str = "user-token";

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build()
}

pub(crate) fn with_session(jar: CookieJar, token: String, ttl_seconds: i64) -> CookieJar {
    let mut cookie = session_cookie(token);
    cookie.set_max_age(time::Duration::seconds(ttl_seconds));
    jar.add(cookie)
}

/// Always emits an expired cookie, even when the request authenticated with a
/// bearer header and carried no cookie to remove.
pub(crate) fn without_session(jar: CookieJar) -> CookieJar {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();
    jar.add(cookie)
}
