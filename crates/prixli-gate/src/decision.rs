//! Gate decisions and the cookie mutations attached to them.

/// Name of the session-token cookie issued by the auth backend.
pub const TOKEN_COOKIE: &str = "token";
/// Name of the tech-access bypass cookie.
pub const TECH_ACCESS_COOKIE: &str = "tech_access";
/// Name of the preview bypass cookie.
pub const PREVIEW_COOKIE: &str = "preview_mode";

/// Outcome of evaluating the gate for one request.
///
/// The pipeline never touches the response directly; cookie writes travel
/// with the decision so the policy stays a pure function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Hand the request to the next stage untouched.
    Continue,
    /// Redirect to `location`, applying each cookie operation to the
    /// response. A redirect carries at most one `Set` (an access cookie)
    /// or one `Remove` (the session token), never both.
    Redirect {
        /// Redirect target, a site-relative path with optional query.
        location: String,
        /// Cookie mutations to attach to the redirect response.
        cookies: Vec<CookieOp>,
    },
}

impl Decision {
    /// Plain redirect with no cookie mutation.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
            cookies: Vec::new(),
        }
    }

    /// Redirect carrying a single cookie operation.
    pub fn redirect_with(location: impl Into<String>, op: CookieOp) -> Self {
        Self::Redirect {
            location: location.into(),
            cookies: vec![op],
        }
    }

    /// Whether this decision lets the request through.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// A cookie mutation attached to a redirect.
///
/// Set cookies are always `HttpOnly`, `Path=/`, `SameSite=Lax`; the HTTP
/// layer applies those attributes when materializing the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieOp {
    /// Set a cookie with the given lifetime.
    Set {
        /// Cookie name.
        name: String,
        /// Cookie value.
        value: String,
        /// Lifetime in seconds.
        max_age_secs: i64,
    },
    /// Expire a cookie immediately.
    Remove {
        /// Cookie name.
        name: String,
    },
}

impl CookieOp {
    /// Set `name=value` for the given number of days.
    pub fn set_for_days(name: impl Into<String>, value: impl Into<String>, days: u32) -> Self {
        Self::Set {
            name: name.into(),
            value: value.into(),
            max_age_secs: i64::from(days) * 86_400,
        }
    }

    /// Expire `name` immediately.
    pub fn remove(name: impl Into<String>) -> Self {
        Self::Remove { name: name.into() }
    }
}
