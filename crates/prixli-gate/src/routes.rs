//! Static route classification sets.
//!
//! Defined once, immutable for the life of the process. Prefix matching is
//! segment-aware: `/signup` matches `/signup` and `/signup/confirm`, not
//! `/signup-bonus`.

/// User-agent substrings identifying search-engine, social-preview and SEO
/// crawlers. Matched case-insensitively.
pub const BOT_USER_AGENTS: &[&str] = &[
    "googlebot",
    "bingbot",
    "slurp",
    "duckduckbot",
    "baiduspider",
    "yandexbot",
    "sogou",
    "exabot",
    "facebot",
    "ia_archiver",
    "linkedinbot",
    "twitterbot",
    "whatsapp",
    "telegrambot",
    "applebot",
    "semrushbot",
    "ahrefsbot",
    "mj12bot",
    "dotbot",
    "petalbot",
    "bytespider",
    "gptbot",
];

/// Pages of the authentication flow.
const AUTH_PATHS: &[&str] = &[
    "/signin",
    "/signup",
    "/verify",
    "/forgot-password",
    "/reset-password",
];

/// Paths reachable while the coming-soon gate is up.
const COMING_SOON_ALLOWED: &[&str] = &["/coming-soon", "/signup", "/verify"];

/// Paths reachable without a tech-access cookie.
const TECH_PUBLIC_PATHS: &[&str] = &["/signup", "/signin"];

/// Prefix of the admin area.
const ADMIN_PREFIX: &str = "/dashboard";

/// Path prefixes that never enter the gate.
const EXCLUDED_PREFIXES: &[&str] = &["/api", "/static", "/images", "/videos"];

/// Exact paths that never enter the gate.
const EXCLUDED_FILES: &[&str] = &["/favicon.ico", "/sitemap.xml", "/robots.txt"];

/// Exact match or sub-path of `base`.
fn under(path: &str, base: &str) -> bool {
    path == base || (path.starts_with(base) && path.as_bytes().get(base.len()) == Some(&b'/'))
}

fn under_any(path: &str, bases: &[&str]) -> bool {
    bases.iter().any(|base| under(path, base))
}

/// Whether the user-agent belongs to a known crawler.
pub fn is_bot(user_agent: Option<&str>) -> bool {
    let Some(ua) = user_agent else {
        return false;
    };
    let ua = ua.to_lowercase();
    BOT_USER_AGENTS.iter().any(|bot| ua.contains(bot))
}

/// Whether the path belongs to the authentication flow.
pub fn is_auth_path(path: &str) -> bool {
    under_any(path, AUTH_PATHS)
}

/// Whether the path is inside the admin area.
pub fn is_admin_path(path: &str) -> bool {
    under(path, ADMIN_PREFIX)
}

/// Whether the path stays reachable behind the coming-soon gate.
pub fn is_coming_soon_allowed(path: &str) -> bool {
    under_any(path, COMING_SOON_ALLOWED)
}

/// Whether the path stays reachable without tech access.
pub fn is_tech_public(path: &str) -> bool {
    under_any(path, TECH_PUBLIC_PATHS)
}

/// Whether the path is statically excluded from gating (assets, API proxy,
/// crawler files).
pub fn is_excluded(path: &str) -> bool {
    under_any(path, EXCLUDED_PREFIXES) || EXCLUDED_FILES.contains(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some("Mozilla/5.0 (compatible; Googlebot/2.1)") => true)]
    #[test_case(Some("WhatsApp/2.23.20 A") => true)]
    #[test_case(Some("GPTBot/1.0") => true; "case insensitive")]
    #[test_case(Some("Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0") => false)]
    #[test_case(None => false)]
    fn bot_detection(user_agent: Option<&str>) -> bool {
        is_bot(user_agent)
    }

    #[test_case("/dashboard" => true)]
    #[test_case("/dashboard/products" => true)]
    #[test_case("/dashboard-old" => false; "no partial segment match")]
    #[test_case("/" => false)]
    fn admin_paths(path: &str) -> bool {
        is_admin_path(path)
    }

    #[test_case("/signin" => true)]
    #[test_case("/signup/confirm" => true)]
    #[test_case("/forgot-password" => true)]
    #[test_case("/reset-password" => true)]
    #[test_case("/products" => false)]
    fn auth_paths(path: &str) -> bool {
        is_auth_path(path)
    }

    #[test_case("/coming-soon" => true)]
    #[test_case("/signup" => true)]
    #[test_case("/verify/abc123" => true)]
    #[test_case("/signin" => false; "signin stays gated during coming soon")]
    #[test_case("/products" => false)]
    fn coming_soon_allowed(path: &str) -> bool {
        is_coming_soon_allowed(path)
    }

    #[test_case("/api/v1/products" => true)]
    #[test_case("/static/chunk.js" => true)]
    #[test_case("/images/logo.png" => true)]
    #[test_case("/videos/promo.mp4" => true)]
    #[test_case("/favicon.ico" => true)]
    #[test_case("/sitemap.xml" => true)]
    #[test_case("/robots.txt" => true)]
    #[test_case("/products" => false)]
    #[test_case("/apis" => false; "prefix is segment aware")]
    fn excluded_paths(path: &str) -> bool {
        is_excluded(path)
    }
}
