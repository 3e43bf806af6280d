//! The ordered gate pipeline.
//!
//! Rules are evaluated strictly in order, first match wins: bot bypass,
//! then whichever gating mode the deployment runs. Every evaluation
//! terminates in a well-defined [`Decision`]; there is no error path.

use crate::{
    config::{GateConfig, GateMode},
    context::RequestContext,
    decision::{CookieOp, Decision, PREVIEW_COOKIE, TECH_ACCESS_COOKIE, TOKEN_COOKIE},
    routes,
    session::{verify_session, Role, SessionVerdict},
};
use tracing::{debug, warn};

/// Query parameter unlocking tech access.
const ACCESS_PARAM: &str = "access";
/// Query parameter unlocking preview access.
const PREVIEW_PARAM: &str = "preview";

/// The request gate. Stateless between requests; safe to share and to
/// evaluate concurrently.
#[derive(Debug, Clone)]
pub struct RequestGate {
    config: GateConfig,
}

impl RequestGate {
    /// Build a gate from resolved configuration.
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// The configuration this gate runs with.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluate the pipeline for one request.
    pub fn evaluate(&self, ctx: &RequestContext) -> Decision {
        // Crawlers index public pages regardless of gating.
        if routes::is_bot(ctx.user_agent.as_deref()) {
            debug!(path = %ctx.path, "bot user-agent, bypassing gate");
            return Decision::Continue;
        }

        let decision = match self.config.mode {
            GateMode::ComingSoon => self.coming_soon(ctx),
            GateMode::TechAccess => self.tech_access(ctx),
            GateMode::Auth => self.auth(ctx),
        };

        if let Decision::Redirect { location, .. } = &decision {
            debug!(path = %ctx.path, to = %location, "gate redirect");
        }
        decision
    }

    /// Pre-launch gate: only the coming-soon page and the signup flow are
    /// public; a preview secret or cookie unlocks the rest.
    fn coming_soon(&self, ctx: &RequestContext) -> Decision {
        if routes::is_coming_soon_allowed(&ctx.path) {
            return Decision::Continue;
        }

        if secret_matches(ctx.query_param(PREVIEW_PARAM), &self.config.preview_secret) {
            return Decision::redirect_with(
                ctx.location_without_param(PREVIEW_PARAM),
                CookieOp::set_for_days(PREVIEW_COOKIE, "1", self.config.preview_cookie_days),
            );
        }

        if ctx.cookie(PREVIEW_COOKIE) == Some("1") {
            return Decision::Continue;
        }

        Decision::redirect("/coming-soon")
    }

    /// Soft-launch gate: the tech secret or cookie grants full access, the
    /// public only reaches signup/signin.
    fn tech_access(&self, ctx: &RequestContext) -> Decision {
        if secret_matches(ctx.query_param(ACCESS_PARAM), &self.config.tech_access_secret) {
            return Decision::redirect_with(
                ctx.location_without_param(ACCESS_PARAM),
                CookieOp::set_for_days(TECH_ACCESS_COOKIE, "1", self.config.tech_cookie_days),
            );
        }

        if ctx.cookie(TECH_ACCESS_COOKIE) == Some("1") {
            return Decision::Continue;
        }

        if routes::is_tech_public(&ctx.path) {
            return Decision::Continue;
        }

        Decision::redirect("/signup")
    }

    /// Launched gate: the session token drives role-based routing.
    fn auth(&self, ctx: &RequestContext) -> Decision {
        let Some(token) = ctx.cookie(TOKEN_COOKIE) else {
            // Anonymous users reach auth pages and public pages, never the
            // admin area.
            if routes::is_admin_path(&ctx.path) {
                return Decision::redirect("/signin");
            }
            return Decision::Continue;
        };

        let role = match verify_session(token, &self.config.jwt_secret) {
            SessionVerdict::Valid { role } => role,
            SessionVerdict::Invalid => {
                warn!(path = %ctx.path, "invalid session token, clearing cookie");
                return Decision::redirect_with("/signin", CookieOp::remove(TOKEN_COOKIE));
            }
        };

        // Already signed in: auth pages bounce to the role's home.
        if routes::is_auth_path(&ctx.path) {
            return match role {
                Role::Admin => Decision::redirect("/dashboard"),
                Role::Client => Decision::redirect("/"),
            };
        }

        match role {
            Role::Admin if ctx.path == "/" => Decision::redirect("/dashboard"),
            Role::Admin => Decision::Continue,
            Role::Client if routes::is_admin_path(&ctx.path) => Decision::redirect("/"),
            Role::Client => Decision::Continue,
        }
    }
}

/// Exact secret match; an unset secret never matches.
fn secret_matches(candidate: Option<&str>, secret: &str) -> bool {
    !secret.is_empty() && candidate == Some(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{encode_session, SessionClaims};

    const JWT_SECRET: &str = "test_secret_key_32_chars_long!!!";
    const PREVIEW_SECRET: &str = "preview1111tn";
    const TECH_SECRET: &str = "tech2222tn";

    fn gate(mode: GateMode) -> RequestGate {
        let mut config = GateConfig::for_mode(mode);
        config.jwt_secret = JWT_SECRET.to_string();
        config.preview_secret = PREVIEW_SECRET.to_string();
        config.tech_access_secret = TECH_SECRET.to_string();
        RequestGate::new(config)
    }

    fn token(role: &str) -> String {
        encode_session(&SessionClaims::new("u1", role, 3600), JWT_SECRET).unwrap()
    }

    fn redirect_to(decision: &Decision) -> &str {
        match decision {
            Decision::Redirect { location, .. } => location,
            Decision::Continue => panic!("expected redirect, got continue"),
        }
    }

    #[test]
    fn bots_bypass_every_mode() {
        let ctx = RequestContext::new("/dashboard")
            .with_user_agent("Mozilla/5.0 (compatible; Googlebot/2.1)");

        for mode in [GateMode::ComingSoon, GateMode::TechAccess, GateMode::Auth] {
            assert!(gate(mode).evaluate(&ctx).is_continue());
        }
    }

    #[test]
    fn coming_soon_redirects_gated_paths() {
        let decision = gate(GateMode::ComingSoon).evaluate(&RequestContext::new("/products"));

        assert_eq!(redirect_to(&decision), "/coming-soon");
    }

    #[test]
    fn coming_soon_page_itself_never_loops() {
        let gate = gate(GateMode::ComingSoon);

        assert!(gate.evaluate(&RequestContext::new("/coming-soon")).is_continue());
        assert!(gate.evaluate(&RequestContext::new("/signup")).is_continue());
        assert!(gate.evaluate(&RequestContext::new("/verify/tok")).is_continue());
    }

    #[test]
    fn preview_secret_sets_cookie_and_strips_param() {
        let ctx = RequestContext::new("/anything").with_query_param("preview", PREVIEW_SECRET);

        let decision = gate(GateMode::ComingSoon).evaluate(&ctx);

        assert_eq!(
            decision,
            Decision::Redirect {
                location: "/anything".to_string(),
                cookies: vec![CookieOp::Set {
                    name: "preview_mode".to_string(),
                    value: "1".to_string(),
                    max_age_secs: 7 * 86_400,
                }],
            }
        );
    }

    #[test]
    fn wrong_preview_secret_stays_gated() {
        let ctx = RequestContext::new("/anything").with_query_param("preview", "guess");

        let decision = gate(GateMode::ComingSoon).evaluate(&ctx);

        assert_eq!(redirect_to(&decision), "/coming-soon");
    }

    #[test]
    fn preview_cookie_unlocks_coming_soon() {
        let ctx = RequestContext::new("/products").with_cookie("preview_mode", "1");

        assert!(gate(GateMode::ComingSoon).evaluate(&ctx).is_continue());
    }

    #[test]
    fn tech_secret_sets_cookie_and_keeps_other_params() {
        let ctx = RequestContext::new("/products")
            .with_query_param("page", "3")
            .with_query_param("access", TECH_SECRET);

        let decision = gate(GateMode::TechAccess).evaluate(&ctx);

        assert_eq!(
            decision,
            Decision::Redirect {
                location: "/products?page=3".to_string(),
                cookies: vec![CookieOp::Set {
                    name: "tech_access".to_string(),
                    value: "1".to_string(),
                    max_age_secs: 30 * 86_400,
                }],
            }
        );
    }

    #[test]
    fn tech_cookie_unlocks_everything() {
        let gate = gate(GateMode::TechAccess);
        let ctx = RequestContext::new("/dashboard").with_cookie("tech_access", "1");

        assert!(gate.evaluate(&ctx).is_continue());
    }

    #[test]
    fn tech_mode_public_reaches_signup_and_signin_only() {
        let gate = gate(GateMode::TechAccess);

        assert!(gate.evaluate(&RequestContext::new("/signup")).is_continue());
        assert!(gate.evaluate(&RequestContext::new("/signin")).is_continue());

        let decision = gate.evaluate(&RequestContext::new("/products"));
        assert_eq!(redirect_to(&decision), "/signup");
    }

    #[test]
    fn empty_secret_never_matches() {
        let mut config = GateConfig::for_mode(GateMode::TechAccess);
        config.tech_access_secret = String::new();
        let gate = RequestGate::new(config);

        let ctx = RequestContext::new("/products").with_query_param("access", "");
        let decision = gate.evaluate(&ctx);

        assert_eq!(redirect_to(&decision), "/signup");
    }

    #[test]
    fn anonymous_reaches_public_pages() {
        let gate = gate(GateMode::Auth);

        assert!(gate.evaluate(&RequestContext::new("/")).is_continue());
        assert!(gate.evaluate(&RequestContext::new("/products/123")).is_continue());
        assert!(gate.evaluate(&RequestContext::new("/signin")).is_continue());
    }

    #[test]
    fn anonymous_dashboard_redirects_to_signin() {
        let decision = gate(GateMode::Auth).evaluate(&RequestContext::new("/dashboard"));

        assert_eq!(redirect_to(&decision), "/signin");
    }

    #[test]
    fn invalid_token_clears_cookie_and_redirects() {
        let ctx = RequestContext::new("/products").with_cookie("token", "tampered.jwt.value");

        let decision = gate(GateMode::Auth).evaluate(&ctx);

        assert_eq!(
            decision,
            Decision::Redirect {
                location: "/signin".to_string(),
                cookies: vec![CookieOp::Remove {
                    name: "token".to_string(),
                }],
            }
        );
    }

    #[test]
    fn expired_token_treated_like_invalid() {
        let expired = encode_session(&SessionClaims::new("u1", "admin", -3600), JWT_SECRET).unwrap();
        let ctx = RequestContext::new("/dashboard").with_cookie("token", expired);

        let decision = gate(GateMode::Auth).evaluate(&ctx);

        assert_eq!(redirect_to(&decision), "/signin");
    }

    #[test]
    fn admin_root_redirects_to_dashboard() {
        let ctx = RequestContext::new("/").with_cookie("token", token("admin"));

        let decision = gate(GateMode::Auth).evaluate(&ctx);

        assert_eq!(redirect_to(&decision), "/dashboard");
    }

    #[test]
    fn admin_reaches_admin_and_public_pages() {
        let gate = gate(GateMode::Auth);
        let tok = token("admin");

        let dashboard = RequestContext::new("/dashboard/products").with_cookie("token", &tok);
        assert!(gate.evaluate(&dashboard).is_continue());

        let public = RequestContext::new("/products").with_cookie("token", &tok);
        assert!(gate.evaluate(&public).is_continue());
    }

    #[test]
    fn client_dashboard_redirects_home() {
        let ctx = RequestContext::new("/dashboard").with_cookie("token", token("client"));

        let decision = gate(GateMode::Auth).evaluate(&ctx);

        assert_eq!(redirect_to(&decision), "/");
    }

    #[test]
    fn signed_in_users_never_see_auth_pages() {
        let gate = gate(GateMode::Auth);

        let admin = RequestContext::new("/signin").with_cookie("token", token("admin"));
        assert_eq!(redirect_to(&gate.evaluate(&admin)), "/dashboard");

        let client = RequestContext::new("/signup").with_cookie("token", token("client"));
        assert_eq!(redirect_to(&gate.evaluate(&client)), "/");
    }

    #[test]
    fn unknown_role_routed_as_client() {
        let ctx = RequestContext::new("/dashboard").with_cookie("token", token("moderator"));

        let decision = gate(GateMode::Auth).evaluate(&ctx);

        assert_eq!(redirect_to(&decision), "/");
    }
}
