//! Per-request context consumed by the gate.

use std::collections::BTreeMap;
use url::form_urlencoded;

/// Everything the gate is allowed to look at for one request.
///
/// Constructed by the HTTP layer from the incoming request and discarded
/// after the decision; nothing here outlives the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request path, always starting with `/`.
    pub path: String,
    /// Decoded query parameters in request order.
    pub query: Vec<(String, String)>,
    /// Raw `user-agent` header value, if present.
    pub user_agent: Option<String>,
    /// Request cookies by name.
    pub cookies: BTreeMap<String, String>,
}

impl RequestContext {
    /// Create a context for the given path with no query, headers or cookies.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            user_agent: None,
            cookies: BTreeMap::new(),
        }
    }

    /// Set the user-agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Append a query parameter.
    pub fn with_query_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Attach a cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Look up a cookie value by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Look up the first query parameter with the given name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Rebuild the path plus query string with every occurrence of `name`
    /// removed. Used to strip a matched secret parameter from the redirect
    /// target; all other parameters are preserved.
    pub fn location_without_param(&self, name: &str) -> String {
        let remaining: Vec<_> = self.query.iter().filter(|(k, _)| k != name).collect();
        if remaining.is_empty() {
            return self.path.clone();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in remaining {
            serializer.append_pair(k, v);
        }
        format!("{}?{}", self.path, serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_named_param() {
        let ctx = RequestContext::new("/products")
            .with_query_param("preview", "secret")
            .with_query_param("page", "2");

        assert_eq!(ctx.location_without_param("preview"), "/products?page=2");
    }

    #[test]
    fn drops_query_string_when_nothing_remains() {
        let ctx = RequestContext::new("/products").with_query_param("access", "secret");

        assert_eq!(ctx.location_without_param("access"), "/products");
    }

    #[test]
    fn preserved_params_are_reencoded() {
        let ctx = RequestContext::new("/search")
            .with_query_param("q", "crème solaire")
            .with_query_param("preview", "secret");

        assert_eq!(
            ctx.location_without_param("preview"),
            "/search?q=cr%C3%A8me+solaire"
        );
    }

    #[test]
    fn cookie_and_param_lookup() {
        let ctx = RequestContext::new("/")
            .with_cookie("token", "abc")
            .with_query_param("page", "1");

        assert_eq!(ctx.cookie("token"), Some("abc"));
        assert_eq!(ctx.cookie("missing"), None);
        assert_eq!(ctx.query_param("page"), Some("1"));
        assert_eq!(ctx.query_param("missing"), None);
    }
}
