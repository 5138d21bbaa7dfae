use actix_web::http::Method;
use std::collections::HashMap;

/// Methods served by every routed pattern.
///
/// `match_pattern` only looks at the path, so stages running before dispatch
/// use this to tell a routed request from one the router will reject.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<&'static str, Vec<Method>>,
}

impl RouteTable {
    pub fn with(mut self, pattern: &'static str, methods: &[Method]) -> Self {
        self.routes
            .entry(pattern)
            .or_default()
            .extend(methods.iter().cloned());
        self
    }

    pub fn allows(&self, pattern: &str, method: &Method) -> bool {
        self.routes
            .get(pattern)
            .is_some_and(|methods| methods.contains(method))
    }
}
