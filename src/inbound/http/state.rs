use crate::configuration::Environment;
use crate::registry::ServiceRegistry;
use std::sync::Arc;

#[derive(Debug)]
pub struct AppState {
    registry: Arc<ServiceRegistry>,
    environment: Environment,
}

#[derive(Debug, Clone)]
pub struct SharedAppState(Arc<AppState>);

impl SharedAppState {
    pub fn new(registry: ServiceRegistry, environment: Environment) -> Self {
        Self(Arc::new(AppState {
            registry: Arc::new(registry),
            environment,
        }))
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.0.registry
    }

    pub fn environment(&self) -> Environment {
        self.0.environment
    }
}
