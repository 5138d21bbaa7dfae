//! Capability bindings and their lifetimes.
//!
//! A capability is any `'static` type, usually a trait object such as
//! `dyn MailService`. Each capability is bound exactly once to a provider and a
//! [`Lifetime`]; binding it a second time is rejected.

use parking_lot::Mutex;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

type AnyBox = Box<dyn Any + Send + Sync>;
type Factory<T> = Arc<dyn Fn() -> Arc<T> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// One instance shared by every request for the life of the process.
    Singleton,
    /// One instance per request scope.
    Scoped,
    /// A fresh instance every time the capability is resolved.
    Transient,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Capability `{0}` is already registered")]
    AlreadyRegistered(&'static str),
    #[error("No implementation is registered for capability `{0}`")]
    NotRegistered(&'static str),
    #[error("Capability `{0}` is scoped and can only be resolved inside a request scope")]
    ScopeRequired(&'static str),
    #[error("Missing bindings for: {}", .0.join(", "))]
    MissingBindings(Vec<&'static str>),
}

/// Identifies a capability without having to name its type parameter later on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    id: TypeId,
    name: &'static str,
}

impl Capability {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

struct Registration {
    capability: Capability,
    lifetime: Lifetime,
    // `Arc<T>` for singletons, `Factory<T>` otherwise.
    provider: AnyBox,
}

#[derive(Default)]
pub struct ServiceRegistry {
    registrations: HashMap<TypeId, Registration>,
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.registrations
                    .values()
                    .map(|r| (r.capability.name, r.lifetime)),
            )
            .finish()
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `T` to `factory` under `lifetime`.
    ///
    /// Singletons are built immediately, so the factory runs exactly once.
    /// Scoped and transient factories run on resolution.
    pub fn register<T, F>(&mut self, lifetime: Lifetime, factory: F) -> Result<(), RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        let capability = Capability::of::<T>();
        if self.registrations.contains_key(&capability.id) {
            tracing::warn!(
                capability = capability.name,
                "Rejected a second registration for an already bound capability"
            );
            return Err(RegistryError::AlreadyRegistered(capability.name));
        }

        let provider: AnyBox = match lifetime {
            Lifetime::Singleton => Box::new(factory()),
            Lifetime::Scoped | Lifetime::Transient => {
                let factory: Factory<T> = Arc::new(factory);
                Box::new(factory)
            }
        };
        tracing::debug!(capability = capability.name, ?lifetime, "Registered capability");
        self.registrations.insert(
            capability.id,
            Registration {
                capability,
                lifetime,
                provider,
            },
        );
        Ok(())
    }

    pub fn add_singleton<T>(&mut self, instance: Arc<T>) -> Result<(), RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register::<T, _>(Lifetime::Singleton, move || Arc::clone(&instance))
    }

    pub fn add_scoped<T, F>(&mut self, factory: F) -> Result<(), RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.register::<T, _>(Lifetime::Scoped, factory)
    }

    pub fn add_transient<T, F>(&mut self, factory: F) -> Result<(), RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.register::<T, _>(Lifetime::Transient, factory)
    }

    pub fn lifetime_of<T: ?Sized + 'static>(&self) -> Option<Lifetime> {
        self.registrations
            .get(&TypeId::of::<T>())
            .map(|r| r.lifetime)
    }

    pub fn contains(&self, capability: &Capability) -> bool {
        self.registrations.contains_key(&capability.id)
    }

    /// Fails with every capability in `required` that has no binding.
    pub fn verify(&self, required: &[Capability]) -> Result<(), RegistryError> {
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|c| !self.contains(c))
            .map(Capability::name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::MissingBindings(missing))
        }
    }

    /// Resolves a singleton or transient capability.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let registration = self.registration::<T>()?;
        match registration.lifetime {
            Lifetime::Singleton => singleton::<T>(registration),
            Lifetime::Transient => Ok(factory::<T>(registration)?()),
            Lifetime::Scoped => Err(RegistryError::ScopeRequired(type_name::<T>())),
        }
    }

    fn registration<T: ?Sized + 'static>(&self) -> Result<&Registration, RegistryError> {
        self.registrations
            .get(&TypeId::of::<T>())
            .ok_or(RegistryError::NotRegistered(type_name::<T>()))
    }
}

fn singleton<T: ?Sized + Send + Sync + 'static>(
    registration: &Registration,
) -> Result<Arc<T>, RegistryError> {
    registration
        .provider
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or(RegistryError::NotRegistered(type_name::<T>()))
}

fn factory<T: ?Sized + Send + Sync + 'static>(
    registration: &Registration,
) -> Result<&Factory<T>, RegistryError> {
    registration
        .provider
        .downcast_ref::<Factory<T>>()
        .ok_or(RegistryError::NotRegistered(type_name::<T>()))
}

/// Per-request view of the registry.
///
/// Scoped capabilities are built on first use and reused until the scope is
/// dropped at the end of the request.
pub struct RequestScope {
    id: uuid::Uuid,
    registry: Arc<ServiceRegistry>,
    instances: Mutex<HashMap<TypeId, AnyBox>>,
}

impl std::fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestScope")
            .field("id", &self.id)
            .field("instances", &self.instances.lock().len())
            .finish()
    }
}

impl RequestScope {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            registry,
            instances: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let registration = self.registry.registration::<T>()?;
        if registration.lifetime != Lifetime::Scoped {
            return self.registry.resolve::<T>();
        }

        let mut instances = self.instances.lock();
        if let Some(instance) = instances
            .get(&TypeId::of::<T>())
            .and_then(|i| i.downcast_ref::<Arc<T>>())
        {
            return Ok(Arc::clone(instance));
        }

        let instance = factory::<T>(registration)?();
        instances.insert(TypeId::of::<T>(), Box::new(Arc::clone(&instance)));
        Ok(instance)
    }
}
