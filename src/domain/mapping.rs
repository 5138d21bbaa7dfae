//! Object-to-object mapping driven by explicitly supplied profiles.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

/// A named set of type maps, handed to [`Mapper::from_profiles`] at startup.
pub trait MappingProfile: Send + Sync {
    fn name(&self) -> &'static str;

    fn configure(&self, configuration: &mut MapperConfiguration);
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MappingError {
    #[error("No mapping profiles were supplied")]
    NoProfiles,
    #[error("A map from {source_type} to {destination_type} is defined more than once (profile {profile})")]
    DuplicateMap {
        profile: &'static str,
        source_type: &'static str,
        destination_type: &'static str,
    },
    #[error("No map is configured from {source_type} to {destination_type}")]
    MissingMap {
        source_type: &'static str,
        destination_type: &'static str,
    },
}

struct TypeMap {
    // Always a `fn(&S) -> D` for the key's source and destination types.
    convert: Box<dyn Any + Send + Sync>,
}

type MapKey = (TypeId, TypeId);

#[derive(Default)]
pub struct MapperConfiguration {
    current_profile: &'static str,
    maps: HashMap<MapKey, TypeMap>,
    errors: Vec<MappingError>,
}

impl MapperConfiguration {
    pub fn create_map<S: 'static, D: 'static>(&mut self, convert: fn(&S) -> D) -> &mut Self {
        let key = (TypeId::of::<S>(), TypeId::of::<D>());
        if self.maps.contains_key(&key) {
            self.errors.push(MappingError::DuplicateMap {
                profile: self.current_profile,
                source_type: type_name::<S>(),
                destination_type: type_name::<D>(),
            });
        } else {
            self.maps.insert(
                key,
                TypeMap {
                    convert: Box::new(convert),
                },
            );
        }
        self
    }
}

pub struct Mapper {
    maps: HashMap<MapKey, TypeMap>,
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("maps", &self.maps.len())
            .finish()
    }
}

impl Mapper {
    pub fn from_profiles(profiles: Vec<Box<dyn MappingProfile>>) -> Result<Mapper, MappingError> {
        if profiles.is_empty() {
            return Err(MappingError::NoProfiles);
        }

        let mut configuration = MapperConfiguration::default();
        for profile in &profiles {
            configuration.current_profile = profile.name();
            profile.configure(&mut configuration);
            tracing::debug!(profile = profile.name(), "Loaded mapping profile");
        }

        if let Some(error) = configuration.errors.into_iter().next() {
            return Err(error);
        }
        Ok(Mapper {
            maps: configuration.maps,
        })
    }

    pub fn map<S: 'static, D: 'static>(&self, source: &S) -> Result<D, MappingError> {
        let convert = self
            .maps
            .get(&(TypeId::of::<S>(), TypeId::of::<D>()))
            .and_then(|m| m.convert.downcast_ref::<fn(&S) -> D>())
            .ok_or(MappingError::MissingMap {
                source_type: type_name::<S>(),
                destination_type: type_name::<D>(),
            })?;
        Ok(convert(source))
    }

    pub fn map_all<S: 'static, D: 'static>(&self, sources: &[S]) -> Result<Vec<D>, MappingError> {
        sources.iter().map(|s| self.map(s)).collect()
    }
}
