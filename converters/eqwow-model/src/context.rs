//! Conversion context and the shared model cache
//!
//! A [`ConversionContext`] is created once by the driver and handed to every
//! conversion. Drivers converting objects on several threads share one
//! [`ModelCache`] so a name is only ever converted once.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::{debug, trace};

use crate::config::{ConversionConfig, ObjectProperties};
use crate::error::{ConversionError, Result};
use crate::model::ObjectModel;
use crate::source::SourceObject;

#[derive(Debug, Clone)]
enum CacheSlot {
    Loading,
    Ready(Arc<ObjectModel>),
}

/// Thread-safe name to model cache
#[derive(Debug, Default)]
pub struct ModelCache {
    slots: DashMap<String, CacheSlot>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished model for `name`, if one has been stored
    pub fn get(&self, name: &str) -> Option<Arc<ObjectModel>> {
        match self.slots.get(name)?.value() {
            CacheSlot::Ready(model) => Some(Arc::clone(model)),
            CacheSlot::Loading => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of finished models
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.value(), CacheSlot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserve `name` for loading.
    ///
    /// Fails with [`ConversionError::AlreadyClaimed`] while another caller
    /// holds the claim or after the model has been stored.
    pub fn claim(&self, name: &str) -> Result<CacheClaim<'_>> {
        match self.slots.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ConversionError::AlreadyClaimed(name.to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(CacheSlot::Loading);
                trace!("Claimed '{name}' for loading");
                Ok(CacheClaim {
                    cache: self,
                    name: name.to_string(),
                    completed: false,
                })
            }
        }
    }
}

/// Exclusive right to load one name; dropping it unfinished releases the name
#[derive(Debug)]
pub struct CacheClaim<'a> {
    cache: &'a ModelCache,
    name: String,
    completed: bool,
}

impl CacheClaim<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store the finished model and hand back a shared handle to it
    pub fn complete(mut self, model: ObjectModel) -> Arc<ObjectModel> {
        let model = Arc::new(model);
        self.cache
            .slots
            .insert(self.name.clone(), CacheSlot::Ready(Arc::clone(&model)));
        self.completed = true;
        model
    }
}

impl Drop for CacheClaim<'_> {
    fn drop(&mut self) {
        if !self.completed {
            debug!("Releasing unfinished claim on '{}'", self.name);
            self.cache.slots.remove(&self.name);
        }
    }
}

/// Everything a conversion needs besides the object itself
#[derive(Debug, Clone, Default)]
pub struct ConversionContext {
    pub config: ConversionConfig,
    pub cache: Option<Arc<ModelCache>>,
}

impl ConversionContext {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ModelCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Convert one object, going through the cache when there is one.
    ///
    /// A cached model is returned as is. Without a cache every call converts.
    pub fn convert(
        &self,
        name: &str,
        properties: ObjectProperties,
        source: SourceObject,
    ) -> Result<Arc<ObjectModel>> {
        let Some(cache) = &self.cache else {
            let mut model = ObjectModel::new(name, properties);
            model.load(source, self)?;
            return Ok(Arc::new(model));
        };

        if let Some(model) = cache.get(name) {
            trace!("Using cached model '{name}'");
            return Ok(model);
        }
        let claim = cache.claim(name)?;
        let mut model = ObjectModel::new(name, properties);
        model.load(source, self)?;
        Ok(claim.complete(model))
    }
}
