//! Registry of validated converter types.

use once_cell::sync::Lazy;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use super::error::RegistryError;
use super::traits::ConverterType;
use super::types::{ConverterDeclaration, ConverterDescriptor, Side};
use super::validate::validate_and_normalize;
use crate::metrics::REGISTRATIONS_TOTAL;

static GLOBAL: Lazy<ConverterRegistry> = Lazy::new(ConverterRegistry::new);

#[derive(Debug)]
struct Registered {
    declaration: ConverterDeclaration,
    descriptor: Arc<ConverterDescriptor>,
}

/// Converter types keyed by name.
///
/// Registration validates a declaration once and stores the resulting
/// descriptor; registering the same declaration again returns the stored
/// descriptor without revalidating. A failed registration leaves the registry
/// untouched, so one malformed converter never affects its siblings.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    entries: RwLock<HashMap<String, Registered>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by [`ConverterType::descriptor`].
    pub fn global() -> &'static ConverterRegistry {
        &GLOBAL
    }

    /// Validates and registers a declaration.
    pub fn register(
        &self,
        declaration: ConverterDeclaration,
    ) -> Result<Arc<ConverterDescriptor>, RegistryError> {
        if let Some(existing) = self.read().get(&declaration.name) {
            return Self::reuse(existing, &declaration);
        }

        let descriptor = match validate_and_normalize(&declaration) {
            Ok(descriptor) => Arc::new(descriptor),
            Err(e) => {
                REGISTRATIONS_TOTAL.with_label_values(&["rejected"]).inc();
                warn!(converter = %declaration.name, error = %e, "Converter rejected");
                return Err(e);
            }
        };

        let mut entries = self.write();
        match entries.entry(declaration.name.clone()) {
            // Registered by another thread between the two locks
            Entry::Occupied(existing) => Self::reuse(existing.get(), &declaration),
            Entry::Vacant(slot) => {
                info!(
                    converter = %descriptor.name(),
                    input_format = %descriptor.input_format(),
                    output_format = %descriptor.output_format(),
                    "Registered converter"
                );
                REGISTRATIONS_TOTAL.with_label_values(&["registered"]).inc();
                slot.insert(Registered {
                    declaration,
                    descriptor: Arc::clone(&descriptor),
                });
                Ok(descriptor)
            }
        }
    }

    /// Registers a statically declared converter type.
    pub fn register_type<T: ConverterType>(&self) -> Result<Arc<ConverterDescriptor>, RegistryError> {
        self.register(T::declaration())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ConverterDescriptor>> {
        self.read().get(name).map(|r| Arc::clone(&r.descriptor))
    }

    /// All registered descriptors, sorted by name.
    pub fn descriptors(&self) -> Vec<Arc<ConverterDescriptor>> {
        let mut descriptors: Vec<_> = self
            .read()
            .values()
            .map(|r| Arc::clone(&r.descriptor))
            .collect();
        descriptors.sort_by(|a, b| a.name().cmp(b.name()));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Descriptors accepting `input` and producing `output`, sorted by name.
    pub fn find_by_paths(&self, input: &Path, output: &Path) -> Vec<Arc<ConverterDescriptor>> {
        self.descriptors()
            .into_iter()
            .filter(|d| d.matches(Side::Input, input) && d.matches(Side::Output, output))
            .collect()
    }

    /// Picks the converter named `name`, or the single one matching the paths.
    pub fn resolve(
        &self,
        name: Option<&str>,
        input: &Path,
        output: &Path,
    ) -> Result<Arc<ConverterDescriptor>, RegistryError> {
        if let Some(name) = name {
            return self.get(name).ok_or_else(|| RegistryError::UnknownConverter {
                name: name.to_string(),
            });
        }

        let mut candidates = self.find_by_paths(input, output);
        match candidates.len() {
            0 => Err(RegistryError::NoMatchingConverter {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(RegistryError::AmbiguousConverter {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                candidates: candidates.iter().map(|d| d.name().to_string()).collect(),
            }),
        }
    }

    fn reuse(
        existing: &Registered,
        declaration: &ConverterDeclaration,
    ) -> Result<Arc<ConverterDescriptor>, RegistryError> {
        if existing.declaration == *declaration {
            debug!(converter = %declaration.name, "Converter already registered");
            Ok(Arc::clone(&existing.descriptor))
        } else {
            Err(RegistryError::DuplicateConverter {
                name: declaration.name.clone(),
            })
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Registered>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Registered>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
