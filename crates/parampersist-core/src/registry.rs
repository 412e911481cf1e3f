//! Class registry: resolve a stored class path to a constructor
//!
//! Every persistable type registers itself once at startup. Resolution is a
//! map lookup and fails closed for unregistered paths.

use crate::errors::{ParamPersistError, Result};
use crate::model::{Parameterized, ParameterizedClass};
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

type Constructor = fn() -> Box<dyn Parameterized>;

fn construct<T: ParameterizedClass>() -> Box<dyn Parameterized> {
    Box::new(T::default())
}

/// Map from dotted class path to zero-argument constructor
#[derive(Default)]
pub struct ClassRegistry {
    classes: RwLock<HashMap<String, Constructor>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn global() -> &'static ClassRegistry {
        static REGISTRY: OnceLock<ClassRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ClassRegistry::new)
    }

    /// Register `T` under its qualified name and return that name
    ///
    /// Registering the same type twice is harmless.
    pub fn register<T: ParameterizedClass>(&self) -> String {
        let class_path = T::qualified_name();
        self.register_as(class_path.clone(), construct::<T>);
        class_path
    }

    /// Register a constructor under an explicit path
    ///
    /// Used for paths written by an earlier layout of the same type.
    pub fn register_as(&self, class_path: impl Into<String>, constructor: Constructor) {
        let class_path = class_path.into();
        tracing::debug!(class_path = %class_path, "Registered parameterized class");
        self.classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(class_path, constructor);
    }

    pub fn is_registered(&self, class_path: &str) -> bool {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(class_path)
    }

    /// Registered class paths, sorted
    pub fn class_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    /// Construct a default instance of the class registered under `class_path`
    ///
    /// The path must split on its last `.` into a non-empty namespace and a
    /// non-empty class name.
    ///
    /// # Errors
    ///
    /// `ClassNotResolvable` carrying the path verbatim.
    pub fn resolve(&self, class_path: &str) -> Result<Box<dyn Parameterized>> {
        let not_resolvable = || ParamPersistError::ClassNotResolvable {
            class_path: class_path.to_string(),
        };

        match class_path.rsplit_once('.') {
            Some((namespace, class_name)) if !namespace.is_empty() && !class_name.is_empty() => {}
            _ => return Err(not_resolvable()),
        }

        let constructor = self
            .classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class_path)
            .copied()
            .ok_or_else(not_resolvable)?;

        Ok(constructor())
    }
}
