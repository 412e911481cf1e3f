//! Bidirectional mapping between typed objects and the canonical form

use crate::errors::{ParamPersistError, Result};
use crate::model::{Parameterized, IDENTITY_FIELD};
use crate::registry::ClassRegistry;
use crate::serialize::{CanonicalForm, ParamTriple};
use serde_json::Value;

/// Serializer bound to the registry used to resolve class paths
#[derive(Clone, Copy)]
pub struct Serializer<'r> {
    registry: &'r ClassRegistry,
}

impl Default for Serializer<'static> {
    fn default() -> Self {
        Self::new(ClassRegistry::global())
    }
}

impl<'r> Serializer<'r> {
    pub fn new(registry: &'r ClassRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ClassRegistry {
        self.registry
    }

    /// Encode an object into its canonical form
    ///
    /// Fields appear in declaration order; the identity field is skipped.
    pub fn to_dict(&self, instance: &dyn Parameterized) -> Result<CanonicalForm> {
        let params = instance
            .param_values()
            .iter()
            .map(|(name, value)| ParamTriple::new(*name, value))
            .collect::<Result<Vec<_>>>()?;

        Ok(CanonicalForm {
            class_path: instance.class_path(),
            params,
        })
    }

    pub fn to_json(&self, instance: &dyn Parameterized) -> Result<String> {
        self.to_dict(instance)?.to_json()
    }

    /// Rebuild an object from a dictionary shaped like the canonical form
    ///
    /// # Errors
    ///
    /// - `MissingClassPath` / `MissingParams` when a key is absent or empty
    /// - `ClassNotResolvable` when the class is not registered
    /// - `UnknownTypeTag` / `InvalidValue` / `TypeMismatch` while applying values
    /// - `Serialization` when a param entry is not a `{name, value, type}` triple
    pub fn from_dict(&self, dict: &Value) -> Result<Box<dyn Parameterized>> {
        let class_path = dict
            .get("class_path")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(ParamPersistError::MissingClassPath)?;

        let params = dict
            .get("params")
            .and_then(Value::as_array)
            .filter(|p| !p.is_empty())
            .ok_or(ParamPersistError::MissingParams)?;

        let triples = params
            .iter()
            .map(|p| serde_json::from_value::<ParamTriple>(p.clone()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.build(class_path, &triples)
    }

    /// Rebuild an object from an already-typed canonical form
    ///
    /// Same validation as [`from_dict`](Self::from_dict).
    pub fn from_form(&self, form: &CanonicalForm) -> Result<Box<dyn Parameterized>> {
        if form.class_path.is_empty() {
            return Err(ParamPersistError::MissingClassPath);
        }
        if form.params.is_empty() {
            return Err(ParamPersistError::MissingParams);
        }
        self.build(&form.class_path, &form.params)
    }

    pub fn from_json(&self, json: &str) -> Result<Box<dyn Parameterized>> {
        let dict: Value = serde_json::from_str(json)?;
        self.from_dict(&dict)
    }

    // Names the target class does not declare are skipped before their tag
    // is looked at, so drifted rows never fail a load.
    fn build(&self, class_path: &str, triples: &[ParamTriple]) -> Result<Box<dyn Parameterized>> {
        let mut object = self.registry.resolve(class_path)?;

        for triple in triples {
            if triple.name == IDENTITY_FIELD || object.field(&triple.name).is_none() {
                tracing::debug!(
                    class_path = %class_path,
                    param_name = %triple.name,
                    "Skipping param not declared on class"
                );
                continue;
            }
            let value = triple.decode()?;
            object.set_param(&triple.name, value)?;
        }

        Ok(object)
    }
}
