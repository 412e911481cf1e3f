use crate::errors::Result;
use parampersist_core::Parameterized;

/// Storage-agnostic persistence operations
///
/// Instances are addressed by the opaque id returned from [`save`](Self::save).
pub trait PersistenceAgent {
    /// Persist a new instance and return its id
    ///
    /// # Errors
    ///
    /// `Serialization` if a value cannot be encoded, `Persistence` on a
    /// storage failure. Nothing is written on error.
    fn save(&self, instance: &dyn Parameterized) -> Result<String>;

    /// Rebuild the instance stored under `instance_id`
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id or an unresolvable class path,
    /// `InvalidInput` when the instance has no params, decode errors for
    /// stored values that no longer fit their field.
    fn load(&self, instance_id: &str) -> Result<Box<dyn Parameterized>>;

    /// Remove an instance and all of its params
    ///
    /// An unknown id is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// `Persistence` on a storage failure.
    fn delete(&self, instance_id: &str) -> Result<()>;

    /// Overwrite a stored instance with the current state of `instance`
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; nothing is written in that case.
    fn update(&self, instance: &dyn Parameterized, instance_id: &str) -> Result<String>;
}
