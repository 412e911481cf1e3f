//! SQLite-backed persistence agent
//!
//! Each operation:
//! - logs `start` and exactly one of `end` / `end_error`
//! - runs in a single transaction, rolled back on any error
//! - returns `ExError` tagged with the request id of the call

#![allow(clippy::result_large_err)]

use crate::agent::PersistenceAgent;
use crate::config::{AgentConfig, UpdateConfig};
use crate::db::Database;
use crate::errors::Result;
use crate::repo::{InstanceRow, ParamRow, SqliteRepo};
use parampersist_core::{
    log_op_end, log_op_error, log_op_start, CanonicalForm, ClassRegistry, ExError,
    ParamPersistError, ParamTriple, Parameterized, ParameterizedClass, Serializer,
};
use parampersist_core_types::RequestId;
use std::sync::Arc;
use std::time::Instant;

pub struct SqliteAgent<'r> {
    db: Arc<Database>,
    serializer: Serializer<'r>,
    update: UpdateConfig,
}

impl SqliteAgent<'static> {
    /// Agent resolving classes through the global registry
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_registry(db, ClassRegistry::global())
    }

    /// Open the configured database and build an agent over it
    ///
    /// # Errors
    ///
    /// `Persistence` if the database cannot be opened or migrated.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let db = Arc::new(Database::open(&config.database)?);
        Ok(Self::new(db).with_update_config(config.update))
    }
}

impl<'r> SqliteAgent<'r> {
    pub fn with_registry(db: Arc<Database>, registry: &'r ClassRegistry) -> Self {
        Self {
            db,
            serializer: Serializer::new(registry),
            update: UpdateConfig::default(),
        }
    }

    pub fn with_update_config(mut self, update: UpdateConfig) -> Self {
        self.update = update;
        self
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Load an instance as a concrete type
    ///
    /// # Errors
    ///
    /// Everything [`load`](PersistenceAgent::load) can return, plus
    /// `TypeMismatch` when the stored class is not `T`.
    pub fn load_as<T: ParameterizedClass>(&self, instance_id: &str) -> Result<T> {
        let object = self.load(instance_id)?;
        let found = object.class_path();
        object.into_concrete::<T>().map(|boxed| *boxed).ok_or_else(|| {
            ExError::from(ParamPersistError::ClassMismatch {
                expected: T::qualified_name(),
                found,
            })
            .with_op("load_as")
        })
    }

    /// Number of stored instances
    pub fn instance_count(&self) -> Result<usize> {
        self.db
            .with_connection("instance_count", SqliteRepo::count_instances)
    }

    /// Number of param rows stored for one instance
    pub fn param_count(&self, instance_id: &str) -> Result<usize> {
        self.db.with_connection("param_count", |conn| {
            SqliteRepo::count_params_for_instance(conn, instance_id)
        })
    }

    fn instrumented<T, F>(&self, op: &'static str, instance_id: &str, body: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let request_id = RequestId::new();
        log_op_start!(op, request_id = %request_id, instance_id = instance_id);
        let start = Instant::now();

        let result = body().map_err(|e| {
            log_op_error!(
                op,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                instance_id = instance_id
            );
            e.with_request_id(request_id.clone())
        })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            instance_id = instance_id
        );

        Ok(result)
    }

    fn save_impl(&self, instance: &dyn Parameterized) -> Result<(String, usize)> {
        let form = self.serializer.to_dict(instance)?;

        self.db.transaction("save", |tx| {
            let row = InstanceRow::new(form.class_path.as_str());
            SqliteRepo::insert_instance(tx, &row)?;
            for triple in &form.params {
                SqliteRepo::insert_param(tx, &ParamRow::encode(&row.id, triple)?)?;
            }
            Ok((row.id, form.params.len()))
        })
    }

    fn load_impl(&self, instance_id: &str) -> Result<Box<dyn Parameterized>> {
        let form = self.db.transaction("load", |tx| {
            let instance = SqliteRepo::get_instance(tx, instance_id)?
                .ok_or_else(|| not_found("load", instance_id))?;

            let params = SqliteRepo::params_for_instance(tx, instance_id)?
                .iter()
                .map(ParamRow::decode)
                .collect::<Result<Vec<_>>>()?;

            Ok(CanonicalForm {
                class_path: instance.class_path,
                params,
            })
        })?;

        Ok(self.serializer.from_form(&form)?)
    }

    fn delete_impl(&self, instance_id: &str) -> Result<()> {
        self.db.transaction("delete", |tx| {
            if !SqliteRepo::delete_instance(tx, instance_id)? {
                tracing::warn!(instance_id, "unable to find instance with given id");
            }
            Ok(())
        })
    }

    fn update_impl(&self, instance: &dyn Parameterized, instance_id: &str) -> Result<String> {
        self.db.transaction("update", |tx| {
            if SqliteRepo::get_instance(tx, instance_id)?.is_none() {
                return Err(not_found("update", instance_id));
            }
            let form = self.serializer.to_dict(instance)?;
            SqliteRepo::update_instance_class_path(tx, instance_id, &form.class_path)?;

            // Each stored row takes at most one pending triple; rows left
            // without one are removed.
            let mut pending: Vec<&ParamTriple> = form.params.iter().collect();
            for row in SqliteRepo::params_for_instance(tx, instance_id)? {
                let stored = row.decode()?;
                match pending.iter().position(|t| t.name == stored.name) {
                    Some(index) => {
                        let triple = pending.remove(index);
                        SqliteRepo::update_param_value(tx, &row.id, &triple.to_json()?)?;
                    }
                    None => {
                        tracing::debug!(instance_id, param_id = %row.id, "Removing stale param row");
                        SqliteRepo::delete_param(tx, &row.id)?;
                    }
                }
            }

            for triple in pending {
                tracing::warn!(
                    instance_id,
                    param_name = %triple.name,
                    inserted = self.update.insert_new_params,
                    "Field has no stored param row"
                );
                if self.update.insert_new_params {
                    SqliteRepo::insert_param(tx, &ParamRow::encode(instance_id, triple)?)?;
                }
            }

            Ok(instance_id.to_string())
        })
    }
}

impl PersistenceAgent for SqliteAgent<'_> {
    fn save(&self, instance: &dyn Parameterized) -> Result<String> {
        let request_id = RequestId::new();
        let class_path = instance.class_path();
        log_op_start!("save", request_id = %request_id, class_path = %class_path);
        let start = Instant::now();

        let (instance_id, param_count) = self.save_impl(instance).map_err(|e| {
            log_op_error!(
                "save",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %request_id,
                class_path = %class_path
            );
            e.with_request_id(request_id.clone())
        })?;

        log_op_end!(
            "save",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %request_id,
            instance_id = instance_id.as_str(),
            param_count = param_count as u64
        );

        Ok(instance_id)
    }

    fn load(&self, instance_id: &str) -> Result<Box<dyn Parameterized>> {
        self.instrumented("load", instance_id, || self.load_impl(instance_id))
    }

    fn delete(&self, instance_id: &str) -> Result<()> {
        self.instrumented("delete", instance_id, || self.delete_impl(instance_id))
    }

    fn update(&self, instance: &dyn Parameterized, instance_id: &str) -> Result<String> {
        self.instrumented("update", instance_id, || {
            self.update_impl(instance, instance_id)
        })
    }
}

fn not_found(op: &str, instance_id: &str) -> ExError {
    ExError::from(ParamPersistError::InstanceNotFound {
        instance_id: instance_id.to_string(),
    })
    .with_op(op.to_string())
}
