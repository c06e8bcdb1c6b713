use super::{DuckDbUpserter, PostgresUpserter, UpsertError, Upserter};
use crate::Session;
use std::{collections::HashMap, sync::Arc};

/// Represents a registry of [upserters](Upserter) keyed by dialect.
#[derive(Clone)]
pub struct UpserterFactory {
    upserters: HashMap<String, Arc<dyn Upserter>>,
}

impl UpserterFactory {
    /// Initializes a new, empty [`UpserterFactory`].
    pub fn empty() -> Self {
        Self {
            upserters: HashMap::new(),
        }
    }

    /// Registers an upserter for its dialect.
    ///
    /// # Arguments
    ///
    /// * `upserter` - the [upserter](Upserter) to register
    ///
    /// # Remarks
    ///
    /// An upserter registered for the same dialect as a previous one replaces it.
    pub fn register<U: Upserter + 'static>(&mut self, upserter: U) -> &mut Self {
        self.upserters
            .insert(upserter.dialect().to_ascii_lowercase(), Arc::new(upserter));
        self
    }

    /// Gets the upserter for the specified dialect.
    ///
    /// # Arguments
    ///
    /// * `dialect` - the case-insensitive dialect name
    pub fn for_dialect(&self, dialect: &str) -> Result<Arc<dyn Upserter>, UpsertError> {
        self.upserters
            .get(&dialect.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| UpsertError::UnsupportedDialect(dialect.to_owned()))
    }

    /// Gets the upserter matching the dialect of a session.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to resolve an upserter for
    pub fn get_upserter(&self, session: &dyn Session) -> Result<Arc<dyn Upserter>, UpsertError> {
        self.for_dialect(session.dialect())
    }
}

impl Default for UpserterFactory {
    fn default() -> Self {
        let mut factory = Self::empty();

        factory.register(PostgresUpserter).register(DuckDbUpserter);
        factory
    }
}
