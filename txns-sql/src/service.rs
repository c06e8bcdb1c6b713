use crate::{
    repository::{RepositoryError, SqlRepository},
    Session, Upserted,
};
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};
use txns::{Frame, Model, ModelError, OnConflict, Validate, ValidationError, Value};

/// Represents the default fraction of rows that may be missing from an upsert.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Represents the possible service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Indicates a tolerance outside of the range [0, 0.5].
    #[error("the tolerance must be between 0 and 0.5, but was {0}")]
    InvalidTolerance(f64),

    /// Indicates a model of another table was passed to the service.
    #[error("the model of table '{actual}' differs from the expected table '{expected}'")]
    UnexpectedModel {
        /// Gets the table of the service.
        expected: String,

        /// Gets the table of the model.
        actual: &'static str,
    },

    /// Indicates a model failed validation.
    #[error("record {index} is invalid: {source}")]
    Invalid {
        /// Gets the zero-based index of the invalid model.
        index: usize,

        /// Gets the [validation error](ValidationError).
        #[source]
        source: ValidationError,
    },

    /// Indicates fewer rows were upserted than the tolerance allows.
    #[error("only {upserted} of {expected} records were upserted, exceeding the tolerance of {:.2}%", .tolerance * 100.0)]
    MissingUpsertions {
        /// Gets the number of rows to upsert.
        expected: usize,

        /// Gets the number of upserted rows.
        upserted: u64,

        /// Gets the allowed fraction of missing rows.
        tolerance: f64,
    },

    /// Indicates a stored row could not be read into a [model](Model).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Indicates a [repository error](RepositoryError).
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Represents a bookkeeping service over a [repository](SqlRepository).
#[derive(Clone)]
pub struct SqlService {
    repository: SqlRepository,
    tolerance: f64,
    on_conflict: OnConflict,
}

impl SqlService {
    /// Creates and returns a new [`SqlServiceBuilder`].
    ///
    /// # Arguments
    ///
    /// * `repository` - the [repository](SqlRepository) used by the service
    pub fn builder(repository: SqlRepository) -> SqlServiceBuilder {
        SqlServiceBuilder {
            repository,
            tolerance: DEFAULT_TOLERANCE,
            on_conflict: OnConflict::default(),
        }
    }

    /// Gets the underlying [repository](SqlRepository).
    pub fn repository(&self) -> &SqlRepository {
        &self.repository
    }

    /// Gets the fraction of rows that may be missing from an upsert.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Gets the default [conflict policy](OnConflict).
    pub fn on_conflict(&self) -> OnConflict {
        self.on_conflict
    }

    fn expect<M: Model>(&self) -> Result<(), ServiceError> {
        let expected = self.repository.table().name();

        if M::TABLE == expected {
            Ok(())
        } else {
            Err(ServiceError::UnexpectedModel {
                expected: expected.to_owned(),
                actual: M::TABLE,
            })
        }
    }

    fn check(&self, expected: usize, upserted: &Upserted) -> Result<(), ServiceError> {
        let minimum = expected as f64 * (1.0 - self.tolerance);

        if (upserted.rows() as f64) < minimum {
            error!(
                table = self.repository.table().name(),
                expected,
                upserted = upserted.rows(),
                "records are missing after upsert"
            );

            Err(ServiceError::MissingUpsertions {
                expected,
                upserted: upserted.rows(),
                tolerance: self.tolerance,
            })
        } else {
            Ok(())
        }
    }

    /// Validates and upserts models.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `models` - the [models](Model) to upsert
    ///
    /// # Remarks
    ///
    /// The upsert fails when fewer rows than the tolerance allows are reported as upserted.
    pub async fn upsert_records<M>(
        &self,
        session: &mut dyn Session,
        models: &[M],
    ) -> Result<Upserted, ServiceError>
    where
        M: Model + Validate + Sync,
    {
        self.expect::<M>()?;

        for (index, model) in models.iter().enumerate() {
            model
                .validate()
                .map_err(|source| ServiceError::Invalid { index, source })?;
        }

        let frame = Frame::from_models(models);

        self.upsert_frame(session, &frame).await
    }

    /// Upserts the rows of a frame without validation.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `frame` - the [frame](Frame) holding the rows
    pub async fn upsert_frame(
        &self,
        session: &mut dyn Session,
        frame: &Frame,
    ) -> Result<Upserted, ServiceError> {
        let upserted = self
            .repository
            .upsert_records(session, frame, self.on_conflict)
            .await?;

        self.check(frame.len(), &upserted)?;
        info!(
            table = self.repository.table().name(),
            rows = upserted.rows(),
            "upserted records"
        );

        Ok(upserted)
    }

    /// Validates and creates or replaces a single model.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `model` - the [model](Model) to create
    pub async fn create<M>(&self, session: &mut dyn Session, model: &M) -> Result<Upserted, ServiceError>
    where
        M: Model + Validate + Sync,
    {
        self.expect::<M>()?;
        model
            .validate()
            .map_err(|source| ServiceError::Invalid { index: 0, source })?;

        Ok(self.repository.upsert_record(session, model).await?)
    }

    /// Gets the model with the specified primary key, if any.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to read with
    /// * `id` - the primary key [value](Value)
    pub async fn get<M: Model>(
        &self,
        session: &mut dyn Session,
        id: Value,
    ) -> Result<Option<M>, ServiceError> {
        self.expect::<M>()?;

        match self.repository.get_record_by_id(session, id).await? {
            Some(values) => Ok(Some(M::from_values(values)?)),
            None => Ok(None),
        }
    }

    /// Gets the models matching every filter.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to read with
    /// * `filters` - the column and [value](Value) pairs a row must equal
    pub async fn get_records<M: Model>(
        &self,
        session: &mut dyn Session,
        filters: &[(&str, Value)],
    ) -> Result<Vec<M>, ServiceError> {
        self.expect::<M>()?;

        let frame = self.repository.get_records(session, filters).await?;
        let mut models = Vec::with_capacity(frame.len());

        for row in frame.rows() {
            models.push(M::from_values(row.values().to_vec())?);
        }

        Ok(models)
    }

    /// Gets the stored model with the primary key of a model or creates it.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to read and write with
    /// * `model` - the [model](Model) to look up or create
    ///
    /// # Remarks
    ///
    /// The stored model is returned unchanged when it exists; otherwise, the specified model is
    /// validated, created, and returned.
    pub async fn get_or_create<M>(&self, session: &mut dyn Session, model: &M) -> Result<M, ServiceError>
    where
        M: Model + Validate + Clone + Sync,
    {
        self.expect::<M>()?;

        let keys = M::schema().primary_key();
        let filters: Vec<_> = keys
            .iter()
            .map(String::as_str)
            .zip(model.key_values())
            .collect();

        if let Some(stored) = self
            .get_records::<M>(session, &filters)
            .await?
            .into_iter()
            .next()
        {
            return Ok(stored);
        }

        self.create(session, model).await?;
        info!(table = M::TABLE, "created missing record");

        Ok(model.clone())
    }

    /// Deletes rows by primary key.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `ids` - the primary key values of the rows to delete
    /// * `hard` - indicates whether rows are removed rather than marked as deleted
    pub async fn delete(
        &self,
        session: &mut dyn Session,
        ids: &[Value],
        hard: bool,
    ) -> Result<u64, ServiceError> {
        let deleted = if hard {
            self.repository.hard_delete(session, ids).await?
        } else {
            let now = Utc::now().naive_utc();
            self.repository.soft_delete(session, ids, now).await?
        };

        Ok(deleted)
    }
}

/// Represents a [service](SqlService) builder.
pub struct SqlServiceBuilder {
    repository: SqlRepository,
    tolerance: f64,
    on_conflict: OnConflict,
}

impl SqlServiceBuilder {
    /// Configures the fraction of rows that may be missing from an upsert.
    ///
    /// # Arguments
    ///
    /// * `value` - the tolerance between 0 and 0.5
    pub fn tolerance(mut self, value: f64) -> Self {
        self.tolerance = value;
        self
    }

    /// Configures the default conflict policy.
    ///
    /// # Arguments
    ///
    /// * `value` - the [conflict policy](OnConflict)
    pub fn on_conflict(mut self, value: OnConflict) -> Self {
        self.on_conflict = value;
        self
    }

    /// Builds and returns a new [service](SqlService).
    pub fn build(self) -> Result<SqlService, ServiceError> {
        if !(0.0..=0.5).contains(&self.tolerance) {
            return Err(ServiceError::InvalidTolerance(self.tolerance));
        }

        Ok(SqlService {
            repository: self.repository,
            tolerance: self.tolerance,
            on_conflict: self.on_conflict,
        })
    }
}
