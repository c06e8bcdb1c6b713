/// Represents the path an upsert took.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpsertPath {
    /// Indicates every row was written by a single statement.
    Bulk,

    /// Indicates the single statement failed and rows were written in batches.
    Batched {
        /// Gets the reason the single statement failed.
        reason: String,

        /// Gets the number of batches written.
        batches: usize,
    },
}

/// Represents the outcome of an upsert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upserted {
    rows: u64,
    estimated: bool,
    path: UpsertPath,
}

impl Upserted {
    pub(crate) fn new(rows: u64, estimated: bool, path: UpsertPath) -> Self {
        Self {
            rows,
            estimated,
            path,
        }
    }

    /// Gets the number of upserted rows.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Gets a value indicating whether the number of rows is an estimate.
    ///
    /// # Remarks
    ///
    /// When the driver reports no affected rows, the number of rows falls back to the number
    /// of rows attempted. Such a count confirms that every row was written without error, but
    /// it may overstate the rows that changed, such as rows skipped by a conflict.
    pub fn estimated(&self) -> bool {
        self.estimated
    }

    /// Gets the [path](UpsertPath) the upsert took.
    pub fn path(&self) -> &UpsertPath {
        &self.path
    }
}
