use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        self.has_sqlstate(UNIQUE_VIOLATION)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.has_sqlstate(FOREIGN_KEY_VIOLATION)
    }

    /// Wraps an insert failure, turning a dangling reference into a
    /// `ConstraintViolation` that names the offending column.
    pub fn from_insert(err: sqlx::Error, column: &str) -> Self {
        let err = Self::from(err);
        if err.is_foreign_key_violation() {
            Self::ConstraintViolation(format!("{column} references a missing row"))
        } else {
            err
        }
    }

    fn has_sqlstate(&self, code: &str) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::Database(e)) if e.code().as_deref() == Some(code)
        )
    }
}
