use mongodb::error::{ErrorKind, WriteFailure};

const MONGO_DUPLICATE_KEY: i32 = 11000;

/// True when a PostgreSQL write failed on the given unique constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}

/// True when a MongoDB write was rejected by a unique index.
pub fn is_mongo_duplicate_key(e: &mongodb::error::Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == MONGO_DUPLICATE_KEY,
        ErrorKind::Command(ce) => ce.code == MONGO_DUPLICATE_KEY,
        _ => false,
    }
}
