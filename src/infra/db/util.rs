use crate::application::repos::RepoError;

/// Map driver errors onto the repository error vocabulary.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db_err) => match db_err.constraint() {
            Some(constraint) => RepoError::constraint(format!("`{constraint}` violated")),
            None => RepoError::storage(db_err),
        },
        other => RepoError::storage(other),
    }
}
