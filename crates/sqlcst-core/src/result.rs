//! Result type alias for sqlcst operations

use crate::error::SqlcstError;

/// Standard Result type for sqlcst operations
pub type Result<T> = std::result::Result<T, SqlcstError>;
