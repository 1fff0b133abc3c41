use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Pagination {
    /// Row offset for the requested page. Pages are 1-based; a non-positive
    /// page or size is a validation error, not a malformed query for the
    /// database to reject.
    pub fn offset(&self) -> Result<i64, Error> {
        if self.page < 1 || self.size < 1 {
            return Err(Error::Validation("page and size must be positive".into()));
        }
        Ok((self.page - 1) * self.size)
    }
}
