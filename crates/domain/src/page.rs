//! Offset/limit pagination shared by list endpoints.

use crate::error::ValidationError;

/// A window over an ordered result set.
///
/// A `limit` of `None` (or `0` on the wire) means "no limit".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: Option<u32>,
}

impl Page {
    /// Parse the raw `offset` / `limit` query values.
    ///
    /// Missing or empty values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPage`] when a value is not a
    /// non-negative integer.
    pub fn parse(offset: Option<&str>, limit: Option<&str>) -> Result<Self, ValidationError> {
        let offset = parse_param("offset", offset)?.unwrap_or(0);
        let limit = parse_param("limit", limit)?.filter(|&n| n > 0);
        Ok(Self { offset, limit })
    }
}

fn parse_param(name: &'static str, value: Option<&str>) -> Result<Option<u32>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ValidationError::InvalidPage {
                name,
                value: raw.to_owned(),
            }),
    }
}
