//! Name filters for topics and consumer groups

use crate::error::{ApiError, Result};
use regex::Regex;

/// Inclusion filter over topic or consumer group names
///
/// A filter without a pattern accepts every name. A pattern accepts a name
/// when it matches at the start of it; the match does not need to span the
/// whole name, so `orders` accepts `orders-eu` as well.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    pattern: Option<Regex>,
}

impl NameFilter {
    /// Filter that accepts everything
    pub fn any() -> Self {
        Self::default()
    }

    /// Builds a filter from an optional pattern
    ///
    /// An empty pattern is treated the same as no pattern.
    ///
    /// # Returns
    /// * `Err(ApiError::InvalidFilter)` - If the pattern does not compile
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let pattern = match pattern {
            Some(p) if !p.is_empty() => p,
            _ => return Ok(Self::any()),
        };

        let anchored = format!("^(?:{})", pattern);
        let regex = Regex::new(&anchored).map_err(|source| ApiError::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: Some(regex),
        })
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// Checks a name against the filter
    ///
    /// Absent or empty names never pass an active filter.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(regex) = &self.pattern else {
            return true;
        };
        match value {
            Some(name) if !name.is_empty() => regex.is_match(name),
            _ => false,
        }
    }
}
