//! Vehicle segment entity (e.g. Sedan, SUV).

use serde::Serialize;

use super::CatalogValidationError;
use super::validation::validate_name;

/// Validated write payload for creating or replacing a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDraft {
    segment_name: String,
}

impl SegmentDraft {
    /// Validate and construct a draft from a raw name.
    pub fn new(segment_name: impl AsRef<str>) -> Result<Self, CatalogValidationError> {
        Ok(Self {
            segment_name: validate_name(segment_name.as_ref(), "segment_name")?,
        })
    }

    pub fn segment_name(&self) -> &str {
        self.segment_name.as_str()
    }
}

/// Persisted segment row as exposed to API clients.
///
/// The name is validated at draft construction; rows read back from storage
/// are trusted to satisfy the same constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    id: i32,
    segment_name: String,
}

impl Segment {
    /// Construct a segment record from its persisted parts.
    pub fn new(id: i32, segment_name: impl Into<String>) -> Self {
        Self {
            id,
            segment_name: segment_name.into(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn segment_name(&self) -> &str {
        self.segment_name.as_str()
    }
}
