//! Vehicle brand entity (manufacturer label).

use serde::Serialize;

use super::CatalogValidationError;
use super::validation::validate_name;

/// Validated write payload for creating or replacing a brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandDraft {
    brand_name: String,
}

impl BrandDraft {
    /// Validate and construct a draft from a raw name.
    pub fn new(brand_name: impl AsRef<str>) -> Result<Self, CatalogValidationError> {
        Ok(Self {
            brand_name: validate_name(brand_name.as_ref(), "brand_name")?,
        })
    }

    pub fn brand_name(&self) -> &str {
        self.brand_name.as_str()
    }
}

/// Persisted brand row as exposed to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brand {
    id: i32,
    brand_name: String,
}

impl Brand {
    /// Construct a brand record from its persisted parts.
    pub fn new(id: i32, brand_name: impl Into<String>) -> Self {
        Self {
            id,
            brand_name: brand_name.into(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn brand_name(&self) -> &str {
        self.brand_name.as_str()
    }
}
