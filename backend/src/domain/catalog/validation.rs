//! Validation helpers shared by catalog draft constructors.

use super::CatalogValidationError;

/// Maximum allowed length for catalog name fields.
pub const NAME_MAX: usize = 100;

pub(super) fn validate_name(
    value: &str,
    field: &'static str,
) -> Result<String, CatalogValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogValidationError::EmptyField { field });
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(CatalogValidationError::FieldTooLong {
            field,
            max: NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Sedan", "Sedan")]
    #[case("  SUV  ", "SUV")]
    fn accepts_and_trims_names(#[case] raw: &str, #[case] expected: &str) {
        let name = validate_name(raw, "segment_name").expect("valid name");
        assert_eq!(name, expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_names(#[case] raw: &str) {
        let err = validate_name(raw, "segment_name").expect_err("blank name must fail");
        assert_eq!(
            err,
            CatalogValidationError::EmptyField {
                field: "segment_name"
            }
        );
    }

    #[test]
    fn rejects_overlong_names() {
        let raw = "x".repeat(NAME_MAX + 1);
        let err = validate_name(&raw, "brand_name").expect_err("overlong name must fail");
        assert_eq!(
            err,
            CatalogValidationError::FieldTooLong {
                field: "brand_name",
                max: NAME_MAX
            }
        );
    }
}
