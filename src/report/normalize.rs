//! Category-name normalization shared by all reports.

/// Bucket name for any missing classification value.
pub const UNKNOWN: &str = "UNKNOWN";

/// Placeholder the validation pipeline emits when it could not classify a failure.
const UNDETERMINED: &str = "undetermined";

/// Component-count checks (`sas_hdd_num`, `dimm_num`, ...) all end with this token.
pub const COMPONENT_COUNT_SUFFIX: &str = "_num";

/// Canonical category for every component-count check.
pub const COMPONENT_COUNT_CATEGORY: &str = "component_count";

/// Categories never broken down into sub-categories.
pub const SUBCATEGORY_DENYLIST: &[&str] = &[UNKNOWN, "BIOS"];

/// Map a raw category name onto its canonical bucket name.
pub fn normalize_category(raw: &str) -> String {
    let name = raw.trim();
    if name.is_empty() || name.eq_ignore_ascii_case(UNDETERMINED) {
        return UNKNOWN.to_string();
    }
    if name.len() > COMPONENT_COUNT_SUFFIX.len() && name.ends_with(COMPONENT_COUNT_SUFFIX) {
        return COMPONENT_COUNT_CATEGORY.to_string();
    }
    name.to_string()
}

/// Whether a (normalized) category takes part in the sub-category tier.
pub fn allows_subcategories(category: &str) -> bool {
    !SUBCATEGORY_DENYLIST
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(category))
}

/// Substitute `default` for an empty or whitespace-only key.
pub fn or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
