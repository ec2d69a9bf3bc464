//! Shared configuration validation helpers.
//!
//! CDN provider credentials come in groups that only make sense together
//! (an API key without its zone id is useless). The rule for every provider
//! is the same: either every field in the group is populated, or none is.

use crate::error::CoreError;

/// Outcome of checking an all-or-none field group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Every field in the group is populated.
    Complete,
    /// No field in the group is populated; the feature is simply off.
    Empty,
}

/// Validate that the named fields are populated all together or not at all.
///
/// `fields` pairs each field name with whether it holds a value. Returns
/// `FieldGroup::Empty` when the whole group is blank (a valid "not
/// configured" state) and a `CoreError::Validation` naming the missing
/// fields when the group is only partially filled in.
pub fn require_all_or_none(fields: &[(&str, bool)]) -> Result<FieldGroup, CoreError> {
    let populated = fields.iter().filter(|(_, set)| *set).count();
    if populated == 0 {
        return Ok(FieldGroup::Empty);
    }
    if populated == fields.len() {
        return Ok(FieldGroup::Complete);
    }

    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, set)| !set)
        .map(|(name, _)| *name)
        .collect();
    Err(CoreError::Validation(format!(
        "Fields must be provided together or not at all; missing: {}",
        missing.join(", ")
    )))
}
