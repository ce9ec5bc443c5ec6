//! Named-placeholder template rendering.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::utilities::errors::UnresolvedPlaceholderError;

/// `{name}` or `{name:default}`, where the default starts right after the
/// colon. Anything else in braces (JSON, `{key: value}` prose) is left
/// untouched.
static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)(?::([^{}\s][^{}]*))?\}").unwrap());

/// Interpolate placeholders in `template` with values from `inputs`.
///
/// Substitution is single-pass: a value that itself contains `{...}` is
/// inserted verbatim.
///
/// # Errors
/// Returns `UnresolvedPlaceholderError` for the first placeholder with no
/// matching input and no inline default.
pub fn interpolate(
    template: &str,
    inputs: &HashMap<String, String>,
) -> Result<String, UnresolvedPlaceholderError> {
    if !template.contains('{') {
        return Ok(template.to_string());
    }

    if let Some(missing) = PLACEHOLDER_PATTERN
        .captures_iter(template)
        .find(|cap| cap.get(2).is_none() && !inputs.contains_key(&cap[1]))
    {
        return Err(UnresolvedPlaceholderError::new(&missing[1]));
    }

    let rendered = PLACEHOLDER_PATTERN.replace_all(template, |cap: &Captures| {
        match inputs.get(&cap[1]) {
            Some(value) => value.clone(),
            None => cap
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        }
    });
    Ok(rendered.into_owned())
}
