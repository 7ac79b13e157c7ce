// Validate is implemented by request objects that carry required fields. It collects
// every violated constraint instead of stopping at the first one.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<String>>;
}

pub(crate) fn require_not_blank(field: &str, value: Option<&str>, errors: &mut Vec<String>) {
    match value {
        Some(v) if !v.trim().is_empty() => {}
        _ => errors.push(format!("{} must not be empty", field)),
    }
}
