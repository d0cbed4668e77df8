//! String helpers for task and variant names.

/// Upper-case the first character of `value`, leaving the rest untouched.
///
/// `capitalize("huaweiRelease")` is `"HuaweiRelease"`; an empty string stays empty.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Join names into a comma-separated list for log output.
pub fn to_csv<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
