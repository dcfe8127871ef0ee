use super::Convention;

/// True when `name` starts with an uppercase ASCII letter and has no `-` or `_`.
///
/// Deliberately broad: `Header` (no internal hump) and `API` (all caps) both
/// qualify.
pub fn is_pascal_case(name: &str) -> bool {
    match name.as_bytes().first() {
        Some(first) if first.is_ascii_uppercase() => !name.contains(['-', '_']),
        _ => false,
    }
}

/// True when `name` matches `^[a-z0-9]+(-[a-z0-9]+)*$` and does not start
/// with a digit.
pub fn is_kebab_case(name: &str) -> bool {
    name.as_bytes().first().is_some_and(u8::is_ascii_lowercase)
        && name.split('-').all(|token| {
            !token.is_empty()
                && token
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// Classify `name` into at most one convention.
pub fn classify(name: &str) -> Option<Convention> {
    if is_pascal_case(name) {
        Some(Convention::Pascal)
    } else if is_kebab_case(name) {
        Some(Convention::Kebab)
    } else {
        None
    }
}
