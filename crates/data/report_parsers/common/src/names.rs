/// Canonical form of a product name: every whitespace character removed, lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Drops the trailing `, <unit>` part of a name cell ("Болт М10, шт" -> "Болт М10").
pub fn strip_unit_suffix(name: &str) -> &str {
    match name.rfind(',') {
        Some(pos) => &name[..pos],
        None => name,
    }
}
