use colored::Colorize;
use std::collections::BTreeMap;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Formatting
// ============================================================================

/// Format tags as `key=value` pairs, sorted by key
pub fn format_tags(tags: &BTreeMap<String, String>) -> String {
    if tags.is_empty() {
        return "-".to_string();
    }
    tags.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a list of names, or "-" when empty
pub fn format_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

/// Pluralize a count: "1 intent", "3 intents"
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tags() {
        let tags = BTreeMap::from([
            ("site".to_string(), "games".to_string()),
            ("env-type".to_string(), "dev".to_string()),
        ]);
        assert_eq!(format_tags(&tags), "env-type=dev, site=games");
        assert_eq!(format_tags(&BTreeMap::new()), "-");
    }

    #[test]
    fn test_format_list() {
        assert_eq!(format_list(["a", "b"]), "a, b");
        assert_eq!(format_list(Vec::<&str>::new()), "-");
    }

    #[test]
    fn test_count() {
        assert_eq!(count(0, "intent"), "0 intents");
        assert_eq!(count(1, "intent"), "1 intent");
        assert_eq!(count(12, "intent"), "12 intents");
    }
}
