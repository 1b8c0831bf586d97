//! Shared output formatting for query commands.

use color_eyre::eyre::Result;
use serde::Serialize;

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one line per item, then a count footer.
pub fn print_list<S: AsRef<str>>(items: &[S], noun: &str) {
    if items.is_empty() {
        println!("(no {noun} found)");
        return;
    }
    for item in items {
        println!("{}", item.as_ref());
    }
    println!();
    println!("-- {} {} --", items.len(), noun);
}

/// Width for a column holding these values, clamped to `[min, max]`.
pub fn column_width<'a>(values: impl Iterator<Item = &'a str>, min: usize, max: usize) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(min).clamp(min, max)
}

/// Truncate string with ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer name", 8), "a lon...");
        assert_eq!(truncate("ünïcödé", 5), "ün...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_column_width() {
        assert_eq!(column_width(["ab", "abcdef"].into_iter(), 4, 5), 5);
        assert_eq!(column_width(std::iter::empty(), 4, 40), 4);
    }
}
