// Resource sections (learning, practice websites, job platforms) render as badges.

const BULLET_PREFIXES: [&str; 3] = ["- ", "* ", "• "];

/// Splits a resource section into display items.
///
/// Bulleted or numbered lines are one item each; any other line is treated as
/// a comma-separated list.
pub fn split_list_items(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(item) = strip_bullet(line) {
            let item = item.trim();
            if !item.is_empty() {
                items.push(item.to_string());
            }
            continue;
        }
        items.extend(
            line.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }
    items
}

fn strip_bullet(line: &str) -> Option<&str> {
    if let Some(rest) = BULLET_PREFIXES.iter().find_map(|p| line.strip_prefix(p)) {
        return Some(rest);
    }
    // "1. item" / "12) item"
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated_line() {
        assert_eq!(
            split_list_items("LinkedIn, Indeed , Wellfound,"),
            vec!["LinkedIn", "Indeed", "Wellfound"]
        );
    }

    #[test]
    fn test_bulleted_lines_keep_commas() {
        assert_eq!(
            split_list_items("- Coursera: SQL, Python\n* edX\n• Udemy"),
            vec!["Coursera: SQL, Python", "edX", "Udemy"]
        );
    }

    #[test]
    fn test_numbered_lines() {
        assert_eq!(
            split_list_items("1. LeetCode\n2) HackerRank\n2024 was a good year"),
            vec!["LeetCode", "HackerRank", "2024 was a good year"]
        );
    }

    #[test]
    fn test_empty_text_has_no_items() {
        assert!(split_list_items("  \n\n").is_empty());
    }
}
