use chrono::NaiveDate;

/// `2024-03-05` -> `March 5, 2024`. Anything else yields `None` so the
/// caller can simply leave the date out.
pub fn format_date(value: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    Some(date.format("%B %-d, %Y").to_string())
}

/// `conflicts_of_interest` -> `Conflicts Of Interest`.
pub fn format_topic(topic: &str) -> String {
    topic
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_statute(statute: &str) -> String {
    format!("§{statute}")
}

/// Thousands separators, en-US style.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            output.push(',');
        }
        output.push(ch);
    }
    output
}

/// Splits body text on blank lines; line breaks inside a paragraph become
/// spaces.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut output = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                output.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        output.push(current.join(" "));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_render_long_form() {
        assert_eq!(format_date("2024-03-05").as_deref(), Some("March 5, 2024"));
        assert_eq!(format_date("1975-12-31").as_deref(), Some("December 31, 1975"));
        assert_eq!(format_date("unknown"), None);
        assert_eq!(format_date(""), None);
    }

    #[test]
    fn topics_are_title_cased() {
        assert_eq!(format_topic("conflicts_of_interest"), "Conflicts Of Interest");
        assert_eq!(format_topic("gifts"), "Gifts");
    }

    #[test]
    fn counts_group_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(14100), "14,100");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn paragraphs_fold_single_newlines() {
        let text = "First line\ncontinues here.\n\n\nSecond paragraph.\n";
        assert_eq!(
            paragraphs(text),
            vec!["First line continues here.".to_string(), "Second paragraph.".to_string()]
        );
        assert!(paragraphs("\n\n").is_empty());
    }

    #[test]
    fn statutes_get_section_sign() {
        assert_eq!(format_statute("87100"), "§87100");
    }
}
