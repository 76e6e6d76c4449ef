//! Presentation helpers shared by every front end.

use crate::models::ServerTimestamp;
use crate::validation::{name_length, BRAND_NAME_MAX_LEN};

/// Renders a server timestamp as `dd Mon yyyy` (e.g. `05 Mar 2024`).
///
/// Unparseable values are shown as received and missing ones as `-`.
pub fn format_display_date(timestamp: Option<&ServerTimestamp>) -> String {
    match timestamp {
        None => "-".to_string(),
        Some(ts) => match ts.parse() {
            Some(parsed) => parsed.format("%d %b %Y").to_string(),
            None => ts.as_str().to_string(),
        },
    }
}

pub fn status_label(is_active: bool) -> &'static str {
    if is_active {
        "Active"
    } else {
        "Inactive"
    }
}

/// `1 brand shown`, `3 brands shown`.
pub fn shown_count_label(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{} brand{} shown", count, plural)
}

/// Character counter under the name input, e.g. `12/50`.
pub fn name_counter(name: &str) -> String {
    format!("{}/{}", name_length(name), BRAND_NAME_MAX_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_render_in_short_month_format() {
        let ts = ServerTimestamp::new("2024-03-05T10:15:30");
        assert_eq!(format_display_date(Some(&ts)), "05 Mar 2024");
        assert_eq!(format_display_date(None), "-");
        assert_eq!(
            format_display_date(Some(&ServerTimestamp::new("soon"))),
            "soon"
        );
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(shown_count_label(0), "0 brands shown");
        assert_eq!(shown_count_label(1), "1 brand shown");
        assert_eq!(shown_count_label(2), "2 brands shown");
    }

    #[test]
    fn counter_counts_untrimmed_characters() {
        assert_eq!(name_counter("  ab"), "4/50");
        assert_eq!(name_counter("😀é"), "3/50");
        assert_eq!(status_label(false), "Inactive");
    }
}
