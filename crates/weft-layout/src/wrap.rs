#![forbid(unsafe_code)]

//! Greedy text wrapping.

/// Wrap text to fit within `max_width` columns.
///
/// Paragraphs are split on `\n`. Leading whitespace of each paragraph is
/// preserved as indentation on every line it wraps to. Words are packed
/// greedily: the next word joins the current line when
/// `current + 1 + word <= max_width`, measured in runes. A word longer than
/// the width is placed unbroken on its own line.
///
/// Empty paragraphs produce one line holding just their indentation. A
/// width of zero produces no lines at all.
pub fn wrap(s: &str, max_width: u16) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }
    let max_width = max_width as usize;

    let mut lines = Vec::new();
    for paragraph in s.split('\n') {
        let trimmed = paragraph.trim_start_matches([' ', '\t']);
        let leading = &paragraph[..paragraph.len() - trimmed.len()];
        let leading_len = leading.chars().count();

        let mut words = trimmed.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(leading.to_string());
            continue;
        };

        let mut line = format!("{leading}{first}");
        let mut line_len = line.chars().count();
        for word in words {
            let word_len = word.chars().count();
            if line_len + 1 + word_len <= max_width {
                line.push(' ');
                line.push_str(word);
                line_len += 1 + word_len;
            } else {
                lines.push(line);
                line = format!("{leading}{word}");
                line_len = leading_len + word_len;
            }
        }
        lines.push(line);
    }
    lines
}
