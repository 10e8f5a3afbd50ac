//! Fixed-width word wrapping for `%description` text.
//!
//! `rpmlint` flags description lines longer than 100 columns.

/// Column width the description is wrapped to.
pub const DESCRIPTION_WIDTH: usize = 100;

/// Wraps `text` so no line is longer than `width` characters.
///
/// Words are kept whole when they fit; a word longer than `width` is split
/// hard. Existing line breaks and blank lines are preserved.
pub fn wrap(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(width) {
                let piece_len = piece.len();
                if line_len > 0 && line_len + 1 + piece_len > width {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                if line_len > 0 {
                    line.push(' ');
                    line_len += 1;
                }
                line.extend(piece);
                line_len += piece_len;
            }
        }

        lines.push(line);
    }

    lines.join("\n")
}
