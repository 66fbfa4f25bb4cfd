//! Escaping for untrusted message text
//!
//! Message text comes from the user and from the server. Before it reaches the
//! terminal every control character is turned into a visible form so that text
//! can't move the cursor, change colors, or rewrite earlier lines.

/// Make `text` safe to draw in a terminal.
///
/// `\n` and `\t` are kept, `\r\n` becomes `\n`. C0 controls and DEL are shown
/// in caret notation (`^[` for ESC), C1 controls and bidi overrides as
/// `\u{..}`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' | '\t' => out.push(c),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\u{0}'..='\u{1f}' => {
                out.push('^');
                out.push(char::from(c as u8 + b'@'));
            }
            '\u{7f}' => out.push_str("^?"),
            c if is_invisible_control(c) => {
                out.push_str(&format!("\\u{{{:x}}}", c as u32));
            }
            _ => out.push(c),
        }
    }

    out
}

fn is_invisible_control(c: char) -> bool {
    matches!(c,
        '\u{80}'..='\u{9f}'
        | '\u{202a}'..='\u{202e}'
        | '\u{2066}'..='\u{2069}'
    )
}
