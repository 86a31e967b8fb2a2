//! OCR text normalization applied before any field search.

/// Normalize raw OCR text for pattern matching.
///
/// Line structure is preserved: the output has exactly as many lines as
/// the input, in the same order. Within a line, whitespace runs collapse to
/// one ASCII space and the ends are trimmed. Arabic-Indic digits and the
/// Arabic decimal/thousands separators are folded to their ASCII forms.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    unified
        .split('\n')
        .map(normalize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split text into trimmed lines.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim)
}

fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;

    for c in line.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(fold_char(c));
    }

    out
}

fn fold_char(c: char) -> char {
    match c {
        // Arabic-Indic digits
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        // Extended Arabic-Indic (Persian/Urdu) digits
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        '\u{066B}' => '.',
        '\u{066C}' => ',',
        _ => c,
    }
}
