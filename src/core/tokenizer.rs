/// Characters that open a region in which commas do not separate arguments
const OPENERS: [char; 5] = ['"', '\'', '<', '(', '{'];

/// Closing counterpart of each entry in `OPENERS`
const CLOSERS: [char; 5] = ['"', '\'', '>', ')', '}'];

/// Split an argument list on top-level commas.
///
/// Commas inside quotes or `<>`, `()`, `{}` pairs are kept, as is anything
/// following a backslash. Regions do not nest: once inside, only the closer
/// of the first opener ends the region. Fragments are trimmed; empty input
/// yields no fragments.
pub fn split_top_level(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();

    if text.trim().is_empty() {
        return fragments;
    }

    let mut current = String::new();
    let mut closer: Option<char> = None;
    let mut next_is_literal = false;

    for ch in text.chars() {
        if next_is_literal {
            current.push(ch);
            next_is_literal = false;
        } else if ch == '\\' {
            current.push(ch);
            next_is_literal = true;
        } else if let Some(expected) = closer {
            current.push(ch);
            if ch == expected {
                closer = None;
            }
        } else if ch == ',' {
            fragments.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
            if let Some(pos) = OPENERS.iter().position(|&open| open == ch) {
                closer = Some(CLOSERS[pos]);
            }
        }
    }

    fragments.push(current.trim().to_string());
    fragments
}
