//! Section extraction: find every `[Title] { ... }` block in a script and
//! check that they form the `GAME` → flat children tree the engine emits.

use crate::error::ScriptError;

/// One matched `{ }` pair and the title tag in front of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPair {
    /// Byte offset of `{`.
    pub opening: usize,
    /// Byte offset of the matching `}`.
    pub closing: usize,
    pub title: String,
}

impl BracketPair {
    /// Strict containment: `other` lies entirely inside this pair's braces.
    pub fn contains(&self, other: &BracketPair) -> bool {
        self.opening < other.opening && self.closing > other.closing
    }

    pub fn is_game(&self) -> bool {
        self.title.eq_ignore_ascii_case("game")
    }
}

/// Scan `text` left to right, pairing each `}` with the innermost open `{`.
///
/// Pairs come back in order of their closing brace, so a nested section
/// always precedes the section containing it.
pub fn find_bracket_pairs(text: &str) -> Result<Vec<BracketPair>, ScriptError> {
    let mut openings: Vec<usize> = Vec::new();
    let mut pairs = Vec::new();

    for (pos, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => openings.push(pos),
            b'}' => {
                let opening = openings
                    .pop()
                    .ok_or_else(|| ScriptError::expected('{', pos))?;
                pairs.push(BracketPair {
                    opening,
                    closing: pos,
                    title: section_title(text, opening)?,
                });
            }
            _ => {}
        }
    }

    if let Some(&unclosed) = openings.last() {
        return Err(ScriptError::expected('}', unclosed));
    }
    Ok(pairs)
}

/// Recover the `[Title]` tag for the brace at `opening` by scanning backward.
///
/// Stricter than taking the nearest tag regardless of what follows it: only
/// whitespace may sit between the `]` and the brace, otherwise the result is
/// [`ScriptError::UnexpectedCharacter`]. A stray token such as `[A]x{` is
/// rejected rather than silently titled `A`.
fn section_title(text: &str, opening: usize) -> Result<String, ScriptError> {
    let before = &text[..opening];
    let close = before
        .rfind(']')
        .ok_or_else(|| ScriptError::expected(']', opening))?;
    let open = before[..close]
        .rfind('[')
        .ok_or_else(|| ScriptError::expected('[', close))?;

    // Only whitespace may separate the tag from its body; anything else means
    // the nearest tag belongs to some other section.
    let gap = &before[close + 1..];
    if let Some((offset, character)) = gap.char_indices().find(|(_, c)| !c.is_whitespace()) {
        return Err(ScriptError::UnexpectedCharacter {
            character,
            position: close + 1 + offset,
        });
    }

    let title = before[open + 1..close].trim();
    if title.is_empty() {
        return Err(ScriptError::format(format!(
            "empty section title before byte {}",
            opening
        )));
    }
    Ok(title.to_owned())
}

/// Enforce the two-level hierarchy: the `GAME` section contains every other
/// section, and no other section contains anything.
pub fn check_hierarchy(pairs: &[BracketPair]) -> Result<(), ScriptError> {
    for (i, pair) in pairs.iter().enumerate() {
        let mut others = pairs
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, other)| other);
        if pair.is_game() {
            if let Some(outside) = others.find(|other| !pair.contains(other)) {
                return Err(ScriptError::format(format!(
                    "game section does not contain section titled \"{}\"",
                    outside.title
                )));
            }
        } else if let Some(inner) = others.find(|other| pair.contains(other)) {
            return Err(ScriptError::format(format!(
                "section titled \"{}\" should not contain any other sections, found \"{}\"",
                pair.title, inner.title
            )));
        }
    }
    Ok(())
}
