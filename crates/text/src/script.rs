//! Script and direction detection by Unicode-block counting.
//!
//! This is deliberately a block-count heuristic, not a full UAX #24
//! implementation: the shaper only needs a dominant script to pick a
//! direction and to flag runs that deserve a contextual shaping backend.

/// Writing scripts recognized by the block counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Arabic,
    Hebrew,
    Han,
    Cyrillic,
    Greek,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

fn classify(c: char) -> Script {
    match c as u32 {
        0x0041..=0x007A => Script::Latin,
        0x0370..=0x03FF => Script::Greek,
        0x0400..=0x04FF => Script::Cyrillic,
        0x0590..=0x05FF => Script::Hebrew,
        0x0600..=0x06FF => Script::Arabic,
        0x4E00..=0x9FFF => Script::Han,
        _ => Script::Unknown,
    }
}

const COUNTED: [Script; 6] = [
    Script::Latin,
    Script::Greek,
    Script::Cyrillic,
    Script::Hebrew,
    Script::Arabic,
    Script::Han,
];

/// Returns the dominant script of `text`: the recognized block with the
/// highest codepoint count. Empty input and ties default to Latin.
pub fn detect_script(text: &str) -> Script {
    let mut counts = [0usize; COUNTED.len()];
    for c in text.chars() {
        let script = classify(c);
        if let Some(slot) = COUNTED.iter().position(|&s| s == script) {
            counts[slot] += 1;
        }
    }

    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Script::Latin;
    }
    let mut winners = counts.iter().enumerate().filter(|&(_, &c)| c == max);
    let (first, _) = winners.next().unwrap_or((0, &0));
    if winners.next().is_some() {
        // Ambiguous between blocks
        return Script::Latin;
    }
    COUNTED[first]
}

/// Right-to-left iff Arabic and Hebrew codepoints outnumber Latin-range
/// codepoints.
pub fn detect_direction(text: &str) -> Direction {
    let mut rtl = 0usize;
    let mut latin = 0usize;
    for c in text.chars() {
        match classify(c) {
            Script::Arabic | Script::Hebrew => rtl += 1,
            Script::Latin => latin += 1,
            _ => {}
        }
    }
    if rtl > latin {
        Direction::RightToLeft
    } else {
        Direction::LeftToRight
    }
}

/// True when the text contains codepoints from scripts that need contextual
/// shaping (reordering, joining) beyond per-codepoint placement: Arabic,
/// Hebrew, Thai, Devanagari.
pub fn needs_complex_shaping(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32,
            0x0590..=0x05FF   // Hebrew
            | 0x0600..=0x06FF // Arabic
            | 0x0900..=0x097F // Devanagari
            | 0x0E00..=0x0E7F // Thai
        )
    })
}
