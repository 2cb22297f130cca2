//! Static symbol tables.
//!
//! Pure, read-only module-level constants: atom classification for spacing
//! and font selection, and the named-operator table with its large-operator
//! flags.

/// Spacing/positioning class of a math atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomClass {
    Ordinary,
    BinaryOperator,
    Relation,
    Open,
    Close,
    Punctuation,
    /// Large operators (∑, ∫, …); their limits center instead of attaching
    /// to the side.
    Operator,
}

const SYMBOL_CLASSES: &[(char, AtomClass)] = &[
    ('+', AtomClass::BinaryOperator),
    ('-', AtomClass::BinaryOperator),
    ('\u{2212}', AtomClass::BinaryOperator), // minus sign
    ('\u{00B1}', AtomClass::BinaryOperator), // plus-minus
    ('*', AtomClass::BinaryOperator),
    ('\u{00D7}', AtomClass::BinaryOperator), // multiplication sign
    ('\u{22C5}', AtomClass::BinaryOperator), // dot operator
    ('/', AtomClass::BinaryOperator),
    ('\u{00F7}', AtomClass::BinaryOperator), // division sign
    ('=', AtomClass::Relation),
    ('<', AtomClass::Relation),
    ('>', AtomClass::Relation),
    ('\u{2264}', AtomClass::Relation), // less-or-equal
    ('\u{2265}', AtomClass::Relation), // greater-or-equal
    ('\u{2260}', AtomClass::Relation), // not equal
    ('\u{2248}', AtomClass::Relation), // almost equal
    ('\u{2261}', AtomClass::Relation), // identical
    ('\u{2192}', AtomClass::Relation), // rightwards arrow
    ('\u{2208}', AtomClass::Relation), // element of
    ('(', AtomClass::Open),
    ('[', AtomClass::Open),
    ('{', AtomClass::Open),
    ('\u{27E8}', AtomClass::Open), // left angle bracket
    (')', AtomClass::Close),
    (']', AtomClass::Close),
    ('}', AtomClass::Close),
    ('\u{27E9}', AtomClass::Close), // right angle bracket
    (',', AtomClass::Punctuation),
    (';', AtomClass::Punctuation),
];

/// Class of a single codepoint; anything unlisted is ordinary.
pub fn classify_char(c: char) -> AtomClass {
    SYMBOL_CLASSES
        .iter()
        .find(|(ch, _)| *ch == c)
        .map(|(_, class)| *class)
        .unwrap_or(AtomClass::Ordinary)
}

/// Class of an atom's text, taken from its first codepoint.
pub fn classify_atom(text: &str) -> AtomClass {
    text.chars().next().map(classify_char).unwrap_or(AtomClass::Ordinary)
}

/// A named operator and its glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorSymbol {
    pub name: &'static str,
    pub codepoint: char,
    /// Large operators center their limits above/below; small ones attach
    /// them as ordinary scripts.
    pub is_large: bool,
}

const OPERATORS: &[OperatorSymbol] = &[
    OperatorSymbol { name: "sum", codepoint: '\u{2211}', is_large: true },
    OperatorSymbol { name: "prod", codepoint: '\u{220F}', is_large: true },
    OperatorSymbol { name: "coprod", codepoint: '\u{2210}', is_large: true },
    OperatorSymbol { name: "int", codepoint: '\u{222B}', is_large: true },
    OperatorSymbol { name: "oint", codepoint: '\u{222E}', is_large: true },
    OperatorSymbol { name: "bigcup", codepoint: '\u{22C3}', is_large: true },
    OperatorSymbol { name: "bigcap", codepoint: '\u{22C2}', is_large: true },
    OperatorSymbol { name: "bigoplus", codepoint: '\u{2A01}', is_large: true },
    OperatorSymbol { name: "bigotimes", codepoint: '\u{2A02}', is_large: true },
    OperatorSymbol { name: "bigvee", codepoint: '\u{22C1}', is_large: true },
    OperatorSymbol { name: "bigwedge", codepoint: '\u{22C0}', is_large: true },
    OperatorSymbol { name: "pm", codepoint: '\u{00B1}', is_large: false },
    OperatorSymbol { name: "times", codepoint: '\u{00D7}', is_large: false },
    OperatorSymbol { name: "cdot", codepoint: '\u{22C5}', is_large: false },
    OperatorSymbol { name: "div", codepoint: '\u{00F7}', is_large: false },
    OperatorSymbol { name: "cup", codepoint: '\u{222A}', is_large: false },
    OperatorSymbol { name: "cap", codepoint: '\u{2229}', is_large: false },
    OperatorSymbol { name: "nabla", codepoint: '\u{2207}', is_large: false },
    OperatorSymbol { name: "partial", codepoint: '\u{2202}', is_large: false },
];

/// Looks up a named operator in the static table.
pub fn resolve_operator(name: &str) -> Option<&'static OperatorSymbol> {
    OPERATORS.iter().find(|op| op.name == name)
}

/// Named accent marks for `Accent` elements.
const ACCENTS: &[(&str, char)] = &[
    ("hat", '\u{0302}'),
    ("tilde", '\u{0303}'),
    ("bar", '\u{0304}'),
    ("vec", '\u{20D7}'),
    ("dot", '\u{0307}'),
    ("ddot", '\u{0308}'),
];

pub fn resolve_accent(name: &str) -> Option<char> {
    ACCENTS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

/// Inter-atom spacing in em units for a pair of adjacent classes.
///
/// A reduced slice of the classic spacing table: thick around relations,
/// medium around binary operators, thin after large operators and
/// punctuation.
pub fn atom_space_em(prev: AtomClass, next: AtomClass) -> f64 {
    const THIN: f64 = 3.0 / 18.0;
    const MEDIUM: f64 = 4.0 / 18.0;
    const THICK: f64 = 5.0 / 18.0;

    use AtomClass::*;
    match (prev, next) {
        (Relation, _) | (_, Relation) => THICK,
        (BinaryOperator, _) | (_, BinaryOperator) => MEDIUM,
        (Operator, _) | (_, Operator) => THIN,
        (Punctuation, _) => THIN,
        (Open, _) | (_, Close) => 0.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(classify_char('+'), AtomClass::BinaryOperator);
        assert_eq!(classify_char('='), AtomClass::Relation);
        assert_eq!(classify_char('('), AtomClass::Open);
        assert_eq!(classify_char(')'), AtomClass::Close);
        assert_eq!(classify_char(','), AtomClass::Punctuation);
        assert_eq!(classify_char('x'), AtomClass::Ordinary);
        assert_eq!(classify_atom("x+y"), AtomClass::Ordinary);
        assert_eq!(classify_atom(""), AtomClass::Ordinary);
    }

    #[test]
    fn test_operator_lookup() {
        let sum = resolve_operator("sum").unwrap();
        assert_eq!(sum.codepoint, '\u{2211}');
        assert!(sum.is_large);

        let times = resolve_operator("times").unwrap();
        assert!(!times.is_large);

        assert!(resolve_operator("frobnicate").is_none());
    }

    #[test]
    fn test_accent_lookup() {
        assert_eq!(resolve_accent("hat"), Some('\u{0302}'));
        assert!(resolve_accent("squiggle").is_none());
    }

    #[test]
    fn test_spacing_pairs() {
        use AtomClass::*;
        assert!(atom_space_em(Ordinary, Relation) > atom_space_em(Ordinary, BinaryOperator));
        assert!(atom_space_em(Ordinary, BinaryOperator) > atom_space_em(Ordinary, Operator));
        assert_eq!(atom_space_em(Ordinary, Ordinary), 0.0);
        assert_eq!(atom_space_em(Open, Ordinary), 0.0);
    }
}
