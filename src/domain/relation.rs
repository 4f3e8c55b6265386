//! Containment relation between two concept texts.
//!
//! A concept is a sub-concept of another when its case-folded text is a proper
//! substring of the other's case-folded text. Nothing more is implied.

use std::fmt;

/// Outcome of classifying concept `a` against concept `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `b` is contained in `a`
    Super,
    /// `a` is contained in `b`
    Sub,
    /// Equal texts, or neither contains the other
    Unrelated,
}

impl Relation {
    /// Relation seen from the other side: `relation(b, a)`.
    pub fn inverse(self) -> Self {
        match self {
            Relation::Super => Relation::Sub,
            Relation::Sub => Relation::Super,
            Relation::Unrelated => Relation::Unrelated,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::Super => "super",
            Relation::Sub => "sub",
            Relation::Unrelated => "unrelated",
        };
        f.write_str(s)
    }
}

/// Case folding shared by dedup, classification and queries.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Classify `a` against `b`.
pub fn relation(a: &str, b: &str) -> Relation {
    relation_folded(&fold(a), &fold(b))
}

/// Same as [`relation`] for texts that are already folded.
pub(crate) fn relation_folded(a: &str, b: &str) -> Relation {
    if a == b {
        Relation::Unrelated
    } else if b.contains(a) {
        Relation::Sub
    } else if a.contains(b) {
        Relation::Super
    } else {
        Relation::Unrelated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cat", "cats", Relation::Sub)]
    #[case("cats", "cat", Relation::Super)]
    #[case("Cat", "BIG CATS", Relation::Sub)]
    #[case("dog", "cat", Relation::Unrelated)]
    #[case("cat", "cat", Relation::Unrelated)]
    #[case("Cat", "cAT", Relation::Unrelated)]
    #[case("", "anything", Relation::Sub)]
    #[case("", "", Relation::Unrelated)]
    fn test_relation(#[case] a: &str, #[case] b: &str, #[case] expected: Relation) {
        assert_eq!(relation(a, b), expected);
    }

    #[rstest]
    #[case("h", "hhh")]
    #[case("golden retriever", "retriever")]
    #[case("xgs", "hh")]
    #[case("Straße", "STRASSE")]
    fn test_relation_is_symmetric_inverse(#[case] a: &str, #[case] b: &str) {
        assert_eq!(relation(a, b), relation(b, a).inverse());
    }

    #[test]
    fn test_relation_is_irreflexive() {
        for text in ["", "a", "Mixed Case", "ünïcode"] {
            assert_eq!(relation(text, text), Relation::Unrelated);
        }
    }
}
