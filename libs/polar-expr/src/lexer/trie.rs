//! # Syntax Tree
//!
//! Character-indexed prefix tree of reserved lexemes (operators and
//! punctuation). Shared prefixes share nodes; a node is `terminal` when a
//! complete lexeme ends there.
//!
//! The tree caches its alphabet (every character of every lexeme) and the
//! set of characters a lexeme can start with, so scanners reject foreign
//! characters without walking the tree.
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::lexer::SyntaxTree;
//!
//! let tree = SyntaxTree::from_lexemes(["*", "**", "+"]);
//! assert_eq!(tree.longest_match("**2"), Some(2));
//! assert_eq!(tree.longest_match("*2"), Some(1));
//! assert!(tree.can_start('+'));
//! assert!(!tree.in_alphabet('/'));
//! ```

use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: bool,
}

// =============================================================================
// MATCH RESULT
// =============================================================================

/// Outcome of walking the tree along a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieMatch {
    /// Bytes of the input that could be walked.
    pub consumed: usize,
    /// The whole input was walked.
    pub found: bool,
    /// The whole input was walked and ends on a complete lexeme.
    pub terminal: bool,
    /// Byte length of the longest complete lexeme that prefixes the input.
    pub partial: Option<usize>,
}

// =============================================================================
// SYNTAX TREE
// =============================================================================

/// Prefix tree over a reserved lexeme set.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    root: TrieNode,
    alphabet: BTreeSet<char>,
    starts: BTreeSet<char>,
}

impl SyntaxTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a lexeme set.
    pub fn from_lexemes<I, S>(lexemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for lexeme in lexemes {
            tree.insert(lexeme.as_ref());
        }
        tree
    }

    /// Insert a lexeme. Empty strings are ignored.
    pub fn insert(&mut self, lexeme: &str) {
        let mut chars = lexeme.chars().peekable();
        let Some(&first) = chars.peek() else {
            return;
        };
        self.starts.insert(first);

        let mut node = &mut self.root;
        for c in chars {
            self.alphabet.insert(c);
            node = node.children.entry(c).or_default();
        }
        node.terminal = true;
    }

    /// Walk the tree along `input`.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use polar_expr::lexer::SyntaxTree;
    ///
    /// let tree = SyntaxTree::from_lexemes(["=="]);
    /// let m = tree.find("=");
    /// assert!(m.found);
    /// assert!(!m.terminal);
    /// assert_eq!(m.partial, None);
    /// ```
    pub fn find(&self, input: &str) -> TrieMatch {
        let mut node = &self.root;
        let mut consumed = 0;
        let mut partial = None;

        for c in input.chars() {
            match node.children.get(&c) {
                Some(next) => {
                    node = next;
                    consumed += c.len_utf8();
                    if node.terminal {
                        partial = Some(consumed);
                    }
                }
                None => {
                    return TrieMatch {
                        consumed,
                        found: false,
                        terminal: false,
                        partial,
                    };
                }
            }
        }

        TrieMatch {
            consumed,
            found: true,
            terminal: node.terminal && consumed > 0,
            partial,
        }
    }

    /// Byte length of the longest lexeme prefixing `input`.
    pub fn longest_match(&self, input: &str) -> Option<usize> {
        self.find(input).partial
    }

    /// True if `lexeme` is exactly one of the inserted strings.
    pub fn contains(&self, lexeme: &str) -> bool {
        self.find(lexeme).terminal
    }

    /// True if `c` occurs anywhere in an inserted lexeme.
    #[inline]
    pub fn in_alphabet(&self, c: char) -> bool {
        self.alphabet.contains(&c)
    }

    /// True if some inserted lexeme starts with `c`.
    #[inline]
    pub fn can_start(&self, c: char) -> bool {
        self.starts.contains(&c)
    }
}

// =============================================================================
// TESTS
// =============================================================================
