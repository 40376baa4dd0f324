use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Root-relative path of child indices identifying a node inside one tree.
///
/// The root of a tree has the empty position; its `i`-th child has `[i]`, and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    moves: Vec<usize>,
}

impl Position {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_moves(moves: impl IntoIterator<Item = usize>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    pub fn moves(&self) -> &[usize] {
        &self.moves
    }

    pub fn depth(&self) -> usize {
        self.moves.len()
    }

    pub fn is_root(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last_move(&self) -> Option<usize> {
        self.moves.last().copied()
    }

    /// Position of the `index`-th child of the node at `self`.
    pub fn child(&self, index: usize) -> Position {
        let mut moves = Vec::with_capacity(self.moves.len() + 1);
        moves.extend_from_slice(&self.moves);
        moves.push(index);
        Position { moves }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, m) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{m}")?;
        }
        f.write_str("]")
    }
}
