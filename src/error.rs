use thiserror::Error;

/// First structural violation found by [`AvlMap::validate`](crate::AvlMap::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// In-order traversal produced a key that does not compare greater than
    /// its predecessor
    #[error("key at in-order position {position} is not greater than its predecessor")]
    Unordered { position: usize },

    /// A node's cached height disagrees with the heights of its children
    #[error("cached height {cached} at in-order position {position} should be {actual}")]
    StaleHeight {
        position: usize,
        cached: usize,
        actual: usize,
    },

    /// A node's subtrees differ in height by more than one
    #[error("balance factor {balance} at in-order position {position} is out of range")]
    Unbalanced { position: usize, balance: isize },

    /// The cached entry count disagrees with the number of reachable nodes
    #[error("map reports {expected} entries but {found} are reachable")]
    LengthMismatch { expected: usize, found: usize },
}
