//! Token filter trait.

/// Stateless keep/drop decision over a single item.
///
/// Returns `true` when `item` is kept. Calling it twice on the same input gives the same answer.
pub trait Filter<T>: Default {
    fn detect(&self, item: T) -> bool;
}
