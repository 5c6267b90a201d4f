/// Represents the outcome of a single non-blocking generation attempt.
///
/// - [`Poll::Ready`] indicates a new ID was generated.
/// - [`Poll::Pending`] means the sequence is exhausted for the current
///   millisecond and no ID can be produced until the clock advances.
///
/// This allows non-blocking generation loops and clean backoff strategies:
/// the generator lock is released before the caller waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<T> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: T,
    },
    /// No ID could be generated because the sequence has been exhausted for
    /// the current millisecond.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}
