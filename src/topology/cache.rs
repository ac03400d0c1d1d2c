//! Invalidation hook for structures that memoise data derived from their
//! cells.

/// Implemented by containers with a lazily computed view (such as a mesh's
/// boundary faces) that must be dropped on every mutation.
pub trait InvalidateCache {
    /// Forget every memoised view; the next query recomputes it.
    fn invalidate_cache(&mut self);
}
