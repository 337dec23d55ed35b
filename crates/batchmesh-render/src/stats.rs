/// Counters for the last completed render cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Calls to `submit` routed into this pool.
    pub submissions: u32,
    /// Quads declared by those submissions.
    pub quads: u64,
    /// Surfaces flushed (drawn) this cycle.
    pub surfaces_active: u32,
    /// Surfaces disabled at the end of this cycle.
    pub surfaces_disabled: u32,
    /// Geometry uploads pushed to the host.
    pub uploads: u32,
    /// Quad buffers resized to a new quad count.
    pub reallocations: u32,
    /// Total bytes uploaded.
    pub uploaded_bytes: u64,
}
