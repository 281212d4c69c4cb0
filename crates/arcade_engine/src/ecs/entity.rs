//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// Generational: once an entity is destroyed its id never resolves again,
    /// even if the slot is reused, so stale handles held by delayed callbacks
    /// or other entities are caught as `InvalidEntity`.
    pub struct EntityId;
}
