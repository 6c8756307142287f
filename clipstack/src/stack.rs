use crate::clipping::Clipping;
use crate::store::ClippingStore;
use tracing::trace;

/// Cursor over a [`ClippingStore`].
///
/// The position always points at an existing clipping when the store is not
/// empty, and is 0 when it is.
#[derive(Debug)]
pub struct ClippingStack {
    store: ClippingStore,
    position: usize,
    wraparound: bool,
}

impl ClippingStack {
    pub fn new(store: ClippingStore) -> Self {
        Self {
            store,
            position: 0,
            wraparound: false,
        }
    }

    #[must_use]
    pub fn with_wraparound(mut self, wraparound: bool) -> Self {
        self.wraparound = wraparound;
        self
    }

    pub fn set_wraparound(&mut self, wraparound: bool) {
        self.wraparound = wraparound;
    }

    pub fn wraparound(&self) -> bool {
        self.wraparound
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Place the cursor, clamped to the last clipping.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.last_index());
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn last_index(&self) -> usize {
        self.store.len().saturating_sub(1)
    }

    fn clamp(&mut self) {
        self.position = self.position.min(self.last_index());
    }

    pub fn current(&self) -> Option<&Clipping> {
        self.store.item_at(self.position)
    }

    pub fn item_at(&self, position: usize) -> Option<&Clipping> {
        self.store.item_at(position)
    }

    pub fn first_n(&self, n: usize) -> &[Clipping] {
        self.store.first_n(n)
    }

    pub fn store(&self) -> &ClippingStore {
        &self.store
    }

    /// Direct store access. Callers that change the number of clippings must
    /// go through the stack methods instead so the cursor is re-clamped.
    pub fn store_mut(&mut self) -> &mut ClippingStore {
        &mut self.store
    }

    pub fn down(&mut self) {
        let count = self.store.len();
        if count == 0 {
            return;
        }

        if self.position + 1 < count {
            self.position += 1;
        } else if self.wraparound {
            self.position = 0;
        }
        trace!(position = self.position, "Stack down");
    }

    pub fn up(&mut self) {
        let count = self.store.len();
        if count == 0 {
            return;
        }

        if self.position > 0 {
            self.position -= 1;
        } else if self.wraparound {
            self.position = count - 1;
        }
        trace!(position = self.position, "Stack up");
    }

    /// Move by `steps` (negative toward the head) without wrapping.
    pub fn move_by(&mut self, steps: isize) {
        if self.store.is_empty() {
            return;
        }

        let target = if steps.is_negative() {
            self.position.saturating_sub(steps.unsigned_abs())
        } else {
            self.position.saturating_add(steps.unsigned_abs())
        };
        self.position = target.min(self.last_index());
        trace!(steps, position = self.position, "Stack move");
    }

    pub fn jump_to(&mut self, slot: usize) {
        if self.store.is_empty() {
            return;
        }
        self.set_position(slot);
    }

    pub fn jump_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.last_index();
    }

    /// Ingest `text`. The cursor is left where it is; re-positioning after
    /// ingestion is the caller's policy.
    pub fn add(&mut self, text: &str) -> bool {
        let added = self.store.add(text);
        self.clamp();
        added
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.position = 0;
    }

    pub fn delete(&mut self) -> Option<Clipping> {
        self.delete_at(self.position)
    }

    /// Remove the clipping at `index`. When the removed slot was at or above
    /// the cursor, the cursor moves up by one so it never points past the end.
    pub fn delete_at(&mut self, index: usize) -> Option<Clipping> {
        let removed = self.store.remove_at(index)?;

        if self.store.is_empty() {
            self.position = 0;
        } else if self.position > 0 && index <= self.position {
            self.position -= 1;
        }
        self.clamp();
        Some(removed)
    }

    /// Move the clipping at `index` to the head. The cursor is untouched.
    pub fn move_to_top(&mut self, index: usize) -> bool {
        self.store.move_to_top(index)
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.store.set_capacity(capacity);
        self.clamp();
    }
}
