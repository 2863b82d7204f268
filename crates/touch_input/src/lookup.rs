//! Touch id assignment for the two-finger drag protocol.

use std::collections::HashMap;

use crate::platform::PlatformTouch;

/// Most contacts the downstream protocol understands at once.
pub const MAX_ACTIVE_TOUCHES: usize = 2;

/// Assigns drag ids to at most two concurrently active touches.
///
/// Ids come from a counter that is never reset: after a contact ends its slot
/// is free again, but the next contact gets a fresh id, not the old one.
///
/// Only use from the input thread, there is no synchronization here.
#[derive(Debug)]
pub struct TouchLookup<T: PlatformTouch> {
    active_touches: HashMap<T::Key, i64>,
    next_id: i64,
}

impl<T: PlatformTouch> Default for TouchLookup<T> {
    fn default() -> Self {
        Self {
            active_touches: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T: PlatformTouch> TouchLookup<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of touches currently holding an id
    pub fn active_count(&self) -> usize {
        self.active_touches.len()
    }

    /// Id the next accepted touch will receive
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    pub fn id_of(&self, touch: &T) -> Option<i64> {
        self.active_touches.get(&touch.key()).copied()
    }

    /// Assign ids to newly started touches.
    ///
    /// Touches that are already tracked are skipped. Touches arriving while two
    /// are active are dropped without being reported.
    pub fn filter_new<'a>(&mut self, new_touches: impl IntoIterator<Item = &'a T>) -> Vec<(i64, T)>
    where
        T: 'a,
    {
        let mut result = Vec::new();

        for touch in new_touches {
            let key = touch.key();
            if self.active_touches.contains_key(&key) {
                continue;
            }
            if self.active_touches.len() >= MAX_ACTIVE_TOUCHES {
                tracing::trace!("Dropping touch {:?}, {} already active", key, MAX_ACTIVE_TOUCHES);
                continue;
            }

            self.active_touches.insert(key, self.next_id);
            result.push((self.next_id, touch.clone()));
            self.next_id += 1;
        }

        result
    }

    /// Report the tracked touches among `moved_touches`, with their ids.
    pub fn filter_moved<'a>(&self, moved_touches: impl IntoIterator<Item = &'a T>) -> Vec<(i64, T)>
    where
        T: 'a,
    {
        moved_touches
            .into_iter()
            .filter_map(|touch| self.id_of(touch).map(|id| (id, touch.clone())))
            .collect()
    }

    /// Like [`TouchLookup::filter_moved`], but also frees the slot of every
    /// touch it reports.
    pub fn filter_ended<'a>(&mut self, ended_touches: impl IntoIterator<Item = &'a T>) -> Vec<(i64, T)>
    where
        T: 'a,
    {
        let mut result = Vec::new();

        for touch in ended_touches {
            if let Some(id) = self.active_touches.remove(&touch.key()) {
                result.push((id, touch.clone()));
            }
        }

        result
    }
}
