//! Target registry: ordered candidate targets with id lookup and a
//! cycling cursor.
//!
//! The external registrar decides what is listed; the registry only keeps
//! insertion order stable and answers lookups.

use std::collections::HashMap;

use voidline_core::enums::Direction;
use voidline_core::target::{Target, TargetId};

#[derive(Debug, Default)]
pub struct TargetRegistry {
    order: Vec<TargetId>,
    targets: HashMap<TargetId, Target>,
    cursor: Option<usize>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a target. Re-adding a known id replaces its data in place and
    /// keeps its position in the cycle order.
    pub fn add(&mut self, target: Target) {
        if !self.targets.contains_key(&target.id) {
            self.order.push(target.id.clone());
        }
        self.targets.insert(target.id.clone(), target);
    }

    /// Remove a target, returning it if it was listed.
    pub fn remove(&mut self, id: &TargetId) -> Option<Target> {
        let removed = self.targets.remove(id)?;
        if let Some(index) = self.index_of(id) {
            self.order.remove(index);
            self.cursor = match self.cursor {
                Some(c) if c > index => Some(c - 1),
                // Step back so the next forward cycle lands on the successor.
                Some(c) if c == index => c.checked_sub(1),
                other => other,
            };
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.targets.clear();
        self.cursor = None;
    }

    pub fn get_by_id(&self, id: &TargetId) -> Option<&Target> {
        self.targets.get(id)
    }

    pub fn get_by_id_mut(&mut self, id: &TargetId) -> Option<&mut Target> {
        self.targets.get_mut(id)
    }

    /// Case-sensitive exact match on display name; first in insertion order wins.
    pub fn get_by_name(&self, name: &str) -> Option<&Target> {
        self.iter().find(|t| t.display_name == name)
    }

    /// Advance the cursor and return the target it lands on. An empty
    /// registry returns `None` and leaves the cursor alone.
    pub fn cycle(&mut self, direction: Direction) -> Option<&Target> {
        let len = self.order.len();
        if len == 0 {
            return None;
        }
        let next = match self.cursor {
            Some(c) => direction.wrap(c.min(len - 1), len),
            None => match direction {
                Direction::Next => 0,
                Direction::Previous => len - 1,
            },
        };
        self.cursor = Some(next);
        self.targets.get(&self.order[next])
    }

    /// Point the cursor at a target, so cycling continues from it.
    pub fn set_cursor(&mut self, id: &TargetId) {
        if let Some(index) = self.index_of(id) {
            self.cursor = Some(index);
        }
    }

    pub fn cursor_id(&self) -> Option<&TargetId> {
        self.cursor.and_then(|c| self.order.get(c))
    }

    /// Set the out-of-range annotation on a listed target.
    pub fn set_out_of_range(&mut self, id: &TargetId, out_of_range: bool) -> bool {
        match self.targets.get_mut(id) {
            Some(target) => {
                target.out_of_range = out_of_range;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &TargetId) -> bool {
        self.targets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Targets in stable insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.order.iter().filter_map(|id| self.targets.get(id))
    }

    fn index_of(&self, id: &TargetId) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }
}
