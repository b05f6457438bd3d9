/// Scene - an ordered collection of Drawables.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys, plus an
/// insertion-order list that fixes the draw order.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use glam::Mat4;
use super::drawable::{Drawable, DrawableKey};

#[derive(Default)]
pub struct Scene {
    drawables: SlotMap<DrawableKey, Drawable>,
    /// Draw order (insertion order)
    order: Vec<DrawableKey>,
    /// Drawables skipped by the renderer
    hidden: FxHashSet<DrawableKey>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable at the end of the draw order
    pub fn add(&mut self, drawable: Drawable) -> DrawableKey {
        let key = self.drawables.insert(drawable);
        self.order.push(key);
        key
    }

    /// Remove a drawable, returning it. None if the key is stale.
    pub fn remove(&mut self, key: DrawableKey) -> Option<Drawable> {
        let drawable = self.drawables.remove(key)?;
        self.order.retain(|k| *k != key);
        self.hidden.remove(&key);
        Some(drawable)
    }

    pub fn get(&self, key: DrawableKey) -> Option<&Drawable> {
        self.drawables.get(key)
    }

    pub fn get_mut(&mut self, key: DrawableKey) -> Option<&mut Drawable> {
        self.drawables.get_mut(key)
    }

    /// Set the model matrix. Returns false if the key is stale.
    pub fn set_model(&mut self, key: DrawableKey, model: Mat4) -> bool {
        match self.drawables.get_mut(key) {
            Some(drawable) => {
                drawable.set_model(model);
                true
            }
            None => false,
        }
    }

    /// Show or hide a drawable. Returns false if the key is stale.
    pub fn set_visible(&mut self, key: DrawableKey, visible: bool) -> bool {
        if !self.drawables.contains_key(key) {
            return false;
        }
        if visible {
            self.hidden.remove(&key);
        } else {
            self.hidden.insert(key);
        }
        true
    }

    pub fn is_visible(&self, key: DrawableKey) -> bool {
        self.drawables.contains_key(key) && !self.hidden.contains(&key)
    }

    /// Keys in draw order
    pub fn keys(&self) -> impl Iterator<Item = DrawableKey> + '_ {
        self.order.iter().copied()
    }

    /// Visible drawables in draw order
    pub fn visible_drawables(&self) -> impl Iterator<Item = (DrawableKey, &Drawable)> + '_ {
        self.order
            .iter()
            .filter(|key| !self.hidden.contains(*key))
            .filter_map(|key| self.drawables.get(*key).map(|d| (*key, d)))
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn clear(&mut self) {
        self.drawables.clear();
        self.order.clear();
        self.hidden.clear();
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
