//! Insertion-ordered collection of wind fields.

use super::{FieldId, WindField};
use crate::core_types::vec3::Vec3;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Ordered set of wind fields with O(1) lookup by id.
///
/// Order never changes the summed force (addition is commutative) but is kept
/// stable so a visualiser can layer indicators consistently.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<WindField>,
    index: FxHashMap<FieldId, usize>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field and return its id.
    ///
    /// Re-adding an id that is already registered replaces the registered
    /// field in place.
    pub fn add(&mut self, field: WindField) -> FieldId {
        let id = field.id();
        if let Some(&slot) = self.index.get(&id) {
            warn!("{} already registered; replacing", id);
            self.fields[slot] = field;
            return id;
        }
        debug!("Registering {} field {}", field.kind().name(), id);
        self.index.insert(id, self.fields.len());
        self.fields.push(field);
        id
    }

    /// Remove a field by id. Unknown ids are ignored and yield `None`.
    pub fn remove(&mut self, id: FieldId) -> Option<WindField> {
        let slot = self.index.remove(&id)?;
        let field = self.fields.remove(slot);
        for (i, f) in self.fields.iter().enumerate().skip(slot) {
            self.index.insert(f.id(), i);
        }
        debug!("Removed {} field {}", field.kind().name(), id);
        Some(field)
    }

    pub fn get(&self, id: FieldId) -> Option<&WindField> {
        self.index.get(&id).map(|&slot| &self.fields[slot])
    }

    /// Mutable access for parameter edits between steps.
    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut WindField> {
        let slot = *self.index.get(&id)?;
        self.fields.get_mut(slot)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields currently enabled
    pub fn enabled_count(&self) -> usize {
        self.iter_enabled().count()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.index.clear();
    }

    /// All fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &WindField> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WindField> {
        self.fields.iter_mut()
    }

    /// Enabled fields in insertion order
    pub fn iter_enabled(&self) -> impl Iterator<Item = &WindField> {
        self.fields.iter().filter(|f| f.is_enabled())
    }

    /// Visit every enabled field in insertion order.
    pub fn for_each_enabled<F: FnMut(&WindField)>(&self, visitor: F) {
        self.iter_enabled().for_each(visitor);
    }

    /// Resultant force of all enabled fields at `position`.
    #[inline]
    pub fn force_at(&self, position: &Vec3, time: f32) -> Vec3 {
        let mut total = Vec3::zeros();
        self.for_each_enabled(|field| total += field.force_at(position, time));
        total
    }

    /// Refresh time-dependent public state of every field.
    pub fn advance(&mut self, time: f32) {
        for field in &mut self.fields {
            field.advance(time);
        }
    }
}
