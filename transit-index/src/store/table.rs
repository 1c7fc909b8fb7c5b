//! Keyed tables that remember feed order.

use std::collections::HashMap;

/// A map from id to record that iterates in first-insertion order.
///
/// Search output order follows feed order, so plain `HashMap` iteration is
/// not good enough. Re-inserting an id replaces the record but keeps the
/// position it was first seen at.
#[derive(Debug, Clone)]
pub struct Table<T> {
    order: Vec<String>,
    rows: HashMap<String, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            rows: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    /// Insert or replace a record. Returns true if the id was already present.
    pub fn insert(&mut self, id: String, row: T) -> bool {
        if let Some(existing) = self.rows.get_mut(&id) {
            *existing = row;
            return true;
        }
        self.order.push(id.clone());
        self.rows.insert(id, row);
        false
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in first-insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(id, record)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.order
            .iter()
            .filter_map(|id| self.rows.get(id).map(|row| (id.as_str(), row)))
    }

    /// Records in first-insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.iter().map(|(_, row)| row)
    }
}
