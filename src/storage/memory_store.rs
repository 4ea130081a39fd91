use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{NotebookError, Result};

use super::NoteStore;

#[derive(Default)]
struct Slots {
    values: HashMap<String, String>,
    /// When set, writes fail with this message.
    write_failure: Option<String>,
    writes: usize,
}

/// In-memory store. Clones share the same slots, so a second widget opened
/// on a clone sees what the first one wrote, as after a page reload.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<Slots>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one value
    pub fn with_value(key: &str, text: &str) -> Self {
        let store = Self::new();
        store
            .slots
            .borrow_mut()
            .values
            .insert(key.to_string(), text.to_string());
        store
    }

    /// Make every following write fail, e.g. to mimic an exhausted quota.
    pub fn fail_writes(&self, message: impl Into<String>) {
        self.slots.borrow_mut().write_failure = Some(message.into());
    }

    pub fn allow_writes(&self) {
        self.slots.borrow_mut().write_failure = None;
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.slots.borrow().writes
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.slots.borrow().values.get(key).cloned()
    }
}

impl NoteStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, text: &str) -> Result<()> {
        let mut slots = self.slots.borrow_mut();
        if let Some(message) = &slots.write_failure {
            return Err(NotebookError::Storage(message.clone()));
        }
        slots.values.insert(key.to_string(), text.to_string());
        slots.writes += 1;
        Ok(())
    }
}
