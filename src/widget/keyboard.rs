//! Key events fanned out to whoever is listening.
//!
//! A listener exists exactly as long as its [`Subscription`] value does, so a
//! widget that drops its subscription on unmount cannot leak a listener.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

type Inbox = Rc<RefCell<VecDeque<KeyEvent>>>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    inboxes: Vec<(u64, Inbox)>,
}

/// Source of global key presses.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    listeners: Rc<RefCell<Listeners>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. It receives every key published from now on until
    /// the returned subscription is dropped.
    pub fn subscribe(&self) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;

        let inbox = Inbox::default();
        listeners.inboxes.push((id, Rc::clone(&inbox)));

        Subscription {
            id,
            inbox,
            hub: Rc::downgrade(&self.listeners),
        }
    }

    pub fn publish(&self, key: KeyEvent) {
        for (_, inbox) in &self.listeners.borrow().inboxes {
            inbox.borrow_mut().push_back(key);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().inboxes.len()
    }
}

/// A live listener registration. Dropping it detaches the listener.
pub struct Subscription {
    id: u64,
    inbox: Inbox,
    hub: Weak<RefCell<Listeners>>,
}

impl Subscription {
    /// Oldest key not yet taken
    pub fn poll(&self) -> Option<KeyEvent> {
        self.inbox.borrow_mut().pop_front()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.hub.upgrade() {
            listeners
                .borrow_mut()
                .inboxes
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// The notebook's own key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+E (or Super+E): flip between read and edit.
    ToggleMode,
    /// Esc: leave edit mode.
    EscapeToRead,
}

impl Shortcut {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        match key.code {
            KeyCode::Char('e')
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER) =>
            {
                Some(Shortcut::ToggleMode)
            }
            KeyCode::Esc => Some(Shortcut::EscapeToRead),
            _ => None,
        }
    }
}
