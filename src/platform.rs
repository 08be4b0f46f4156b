//! Ports between the behaviors and the browser.
//!
//! Each behavior is written against these traits rather than web-sys
//! directly. The `web` module implements them on top of the real DOM;
//! tests substitute in-memory fakes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::BehaviorError;

/// The subset of element operations the behaviors need.
///
/// Mutations are infallible from the caller's point of view: adapters log
/// DOM exceptions instead of returning them, since a handler has no way to
/// recover from a rejected attribute write.
pub trait PageElement {
    fn set_attribute(&self, name: &str, value: &str);
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    /// Inline style property value ("" when unset)
    fn style_property(&self, property: &str) -> String;
    fn set_style_property(&self, property: &str, value: &str);
    fn set_inner_html(&self, html: &str);
    fn set_disabled(&self, disabled: bool);
    /// Node identity, not structural equality
    fn is_same_element(&self, other: &Self) -> bool
    where
        Self: Sized;
}

/// Durable per-origin key-value storage (localStorage in the browser)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, BehaviorError>;
    fn set(&self, key: &str, value: &str) -> Result<(), BehaviorError>;
}

/// Operating-system color scheme signal
pub trait ColorScheme {
    fn prefers_dark(&self) -> bool;
}

/// Blocking user prompts
pub trait Dialogs {
    /// Returns true when the user accepts
    fn confirm(&self, message: &str) -> bool;
}

pub trait Navigator {
    fn navigate(&self, href: &str);
}

/// Handle to a deferred task; cancelling guarantees the task never runs
pub trait TaskHandle {
    fn cancel(self);
}

/// Deferred continuations on the page's event loop
pub trait Scheduler {
    type Handle: TaskHandle;

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
}

pub trait Viewport {
    /// Current vertical scroll offset in CSS pixels
    fn scroll_offset(&self) -> f64;
    /// Smooth-scroll the window to vertical offset zero
    fn scroll_to_top(&self);
}

/// Description of a fixed-position control injected into the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingButton {
    pub id: &'static str,
    pub class: &'static str,
    pub aria_label: &'static str,
    pub icon_html: &'static str,
}

/// In-memory preference store, for pages without usable localStorage
/// (private browsing modes that throw on access) and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BehaviorError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BehaviorError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, BehaviorError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BehaviorError> {
        (**self).set(key, value)
    }
}

impl<T: Dialogs + ?Sized> Dialogs for std::rc::Rc<T> {
    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

impl<T: Scheduler + ?Sized> Scheduler for std::rc::Rc<T> {
    type Handle = T::Handle;

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
        (**self).defer(delay, task)
    }
}

impl<T: Viewport + ?Sized> Viewport for std::rc::Rc<T> {
    fn scroll_offset(&self) -> f64 {
        (**self).scroll_offset()
    }

    fn scroll_to_top(&self) {
        (**self).scroll_to_top();
    }
}
