//! Checkout form double-submit guard.
//!
//! Submitting disables the submit button and reveals its spinner. A page
//! restored from the back/forward cache (e.g. after a failed payment
//! redirect) would otherwise come back with the button stuck disabled, so
//! the first submission also arms a `pageshow` recovery that re-enables it
//! on every later restore.

use std::cell::Cell;

use tracing::debug;

use crate::binding::Binding;
use crate::config::CheckoutConfig;
use crate::platform::PageElement;

pub const BINDING: Binding = Binding::AtInit;

pub struct CheckoutGuard<E> {
    submit: E,
    busy: Option<E>,
    hidden_class: String,
    recovery_armed: Cell<bool>,
}

impl<E: PageElement> CheckoutGuard<E> {
    pub fn new(submit: E, busy: Option<E>, config: &CheckoutConfig) -> Self {
        Self {
            submit,
            busy,
            hidden_class: config.hidden_class.clone(),
            recovery_armed: Cell::new(false),
        }
    }

    /// Lock the form for an in-flight submission.
    ///
    /// Returns true exactly once per page view: the caller must then attach
    /// the `pageshow` listener that calls [`CheckoutGuard::on_page_show`].
    pub fn on_submit(&self) -> bool {
        self.submit.set_disabled(true);
        if let Some(busy) = &self.busy {
            busy.remove_class(&self.hidden_class);
        }
        debug!("Checkout submitted, submit control disabled");
        !self.recovery_armed.replace(true)
    }

    /// Unlock after the page becomes visible again. Runs on every restore,
    /// whether or not the submission completed.
    pub fn on_page_show(&self, persisted: bool) {
        self.submit.set_disabled(false);
        if let Some(busy) = &self.busy {
            busy.add_class(&self.hidden_class);
        }
        debug!(persisted, "Page shown, checkout submit control re-enabled");
    }

    #[cfg(test)]
    fn is_recovery_armed(&self) -> bool {
        self.recovery_armed.get()
    }
}
