//! Confirmation prompts for destructive controls.
//!
//! One delegated click listener on the document body covers every guarded
//! control, including ones rendered after page load. Every rule is checked
//! on every click; a click inside several guarded roles prompts once per
//! role and is blocked if any prompt is declined.

use tracing::debug;

use crate::binding::Binding;
use crate::config::{ConfirmConfig, ConfirmRule};
use crate::platform::Dialogs;

pub const BINDING: Binding = Binding::Delegated;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Proceed,
    Block,
}

impl Verdict {
    pub fn prevents_default(self) -> bool {
        self == Verdict::Block
    }
}

pub struct ConfirmationGuard {
    rules: Vec<ConfirmRule>,
}

impl ConfirmationGuard {
    pub fn new(config: ConfirmConfig) -> Self {
        Self {
            rules: config.rules,
        }
    }

    pub fn rules(&self) -> &[ConfirmRule] {
        &self.rules
    }

    /// Decide a click. `within(selector)` reports whether the click's
    /// origin is, or is nested inside, an element matching `selector`.
    pub fn evaluate<F, D>(&self, within: F, dialogs: &D) -> Verdict
    where
        F: Fn(&str) -> bool,
        D: Dialogs + ?Sized,
    {
        let mut verdict = Verdict::Proceed;
        for rule in &self.rules {
            if !within(&rule.selector) {
                continue;
            }
            if !dialogs.confirm(&rule.message) {
                debug!(selector = %rule.selector, "Destructive action declined");
                verdict = Verdict::Block;
            }
        }
        verdict
    }
}
