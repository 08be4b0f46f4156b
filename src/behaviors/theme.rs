//! Light/dark theme toggle persisted in localStorage.
//!
//! The effective theme is resolved once at install time (stored value, then
//! the OS color-scheme preference, then light) and written to a single
//! attribute on the document root, which the stylesheet keys off.

use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::binding::Binding;
use crate::config::ThemeConfig;
use crate::platform::{ColorScheme, FloatingButton, PageElement, PreferenceStore};

pub const BINDING: Binding = Binding::AtInit;

pub const TOGGLE_BUTTON: FloatingButton = FloatingButton {
    id: "theme-toggle",
    class: "btn btn-light position-fixed bottom-0 end-0 m-3",
    aria_label: "Toggle dark mode",
    icon_html: MOON_ICON,
};

/// Media query reporting the OS-level dark preference
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

const MOON_ICON: &str = r#"<i class="bi bi-moon-stars"></i>"#;
const SUN_ICON: &str = r#"<i class="bi bi-sun"></i>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon shown on the toggle: the mode a click switches *to*
    fn icon_html(self) -> &'static str {
        match self {
            Theme::Light => MOON_ICON,
            Theme::Dark => SUN_ICON,
        }
    }

    /// Precedence: stored value, then OS preference, then light.
    /// Stored values other than "light"/"dark" count as absent.
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        match stored.and_then(|s| s.parse().ok()) {
            Some(theme) => theme,
            None if prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme `{0}`")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Owns the current theme and keeps the root attribute, the toggle button
/// and the persisted value in step.
pub struct ThemeController<S, E> {
    store: S,
    root: E,
    toggle: E,
    config: ThemeConfig,
    current: Cell<Theme>,
}

impl<S: PreferenceStore, E: PageElement> ThemeController<S, E> {
    /// Resolve the initial theme and apply it. Nothing is persisted until
    /// the user toggles.
    pub fn install<C>(store: S, root: E, toggle: E, scheme: &C, config: ThemeConfig) -> Self
    where
        C: ColorScheme + ?Sized,
    {
        let stored = match store.get(&config.storage_key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Theme preference unreadable, using defaults: {}", e);
                None
            }
        };
        let prefers_dark = scheme.prefers_dark();
        let initial = Theme::resolve(stored.as_deref(), prefers_dark);
        debug!(?stored, prefers_dark, theme = %initial, "Resolved initial theme");

        let controller = Self {
            store,
            root,
            toggle,
            config,
            current: Cell::new(initial),
        };
        controller.apply(initial);
        controller
    }

    pub fn current(&self) -> Theme {
        self.current.get()
    }

    /// Flip, re-apply and persist. Returns the new theme.
    pub fn toggle(&self) -> Theme {
        let next = self.current.get().toggled();
        self.current.set(next);
        self.apply(next);

        if let Err(e) = self.store.set(&self.config.storage_key, next.as_str()) {
            warn!("Failed to persist theme {}: {}", next, e);
        }
        debug!(theme = %next, "Theme toggled");
        next
    }

    fn apply(&self, theme: Theme) {
        self.root
            .set_attribute(&self.config.root_attribute, theme.as_str());
        self.toggle.set_inner_html(theme.icon_html());
        self.toggle.set_attribute(
            "aria-pressed",
            if theme == Theme::Dark { "true" } else { "false" },
        );
    }
}
