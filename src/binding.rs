//! Listener binding strategies.
//!
//! Behaviors attach their listeners in one of two ways, and the choice is
//! observable: a control rendered after initialization (e.g. by a partial
//! page update) is only covered by a delegated behavior.
//!
//! | Behavior | Binding |
//! |---|---|
//! | theme toggle | [`Binding::AtInit`] (own injected button) |
//! | add-to-cart animation | [`Binding::AtInit`] |
//! | delete / remove confirmation | [`Binding::Delegated`] (document body) |
//! | checkout submission guard | [`Binding::AtInit`] |
//! | scroll-to-top | [`Binding::AtInit`] (window + own injected button) |

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// One listener per element matched when the behavior is installed
    AtInit,
    /// One listener on an ancestor that inspects each bubbling event's origin
    Delegated,
}

impl Binding {
    /// Whether elements inserted after installation are handled
    pub fn covers_late_elements(self) -> bool {
        matches!(self, Binding::Delegated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Binding::AtInit => "bind-at-init",
            Binding::Delegated => "delegate-from-ancestor",
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
