//! The page behaviors, each independent of the others.
//!
//! - [`theme`] - light/dark toggle with a persisted preference
//! - [`cart`] - add-to-cart shrink animation before navigating
//! - [`confirm`] - confirmation prompts for delete/remove controls
//! - [`checkout`] - checkout double-submit guard with back/forward recovery
//! - [`scroll`] - scroll-to-top button shown past a scroll threshold

pub mod cart;
pub mod checkout;
pub mod confirm;
pub mod scroll;
pub mod theme;

pub use cart::{CartAnimator, ClickOutcome};
pub use checkout::CheckoutGuard;
pub use confirm::{ConfirmationGuard, Verdict};
pub use scroll::ScrollToTop;
pub use theme::{Theme, ThemeController};
