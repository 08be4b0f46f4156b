//! Storefront page behavior
//!
//! Client-side behavior for the server-rendered storefront pages, compiled
//! to WebAssembly and started once the document has loaded.
//!
//! This library provides:
//! - Light/dark theme toggle persisted in localStorage
//! - "Add to cart" card animation before navigating
//! - Confirmation prompts on delete / remove-from-cart controls
//! - Checkout double-submit guard with back/forward-cache recovery
//! - Scroll-to-top button shown past a scroll threshold
//!
//! The behaviors in [`behaviors`] are written against the ports in
//! [`platform`] and run natively under test; the `web` module (wasm32 only)
//! binds them to the live DOM.

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod behaviors;
pub mod binding;
pub mod config;
pub mod error;
pub mod platform;

// Browser-only modules (excluded from native builds)
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use binding::Binding;
pub use config::BehaviorConfig;
pub use error::BehaviorError;
