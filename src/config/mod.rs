//! Configuration management
//!
//! The server-rendered page may embed a JSON document
//! (`<script type="application/json" id="page-behavior-config">`) that
//! overrides selectors, messages and timings. Every field has a default
//! matching the storefront templates, so a partial document only changes
//! what it names.

use serde::Deserialize;

use crate::error::BehaviorError;

/// Element id of the embedded config document
pub const CONFIG_ELEMENT_ID: &str = "page-behavior-config";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub cart: CartConfig,

    #[serde(default)]
    pub confirm: ConfirmConfig,

    #[serde(default)]
    pub checkout: CheckoutConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl BehaviorConfig {
    /// Parse a (possibly partial) config document
    pub fn from_json(json: &str) -> Result<Self, BehaviorError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_root_attribute")]
    pub root_attribute: String,
}

fn default_storage_key() -> String {
    "theme".to_string()
}

fn default_root_attribute() -> String {
    "data-bs-theme".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            root_attribute: default_root_attribute(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartConfig {
    #[serde(default = "default_trigger_selector")]
    pub trigger_selector: String,
    #[serde(default = "default_card_selector")]
    pub card_selector: String,
    #[serde(default = "default_marker_class")]
    pub marker_class: String,
    #[serde(default = "default_shrink_transform")]
    pub shrink_transform: String,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u32,
}

fn default_trigger_selector() -> String {
    ".add-to-cart".to_string()
}

fn default_card_selector() -> String {
    ".product-card".to_string()
}

fn default_marker_class() -> String {
    "adding-to-cart".to_string()
}

fn default_shrink_transform() -> String {
    "scale(0.95)".to_string()
}

fn default_delay_ms() -> u32 {
    300
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            trigger_selector: default_trigger_selector(),
            card_selector: default_card_selector(),
            marker_class: default_marker_class(),
            shrink_transform: default_shrink_transform(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// One guarded role: clicks inside `selector` must be confirmed with `message`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfirmRule {
    pub selector: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfirmConfig {
    #[serde(default = "default_confirm_rules")]
    pub rules: Vec<ConfirmRule>,
}

fn default_confirm_rules() -> Vec<ConfirmRule> {
    vec![
        ConfirmRule {
            selector: ".delete-btn".to_string(),
            message: "Are you sure you want to delete this item?".to_string(),
        },
        ConfirmRule {
            selector: ".remove-from-cart".to_string(),
            message: "Are you sure you want to remove this item from your cart?".to_string(),
        },
    ]
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            rules: default_confirm_rules(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_form_id")]
    pub form_id: String,
    #[serde(default = "default_submit_selector")]
    pub submit_selector: String,
    #[serde(default = "default_busy_selector")]
    pub busy_selector: String,
    #[serde(default = "default_hidden_class")]
    pub hidden_class: String,
}

fn default_form_id() -> String {
    "checkout-form".to_string()
}

fn default_submit_selector() -> String {
    r#"button[type="submit"]"#.to_string()
}

fn default_busy_selector() -> String {
    ".spinner-border".to_string()
}

fn default_hidden_class() -> String {
    "d-none".to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            form_id: default_form_id(),
            submit_selector: default_submit_selector(),
            busy_selector: default_busy_selector(),
            hidden_class: default_hidden_class(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScrollConfig {
    /// Vertical offset (CSS px) the page must scroll strictly past
    #[serde(default = "default_threshold_px")]
    pub threshold_px: f64,
}

fn default_threshold_px() -> f64 {
    300.0
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold_px: default_threshold_px(),
        }
    }
}
