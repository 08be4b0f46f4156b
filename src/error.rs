//! Error type shared by the behaviors and the browser adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    /// Page-embedded configuration could not be parsed
    #[error("invalid page behavior config: {0}")]
    Config(#[from] serde_json::Error),

    /// Durable preference storage rejected a read or write
    #[error("preference storage unavailable: {0}")]
    Storage(String),

    /// A DOM call failed (the message is the stringified JS exception)
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// Markup the renderer was expected to provide is missing
    #[error("no element matches `{selector}`")]
    MissingElement { selector: String },

    /// A link target could not be resolved against the document URL
    #[error("invalid navigation target `{href}`: {source}")]
    InvalidTarget {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for BehaviorError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        use wasm_bindgen::JsCast;

        let message = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| format!("{:?}", value));
        BehaviorError::Dom(message)
    }
}
