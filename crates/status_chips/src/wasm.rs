//! WASM bindings for the chip engine
//!
//! Lets the browser card run the same resolution and classification as the
//! native build. Inputs and outputs cross the boundary as plain JS objects.

use wasm_bindgen::prelude::*;

use crate::{
    Attributes, ChipEntity, ChipView, Registries, ScopeConfig, build_chips, resolve_candidates,
    slug_from_url,
};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// Classify a single state, returning the chip view for it
#[wasm_bindgen]
pub fn classify_state(
    entity_id: &str,
    state: Option<String>,
    attributes: JsValue,
) -> Result<JsValue, JsValue> {
    let attributes: Attributes = if attributes.is_undefined() || attributes.is_null() {
        Attributes::default()
    } else {
        from_js(attributes, "attributes")?
    };
    let view: ChipView = ChipEntity::new(entity_id, state, attributes).view();
    to_js(&view)
}

/// Build the chip list for a registry snapshot and card configuration
#[wasm_bindgen]
pub fn build_chip_views(
    registries: JsValue,
    config: JsValue,
    url: Option<String>,
) -> Result<JsValue, JsValue> {
    let registries: Registries = from_js(registries, "registries")?;
    let config: ScopeConfig = from_js(config, "configuration")?;
    let slug = url.as_deref().and_then(slug_from_url);

    let candidates = resolve_candidates(
        &registries.entities,
        &registries.devices,
        &config,
        slug.as_deref(),
    );
    let chips = build_chips(
        candidates,
        &registries.states,
        config.is_optional(slug.as_deref()),
    );
    let views: Vec<ChipView> = chips.iter().map(ChipEntity::view).collect();
    to_js(&views)
}

/// Suggest a default configuration for a new card
#[wasm_bindgen]
pub fn stub_config(registries: JsValue) -> Result<JsValue, JsValue> {
    let registries: Registries = from_js(registries, "registries")?;
    to_js(&registries.stub_config())
}

/// Get version information
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
