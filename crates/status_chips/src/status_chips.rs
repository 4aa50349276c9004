//! Status Chips - entity selection and classification for toolbar status chips
//!
//! Turns a snapshot of the host registries (entities, devices, areas and
//! current states) into an ordered list of classified chips.
//!
//! ```text
//! Registries ──► resolver ──► candidates ──► chips (join states, classify,
//!                  ▲                              drop optional) ──► Presenter
//!             ScopeConfig
//!
//! Registries ──► stub ──► StubConfig
//! ```
//!
//! Everything here is synchronous and free of I/O; the [`StatusChips`]
//! controller only calls out through its [`Presenter`].
//!
//! ## Features
//!
//! - `wasm` - Enable WASM bindings via wasm-bindgen

mod attributes;
mod chips;
mod classify;
mod config;
mod controller;
mod resolver;
mod stub;
mod types;

#[cfg(feature = "wasm")]
mod wasm;

pub use attributes::Attributes;
pub use chips::{ChipEntity, ChipUpdate, ChipView, build_chips, compare};
pub use classify::{
    EXCLUDE_ON_STATUS_PATH, IconColor, ON_COLOR, ON_STATE, PASS_THRESHOLD, Tier,
    WARNING_THRESHOLD, classify, exclude_on_status_path, icon_color, is_active, is_numeric,
    is_positive_state, numeric_value, tier_color,
};
pub use config::{ConfigError, DEFAULT_STATUS_PATH, Feature, ScopeConfig, StubConfig, slug_from_url};
pub use controller::{CARD_NAME, NullPresenter, Presenter, StatusChips};
pub use resolver::{ScopeRule, in_area, resolve_candidates};
pub use stub::{status_count, suggest_scope};
pub use types::{AreaRef, DeviceRef, EntityRef, Registries, STATUS_LABEL, StateRecord};
