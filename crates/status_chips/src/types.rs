//! Host registry records
//!
//! Mirrors the slices of the host platform's live object that the chip engine
//! reads: the entity, device and area registries plus the current states.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;

/// Label every status entity carries unless a solo label overrides it.
pub const STATUS_LABEL: &str = "status";

/// Entity registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_id: String,
    /// Area the entity is placed in directly (may be unset in host data)
    #[serde(default)]
    pub area_id: Option<String>,
    /// Device owning the entity
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl EntityRef {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Default::default()
        }
    }

    pub fn with_area(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

/// Device registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    pub id: String,
    #[serde(default)]
    pub area_id: Option<String>,
}

impl DeviceRef {
    pub fn new(id: impl Into<String>, area_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            area_id: Some(area_id.into()),
        }
    }
}

/// Area registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRef {
    pub area_id: String,
}

impl AreaRef {
    pub fn new(area_id: impl Into<String>) -> Self {
        Self {
            area_id: area_id.into(),
        }
    }
}

/// Current state of one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl StateRecord {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: Attributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// One snapshot of the host registries.
///
/// Every map keeps the order of the source document; that order is the
/// "registry order" used for chip ordering and stub tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registries {
    #[serde(default)]
    pub entities: IndexMap<String, EntityRef>,
    #[serde(default)]
    pub devices: IndexMap<String, DeviceRef>,
    #[serde(default)]
    pub areas: IndexMap<String, AreaRef>,
    #[serde(default)]
    pub states: IndexMap<String, StateRecord>,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: EntityRef) -> &mut Self {
        self.entities.insert(entity.entity_id.clone(), entity);
        self
    }

    pub fn add_device(&mut self, device: DeviceRef) -> &mut Self {
        self.devices.insert(device.id.clone(), device);
        self
    }

    pub fn add_area(&mut self, area: AreaRef) -> &mut Self {
        self.areas.insert(area.area_id.clone(), area);
        self
    }

    pub fn add_state(&mut self, state: StateRecord) -> &mut Self {
        self.states.insert(state.entity_id.clone(), state);
        self
    }
}
