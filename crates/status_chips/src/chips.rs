//! Chip construction and visibility
//!
//! Joins candidate entities with their current states, drops chips hidden by
//! the optional feature, and detects whether a rebuilt list differs from the
//! one already shown.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::attributes::Attributes;
use crate::classify::{self, IconColor, Tier};
use crate::types::{EntityRef, StateRecord};

/// A candidate entity joined with its current state.
///
/// Never mutated after construction; a new list replaces the old one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChipEntity {
    pub entity_id: String,
    /// `None` when the state registry has no record for the entity
    pub state: Option<String>,
    pub attributes: Attributes,
}

impl ChipEntity {
    pub fn new(entity_id: impl Into<String>, state: Option<String>, attributes: Attributes) -> Self {
        Self {
            entity_id: entity_id.into(),
            state,
            attributes,
        }
    }

    /// Join an entity with its state record (keyed by `entity_id`).
    pub fn join(entity: &EntityRef, states: &IndexMap<String, StateRecord>) -> Self {
        match states.get(&entity.entity_id) {
            Some(record) => Self::new(
                entity.entity_id.clone(),
                Some(record.state.clone()),
                record.attributes.clone(),
            ),
            None => Self::new(entity.entity_id.clone(), None, Attributes::default()),
        }
    }

    pub fn tier(&self) -> Tier {
        classify::classify(self.state.as_deref(), &self.attributes)
    }

    pub fn is_active(&self) -> bool {
        classify::is_active(self.state.as_deref(), &self.attributes)
    }

    pub fn is_positive_state(&self) -> bool {
        classify::is_positive_state(self.state.as_deref())
    }

    pub fn icon_color(&self) -> IconColor {
        classify::icon_color(self.state.as_deref(), &self.attributes)
    }

    pub fn exclude_on_status_path(&self) -> bool {
        classify::exclude_on_status_path(&self.attributes)
    }

    /// Snapshot of the chip with every derived view resolved.
    pub fn view(&self) -> ChipView {
        let tier = self.tier();
        ChipView {
            entity_id: self.entity_id.clone(),
            state: self.state.clone(),
            attributes: self.attributes.clone(),
            tier,
            icon_color: classify::tier_color(tier, &self.attributes),
            is_active: tier == Tier::Error,
            exclude_on_status_path: self.exclude_on_status_path(),
        }
    }
}

/// Display-ready chip handed to the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChipView {
    pub entity_id: String,
    pub state: Option<String>,
    #[ts(type = "Record<string, unknown>")]
    pub attributes: Attributes,
    pub tier: Tier,
    #[ts(type = "string")]
    pub icon_color: IconColor,
    pub is_active: bool,
    pub exclude_on_status_path: bool,
}

/// Build the ordered chip list for the given candidates.
///
/// With `optional` set, chips flagged `exclude_on_status_path` are dropped
/// whatever their tier.
pub fn build_chips<'e>(
    candidates: impl IntoIterator<Item = &'e EntityRef>,
    states: &IndexMap<String, StateRecord>,
    optional: bool,
) -> Vec<ChipEntity> {
    candidates
        .into_iter()
        .map(|entity| ChipEntity::join(entity, states))
        .filter(|chip| !(optional && chip.exclude_on_status_path()))
        .collect()
}

/// Result of comparing a rebuilt chip list with the retained one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChipUpdate {
    pub chips: Vec<ChipEntity>,
    /// False when the new list is deep-equal to the previous one
    pub changed: bool,
}

/// Compare a freshly built list against the previous one.
pub fn compare(previous: Option<&[ChipEntity]>, chips: Vec<ChipEntity>) -> ChipUpdate {
    let changed = previous != Some(chips.as_slice());
    ChipUpdate { chips, changed }
}
