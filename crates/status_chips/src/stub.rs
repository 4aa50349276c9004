//! Stub configuration heuristic
//!
//! Proposes a default area for a new card: the area holding the most status
//! entities. Earlier areas win ties; areas without status entities are never
//! proposed.

use indexmap::IndexMap;
use tracing::debug;

use crate::config::StubConfig;
use crate::resolver::in_area;
use crate::types::{AreaRef, DeviceRef, EntityRef, Registries, STATUS_LABEL};

/// Count status-labelled entities placed in `area` (directly or via device).
pub fn status_count(
    area: &str,
    devices: &IndexMap<String, DeviceRef>,
    entities: &IndexMap<String, EntityRef>,
) -> usize {
    entities
        .values()
        .filter(|entity| in_area(entity, devices, area) && entity.has_label(STATUS_LABEL))
        .count()
}

/// Suggest a scope by ranking areas on status entity count.
pub fn suggest_scope(
    areas: &IndexMap<String, AreaRef>,
    devices: &IndexMap<String, DeviceRef>,
    entities: &IndexMap<String, EntityRef>,
) -> StubConfig {
    let mut best: Option<(&str, usize)> = None;

    for area_id in areas.keys() {
        let count = status_count(area_id, devices, entities);
        debug!(area = %area_id, count, "ranked area");

        if count > best.map_or(0, |(_, max)| max) {
            best = Some((area_id.as_str(), count));
        }
    }

    StubConfig {
        area: best.map(|(area, _)| area.to_string()).unwrap_or_default(),
    }
}

impl Registries {
    /// [`suggest_scope`] over this snapshot.
    pub fn stub_config(&self) -> StubConfig {
        suggest_scope(&self.areas, &self.devices, &self.entities)
    }
}
