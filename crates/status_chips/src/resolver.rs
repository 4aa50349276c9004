//! Candidate resolution
//!
//! Decides which registry entities may become chips for a scope. The scoping
//! options are evaluated as an ordered rule chain; the first rule whose guard
//! holds is the only one applied:
//!
//! | guard                              | rule              |
//! |------------------------------------|-------------------|
//! | `solo_label` set                   | [`ScopeRule::Solo`] |
//! | `additional_label` set             | [`ScopeRule::AdditionalLabel`] |
//! | area differs from the status path  | [`ScopeRule::Area`] |
//! | otherwise                          | [`ScopeRule::StatusPath`] |

use indexmap::IndexMap;
use tracing::trace;

use crate::config::ScopeConfig;
use crate::types::{DeviceRef, EntityRef, STATUS_LABEL};

/// The scoping rule selected for one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRule<'a> {
    /// Entities carrying the solo label, nothing else considered
    Solo(&'a str),
    /// Status entities that also carry the additional label
    AdditionalLabel(&'a str),
    /// Status entities in the area, directly or through their device
    Area(&'a str),
    /// Every status entity
    StatusPath,
}

impl<'a> ScopeRule<'a> {
    /// Pick the rule for a scope. `slug` stands in for an unset area.
    pub fn select(scope: &'a ScopeConfig, slug: Option<&'a str>) -> Self {
        if let Some(label) = scope.solo_label() {
            return ScopeRule::Solo(label);
        }
        if let Some(label) = scope.additional_label() {
            return ScopeRule::AdditionalLabel(label);
        }
        let area = scope.resolve_area(slug);
        if area != scope.status_path() {
            return ScopeRule::Area(area);
        }
        ScopeRule::StatusPath
    }

    pub fn matches(&self, entity: &EntityRef, devices: &IndexMap<String, DeviceRef>) -> bool {
        match self {
            ScopeRule::Solo(label) => entity.has_label(label),
            ScopeRule::AdditionalLabel(label) => {
                entity.has_label(STATUS_LABEL) && entity.has_label(label)
            }
            ScopeRule::Area(area) => {
                entity.has_label(STATUS_LABEL) && in_area(entity, devices, area)
            }
            ScopeRule::StatusPath => entity.has_label(STATUS_LABEL),
        }
    }
}

/// Whether the entity sits in `area`, either directly or via its device.
///
/// Unknown devices and unset ids never match; an empty area matches nothing.
pub fn in_area(entity: &EntityRef, devices: &IndexMap<String, DeviceRef>, area: &str) -> bool {
    if area.is_empty() {
        return false;
    }
    if entity.area_id.as_deref() == Some(area) {
        return true;
    }
    entity
        .device_id
        .as_deref()
        .and_then(|id| devices.get(id))
        .is_some_and(|device| device.area_id.as_deref() == Some(area))
}

/// Resolve the candidate entities for a scope, in registry order.
pub fn resolve_candidates<'e>(
    entities: &'e IndexMap<String, EntityRef>,
    devices: &IndexMap<String, DeviceRef>,
    scope: &ScopeConfig,
    slug: Option<&str>,
) -> Vec<&'e EntityRef> {
    let rule = ScopeRule::select(scope, slug);
    trace!(?rule, "resolving chip candidates");

    entities
        .values()
        .filter(|entity| rule.matches(entity, devices))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Registries;

    fn registries() -> Registries {
        let mut r = Registries::new();
        r.add_device(DeviceRef::new("device1", "kitchen"))
            .add_device(DeviceRef::new("device2", "garage"))
            .add_entity(
                EntityRef::new("light.kitchen")
                    .with_area("kitchen")
                    .with_label("status"),
            )
            .add_entity(
                EntityRef::new("sensor.fridge")
                    .with_device("device1")
                    .with_label("status")
                    .with_label("network"),
            )
            .add_entity(
                EntityRef::new("binary_sensor.garage_door")
                    .with_device("device2")
                    .with_label("status"),
            )
            .add_entity(EntityRef::new("light.unlabelled").with_area("kitchen"))
            .add_entity(
                EntityRef::new("switch.lab")
                    .with_device("missing_device")
                    .with_label("lab")
                    .with_label("status"),
            );
        r
    }

    fn ids(entities: Vec<&EntityRef>) -> Vec<&str> {
        entities.iter().map(|e| e.entity_id.as_str()).collect()
    }

    fn resolve<'r>(r: &'r Registries, scope: &ScopeConfig, slug: Option<&str>) -> Vec<&'r str> {
        ids(resolve_candidates(&r.entities, &r.devices, scope, slug))
    }

    #[test]
    fn test_rule_precedence() {
        let scope = ScopeConfig::new()
            .with_solo_label("lab")
            .with_additional_label("network")
            .with_area("kitchen");
        assert_eq!(ScopeRule::select(&scope, None), ScopeRule::Solo("lab"));

        let scope = ScopeConfig::new()
            .with_additional_label("network")
            .with_area("kitchen");
        assert_eq!(
            ScopeRule::select(&scope, None),
            ScopeRule::AdditionalLabel("network")
        );

        let scope = ScopeConfig::new().with_area("kitchen");
        assert_eq!(ScopeRule::select(&scope, None), ScopeRule::Area("kitchen"));

        let scope = ScopeConfig::new().with_area("home");
        assert_eq!(ScopeRule::select(&scope, None), ScopeRule::StatusPath);

        assert_eq!(
            ScopeRule::select(&ScopeConfig::new(), Some("home")),
            ScopeRule::StatusPath
        );
    }

    #[test]
    fn test_solo_label_bypasses_everything() {
        let r = registries();
        let scope = ScopeConfig::new()
            .with_solo_label("network")
            .with_additional_label("lab")
            .with_area("garage");
        assert_eq!(resolve(&r, &scope, None), vec!["sensor.fridge"]);
    }

    #[test]
    fn test_solo_label_does_not_require_status() {
        let mut r = registries();
        r.add_entity(EntityRef::new("sensor.solo_only").with_label("solo"));
        let scope = ScopeConfig::new().with_solo_label("solo");
        assert_eq!(resolve(&r, &scope, None), vec!["sensor.solo_only"]);
    }

    #[test]
    fn test_additional_label_ignores_area() {
        let r = registries();
        let scope = ScopeConfig::new()
            .with_additional_label("lab")
            .with_area("kitchen");
        assert_eq!(resolve(&r, &scope, None), vec!["switch.lab"]);
    }

    #[test]
    fn test_area_direct_and_via_device() {
        let r = registries();
        let scope = ScopeConfig::new().with_area("kitchen");
        assert_eq!(
            resolve(&r, &scope, None),
            vec!["light.kitchen", "sensor.fridge"]
        );
    }

    #[test]
    fn test_area_from_slug() {
        let r = registries();
        assert_eq!(
            resolve(&r, &ScopeConfig::new(), Some("garage")),
            vec!["binary_sensor.garage_door"]
        );
    }

    #[test]
    fn test_status_path_passes_all_status_entities() {
        let r = registries();
        let scope = ScopeConfig::new().with_area("home");
        assert_eq!(
            resolve(&r, &scope, None),
            vec![
                "light.kitchen",
                "sensor.fridge",
                "binary_sensor.garage_door",
                "switch.lab"
            ]
        );
    }

    #[test]
    fn test_custom_status_path() {
        let r = registries();
        let scope = ScopeConfig::new().with_status_path("overview");
        assert_eq!(resolve(&r, &scope, Some("overview")).len(), 4);
        // "home" is now an ordinary area with nothing in it
        assert!(resolve(&r, &scope, Some("home")).is_empty());
    }

    #[test]
    fn test_unknown_device_is_not_in_area() {
        let r = registries();
        let entity = &r.entities["switch.lab"];
        assert!(!in_area(entity, &r.devices, "kitchen"));
        assert!(!in_area(entity, &r.devices, ""));
    }
}
