//! Chip controller
//!
//! Owns one card's scope configuration and the chip list last handed to the
//! presentation side. Each registry push runs a full resolution pass; the
//! presenter is only called when the rebuilt list differs.

use tracing::{debug, info};

use crate::chips::{self, ChipEntity, ChipView};
use crate::config::{ScopeConfig, slug_from_url};
use crate::resolver::resolve_candidates;
use crate::types::Registries;

pub const CARD_NAME: &str = "toolbar-status-chips";

/// Rendering seam. Receives every new chip list, including empty ones.
pub trait Presenter {
    fn present(&mut self, chips: &[ChipView]);
}

impl<F> Presenter for F
where
    F: FnMut(&[ChipView]),
{
    fn present(&mut self, chips: &[ChipView]) {
        self(chips)
    }
}

/// Presenter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _chips: &[ChipView]) {}
}

pub struct StatusChips<P: Presenter> {
    config: ScopeConfig,
    slug: Option<String>,
    chips: Option<Vec<ChipEntity>>,
    presenter: P,
}

impl<P: Presenter> StatusChips<P> {
    pub fn new(config: ScopeConfig, presenter: P) -> Self {
        info!("{} v{}", CARD_NAME, env!("CARGO_PKG_VERSION"));
        Self {
            config,
            slug: None,
            chips: None,
            presenter,
        }
    }

    /// Take the fallback area from the dashboard URL.
    pub fn with_url(mut self, url: &str) -> Self {
        self.slug = slug_from_url(url);
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn area(&self) -> &str {
        self.config.resolve_area(self.slug.as_deref())
    }

    pub fn status_path(&self) -> &str {
        self.config.status_path()
    }

    pub fn optional(&self) -> bool {
        self.config.is_optional(self.slug.as_deref())
    }

    /// Chips currently presented (empty before the first push).
    pub fn chips(&self) -> &[ChipEntity] {
        self.chips.as_deref().unwrap_or_default()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Replace the configuration unless it is deep-equal to the current one.
    pub fn set_config(&mut self, config: ScopeConfig) -> bool {
        if config == self.config {
            return false;
        }
        debug!(?config, "scope configuration replaced");
        self.config = config;
        true
    }

    /// Run one resolution pass over a registry snapshot.
    ///
    /// Returns whether a new chip list was presented.
    pub fn update(&mut self, registries: &Registries) -> bool {
        let candidates = resolve_candidates(
            &registries.entities,
            &registries.devices,
            &self.config,
            self.slug.as_deref(),
        );
        let built = chips::build_chips(candidates, &registries.states, self.optional());
        let update = chips::compare(self.chips.as_deref(), built);

        if !update.changed {
            debug!(count = update.chips.len(), "chip list unchanged");
            return false;
        }

        let views: Vec<ChipView> = update.chips.iter().map(ChipEntity::view).collect();
        info!(count = views.len(), area = %self.area(), "presenting chips");
        self.chips = Some(update.chips);
        self.presenter.present(&views);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::classify::Tier;
    use crate::config::Feature;
    use crate::types::{DeviceRef, EntityRef, StateRecord};

    /// Records every list it is handed.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Vec<ChipView>>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, chips: &[ChipView]) {
            self.calls.push(chips.to_vec());
        }
    }

    fn registries() -> Registries {
        let mut r = Registries::new();
        r.add_entity(
            EntityRef::new("light.living_room")
                .with_area("living_room")
                .with_device("device_1")
                .with_label("status"),
        )
        .add_state(StateRecord::new("light.living_room", "on"));
        r
    }

    #[test]
    fn test_first_push_presents() {
        let mut card = StatusChips::new(ScopeConfig::new().with_status_path("home"), Recorder::default())
            .with_slug("home");
        assert!(card.update(&registries()));
        assert_eq!(card.chips().len(), 1);
        assert_eq!(card.presenter().calls.len(), 1);
        assert_eq!(card.presenter().calls[0][0].tier, Tier::Error);
    }

    #[test]
    fn test_identical_push_is_suppressed() {
        let mut card = StatusChips::new(ScopeConfig::new(), Recorder::default()).with_slug("home");
        let snapshot = registries();
        assert!(card.update(&snapshot));
        // a new snapshot object with the same content
        assert!(!card.update(&snapshot.clone()));
        assert_eq!(card.presenter().calls.len(), 1);
    }

    #[test]
    fn test_state_change_is_presented() {
        let mut card = StatusChips::new(ScopeConfig::new(), Recorder::default()).with_slug("home");
        let mut snapshot = registries();
        card.update(&snapshot);

        snapshot.add_state(StateRecord::new("light.living_room", "off"));
        assert!(card.update(&snapshot));
        assert_eq!(card.presenter().calls.len(), 2);
        assert_eq!(card.presenter().calls[1][0].tier, Tier::Pass);
    }

    #[test]
    fn test_empty_list_is_presented_once() {
        let mut card = StatusChips::new(ScopeConfig::new().with_area("garage"), Recorder::default());
        assert!(card.update(&registries()));
        assert!(!card.update(&registries()));
        assert_eq!(card.presenter().calls, vec![Vec::<ChipView>::new()]);
    }

    #[test]
    fn test_area_filter_through_device() {
        let mut r = registries();
        r.add_device(DeviceRef::new("device1", "test_area"));
        r.entities["light.living_room"].device_id = Some("device1".into());

        let mut card = StatusChips::new(ScopeConfig::new().with_area("test_area"), NullPresenter);
        card.update(&r);
        assert_eq!(card.chips().len(), 1);
    }

    #[test]
    fn test_solo_label() {
        let mut r = registries();
        r.entities["light.living_room"].labels = ["test_label".to_string()].into();

        let mut card = StatusChips::new(ScopeConfig::new().with_solo_label("test_label"), NullPresenter);
        card.update(&r);
        assert_eq!(card.chips().len(), 1);
    }

    #[test]
    fn test_status_path_hides_excluded_chips() {
        let mut r = registries();
        r.add_state(
            StateRecord::new("light.living_room", "on")
                .with_attributes(Attributes::new().with("exclude_on_status_path", true)),
        );

        let mut on_home = StatusChips::new(ScopeConfig::new(), NullPresenter).with_slug("home");
        assert!(on_home.optional());
        on_home.update(&r);
        assert!(on_home.chips().is_empty());

        let mut in_room = StatusChips::new(ScopeConfig::new(), NullPresenter).with_slug("living_room");
        assert!(!in_room.optional());
        in_room.update(&r);
        assert_eq!(in_room.chips().len(), 1);

        let mut forced = StatusChips::new(ScopeConfig::new().with_feature(Feature::Optional), NullPresenter)
            .with_slug("living_room");
        forced.update(&r);
        assert!(forced.chips().is_empty());
    }

    #[test]
    fn test_set_config_only_on_change() {
        let mut card = StatusChips::new(ScopeConfig::new().with_area(""), NullPresenter);
        assert!(!card.set_config(ScopeConfig::new().with_area("")));
        assert!(card.set_config(ScopeConfig::new().with_area("kitchen")));
        assert_eq!(card.area(), "kitchen");
    }

    #[test]
    fn test_slug_from_url_fallback() {
        let card = StatusChips::new(ScopeConfig::new(), NullPresenter)
            .with_url("http://ha.local/dashboard-rooms/living-room?edit=1");
        assert_eq!(card.slug(), Some("living_room"));
        assert_eq!(card.area(), "living_room");
        assert_eq!(card.status_path(), "home");
    }

    #[test]
    fn test_closure_presenter() {
        let mut seen = 0usize;
        {
            let mut card = StatusChips::new(ScopeConfig::new(), |chips: &[ChipView]| seen += chips.len())
                .with_slug("home");
            card.update(&registries());
        }
        assert_eq!(seen, 1);
    }
}
