//! The browser controller.
//!
//! Owns everything a page session needs: the loaded catalog, the current
//! filter state, the current view, and the lazy image loader. Initialization
//! runs in a fixed order and stops at the first step that fails:
//!
//! ```text
//! load index ──▶ derive vocabularies ──▶ initial render ──▶ arm lazy loading
//!     │
//!     └─ failure: error view, no vocabularies, no grid, no further work
//! ```
//!
//! Every event afterwards is a full synchronous recompute: dispatch the event
//! into a new filter state, render from scratch, re-arm lazy loading.

use crate::catalog::{self, Catalog, Vocabularies};
use crate::filter::{self, FilterEvent, FilterState};
use crate::lazy::{ImageSlot, LazyLoader, VisibilityObserver};
use crate::render::{self, View};
use std::path::Path;
use tracing::{debug, error};

pub struct Browser<O> {
    catalog: Option<Catalog>,
    state: FilterState,
    view: View,
    lazy: LazyLoader<O>,
    renders: usize,
}

impl<O: VisibilityObserver> Browser<O> {
    /// Load the index at `path` and render the initial view.
    ///
    /// A load failure is terminal for this session: the returned browser
    /// shows an error view and ignores every subsequent event.
    pub fn open(path: &Path, observer: O) -> Self {
        match catalog::load(path) {
            Ok(catalog) => Self::with_catalog(catalog, observer),
            Err(e) => {
                error!("{e}");
                Self {
                    catalog: None,
                    state: FilterState::default(),
                    view: View::Error {
                        message: format!(
                            "Failed to load archive data. Make sure {} exists.",
                            path.display()
                        ),
                    },
                    lazy: LazyLoader::new(observer),
                    renders: 0,
                }
            }
        }
    }

    pub fn with_catalog(catalog: Catalog, observer: O) -> Self {
        let mut browser = Self {
            catalog: Some(catalog),
            state: FilterState::default(),
            view: View::Empty,
            lazy: LazyLoader::new(observer),
            renders: 0,
        };
        browser.rerender();
        browser
    }

    /// Apply a control event and rebuild the view.
    pub fn handle(&mut self, event: FilterEvent) -> &View {
        if self.catalog.is_some() {
            self.state = filter::dispatch(&self.state, event);
            self.rerender();
        }
        &self.view
    }

    fn rerender(&mut self) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        self.view = render::render(&self.state, catalog);
        self.renders += 1;
        debug!(
            render = self.renders,
            cells = self.view.cells().len(),
            "rendered view"
        );
        let sources: Vec<String> = self
            .view
            .cells()
            .iter()
            .map(|c| c.image.src.clone())
            .collect();
        self.lazy.arm(sources);
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Filter choices, or `None` when the index failed to load.
    pub fn vocabularies(&self) -> Option<&Vocabularies> {
        self.catalog.as_ref().map(Catalog::vocabularies)
    }

    /// Number of renders performed so far.
    pub fn renders(&self) -> usize {
        self.renders
    }

    pub fn image_slots(&self) -> Vec<ImageSlot> {
        self.lazy.slots()
    }

    pub fn observer_mut(&mut self) -> &mut O {
        self.lazy.observer_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;
    use crate::lazy::{OnVisible, PlaceholderId};
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingObserver {
        observed: Vec<PlaceholderId>,
        fire: bool,
    }

    impl VisibilityObserver for CountingObserver {
        fn observe(&mut self, id: PlaceholderId, on_visible: OnVisible) {
            self.observed.push(id);
            if self.fire {
                on_visible(id);
            }
        }

        fn disconnect(&mut self) {
            self.observed.clear();
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_index(&index_of(&[
            (
                "2022",
                vec![
                    record("2022", "alban_ovanessian", "01", "bts"),
                    record("2022", "kim", "01", "final"),
                ],
            ),
            ("2023", vec![record("2023", "kim", "02", "bts")]),
        ]))
    }

    #[test]
    fn initial_render_shows_everything() {
        let browser = Browser::with_catalog(catalog(), CountingObserver::default());
        assert_eq!(browser.view().cells().len(), 3);
        assert_eq!(browser.renders(), 1);
        assert_eq!(browser.state(), &FilterState::default());
    }

    #[test]
    fn initial_render_arms_lazy_loading() {
        let browser = Browser::with_catalog(catalog(), CountingObserver::default());
        let slots = browser.image_slots();
        assert_eq!(slots.len(), 3);
        assert!(slots.iter().all(|s| !s.is_active()));
    }

    #[test]
    fn events_rerender_and_rearm() {
        let mut browser = Browser::with_catalog(catalog(), CountingObserver::default());
        let view = browser.handle(FilterEvent::YearClicked(Selection::only("2022")));
        assert_eq!(view.cells().len(), 2);
        assert_eq!(browser.renders(), 2);
        assert_eq!(browser.image_slots().len(), 2);
        assert_eq!(browser.observer_mut().observed, vec![0, 1]);
    }

    #[test]
    fn empty_result_arms_nothing() {
        let mut browser = Browser::with_catalog(catalog(), CountingObserver::default());
        browser.handle(FilterEvent::YearClicked(Selection::only("2023")));
        let view = browser.handle(FilterEvent::MediumClicked(Selection::only("final")));
        assert_eq!(view, &View::Empty);
        assert!(browser.image_slots().is_empty());
        assert!(browser.observer_mut().observed.is_empty());
    }

    #[test]
    fn visible_images_activate() {
        let observer = CountingObserver {
            fire: true,
            ..CountingObserver::default()
        };
        let browser = Browser::with_catalog(catalog(), observer);
        assert!(browser.image_slots().iter().all(ImageSlot::is_active));
    }

    #[test]
    fn vocabularies_available_after_load() {
        let browser = Browser::with_catalog(catalog(), CountingObserver::default());
        let vocab = browser.vocabularies().unwrap();
        assert_eq!(vocab.artists, vec!["Alban Ovanessian", "Kim"]);
        assert_eq!(vocab.media, vec!["bts", "final"]);
    }

    #[test]
    fn missing_index_is_terminal() {
        let tmp = TempDir::new().unwrap();
        let mut browser = Browser::open(
            &tmp.path().join("archive-data.json"),
            CountingObserver::default(),
        );

        assert!(matches!(browser.view(), View::Error { .. }));
        assert!(browser.vocabularies().is_none());

        browser.handle(FilterEvent::YearClicked(Selection::only("2022")));
        assert!(matches!(browser.view(), View::Error { .. }));
        assert_eq!(browser.renders(), 0);
        assert!(browser.image_slots().is_empty());
        assert!(browser.observer_mut().observed.is_empty());
        assert_eq!(browser.state(), &FilterState::default());
    }

    #[test]
    fn open_loads_existing_index() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("archive-data.json");
        let index = index_of(&[("2022", vec![record("2022", "kim", "01", "final")])]);
        std::fs::write(&path, serde_json::to_string(&index).unwrap()).unwrap();

        let browser = Browser::open(&path, CountingObserver::default());
        assert_eq!(browser.view().cells().len(), 1);
        assert!(browser.catalog().is_some());
    }
}
