//! Deferred image loading.
//!
//! Each grid cell starts with a deferred image: its source is known but no
//! fetch has been requested. A [`VisibilityObserver`] reports when a
//! placeholder first comes within the lookahead margin of the viewport; the
//! [`LazyLoader`] then promotes that image to active. Promotion is one-shot:
//! an active image is never observed again and never unloaded.
//!
//! Re-arming the loader for a new grid disconnects the observer and replaces
//! the slot table, so callbacks registered for the previous grid can no
//! longer reach the new one.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Position of a placeholder in the rendered grid.
pub type PlaceholderId = usize;

/// Invoked once, when the placeholder first intersects the viewport.
pub type OnVisible = Box<dyn FnOnce(PlaceholderId)>;

/// Visibility detection primitive.
///
/// Implementations must fire each registered callback at most once and stop
/// watching the placeholder afterwards.
pub trait VisibilityObserver {
    fn observe(&mut self, id: PlaceholderId, on_visible: OnVisible);
    /// Drop every pending registration.
    fn disconnect(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    /// Source known, nothing fetched yet.
    Deferred { src: String },
    /// Fetch requested.
    Active { src: String },
}

impl ImageSlot {
    pub fn src(&self) -> &str {
        match self {
            ImageSlot::Deferred { src } | ImageSlot::Active { src } => src,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ImageSlot::Active { .. })
    }
}

type Slots = Rc<RefCell<Vec<ImageSlot>>>;

pub struct LazyLoader<O> {
    observer: O,
    slots: Slots,
}

impl<O: VisibilityObserver> LazyLoader<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            slots: Rc::default(),
        }
    }

    /// Replace the watched set with `sources`, one deferred slot each.
    pub fn arm<I>(&mut self, sources: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.observer.disconnect();
        let slots: Vec<ImageSlot> = sources
            .into_iter()
            .map(|src| ImageSlot::Deferred { src })
            .collect();
        let count = slots.len();
        self.slots = Rc::new(RefCell::new(slots));

        for id in 0..count {
            let slots = Rc::clone(&self.slots);
            self.observer
                .observe(id, Box::new(move |id| promote(&slots, id)));
        }
    }

    /// Stop watching and forget every slot.
    pub fn clear(&mut self) {
        self.arm(std::iter::empty());
    }

    pub fn slots(&self) -> Vec<ImageSlot> {
        self.slots.borrow().clone()
    }

    pub fn active_count(&self) -> usize {
        self.slots.borrow().iter().filter(|s| s.is_active()).count()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

fn promote(slots: &Slots, id: PlaceholderId) {
    let mut slots = slots.borrow_mut();
    if let Some(slot) = slots.get_mut(id)
        && let ImageSlot::Deferred { src } = slot
    {
        *slot = ImageSlot::Active {
            src: std::mem::take(src),
        };
    }
}

/// Geometry of a grid scrolled inside a fixed-height viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: usize,
    pub row_height: u32,
    pub viewport_height: u32,
    /// Lookahead in pixels on both edges of the viewport.
    pub margin: u32,
}

impl GridGeometry {
    fn row_span(&self, id: PlaceholderId) -> (u64, u64) {
        let row = (id / self.columns.max(1)) as u64;
        let top = row * u64::from(self.row_height);
        (top, top + u64::from(self.row_height))
    }
}

/// Observer that computes intersection from grid geometry and a scroll offset.
///
/// Placeholders already inside the expanded viewport fire as soon as they are
/// observed; the rest fire on the [`scroll_to`](Self::scroll_to) that brings
/// them into range.
pub struct ViewportObserver {
    geometry: GridGeometry,
    scroll: u64,
    pending: BTreeMap<PlaceholderId, OnVisible>,
}

impl ViewportObserver {
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            scroll: 0,
            pending: BTreeMap::new(),
        }
    }

    fn intersects(&self, id: PlaceholderId) -> bool {
        let (top, bottom) = self.geometry.row_span(id);
        let margin = u64::from(self.geometry.margin);
        let start = self.scroll.saturating_sub(margin);
        let end = self.scroll + u64::from(self.geometry.viewport_height) + margin;
        bottom > start && top < end
    }

    /// Move the viewport and fire every newly intersecting placeholder.
    pub fn scroll_to(&mut self, offset: u64) {
        self.scroll = offset;
        let visible: Vec<PlaceholderId> = self
            .pending
            .keys()
            .copied()
            .filter(|&id| self.intersects(id))
            .collect();
        for id in visible {
            if let Some(callback) = self.pending.remove(&id) {
                callback(id);
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl VisibilityObserver for ViewportObserver {
    fn observe(&mut self, id: PlaceholderId, on_visible: OnVisible) {
        if self.intersects(id) {
            on_visible(id);
        } else {
            self.pending.insert(id, on_visible);
        }
    }

    fn disconnect(&mut self) {
        self.pending.clear();
    }
}
