//! The slide deck and its navigation controller.

use crate::input::NavKey;
use crate::markup::{self, MarkupError};
use crate::slide::Slide;
use crate::storage::OffsetStore;

/// Snapshot of navigation control state for the host UI to apply: the
/// selector's value and whether the previous/next triggers are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    /// 1-based index of the active slide.
    pub value: usize,
    /// False exactly when the first slide is active.
    pub prev_enabled: bool,
    /// False exactly when the last slide is active.
    pub next_enabled: bool,
}

/// An ordered, non-empty set of slides with exactly one active at a time.
///
/// Owns the `current` index and enforces its bounds: navigation requests
/// are clamped into `1..=N`, never wrapped or rejected. Whenever the
/// visible slide changes, persisted offsets for it are re-applied.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
    current: usize,
}

impl Deck {
    /// Build a deck from per-slide markup fragments. Slide 1 is active
    /// initially; at least one fragment is required.
    pub fn from_markup(fragments: &[&str]) -> Result<Self, MarkupError> {
        if fragments.is_empty() {
            return Err(MarkupError::NoSlides);
        }
        let mut slides = Vec::with_capacity(fragments.len());
        for (i, fragment) in fragments.iter().enumerate() {
            let mut slide = Slide::new(i + 1);
            for shape in markup::parse_slide(fragment)? {
                slide.add_shape(shape);
            }
            slides.push(slide);
        }
        Ok(Self::new(slides))
    }

    /// Build a deck from pre-constructed slides. `slides` must be
    /// non-empty; indices are renumbered to the contiguous range `1..=N`
    /// and slide 1 is made active.
    pub fn new(slides: Vec<Slide>) -> Self {
        debug_assert!(!slides.is_empty(), "a deck needs at least one slide");
        let mut deck = Self { slides, current: 1 };
        for (i, slide) in deck.slides.iter_mut().enumerate() {
            slide.index = i + 1;
            slide.active = i == 0;
        }
        deck
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// 1-based index of the active slide.
    pub fn current(&self) -> usize {
        self.current
    }

    /// The active slide.
    pub fn active_slide(&self) -> &Slide {
        &self.slides[self.current - 1]
    }

    /// Mutable access to the active slide.
    pub fn active_slide_mut(&mut self) -> &mut Slide {
        &mut self.slides[self.current - 1]
    }

    /// A slide by 1-based index.
    pub fn slide(&self, n: usize) -> Option<&Slide> {
        n.checked_sub(1).and_then(|i| self.slides.get(i))
    }

    /// Mutable access to a slide by 1-based index.
    pub fn slide_mut(&mut self, n: usize) -> Option<&mut Slide> {
        n.checked_sub(1).and_then(|i| self.slides.get_mut(i))
    }

    /// All slides in order.
    pub fn slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Mutable iteration over all slides.
    pub fn slides_mut(&mut self) -> impl Iterator<Item = &mut Slide> {
        self.slides.iter_mut()
    }

    /// Activate slide `n`, clamped into `1..=N`, and re-apply its persisted
    /// offsets. Idempotent; showing the current slide again is safe.
    pub fn show(&mut self, n: usize, offsets: &OffsetStore) {
        let n = n.clamp(1, self.slides.len());
        self.slides[self.current - 1].active = false;
        self.current = n;
        let slide = &mut self.slides[n - 1];
        slide.active = true;
        slide.apply_offsets(offsets);
        log::debug!("showing slide {n}");
    }

    /// Advance to the next slide (no-op on the last one).
    pub fn next(&mut self, offsets: &OffsetStore) {
        self.show(self.current + 1, offsets);
    }

    /// Go back to the previous slide (no-op on the first one).
    pub fn previous(&mut self, offsets: &OffsetStore) {
        self.show(self.current.saturating_sub(1), offsets);
    }

    /// Map a keyboard shortcut to its navigation action.
    pub fn handle_nav_key(&mut self, key: NavKey, offsets: &OffsetStore) {
        match key {
            NavKey::Left => self.previous(offsets),
            NavKey::Right => self.next(offsets),
        }
    }

    /// Drop every stored offset for the current slide and re-apply the
    /// now-empty state, snapping its shapes back to their base placement.
    pub fn reset_current(&mut self, offsets: &mut OffsetStore) {
        offsets.reset_slide(self.current);
        self.slides[self.current - 1].apply_offsets(offsets);
    }

    /// Current navigation control state for the host UI.
    pub fn nav_controls(&self) -> NavControls {
        NavControls {
            value: self.current,
            prev_enabled: self.current > 1,
            next_enabled: self.current < self.slides.len(),
        }
    }

    /// Option labels `"1"..="N"` for the host's slide selector control.
    pub fn selector_options(&self) -> Vec<String> {
        (1..=self.slides.len()).map(|n| n.to_string()).collect()
    }
}
