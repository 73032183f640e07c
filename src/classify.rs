//! Draggability classification.
//!
//! The markup's `draggable` class only marks a shape as a structural
//! candidate. Whether a candidate actually moves is policy: it must embed
//! at least one image from the allow-list of interactive assets. Keeping
//! the allow-list out of the markup lets policy change without touching
//! slide artwork.

use crate::deck::Deck;
use std::collections::HashSet;

/// The fixed set of asset identifiers whose presence makes a candidate
/// shape eligible for dragging.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    assets: HashSet<String>,
}

impl AllowList {
    /// Build an allow-list from asset identifiers.
    pub fn new<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assets: assets.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether an asset identifier is allowed to move.
    pub fn contains(&self, asset: &str) -> bool {
        self.assets.contains(asset)
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }
}

/// One-shot classification pass over every shape in the deck, run once
/// after all slides are populated.
///
/// Any pre-set draggable flag is discarded; a shape ends up draggable only
/// if it is a structural candidate and references an allow-listed image.
/// The flags are not revisited afterwards.
pub fn classify(deck: &mut Deck, allow_list: &AllowList) {
    let mut eligible = 0usize;
    let mut total = 0usize;
    for slide in deck.slides_mut() {
        for shape in slide.shapes_mut() {
            total += 1;
            shape.draggable =
                shape.candidate && shape.image_refs.iter().any(|r| allow_list.contains(r));
            if shape.draggable {
                eligible += 1;
            }
        }
    }
    log::debug!("classified {eligible} of {total} shapes as draggable");
}
