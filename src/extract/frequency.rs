//! The frequency extraction method: keep the most common matches.

use super::FrequencyOptions;
use crate::{Color, Palette};
use std::cmp::Reverse;

/// Counts how many samples matched each palette color.
pub(super) struct Frequency<'a> {
    /// The palette the matches index into.
    palette: &'a Palette,
    /// The number of matches for each palette color.
    counts: Vec<u32>,
}

impl<'a> Frequency<'a> {
    /// Creates a new [`Frequency`] with all counts at zero.
    pub(super) fn new(palette: &'a Palette) -> Self {
        Self { palette, counts: vec![0; palette.len()] }
    }

    /// Counts a match for the palette color at index `i`.
    pub(super) fn add(&mut self, i: usize) {
        self.counts[i] = self.counts[i].saturating_add(1);
    }

    /// Returns up to `top` matched colors by descending count, ties in palette order.
    pub(super) fn into_colors(self, options: FrequencyOptions) -> Vec<&'a Color> {
        let Self { palette, counts } = self;

        let mut order = (0..palette.len())
            .filter(|&i| counts[i] > 0)
            .collect::<Vec<_>>();

        // stable sort, so equal counts keep palette order
        order.sort_by_key(|&i| Reverse(counts[i]));

        order
            .into_iter()
            .take(options.top)
            .map(|i| &palette[i])
            .collect()
    }
}
