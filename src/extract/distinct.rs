//! The distinct extraction method: keep matches that are far apart in RGB.

use super::DistinctOptions;
use crate::{rgb_distance, Color, Palette};
use bitvec::vec::BitVec;
use std::ops::ControlFlow;

/// Accumulates palette matches that are far enough apart from each other.
pub(super) struct Distinct<'a> {
    /// The palette the matches index into.
    palette: &'a Palette,
    /// The distance and cap options.
    options: DistinctOptions,
    /// Whether each palette color has already been kept or rejected.
    seen: BitVec,
    /// The kept colors in discovery order.
    kept: Vec<&'a Color>,
}

impl<'a> Distinct<'a> {
    /// Creates a new, empty [`Distinct`].
    pub(super) fn new(palette: &'a Palette, options: DistinctOptions) -> Self {
        Self {
            palette,
            options,
            seen: BitVec::repeat(false, palette.len()),
            kept: Vec::with_capacity(options.max_colors.min(palette.len())),
        }
    }

    /// Considers the palette color at index `i`,
    /// breaking once `max_colors` colors have been kept.
    pub(super) fn add(&mut self, i: usize) -> ControlFlow<()> {
        // `kept` only grows, so a rejected color stays rejected
        if !self.seen.replace(i, true) {
            let color = &self.palette[i];
            let DistinctOptions { threshold, max_colors } = self.options;

            if self
                .kept
                .iter()
                .all(|kept| rgb_distance(kept.srgb(), color.srgb()) > threshold)
            {
                self.kept.push(color);
                if self.kept.len() >= max_colors {
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Returns the kept colors in discovery order.
    pub(super) fn into_colors(self) -> Vec<&'a Color> {
        self.kept
    }
}
