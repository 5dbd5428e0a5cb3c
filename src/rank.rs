//! Contains the [`Ranker`] which finds the closest palette colors to a query color.

use crate::{
    lab_distance, rgb_distance, srgb_to_lab, DistanceMetric, Match, MatchError, Palette,
    PixelSource, Ranking,
};
use ordered_float::OrderedFloat;
use palette::Srgb;

/// The default number of matches to return from [`Ranker::rank`]:
/// the best match plus three suggestions.
pub const DEFAULT_SUGGESTIONS: usize = 4;

/// Returns the index and value of the first minimum distance.
#[inline]
fn argmin(distances: impl Iterator<Item = f32>) -> (usize, f32) {
    let mut min_index = 0;
    let mut min_distance = f32::INFINITY;
    for (i, distance) in distances.enumerate() {
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }
    (min_index, min_distance)
}

/// Ranks the colors of a [`Palette`] by their distance to a query color.
///
/// The palette is borrowed, so a single palette can be shared by any number of rankers.
/// A linear scan is done for each query, since palettes are expected to be small.
///
/// # Examples
/// ```
/// # use colorfinder::{Palette, Ranker, DistanceMetric, MatchError, DEFAULT_SUGGESTIONS};
/// # use palette::Srgb;
/// # fn main() -> Result<(), MatchError> {
/// let palette = Palette::sample();
/// let ranker = Ranker::new(&palette).metric(DistanceMetric::Lab);
///
/// let ranking = ranker.rank(Srgb::new(250, 30, 5), DEFAULT_SUGGESTIONS)?;
/// assert_eq!(ranking.best.color.name(), "Scarlet Red");
/// assert_eq!(ranking.rest.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Ranker<'a> {
    /// The palette to match against.
    palette: &'a Palette,
    /// The distance metric to rank by.
    metric: DistanceMetric,
}

impl<'a> Ranker<'a> {
    /// Creates a new [`Ranker`] for the given palette using the default [`DistanceMetric`].
    #[must_use]
    pub const fn new(palette: &'a Palette) -> Self {
        Self { palette, metric: DistanceMetric::Rgb }
    }

    /// Sets the distance metric to rank by.
    ///
    /// The default metric is [`DistanceMetric::Rgb`].
    #[must_use]
    pub const fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the palette this ranker matches against.
    #[must_use]
    pub const fn palette(&self) -> &'a Palette {
        self.palette
    }

    /// Returns the distance metric this ranker uses.
    #[must_use]
    pub const fn distance_metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Returns the index into the palette and the distance of the nearest palette color.
    ///
    /// If multiple palette colors are equally near, the earliest one is returned.
    #[must_use]
    pub fn nearest_index(&self, query: Srgb<u8>) -> (usize, f32) {
        match self.metric {
            DistanceMetric::Rgb => argmin(
                self.palette
                    .iter()
                    .map(|color| rgb_distance(query, color.srgb())),
            ),
            DistanceMetric::Lab => {
                let query = srgb_to_lab(query);
                argmin(self.palette.labs().iter().map(|&lab| lab_distance(query, lab)))
            }
        }
    }

    /// Returns the nearest palette color to `query`.
    #[must_use]
    pub fn nearest(&self, query: Srgb<u8>) -> Match<'a> {
        let (i, distance) = self.nearest_index(query);
        Match { color: &self.palette[i], distance }
    }

    /// Ranks the palette by distance to `query`, returning the best match and
    /// up to `k - 1` runner ups.
    ///
    /// The runner ups are in ascending order of distance, with ties broken by palette order.
    /// They never include a color with the same code as the best match,
    /// so `rest.len() == min(k - 1, palette.len() - 1)`.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidOptions`] if `k` is `0`.
    pub fn rank(&self, query: Srgb<u8>, k: usize) -> Result<Ranking<'a>, MatchError> {
        if k == 0 {
            return Err(MatchError::InvalidOptions("k must be at least 1"));
        }

        let mut matches = match self.metric {
            DistanceMetric::Rgb => self
                .palette
                .iter()
                .map(|color| Match {
                    color,
                    distance: rgb_distance(query, color.srgb()),
                })
                .collect::<Vec<_>>(),
            DistanceMetric::Lab => {
                let query = srgb_to_lab(query);
                self.palette
                    .iter()
                    .zip(self.palette.labs())
                    .map(|(color, &lab)| Match { color, distance: lab_distance(query, lab) })
                    .collect()
            }
        };

        // stable sort, so equal distances keep palette order
        matches.sort_by_key(|m| OrderedFloat(m.distance));

        let Some((&best, others)) = matches.split_first() else {
            return Err(MatchError::InvalidPalette("palette has no colors".to_owned()));
        };

        let rest = others
            .iter()
            .filter(|m| m.color.code() != best.color.code())
            .take(k - 1)
            .copied()
            .collect();

        Ok(Ranking { best, rest })
    }

    /// Reads the pixel at `(x, y)` from `source` and ranks it (see [`Ranker::rank`]).
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidPixel`] if `(x, y)` is outside of the image,
    /// or [`MatchError::InvalidOptions`] if `k` is `0`.
    pub fn rank_at(
        &self,
        source: &(impl PixelSource + ?Sized),
        x: u32,
        y: u32,
        k: usize,
    ) -> Result<Ranking<'a>, MatchError> {
        self.rank(source.pixel(x, y)?, k)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, Color, PixelBuffer};

    #[test]
    fn exact_white_and_black() {
        let palette = Palette::sample();
        for metric in [DistanceMetric::Rgb, DistanceMetric::Lab] {
            let ranker = Ranker::new(&palette).metric(metric);

            let white = ranker.rank(Srgb::new(255, 255, 255), DEFAULT_SUGGESTIONS).unwrap();
            assert_eq!(white.best.color.code(), "001");
            assert!(white.best.distance.abs() < 1e-6);

            let black = ranker.rank(Srgb::new(0, 0, 0), DEFAULT_SUGGESTIONS).unwrap();
            assert_eq!(black.best.color.code(), "002");
            assert!(black.best.distance.abs() < 1e-6);
        }
    }

    #[test]
    fn scarlet_red() {
        let palette = Palette::sample();
        let ranking = Ranker::new(&palette)
            .rank(Srgb::new(250, 30, 5), DEFAULT_SUGGESTIONS)
            .unwrap();

        assert_eq!(ranking.best.color.code(), "003");
        assert!((ranking.best.distance - 86f32.sqrt()).abs() < 1e-4);
        assert_eq!(ranking.rest.len(), 3);
        assert!(ranking.rest.iter().all(|m| m.color.code() != "003"));
        assert_eq!(ranking.rest[0].color.code(), "008");
    }

    #[test]
    fn sorted_and_best_is_minimum() {
        let palette = Palette::sample();
        for metric in [DistanceMetric::Rgb, DistanceMetric::Lab] {
            let ranker = Ranker::new(&palette).metric(metric);
            for color in test_pixels(256) {
                let ranking = ranker.rank(color, palette.len()).unwrap();
                let distances = ranking.iter().map(|m| m.distance).collect::<Vec<_>>();
                for i in 1..distances.len() {
                    assert!(distances[i - 1] <= distances[i]);
                }

                let min = palette
                    .iter()
                    .map(|c| OrderedFloat(metric.distance(color, c.srgb())))
                    .min()
                    .unwrap()
                    .0;
                assert!((ranking.best.distance - min).abs() < 1e-4);

                let (i, distance) = ranker.nearest_index(color);
                assert_eq!(palette[i].code(), ranking.best.color.code());
                #[allow(clippy::float_cmp)]
                {
                    assert_eq!(distance, ranking.best.distance);
                }
            }
        }
    }

    #[test]
    fn rest_length() {
        let palette = Palette::sample();
        let ranker = Ranker::new(&palette);
        for k in 1..=(palette.len() + 3) {
            let ranking = ranker.rank(Srgb::new(12, 200, 99), k).unwrap();
            assert_eq!(ranking.rest.len(), (k - 1).min(palette.len() - 1));
            assert!(ranking
                .rest
                .iter()
                .all(|m| m.color.code() != ranking.best.color.code()));
        }
    }

    #[test]
    fn zero_k() {
        let palette = Palette::sample();
        assert!(matches!(
            Ranker::new(&palette).rank(Srgb::new(1, 2, 3), 0),
            Err(MatchError::InvalidOptions(_))
        ));
    }

    #[test]
    fn ties_keep_palette_order() {
        let palette = Palette::new(vec![
            Color::new("a", "Gray", 128, 128, 128),
            Color::new("b", "Same Gray", 128, 128, 128),
            Color::new("c", "Black", 0, 0, 0),
        ])
        .unwrap();
        let ranker = Ranker::new(&palette);

        let ranking = ranker.rank(Srgb::new(128, 128, 128), 3).unwrap();
        assert_eq!(ranking.best.color.code(), "a");
        let rest = ranking.rest.iter().map(|m| m.color.code()).collect::<Vec<_>>();
        assert_eq!(rest, ["b", "c"]);
        assert_eq!(ranker.nearest(Srgb::new(128, 128, 128)).color.code(), "a");
    }

    #[test]
    fn single_color_palette() {
        let palette = Palette::new(vec![Color::new("only", "Only", 10, 20, 30)]).unwrap();
        let ranking = Ranker::new(&palette)
            .rank(Srgb::new(200, 200, 200), DEFAULT_SUGGESTIONS)
            .unwrap();
        assert_eq!(ranking.best.color.code(), "only");
        assert!(ranking.rest.is_empty());
    }

    #[test]
    fn rank_at_pixel() {
        let palette = Palette::sample();
        let ranker = Ranker::new(&palette);
        let buf = rgba_buffer(&[Srgb::new(0, 0, 0), Srgb::new(0, 130, 125)]);
        let pixels = PixelBuffer::new(&buf, 2, 1).unwrap();

        let ranking = ranker.rank_at(&pixels, 1, 0, DEFAULT_SUGGESTIONS).unwrap();
        assert_eq!(ranking.best.color.code(), "009");

        assert!(matches!(
            ranker.rank_at(&pixels, 2, 0, DEFAULT_SUGGESTIONS),
            Err(MatchError::InvalidPixel(_))
        ));
    }
}
