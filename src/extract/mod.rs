//! Contains the dominant color [`Extractor`] and its options.
//!
//! Extraction samples every `stride`-th pixel of an image (in row-major order),
//! reduces the samples to a few representative colors using one of the [`ExtractMethod`]s,
//! and returns the palette colors matching those representatives.
//! The returned colors never contain two colors with the same code.

mod distinct;
mod frequency;
pub mod kmeans;

use crate::{Color, MatchError, PixelSource, Ranker};
use distinct::Distinct;
use frequency::Frequency;
use palette::Srgb;
use std::{
    ops::ControlFlow,
    sync::atomic::{AtomicBool, Ordering},
};

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The number of samples to match between checks of the cancellation flag.
const BATCH_SIZE: usize = 4096;

/// A builder struct to specify the parameters for [`ExtractMethod::Distinct`].
///
/// # Examples
/// ```
/// # use colorfinder::DistinctOptions;
/// let options = DistinctOptions::new()
///     .threshold(80.0)
///     .max_colors(4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistinctOptions {
    /// The RGB distance a match must exceed to every kept match to also be kept.
    pub(crate) threshold: f32,
    /// The maximum number of colors to keep.
    pub(crate) max_colors: usize,
}

impl Default for DistinctOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DistinctOptions {
    /// Creates a new [`DistinctOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self { threshold: 50.0, max_colors: 6 }
    }

    /// Sets the minimum RGB distance between kept colors.
    ///
    /// A palette color is only kept if its RGB distance to every previously kept color
    /// is greater than this threshold. This is always measured in RGB,
    /// regardless of the ranker's [`DistanceMetric`](crate::DistanceMetric).
    ///
    /// The default threshold is `50.0`. Negative or `NAN` thresholds are invalid.
    #[must_use]
    pub const fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the maximum number of colors to return.
    /// Extraction stops as soon as this many colors have been found.
    ///
    /// The default is `6`. A value of `0` is invalid.
    #[must_use]
    pub const fn max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }
}

/// A builder struct to specify the parameters for [`ExtractMethod::Frequency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyOptions {
    /// The number of most frequent colors to return.
    pub(crate) top: usize,
}

impl Default for FrequencyOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyOptions {
    /// Creates a new [`FrequencyOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self { top: 10 }
    }

    /// Sets the number of most frequent palette colors to return.
    ///
    /// The default is `10`. A value of `0` is invalid.
    #[must_use]
    pub const fn top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }
}

/// A builder struct to specify the parameters for [`ExtractMethod::Kmeans`].
///
/// # Examples
/// ```
/// # use colorfinder::KmeansOptions;
/// let options = KmeansOptions::new()
///     .k(8)
///     .iterations(20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmeansOptions {
    /// The number of clusters.
    pub(crate) k: usize,
    /// The number of assignment and update steps to run.
    pub(crate) iterations: u32,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansOptions {
    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self { k: 5, iterations: 10 }
    }

    /// Sets the number of clusters (centroids).
    ///
    /// The default is `5`. A value of `0` is invalid.
    #[must_use]
    pub const fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the number of iterations to run.
    ///
    /// The default is `10`. With `0` iterations, the initial centroids are used as is.
    #[must_use]
    pub const fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

/// The set of supported methods to reduce the sampled pixels to a few palette colors.
///
/// Each method gives a different answer for the same image.
/// See the descriptions on each enum variant for more information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtractMethod {
    /// Match each sample to the palette and keep a match only if it is far enough
    /// from every previously kept match.
    ///
    /// This favors diversity. It is order dependent: colors found first win.
    /// The colors are returned in the order they were found.
    Distinct(DistinctOptions),
    /// Count how many samples match each palette color and return the most frequent colors.
    ///
    /// This favors coverage: a common color can crowd out a rare but distinct one.
    /// The colors are returned in descending order of frequency, with ties broken by palette order.
    Frequency(FrequencyOptions),
    /// Cluster the samples in RGB with k-means and match each centroid to the palette.
    ///
    /// The colors are returned in centroid order, skipping centroids
    /// that match an already returned color. See the [`kmeans`] module for more details.
    Kmeans(KmeansOptions),
}

impl ExtractMethod {
    /// Creates a new [`ExtractMethod::Distinct`] with the default [`DistinctOptions`].
    #[must_use]
    pub const fn distinct() -> Self {
        Self::Distinct(DistinctOptions::new())
    }

    /// Creates a new [`ExtractMethod::Frequency`] with the default [`FrequencyOptions`].
    #[must_use]
    pub const fn frequency() -> Self {
        Self::Frequency(FrequencyOptions::new())
    }

    /// Creates a new [`ExtractMethod::Kmeans`] with the default [`KmeansOptions`].
    #[must_use]
    pub const fn kmeans() -> Self {
        Self::Kmeans(KmeansOptions::new())
    }
}

impl Default for ExtractMethod {
    fn default() -> Self {
        Self::distinct()
    }
}

impl From<DistinctOptions> for ExtractMethod {
    fn from(options: DistinctOptions) -> Self {
        Self::Distinct(options)
    }
}

impl From<FrequencyOptions> for ExtractMethod {
    fn from(options: FrequencyOptions) -> Self {
        Self::Frequency(options)
    }
}

impl From<KmeansOptions> for ExtractMethod {
    fn from(options: KmeansOptions) -> Self {
        Self::Kmeans(options)
    }
}

/// A builder struct to specify how pixels are sampled and reduced.
///
/// # Examples
/// ```
/// # use colorfinder::{ExtractOptions, KmeansOptions};
/// let options = ExtractOptions::new()
///     .stride(25)
///     .method(KmeansOptions::new().k(3).into());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractOptions {
    /// Sample every `stride`-th pixel.
    pub(crate) stride: usize,
    /// The reduction method.
    pub(crate) method: ExtractMethod,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Creates a new [`ExtractOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self { stride: 100, method: ExtractMethod::distinct() }
    }

    /// Sets the sampling stride in pixels: every `stride`-th pixel in row-major order is sampled,
    /// starting with the first pixel.
    ///
    /// The default stride is `100` (every 400th byte of an RGBA buffer).
    /// A stride of `0` is invalid.
    #[must_use]
    pub const fn stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Sets the reduction method.
    ///
    /// The default method is [`ExtractMethod::Distinct`] with the default [`DistinctOptions`].
    #[must_use]
    pub const fn method(mut self, method: ExtractMethod) -> Self {
        self.method = method;
        self
    }

    /// Checks that every option is in its valid range.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidOptions`] describing the first invalid option.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.stride == 0 {
            return Err(MatchError::InvalidOptions("stride must be at least 1"));
        }
        match self.method {
            ExtractMethod::Distinct(DistinctOptions { threshold, max_colors }) => {
                if !(threshold >= 0.0 && threshold.is_finite()) {
                    Err(MatchError::InvalidOptions(
                        "threshold must be finite and non-negative",
                    ))
                } else if max_colors == 0 {
                    Err(MatchError::InvalidOptions("max_colors must be at least 1"))
                } else {
                    Ok(())
                }
            }
            ExtractMethod::Frequency(FrequencyOptions { top }) => {
                if top == 0 {
                    Err(MatchError::InvalidOptions("top must be at least 1"))
                } else {
                    Ok(())
                }
            }
            ExtractMethod::Kmeans(options) => kmeans::validate(options),
        }
    }
}

/// Summarizes the colors of an image as a few matching palette colors.
///
/// The extractor borrows a [`Ranker`] (and so its palette), and optionally a cancellation flag.
/// Neither the extractor nor its output hold on to the pixels of the image.
///
/// # Examples
/// ```
/// # use colorfinder::{Extractor, ExtractOptions, ExtractMethod, Palette, PixelBuffer, Ranker, MatchError};
/// # fn main() -> Result<(), MatchError> {
/// let palette = Palette::sample();
/// let ranker = Ranker::new(&palette);
///
/// // a 20x10 image: left half white, right half black
/// let rgba = (0..200)
///     .flat_map(|i| if i % 20 < 10 { [255, 255, 255, 255] } else { [0, 0, 0, 255] })
///     .collect::<Vec<u8>>();
/// let pixels = PixelBuffer::new(&rgba, 20, 10)?;
///
/// let colors = Extractor::new(ranker)
///     .options(ExtractOptions::new().stride(5).method(ExtractMethod::frequency()))
///     .extract(&pixels)?;
///
/// let codes = colors.iter().map(|c| c.code()).collect::<Vec<_>>();
/// assert_eq!(codes, ["001", "002"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    /// Maps samples and representatives to palette colors.
    ranker: Ranker<'a>,
    /// The sampling and reduction options.
    options: ExtractOptions,
    /// When set to `true`, extraction stops with [`MatchError::Cancelled`].
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Extractor<'a> {
    /// Creates a new [`Extractor`] with the default [`ExtractOptions`].
    #[must_use]
    pub const fn new(ranker: Ranker<'a>) -> Self {
        Self {
            ranker,
            options: ExtractOptions::new(),
            cancel: None,
        }
    }

    /// Sets the sampling and reduction options.
    #[must_use]
    pub const fn options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets a flag that cancels any running extraction once it is set to `true`.
    ///
    /// The flag is checked between batches of samples and between k-means iterations.
    #[must_use]
    pub const fn cancel_flag(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Returns the ranker used to match colors.
    #[must_use]
    pub const fn ranker(&self) -> Ranker<'a> {
        self.ranker
    }

    /// Returns an error if the cancellation flag has been set.
    fn check_cancelled(&self) -> Result<(), MatchError> {
        match self.cancel {
            Some(cancel) if cancel.load(Ordering::Relaxed) => Err(MatchError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Calls `f` with the palette index of the nearest color of each sample, in order,
    /// until `f` breaks.
    fn for_each_nearest(
        &self,
        samples: &[Srgb<u8>],
        mut f: impl FnMut(usize) -> ControlFlow<()>,
    ) -> Result<(), MatchError> {
        for chunk in samples.chunks(BATCH_SIZE) {
            self.check_cancelled()?;
            for &sample in chunk {
                if f(self.ranker.nearest_index(sample).0).is_break() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Samples the image and reduces the samples to a set of palette colors.
    ///
    /// An image without pixels gives an empty result.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidOptions`] if the options are invalid (before any work is done),
    /// or [`MatchError::Cancelled`] if the cancellation flag was set.
    pub fn extract(
        &self,
        source: &(impl PixelSource + ?Sized),
    ) -> Result<Vec<&'a Color>, MatchError> {
        self.options.validate()?;
        self.check_cancelled()?;

        let samples = source.samples(self.options.stride);
        let palette = self.ranker.palette();

        match self.options.method {
            ExtractMethod::Distinct(options) => {
                let mut distinct = Distinct::new(palette, options);
                self.for_each_nearest(&samples, |i| distinct.add(i))?;
                Ok(distinct.into_colors())
            }
            ExtractMethod::Frequency(options) => {
                let mut frequency = Frequency::new(palette);
                self.for_each_nearest(&samples, |i| {
                    frequency.add(i);
                    ControlFlow::Continue(())
                })?;
                Ok(frequency.into_colors(options))
            }
            ExtractMethod::Kmeans(options) => {
                let centroids =
                    kmeans::cluster(&samples, options, || self.check_cancelled())?;
                Ok(kmeans::match_centroids(self.ranker, &centroids))
            }
        }
    }
}

#[cfg(feature = "threads")]
impl<'a> Extractor<'a> {
    /// Returns the palette index of the nearest color of each sample, computed in parallel.
    fn nearest_indices_par(&self, samples: &[Srgb<u8>]) -> Result<Vec<usize>, MatchError> {
        let chunks = samples
            .par_chunks(BATCH_SIZE)
            .map(|chunk| {
                self.check_cancelled()?;
                Ok(chunk
                    .iter()
                    .map(|&sample| self.ranker.nearest_index(sample).0)
                    .collect::<Vec<_>>())
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        Ok(chunks.concat())
    }

    /// Same as [`Extractor::extract`], except the per-sample work is done in parallel.
    ///
    /// The partial results are merged in sample order, so this returns the same colors
    /// as [`Extractor::extract`].
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidOptions`] if the options are invalid (before any work is done),
    /// or [`MatchError::Cancelled`] if the cancellation flag was set.
    pub fn extract_par(
        &self,
        source: &(impl PixelSource + ?Sized),
    ) -> Result<Vec<&'a Color>, MatchError> {
        self.options.validate()?;
        self.check_cancelled()?;

        let samples = source.samples(self.options.stride);
        let palette = self.ranker.palette();

        match self.options.method {
            ExtractMethod::Distinct(options) => {
                let mut distinct = Distinct::new(palette, options);
                for i in self.nearest_indices_par(&samples)? {
                    if distinct.add(i).is_break() {
                        break;
                    }
                }
                Ok(distinct.into_colors())
            }
            ExtractMethod::Frequency(options) => {
                let mut frequency = Frequency::new(palette);
                for i in self.nearest_indices_par(&samples)? {
                    frequency.add(i);
                }
                Ok(frequency.into_colors(options))
            }
            ExtractMethod::Kmeans(options) => {
                let centroids =
                    kmeans::cluster_par(&samples, options, || self.check_cancelled())?;
                Ok(kmeans::match_centroids(self.ranker, &centroids))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, Palette, PixelBuffer};
    use std::collections::HashSet;

    fn all_methods() -> [ExtractMethod; 6] {
        [
            ExtractMethod::distinct(),
            DistinctOptions::new().threshold(0.0).max_colors(100).into(),
            ExtractMethod::frequency(),
            FrequencyOptions::new().top(3).into(),
            ExtractMethod::kmeans(),
            KmeansOptions::new().k(12).iterations(3).into(),
        ]
    }

    fn codes<'a>(colors: &[&'a Color]) -> Vec<&'a str> {
        colors.iter().map(|c| c.code()).collect()
    }

    #[test]
    fn output_has_unique_codes() {
        let palette = Palette::sample();
        let ranker = Ranker::new(&palette);
        let pixels = test_pixels(4096);
        let buf = rgba_buffer(&pixels);
        let image = PixelBuffer::new(&buf, 64, 64).unwrap();

        for method in all_methods() {
            for stride in [1, 7, 100] {
                let options = ExtractOptions::new().stride(stride).method(method);
                let colors = Extractor::new(ranker).options(options).extract(&image).unwrap();
                assert!(!colors.is_empty());
                let unique = colors.iter().map(|c| c.code()).collect::<HashSet<_>>();
                assert_eq!(unique.len(), colors.len());
                assert!(colors.iter().all(|c| palette.get(c.code()).is_some()));
            }
        }
    }

    #[test]
    fn stable_for_fixed_input() {
        let palette = Palette::sample();
        let ranker = Ranker::new(&palette);
        let buf = rgba_buffer(&test_pixels(1000));
        let image = PixelBuffer::new(&buf, 40, 25).unwrap();

        for method in all_methods() {
            let extractor =
                Extractor::new(ranker).options(ExtractOptions::new().stride(3).method(method));
            assert_eq!(
                extractor.extract(&image).unwrap(),
                extractor.extract(&image).unwrap()
            );
        }
    }

    #[test]
    fn empty_image() {
        let palette = Palette::sample();
        let image = PixelBuffer::new(&[], 0, 0).unwrap();
        for method in all_methods() {
            let extractor = Extractor::new(Ranker::new(&palette))
                .options(ExtractOptions::new().method(method));
            assert!(extractor.extract(&image).unwrap().is_empty());
        }
    }

    #[test]
    fn invalid_options() {
        let palette = Palette::sample();
        let buf = rgba_buffer(&test_pixels(16));
        let image = PixelBuffer::new(&buf, 4, 4).unwrap();

        for options in [
            ExtractOptions::new().stride(0),
            ExtractOptions::new().method(DistinctOptions::new().max_colors(0).into()),
            ExtractOptions::new().method(DistinctOptions::new().threshold(-1.0).into()),
            ExtractOptions::new().method(DistinctOptions::new().threshold(f32::NAN).into()),
            ExtractOptions::new().method(FrequencyOptions::new().top(0).into()),
            ExtractOptions::new().method(KmeansOptions::new().k(0).into()),
        ] {
            let extractor = Extractor::new(Ranker::new(&palette)).options(options);
            assert!(matches!(
                extractor.extract(&image),
                Err(MatchError::InvalidOptions(_))
            ));
        }
    }

    #[test]
    fn distinct_keeps_discovery_order() {
        let palette = Palette::sample();
        let pixels = [
            Srgb::new(0, 130, 130),   // teal
            Srgb::new(250, 250, 250), // white
            Srgb::new(1, 128, 128),   // teal again
            Srgb::new(255, 100, 0),   // orange
            Srgb::new(255, 40, 0),    // scarlet, 67 away from orange
            Srgb::new(0, 0, 0),       // black
        ];
        let buf = rgba_buffer(&pixels);
        let image = PixelBuffer::new(&buf, 6, 1).unwrap();
        let extractor = Extractor::new(Ranker::new(&palette));
        let distinct = |options: DistinctOptions| {
            extractor
                .options(ExtractOptions::new().stride(1).method(options.into()))
                .extract(&image)
                .unwrap()
        };

        let colors = distinct(DistinctOptions::new());
        assert_eq!(codes(&colors), ["009", "001", "008", "003", "002"]);

        let colors = distinct(DistinctOptions::new().threshold(70.0));
        assert_eq!(codes(&colors), ["009", "001", "008", "002"]);

        let colors = distinct(DistinctOptions::new().threshold(70.0).max_colors(2));
        assert_eq!(codes(&colors), ["009", "001"]);
    }

    #[test]
    fn frequency_orders_by_count_then_palette() {
        let palette = Palette::sample();
        let black = Srgb::new(0, 0, 0);
        let white = Srgb::new(255, 255, 255);
        let purple = Srgb::new(120, 81, 169);
        let pixels = [purple, white, black, white, black, purple, white, Srgb::new(0, 128, 128)];
        let buf = rgba_buffer(&pixels);
        let image = PixelBuffer::new(&buf, 4, 2).unwrap();

        let extractor = Extractor::new(Ranker::new(&palette))
            .options(ExtractOptions::new().stride(1).method(ExtractMethod::frequency()));
        let colors = extractor.extract(&image).unwrap();
        // white: 3, black: 2, purple: 2 (black first by palette order), teal: 1
        assert_eq!(codes(&colors), ["001", "002", "007", "009"]);

        let top2 = extractor
            .options(
                ExtractOptions::new()
                    .stride(1)
                    .method(FrequencyOptions::new().top(2).into()),
            )
            .extract(&image)
            .unwrap();
        assert_eq!(codes(&top2), ["001", "002"]);
    }

    #[test]
    fn stride_skips_pixels() {
        let palette = Palette::sample();
        // only every 3rd pixel is red
        let pixels = (0..30)
            .map(|i| if i % 3 == 0 { Srgb::new(255, 36, 0) } else { Srgb::new(0, 0, 0) })
            .collect::<Vec<_>>();
        let buf = rgba_buffer(&pixels);
        let image = PixelBuffer::new(&buf, 10, 3).unwrap();

        let colors = Extractor::new(Ranker::new(&palette))
            .options(ExtractOptions::new().stride(3).method(ExtractMethod::frequency()))
            .extract(&image)
            .unwrap();
        assert_eq!(codes(&colors), ["003"]);
    }

    #[test]
    fn cancelled() {
        let palette = Palette::sample();
        let buf = rgba_buffer(&test_pixels(64));
        let image = PixelBuffer::new(&buf, 8, 8).unwrap();
        let cancel = AtomicBool::new(true);

        for method in all_methods() {
            let extractor = Extractor::new(Ranker::new(&palette))
                .options(ExtractOptions::new().stride(1).method(method))
                .cancel_flag(&cancel);
            assert_eq!(extractor.extract(&image), Err(MatchError::Cancelled));
            #[cfg(feature = "threads")]
            {
                assert_eq!(extractor.extract_par(&image), Err(MatchError::Cancelled));
            }
        }

        cancel.store(false, Ordering::Relaxed);
        let extractor = Extractor::new(Ranker::new(&palette))
            .options(ExtractOptions::new().stride(1))
            .cancel_flag(&cancel);
        assert!(extractor.extract(&image).is_ok());
    }

    #[test]
    fn cancelled_between_batches() {
        let palette = Palette::sample();
        let cancel = AtomicBool::new(false);
        let extractor = Extractor::new(Ranker::new(&palette)).cancel_flag(&cancel);
        let samples = test_pixels(3 * BATCH_SIZE);

        let mut matched = 0;
        let result = extractor.for_each_nearest(&samples, |_| {
            matched += 1;
            if matched == BATCH_SIZE {
                cancel.store(true, Ordering::Relaxed);
            }
            ControlFlow::Continue(())
        });
        assert_eq!(result, Err(MatchError::Cancelled));
        assert_eq!(matched, BATCH_SIZE);
    }

    /// Sets the flag right after sampling, so only the checks inside the reduction can stop it.
    struct CancelAfterSampling<'a> {
        pixels: PixelBuffer<'a>,
        cancel: &'a AtomicBool,
    }

    impl PixelSource for CancelAfterSampling<'_> {
        fn dimensions(&self) -> (u32, u32) {
            self.pixels.dimensions()
        }

        fn get(&self, x: u32, y: u32) -> Option<Srgb<u8>> {
            self.pixels.get(x, y)
        }

        fn samples(&self, stride: usize) -> Vec<Srgb<u8>> {
            let samples = self.pixels.samples(stride);
            self.cancel.store(true, Ordering::Relaxed);
            samples
        }
    }

    #[test]
    fn cancelled_after_sampling() {
        let palette = Palette::sample();
        let buf = rgba_buffer(&test_pixels(2 * BATCH_SIZE));
        let cancel = AtomicBool::new(false);
        let source = CancelAfterSampling {
            pixels: PixelBuffer::new(&buf, 128, 64).unwrap(),
            cancel: &cancel,
        };

        for method in all_methods() {
            let extractor = Extractor::new(Ranker::new(&palette))
                .options(ExtractOptions::new().stride(1).method(method))
                .cancel_flag(&cancel);

            cancel.store(false, Ordering::Relaxed);
            assert_eq!(extractor.extract(&source), Err(MatchError::Cancelled));
            #[cfg(feature = "threads")]
            {
                cancel.store(false, Ordering::Relaxed);
                assert_eq!(extractor.extract_par(&source), Err(MatchError::Cancelled));
            }
        }
    }

    #[cfg(feature = "threads")]
    #[test]
    fn parallel_matches_sequential() {
        let palette = Palette::sample();
        let pixels = test_pixels(300 * 200);
        let buf = rgba_buffer(&pixels);
        let image = PixelBuffer::new(&buf, 300, 200).unwrap();

        for metric in [crate::DistanceMetric::Rgb, crate::DistanceMetric::Lab] {
            let ranker = Ranker::new(&palette).metric(metric);
            for method in all_methods() {
                for stride in [1, 100] {
                    let extractor = Extractor::new(ranker)
                        .options(ExtractOptions::new().stride(stride).method(method));
                    assert_eq!(
                        extractor.extract(&image).unwrap(),
                        extractor.extract_par(&image).unwrap()
                    );
                }
            }
        }
    }
}
