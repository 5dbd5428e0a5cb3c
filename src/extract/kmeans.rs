//! K-means clustering of sampled pixels in RGB.
//!
//! This is Lloyd's k-means with a fixed number of iterations and no randomness:
//! - The initial centroids are the first `k` samples.
//!   If there are fewer than `k` samples, they are reused in order,
//!   so exactly `k` centroids are returned for any non-empty set of samples.
//! - Each iteration assigns every sample to its nearest centroid by squared euclidean distance
//!   (the lowest centroid index wins ties), then moves each centroid to the mean of its samples.
//! - A centroid that was assigned no samples keeps its previous position.
//!
//! The resulting centroids are rounded to 8-bit sRGB and mapped to the palette
//! by the extractor's [`Ranker`].

use super::KmeansOptions;
use crate::{distance::srgb_components, Color, MatchError, Ranker};
use bitvec::vec::BitVec;
use palette::Srgb;
use std::array;
use wide::{f32x8, u32x8, CmpLt};

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Returns the index of the nearest point to `query`, preferring the lowest index on ties.
#[inline]
#[allow(clippy::float_cmp)]
fn simd_argmin(points: &[[f32x8; 3]], query: [f32; 3]) -> usize {
    let incr = u32x8::ONE;
    let mut cur_chunk = u32x8::ZERO;
    let mut min_chunk = cur_chunk;
    let mut min_distance = f32x8::splat(f32::INFINITY);

    let query = query.map(f32x8::splat);

    for chunk in points {
        let [dr, dg, db] = array::from_fn::<_, 3, _>(|i| query[i] - chunk[i]);
        let distance = dr * dr + dg * dg + db * db;

        // strictly less, so the earliest chunk is kept on ties
        let mask = u32x8::new(distance.cmp_lt(min_distance).to_array().map(f32::to_bits));
        min_chunk = mask.blend(cur_chunk, min_chunk);
        min_distance = min_distance.fast_min(distance);
        cur_chunk += incr;
    }

    let mut min_index = 0;
    let mut min_dist = f32::INFINITY;
    for (lane, (&dist, &chunk)) in min_distance
        .as_array_ref()
        .iter()
        .zip(min_chunk.as_array_ref())
        .enumerate()
    {
        let index = chunk as usize * 8 + lane;
        if dist < min_dist || (dist == min_dist && index < min_index) {
            min_dist = dist;
            min_index = index;
        }
    }

    min_index
}

/// The centroids being refined by k-means.
struct State {
    /// The centroids in RGB.
    centroids: Vec<[f32; 3]>,
    /// The centroids in chunks of 8 for [`simd_argmin`], padded with infinity.
    components: Vec<[f32x8; 3]>,
}

impl State {
    /// Initializes `k` centroids from the first `k` samples, reusing samples if there are too few.
    fn new(samples: &[[f32; 3]], k: usize) -> Self {
        let centroids = samples.iter().copied().cycle().take(k).collect();
        let mut state = Self { centroids, components: Vec::new() };
        state.load_components();
        state
    }

    /// Rebuilds `components` from `centroids`.
    fn load_components(&mut self) {
        let Self { centroids, components } = self;

        components.clear();
        let chunks = centroids.chunks_exact(8);
        components.extend(
            chunks
                .clone()
                .map(|chunk| array::from_fn(|i| f32x8::new(array::from_fn(|j| chunk[j][i])))),
        );

        if !chunks.remainder().is_empty() {
            let mut arr = [[f32::INFINITY; 8]; 3];
            for (i, &color) in chunks.remainder().iter().enumerate() {
                for (arr, c) in arr.iter_mut().zip(color) {
                    arr[i] = c;
                }
            }
            components.push(arr.map(f32x8::new));
        }
    }

    /// Returns the index of the nearest centroid.
    #[inline]
    fn nearest(&self, sample: [f32; 3]) -> usize {
        simd_argmin(&self.components, sample)
    }

    /// Moves each centroid to the mean of the samples assigned to it.
    fn update(&mut self, samples: &[[f32; 3]], assignments: &[usize]) {
        let k = self.centroids.len();
        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0u32; k];

        for (sample, &i) in samples.iter().zip(assignments) {
            for (sum, &c) in sums[i].iter_mut().zip(sample) {
                *sum += f64::from(c);
            }
            counts[i] += 1;
        }

        for ((centroid, sum), count) in self.centroids.iter_mut().zip(sums).zip(counts) {
            // an empty cluster keeps its previous centroid
            if count > 0 {
                #[allow(clippy::cast_possible_truncation)]
                {
                    *centroid = sum.map(|s| (s / f64::from(count)) as f32);
                }
            }
        }

        self.load_components();
    }

    /// Returns the centroids as colors.
    fn into_centroids(self) -> Vec<Srgb<f32>> {
        self.centroids.into_iter().map(Srgb::from).collect()
    }
}

/// Checks the k-means options.
pub(super) fn validate(options: KmeansOptions) -> Result<(), MatchError> {
    if options.k == 0 {
        Err(MatchError::InvalidOptions("k must be at least 1"))
    } else {
        Ok(())
    }
}

/// Runs k-means, calling `check_cancelled` before each iteration.
pub(super) fn cluster(
    samples: &[Srgb<u8>],
    options: KmeansOptions,
    check_cancelled: impl Fn() -> Result<(), MatchError>,
) -> Result<Vec<Srgb<f32>>, MatchError> {
    validate(options)?;
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let samples = samples.iter().copied().map(srgb_components).collect::<Vec<_>>();
    let mut state = State::new(&samples, options.k);
    let mut assignments = Vec::with_capacity(samples.len());

    for _ in 0..options.iterations {
        check_cancelled()?;
        assignments.clear();
        assignments.extend(samples.iter().map(|&sample| state.nearest(sample)));
        state.update(&samples, &assignments);
    }

    Ok(state.into_centroids())
}

/// Runs k-means with a parallel assignment step, calling `check_cancelled` before each iteration.
#[cfg(feature = "threads")]
pub(super) fn cluster_par(
    samples: &[Srgb<u8>],
    options: KmeansOptions,
    check_cancelled: impl Fn() -> Result<(), MatchError>,
) -> Result<Vec<Srgb<f32>>, MatchError> {
    validate(options)?;
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let samples = samples
        .par_iter()
        .copied()
        .map(srgb_components)
        .collect::<Vec<_>>();
    let mut state = State::new(&samples, options.k);
    let mut assignments = Vec::with_capacity(samples.len());

    for _ in 0..options.iterations {
        check_cancelled()?;
        samples
            .par_iter()
            .map(|&sample| state.nearest(sample))
            .collect_into_vec(&mut assignments);
        // summing in sample order keeps the result identical to `cluster`
        state.update(&samples, &assignments);
    }

    Ok(state.into_centroids())
}

/// Computes the k-means centroids of the given samples in RGB (`0.0..=255.0` components).
///
/// Returns exactly `options.k` centroids, unless `samples` is empty,
/// in which case no centroids are returned.
///
/// # Errors
/// Returns [`MatchError::InvalidOptions`] if `k` is `0`.
pub fn centroids(
    samples: &[Srgb<u8>],
    options: KmeansOptions,
) -> Result<Vec<Srgb<f32>>, MatchError> {
    cluster(samples, options, || Ok(()))
}

/// Same as [`centroids`], except the assignment step is done in parallel.
///
/// # Errors
/// Returns [`MatchError::InvalidOptions`] if `k` is `0`.
#[cfg(feature = "threads")]
pub fn centroids_par(
    samples: &[Srgb<u8>],
    options: KmeansOptions,
) -> Result<Vec<Srgb<f32>>, MatchError> {
    cluster_par(samples, options, || Ok(()))
}

/// Rounds a centroid to the nearest 8-bit sRGB color.
fn round_centroid(centroid: Srgb<f32>) -> Srgb<u8> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let round = |c: f32| c.round().clamp(0.0, 255.0) as u8;
    Srgb::new(
        round(centroid.red),
        round(centroid.green),
        round(centroid.blue),
    )
}

/// Maps each centroid to its nearest palette color, skipping colors that were already matched.
pub(super) fn match_centroids<'a>(ranker: Ranker<'a>, centroids: &[Srgb<f32>]) -> Vec<&'a Color> {
    let palette = ranker.palette();
    let mut seen = BitVec::<usize>::repeat(false, palette.len());

    centroids
        .iter()
        .filter_map(|&centroid| {
            let (i, _) = ranker.nearest_index(round_centroid(centroid));
            (!seen.replace(i, true)).then(|| &palette[i])
        })
        .collect()
}
