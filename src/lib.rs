//! A library for matching the colors of an image against a fixed reference palette.
//!
//! `colorfinder` answers two kinds of questions:
//! - Point picks: which palette colors are closest to the color of this pixel?
//!   See [`Ranker`].
//! - Whole image summaries: which palette colors best describe this image?
//!   See [`Extractor`].
//!
//! Colors can be compared by euclidean distance in sRGB or in the perceptually uniform
//! CIELAB color space (see [`DistanceMetric`]).
//!
//! # Features
//! To reduce dependencies and compile times, `colorfinder` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes parallel versions of the extraction functions via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//! - `serde`: allows (de)serializing [`Color`]s and [`Palette`]s.
//!
//! # Examples
//! ```
//! # use colorfinder::{Extractor, ExtractOptions, KmeansOptions, Palette, PixelBuffer, Ranker, MatchError, DEFAULT_SUGGESTIONS};
//! # use palette::Srgb;
//! # fn main() -> Result<(), MatchError> {
//! let palette = Palette::sample();
//! let ranker = Ranker::new(&palette);
//!
//! // pick a single color
//! let ranking = ranker.rank(Srgb::new(250, 30, 5), DEFAULT_SUGGESTIONS)?;
//! assert_eq!(ranking.best.color.code(), "003");
//!
//! // summarize a whole image
//! let rgba = vec![0; 16 * 16 * 4];
//! let pixels = PixelBuffer::new(&rgba, 16, 16)?;
//! let colors = Extractor::new(ranker)
//!     .options(ExtractOptions::new().method(KmeansOptions::new().into()))
//!     .extract(&pixels)?;
//! assert_eq!(colors[0].name(), "Jet Black");
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod distance;
mod rank;
mod swatches;
mod traits;
mod types;

pub mod extract;

pub use distance::*;
pub use extract::{
    DistinctOptions, ExtractMethod, ExtractOptions, Extractor, FrequencyOptions, KmeansOptions,
};
pub use rank::*;
pub use swatches::*;
pub use traits::*;
pub use types::*;
