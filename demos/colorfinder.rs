#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{fmt::Display, fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use colorfinder::{
    Color, DistanceMetric, DistinctOptions, ExtractMethod, ExtractOptions, Extractor,
    FrequencyOptions, KmeansOptions, Palette, Ranker, DEFAULT_SUGGESTIONS,
};

#[derive(Copy, Clone, ValueEnum)]
enum CliMetric {
    Rgb,
    Lab,
}

impl From<CliMetric> for DistanceMetric {
    fn from(value: CliMetric) -> Self {
        match value {
            CliMetric::Rgb => DistanceMetric::Rgb,
            CliMetric::Lab => DistanceMetric::Lab,
        }
    }
}

impl Display for CliMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CliMetric::Rgb => "rgb",
                CliMetric::Lab => "lab",
            }
        )
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum CliMethod {
    Distinct,
    Frequency,
    Kmeans,
}

impl Display for CliMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CliMethod::Distinct => "distinct",
                CliMethod::Frequency => "frequency",
                CliMethod::Kmeans => "kmeans",
            }
        )
    }
}

#[derive(Subcommand)]
enum Command {
    /// Rank the palette against the color of a single pixel.
    Pick {
        x: u32,

        y: u32,

        #[arg(short, long, default_value_t = DEFAULT_SUGGESTIONS)]
        k: usize,
    },
    /// Summarize the whole image as a few palette colors.
    Extract {
        #[arg(long, default_value_t = CliMethod::Distinct)]
        method: CliMethod,

        #[arg(long, default_value_t = 100)]
        stride: usize,

        /// Distinct: minimum RGB distance between returned colors.
        #[arg(long, default_value_t = 50.0)]
        threshold: f32,

        /// Distinct: maximum number of colors.
        #[arg(long, default_value_t = 6)]
        max_colors: usize,

        /// Frequency: number of colors.
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Kmeans: number of clusters.
        #[arg(long, default_value_t = 5)]
        clusters: usize,

        /// Kmeans: number of iterations.
        #[arg(long, default_value_t = 10)]
        iterations: u32,

        #[arg(long)]
        single_threaded: bool,
    },
}

#[derive(Parser)]
pub struct Options {
    #[arg(long, default_value_t = CliMetric::Rgb)]
    metric: CliMetric,

    /// A JSON array of `{ Code, Name, Hex, R, G, B }` records to use instead of the sample palette.
    #[arg(long)]
    palette: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    input: PathBuf,

    #[command(subcommand)]
    command: Command,
}

fn load_palette(path: Option<PathBuf>) -> Result<Palette, String> {
    let Some(path) = path else {
        return Ok(Palette::sample());
    };

    let json = fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    let colors = serde_json::from_str::<Vec<Color>>(&json)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Palette::new(colors).map_err(|e| e.to_string())
}

fn run() -> Result<(), String> {
    let Options { metric, palette, verbose, input, command } = Options::parse();

    macro_rules! log {
        ($name: literal, $val: expr) => {
            if verbose {
                let time = std::time::Instant::now();
                let value = $val;
                eprintln!("{} took {}ms", $name, time.elapsed().as_millis());
                value
            } else {
                $val
            }
        };
    }

    let palette = load_palette(palette)?;
    let ranker = Ranker::new(&palette).metric(metric.into());

    let image = log!("read image", image::open(&input))
        .map_err(|e| format!("{}: {e}", input.display()))?
        .into_rgba8();

    match command {
        Command::Pick { x, y, k } => {
            let ranking =
                log!("rank", ranker.rank_at(&image, x, y, k)).map_err(|e| e.to_string())?;
            println!("best: {} ({:.2})", ranking.best.color, ranking.best.distance);
            for m in &ranking.rest {
                println!("      {} ({:.2})", m.color, m.distance);
            }
        }
        Command::Extract {
            method,
            stride,
            threshold,
            max_colors,
            top,
            clusters,
            iterations,
            single_threaded,
        } => {
            let method: ExtractMethod = match method {
                CliMethod::Distinct => DistinctOptions::new()
                    .threshold(threshold)
                    .max_colors(max_colors)
                    .into(),
                CliMethod::Frequency => FrequencyOptions::new().top(top).into(),
                CliMethod::Kmeans => KmeansOptions::new()
                    .k(clusters)
                    .iterations(iterations)
                    .into(),
            };

            let extractor =
                Extractor::new(ranker).options(ExtractOptions::new().stride(stride).method(method));

            let colors = log!(
                "extract",
                if single_threaded {
                    extractor.extract(&image)
                } else {
                    extractor.extract_par(&image)
                }
            )
            .map_err(|e| e.to_string())?;

            for color in colors {
                println!("{color}");
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
