use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "connlab",
    version,
    about = "Tapered spectral estimation and connectivity command-line tool",
    long_about = "Compute power and cross-spectral densities of multichannel recordings and\n\
                  sensor-level connectivity networks of evoked data. Inputs and outputs are JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Power spectral density of selected channels
    Psd(PsdArgs),
    /// Cross-spectral density between a seed channel and target channels
    Csd(CsdArgs),
    /// Connectivity network of an evoked recording
    Connectivity(ConnectivityArgs),
}

/// Options shared by the spectral subcommands
#[derive(Args, Clone)]
pub struct SpectraArgs {
    /// Recording JSON: {"sampling_frequency": f64, "data": [[f64, ...], ...]}
    #[arg(long)]
    pub file: String,

    /// Taper window (hanning, ones); unknown names fall back to hanning
    #[arg(long, default_value = "hanning")]
    pub window: String,

    /// FFT length (raised to the signal length when smaller)
    #[arg(long)]
    pub nfft: Option<usize>,

    /// Transform at the resolved FFT length without power-of-two padding
    #[arg(long, default_value_t = false)]
    pub no_zero_pad: bool,

    /// Keep each channel's mean instead of subtracting it
    #[arg(long, default_value_t = false)]
    pub keep_mean: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args)]
pub struct PsdArgs {
    #[command(flatten)]
    pub spectra: SpectraArgs,

    /// 0-based channel indices (default: all channels)
    #[arg(long, num_args = 1..)]
    pub channels: Vec<usize>,
}

#[derive(Args)]
pub struct CsdArgs {
    #[command(flatten)]
    pub spectra: SpectraArgs,

    /// 0-based seed channel
    #[arg(long, default_value_t = 0, conflicts_with = "all_pairs")]
    pub seed: usize,

    /// 0-based target channel indices (default: all channels)
    #[arg(long, num_args = 1.., conflicts_with = "all_pairs")]
    pub channels: Vec<usize>,

    /// Use every channel as seed against all channels
    #[arg(long, default_value_t = false)]
    pub all_pairs: bool,
}

#[derive(Args)]
pub struct ConnectivityArgs {
    /// Evoked JSON: one {"info": {...}, "data": [[...]]} object or a list of them
    #[arg(long)]
    pub evoked: String,

    /// Connectivity settings JSON (defaults apply to missing fields)
    #[arg(long)]
    pub settings: Option<String>,

    /// Connectivity method, overrides the settings file (COR, XCOR)
    #[arg(long)]
    pub method: Option<String>,

    /// Index of the evoked set within the file, overrides the settings file
    #[arg(long)]
    pub ave_index: Option<usize>,

    /// Drop edges whose absolute weight is below this value
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}
