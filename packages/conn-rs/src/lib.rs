pub mod connectivity;
pub mod error;
pub mod network;
pub mod profiling;
pub mod spectra;
pub mod types;

pub use connectivity::{Connectivity, ConnectivitySettings, DataSources};
pub use error::{ConnError, Result};
pub use network::{Network, NetworkStatus};
pub use spectra::{
    compute_tapered_spectra, csd_from_tapered_spectra, psd_from_tapered_spectra, SpectraOptions,
    TaperedSpectra, WindowType,
};
pub use types::*;
