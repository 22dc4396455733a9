pub mod connectivity;
pub mod csd;
pub mod psd;

use crate::cli::SpectraArgs;
use crate::exit_codes;
use crate::input;
use conn_rs::spectra::{compute_tapered_spectra, SpectraOptions, TaperedSpectra, WindowType};

pub(crate) fn spectra_options(args: &SpectraArgs) -> SpectraOptions {
    SpectraOptions {
        window: WindowType::from_name(&args.window),
        nfft: args.nfft,
        zero_pad: !args.no_zero_pad,
        remove_mean: !args.keep_mean,
    }
}

/// Read the recording and compute its tapered spectra; `Err` carries the exit code
pub(crate) fn load_spectra(args: &SpectraArgs) -> Result<TaperedSpectra, i32> {
    let (data, sampling_frequency) = input::read_recording(&args.file).map_err(|e| {
        eprintln!("Error: {}", e);
        exit_codes::INPUT_ERROR
    })?;

    compute_tapered_spectra(&data, sampling_frequency, &spectra_options(args)).map_err(|e| {
        eprintln!("Error: {}", e);
        exit_codes::INPUT_ERROR
    })
}
