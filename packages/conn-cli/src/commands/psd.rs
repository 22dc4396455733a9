use super::load_spectra;
use crate::cli::PsdArgs;
use crate::exit_codes;
use crate::output;
use conn_rs::spectra::psd_from_tapered_spectra;
use serde::Serialize;

#[derive(Serialize)]
struct PsdOutput {
    window: String,
    sampling_frequency: f64,
    nfft: usize,
    channels: Vec<usize>,
    freq_bins: Vec<f64>,
    psd: Vec<Vec<f64>>,
}

pub fn execute(args: PsdArgs) -> i32 {
    let spectra = match load_spectra(&args.spectra) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let psd = match psd_from_tapered_spectra(&spectra, &args.channels) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    let result = PsdOutput {
        window: psd.method.to_string(),
        sampling_frequency: spectra.sampling_frequency,
        nfft: spectra.nfft,
        channels: psd.indices.clone(),
        freq_bins: psd.freq_bins.to_vec(),
        psd: output::matrix_rows(&psd.psd),
    };

    output::emit(&result, args.spectra.compact, args.spectra.output.as_deref())
}
