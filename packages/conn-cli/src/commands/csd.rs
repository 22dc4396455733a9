use super::load_spectra;
use crate::cli::CsdArgs;
use crate::exit_codes;
use crate::output;
use conn_rs::spectra::{csd_all_pairs, csd_from_tapered_spectra, CsdData};
use serde::Serialize;

#[derive(Serialize)]
struct CsdOutput {
    window: String,
    seed: usize,
    channels: Vec<usize>,
    freq_bins: Vec<f64>,
    /// Real and imaginary parts, one row per target channel
    real: Vec<Vec<f64>>,
    imag: Vec<Vec<f64>>,
}

impl From<&CsdData> for CsdOutput {
    fn from(csd: &CsdData) -> Self {
        Self {
            window: csd.method.to_string(),
            seed: csd.seed,
            channels: csd.indices.clone(),
            freq_bins: csd.freq_bins.to_vec(),
            real: output::matrix_rows(&csd.csd.mapv(|c| c.re)),
            imag: output::matrix_rows(&csd.csd.mapv(|c| c.im)),
        }
    }
}

pub fn execute(args: CsdArgs) -> i32 {
    let spectra = match load_spectra(&args.spectra) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let compact = args.spectra.compact;
    let output_path = args.spectra.output.as_deref();

    if args.all_pairs {
        return match csd_all_pairs(&spectra) {
            Ok(all) => {
                let result: Vec<CsdOutput> = all.iter().map(CsdOutput::from).collect();
                output::emit(&result, compact, output_path)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                exit_codes::EXECUTION_ERROR
            }
        };
    }

    match csd_from_tapered_spectra(&spectra, args.seed, &args.channels) {
        Ok(csd) => output::emit(&CsdOutput::from(&csd), compact, output_path),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_codes::INPUT_ERROR
        }
    }
}
