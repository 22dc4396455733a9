use crate::cli::ConnectivityArgs;
use crate::exit_codes;
use crate::input::JsonEvokedSource;
use crate::output;
use conn_rs::connectivity::{Connectivity, ConnectivitySettings, DataSources};
use conn_rs::NetworkStatus;
use std::path::Path;

fn build_settings(args: &ConnectivityArgs) -> Result<ConnectivitySettings, String> {
    let mut settings = match &args.settings {
        Some(path) => ConnectivitySettings::from_json_file(Path::new(path))
            .map_err(|e| format!("Invalid settings file '{}': {}", path, e))?,
        None => ConnectivitySettings::default(),
    };

    settings.measurement = args.evoked.clone().into();
    if let Some(method) = &args.method {
        settings.method = method.clone();
    }
    if let Some(ave_index) = args.ave_index {
        settings.ave_index = ave_index;
    }
    settings.validate().map_err(|e| e.to_string())?;
    Ok(settings)
}

pub fn execute(args: ConnectivityArgs) -> i32 {
    let settings = match build_settings(&args) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if settings.do_source_loc {
        eprintln!(
            "Error: Source-level connectivity needs forward model, covariance and inverse \
             providers; this binary only computes sensor-level networks"
        );
        return exit_codes::UNSUPPORTED;
    }

    if !args.quiet {
        eprintln!("Computing {} connectivity for {}...", settings.method, args.evoked);
        eprintln!(
            "  Channels: {:?} / {:?}, evoked set {}",
            settings.channel_type, settings.coil_type, settings.ave_index
        );
    }

    let sources = DataSources::sensor_only(&JsonEvokedSource);
    let network = match Connectivity::new(&settings).calculate(&sources) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Connectivity computation failed: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    let network = match args.threshold {
        Some(threshold) => network.threshold(threshold),
        None => network,
    };

    let written = output::emit(&network, args.compact, args.output.as_deref());
    if written != exit_codes::SUCCESS {
        return written;
    }

    match &network.status {
        NetworkStatus::Computed => {
            if !args.quiet {
                eprintln!(
                    "Network: {} nodes, {} edges",
                    network.num_nodes(),
                    network.edges.len()
                );
                if let Some(ref path) = args.output {
                    eprintln!("Results written to {}", path);
                }
            }
            exit_codes::SUCCESS
        }
        NetworkStatus::MissingData => {
            eprintln!("Error: No usable data in '{}'", args.evoked);
            exit_codes::INPUT_ERROR
        }
        NetworkStatus::UnsupportedMethod(method) => {
            eprintln!("Error: Connectivity method '{}' is not supported (COR, XCOR)", method);
            exit_codes::UNSUPPORTED
        }
    }
}
