//! Time-domain connectivity measures
//!
//! Both measures build a fully connected undirected network with one node per
//! data row. Rows that are constant (up to rounding) get zero-weight edges.
//! Weights are scale invariant, so SI-unit MEG data (1e-13 T) scores the same
//! as its rescaled copy.

use ndarray::Array2;
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ConnError, Result};
use crate::network::Network;
use crate::profile_scope;
use crate::spectra::with_fft_planner;

/// Implemented connectivity measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityMethod {
    /// Zero-lag Pearson correlation ("COR")
    #[serde(rename = "COR")]
    Correlation,
    /// Peak normalized cross-correlation over all lags ("XCOR")
    #[serde(rename = "XCOR")]
    CrossCorrelation,
}

impl ConnectivityMethod {
    /// Look up a measure by name; `None` for names without an implementation
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "COR" => Some(Self::Correlation),
            "XCOR" => Some(Self::CrossCorrelation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correlation => "COR",
            Self::CrossCorrelation => "XCOR",
        }
    }

    pub fn compute(&self, data: &Array2<f64>, node_positions: &Array2<f32>) -> Result<Network> {
        match self {
            Self::Correlation => pearson_correlation(data, node_positions),
            Self::CrossCorrelation => cross_correlation(data, node_positions),
        }
    }
}

/// Zero-lag Pearson correlation between every pair of rows
pub fn pearson_correlation(data: &Array2<f64>, node_positions: &Array2<f32>) -> Result<Network> {
    profile_scope!("pearson_correlation");
    validate_inputs(data, node_positions)?;

    let centered = center_rows(data);
    let norms = centered_norms(data, &centered);

    let mut network = Network::new(ConnectivityMethod::Correlation.as_str(), node_positions);
    let n = data.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let weight = match (norms[i], norms[j]) {
                (Some(a), Some(b)) => centered.row(i).dot(&centered.row(j)) / (a * b),
                _ => 0.0,
            };
            network.add_edge(i, j, weight)?;
        }
    }

    Ok(network)
}

/// Normalized cross-correlation between every pair of rows.
///
/// The edge weight is the cross-correlation value of largest magnitude over all
/// lags, normalized so that identical rows score 1.
pub fn cross_correlation(data: &Array2<f64>, node_positions: &Array2<f32>) -> Result<Network> {
    profile_scope!("cross_correlation");
    validate_inputs(data, node_positions)?;

    let (n, signal_length) = data.dim();
    // Linear (non-circular) correlation needs at least 2L - 1 points
    let nfft = (2 * signal_length - 1).next_power_of_two();

    let centered = center_rows(data);
    let norms = centered_norms(data, &centered);

    let (forward, inverse) = with_fft_planner(|planner| {
        (planner.plan_fft_forward(nfft), planner.plan_fft_inverse(nfft))
    });

    let spectra: Vec<Vec<Complex64>> = centered
        .rows()
        .into_iter()
        .map(|row| {
            let mut buffer = vec![Complex64::new(0.0, 0.0); nfft];
            for (dst, &x) in buffer.iter_mut().zip(row.iter()) {
                *dst = Complex64::new(x, 0.0);
            }
            forward.process(&mut buffer);
            buffer
        })
        .collect();

    let mut network = Network::new(ConnectivityMethod::CrossCorrelation.as_str(), node_positions);
    let mut buffer = vec![Complex64::new(0.0, 0.0); nfft];
    for i in 0..n {
        for j in (i + 1)..n {
            let (Some(norm_i), Some(norm_j)) = (norms[i], norms[j]) else {
                network.add_edge(i, j, 0.0)?;
                continue;
            };

            let pairs = spectra[i].iter().zip(spectra[j].iter());
            for (dst, (a, b)) in buffer.iter_mut().zip(pairs) {
                *dst = a * b.conj();
            }
            inverse.process(&mut buffer);

            // rustfft's inverse is unnormalized
            let peak = buffer
                .iter()
                .map(|c| c.re / nfft as f64)
                .fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
            network.add_edge(i, j, peak / (norm_i * norm_j))?;
        }
    }

    log::debug!("[CONN] Cross-correlation of {} nodes (nfft = {})", n, nfft);

    Ok(network)
}

fn validate_inputs(data: &Array2<f64>, node_positions: &Array2<f32>) -> Result<()> {
    if data.nrows() != node_positions.nrows() {
        return Err(ConnError::ShapeMismatch(format!(
            "{} data rows but {} node positions",
            data.nrows(),
            node_positions.nrows()
        )));
    }
    if node_positions.ncols() != 3 {
        return Err(ConnError::ShapeMismatch(format!(
            "Node positions must have 3 columns, got {}",
            node_positions.ncols()
        )));
    }
    if data.ncols() < 2 {
        return Err(ConnError::InvalidParameter(format!(
            "Connectivity needs at least 2 samples per node, got {}",
            data.ncols()
        )));
    }
    Ok(())
}

/// Norm of every centered row, `None` for rows whose norm is at rounding level
/// relative to the row's own magnitude
fn centered_norms(data: &Array2<f64>, centered: &Array2<f64>) -> Vec<Option<f64>> {
    let rounding = f64::EPSILON * data.ncols() as f64;
    data.rows()
        .into_iter()
        .zip(centered.rows())
        .map(|(raw, row)| {
            let norm = row.dot(&row).sqrt();
            let peak = raw.iter().fold(0.0f64, |m, x| m.max(x.abs()));
            if norm == 0.0 || norm <= rounding * peak {
                None
            } else {
                Some(norm)
            }
        })
        .collect()
}

fn center_rows(data: &Array2<f64>) -> Array2<f64> {
    let mut centered = data.clone();
    for mut row in centered.rows_mut() {
        let mean = row.mean().unwrap_or(0.0);
        row.mapv_inplace(|x| x - mean);
    }
    centered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn edge_weight(network: &Network, a: usize, b: usize) -> Option<f64> {
        network
            .edges
            .iter()
            .find(|e| e.from == a.min(b) && e.to == a.max(b))
            .map(|e| e.weight)
    }

    fn positions(n: usize) -> Array2<f32> {
        Array2::from_shape_fn((n, 3), |(i, c)| (i * 3 + c) as f32)
    }

    fn test_data() -> Array2<f64> {
        Array2::from_shape_fn((3, 200), |(c, t)| {
            let t = t as f64 / 100.0;
            match c {
                0 => (2.0 * PI * 5.0 * t).sin(),
                1 => 2.0 * (2.0 * PI * 5.0 * t).sin() + 1.0,
                _ => -(2.0 * PI * 5.0 * t).sin(),
            }
        })
    }

    #[test]
    fn test_method_names() {
        use ConnectivityMethod::{Correlation, CrossCorrelation};
        assert_eq!(ConnectivityMethod::from_name("COR"), Some(Correlation));
        assert_eq!(ConnectivityMethod::from_name("XCOR"), Some(CrossCorrelation));
        assert_eq!(ConnectivityMethod::from_name("PLV"), None);
        assert_eq!(ConnectivityMethod::from_name("cor"), None);
    }

    #[test]
    fn test_pearson_scale_and_sign() {
        let network = pearson_correlation(&test_data(), &positions(3)).unwrap();
        assert_eq!(network.num_nodes(), 3);
        assert_eq!(network.edges.len(), 3);
        assert!((edge_weight(&network, 0, 1).unwrap() - 1.0).abs() < 1e-9);
        assert!((edge_weight(&network, 0, 2).unwrap() + 1.0).abs() < 1e-9);
        assert_eq!(network.method, "COR");
    }

    #[test]
    fn test_flat_row_has_zero_weight() {
        let mut data = test_data();
        data.row_mut(2).fill(4.0);
        let network = pearson_correlation(&data, &positions(3)).unwrap();
        assert_eq!(edge_weight(&network, 1, 2), Some(0.0));
        let network = cross_correlation(&data, &positions(3)).unwrap();
        assert_eq!(edge_weight(&network, 0, 2), Some(0.0));
    }

    #[test]
    fn test_cross_correlation_finds_lagged_copy() {
        let signal: Vec<f64> = (0..256).map(|t| ((t * 37 % 101) as f64).sin()).collect();
        let mut data = Array2::<f64>::zeros((2, 200));
        for t in 0..200 {
            data[[0, t]] = signal[t + 10];
            data[[1, t]] = signal[t];
        }
        let lagged = cross_correlation(&data, &positions(2)).unwrap();
        let zero_lag = pearson_correlation(&data, &positions(2)).unwrap();

        let xcor = edge_weight(&lagged, 0, 1).unwrap();
        let cor = edge_weight(&zero_lag, 0, 1).unwrap();
        assert!(xcor > 0.8, "xcor = {}", xcor);
        assert!(xcor.abs() > cor.abs());
        assert!(xcor <= 1.0 + 1e-9);
    }

    #[test]
    fn test_weights_do_not_depend_on_units() {
        let data = test_data();
        let reference_cor = pearson_correlation(&data, &positions(3)).unwrap();
        let reference_xcor = cross_correlation(&data, &positions(3)).unwrap();

        // Gradiometer (T/m) and magnetometer (T) magnitudes
        for scale in [1e-11, 1e-13] {
            let scaled = data.mapv(|x| x * scale);
            let cor = pearson_correlation(&scaled, &positions(3)).unwrap();
            let xcor = cross_correlation(&scaled, &positions(3)).unwrap();
            for (a, b) in [(0, 1), (0, 2), (1, 2)] {
                let expected = edge_weight(&reference_cor, a, b).unwrap();
                let actual = edge_weight(&cor, a, b).unwrap();
                assert!((actual - expected).abs() < 1e-9, "COR {}-{} at {}", a, b, scale);

                let expected = edge_weight(&reference_xcor, a, b).unwrap();
                let actual = edge_weight(&xcor, a, b).unwrap();
                assert!((actual - expected).abs() < 1e-9, "XCOR {}-{} at {}", a, b, scale);
            }
            assert!((edge_weight(&cor, 0, 1).unwrap() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flat_row_with_offset_has_zero_weight() {
        let mut data = test_data();
        data.row_mut(0).fill(1e6 + 0.1);
        let network = pearson_correlation(&data, &positions(3)).unwrap();
        assert_eq!(edge_weight(&network, 0, 1), Some(0.0));
        assert_eq!(edge_weight(&network, 0, 2), Some(0.0));
        assert!((edge_weight(&network, 1, 2).unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_correlation_identical_rows() {
        let network = cross_correlation(&test_data(), &positions(3)).unwrap();
        assert_eq!(network.method, "XCOR");
        assert!((edge_weight(&network, 0, 1).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(matches!(
            pearson_correlation(&test_data(), &positions(2)),
            Err(ConnError::ShapeMismatch(_))
        ));
        let bad_positions = Array2::<f32>::zeros((3, 2));
        assert!(cross_correlation(&test_data(), &bad_positions).is_err());
    }
}
