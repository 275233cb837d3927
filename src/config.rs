//! JSON run configuration for the `pixel_lab` tool.
//!
//! ```json
//! {
//!   "input": "photo.png",
//!   "output_dir": "out",
//!   "seed": 7,
//!   "operation": { "op": "convolution", "kernel": { "template": "sharpen" }, "edge": "mirror" }
//! }
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::filters::convolution::{EdgeHandling, Kernel, KernelTemplate};

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub input: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Noise generator seed.
    #[serde(default)]
    pub seed: u64,
    pub operation: Operation,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_sigma() -> f32 {
    20.0
}

fn default_level() -> i32 {
    1
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    GrayHistogram,
    GaussianNoise {
        /// Standard deviation in 0-255 units.
        #[serde(default = "default_sigma")]
        sigma: f32,
    },
    Resize {
        width: usize,
        height: usize,
    },
    HaarWavelet {
        #[serde(default = "default_level")]
        level: i32,
        #[serde(default = "default_scale")]
        scale: f32,
    },
    Equalize,
    Convolution {
        #[serde(default)]
        kernel: KernelConfig,
        #[serde(default)]
        edge: EdgeHandling,
    },
}

impl Operation {
    /// Short name used as the output file prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GrayHistogram => "gray_histogram",
            Operation::GaussianNoise { .. } => "gaussian_noise",
            Operation::Resize { .. } => "resize",
            Operation::HaarWavelet { .. } => "haar_wavelet",
            Operation::Equalize => "equalize",
            Operation::Convolution { .. } => "convolution",
        }
    }
}

/// Either a named template (optionally grown to `size`) or explicit weights.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KernelConfig {
    Template {
        template: KernelTemplate,
        #[serde(default)]
        size: Option<usize>,
    },
    Custom {
        size: usize,
        weights: Vec<f32>,
    },
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig::Template {
            template: KernelTemplate::Identity,
            size: None,
        }
    }
}

impl KernelConfig {
    pub fn build(&self) -> Result<Kernel> {
        match self {
            KernelConfig::Template { template, size } => {
                let kernel = Kernel::template(*template);
                match size {
                    Some(size) => kernel.resized(*size),
                    None => Ok(kernel),
                }
            }
            KernelConfig::Custom { size, weights } => Kernel::new(*size, weights.clone()),
        }
    }
}

pub fn load_config(path: &Path) -> std::result::Result<RunConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    fn parse(json: &str) -> RunConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(r#"{ "input": "a.png", "operation": { "op": "gaussian_noise" } }"#);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.seed, 0);
        assert_eq!(config.operation, Operation::GaussianNoise { sigma: 20.0 });

        let config = parse(r#"{ "input": "a.png", "operation": { "op": "haar_wavelet" } }"#);
        assert_eq!(
            config.operation,
            Operation::HaarWavelet {
                level: 1,
                scale: 1.0
            }
        );
    }

    #[test]
    fn test_unit_operations() {
        let config = parse(r#"{ "input": "a.png", "operation": { "op": "equalize" } }"#);
        assert_eq!(config.operation, Operation::Equalize);
        assert_eq!(config.operation.name(), "equalize");
        let config = parse(r#"{ "input": "a.png", "seed": 9, "operation": { "op": "gray_histogram" } }"#);
        assert_eq!(config.operation, Operation::GrayHistogram);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_convolution_template_kernel() {
        let config = parse(
            r#"{ "input": "a.png", "operation": {
                "op": "convolution", "kernel": { "template": "emboss" }, "edge": "mirror" } }"#,
        );
        let Operation::Convolution { kernel, edge } = config.operation else {
            panic!("expected convolution");
        };
        assert_eq!(edge, EdgeHandling::Mirror);
        let kernel = kernel.build().unwrap();
        assert_eq!(kernel.to_vec(), KernelTemplate::Emboss.weights().to_vec());
    }

    #[test]
    fn test_convolution_defaults_to_identity_extend() {
        let config = parse(r#"{ "input": "a.png", "operation": { "op": "convolution" } }"#);
        let Operation::Convolution { kernel, edge } = config.operation else {
            panic!("expected convolution");
        };
        assert_eq!(edge, EdgeHandling::Extend);
        assert_eq!(kernel.build().unwrap(), Kernel::template(KernelTemplate::Identity));
    }

    #[test]
    fn test_template_grown_to_size() {
        let kernel = KernelConfig::Template {
            template: KernelTemplate::Sharpen,
            size: Some(5),
        }
        .build()
        .unwrap();
        assert_eq!(kernel.size(), 5);
        assert_eq!(kernel.weights()[[2, 2]], 5.0);
        assert_eq!(kernel.weights()[[0, 0]], 0.0);
    }

    #[test]
    fn test_custom_kernel_validated() {
        let config = parse(
            r#"{ "input": "a.png", "operation": {
                "op": "convolution", "kernel": { "size": 1, "weights": [2.0] } } }"#,
        );
        let Operation::Convolution { kernel, .. } = config.operation else {
            panic!("expected convolution");
        };
        assert_eq!(kernel.build().unwrap().to_vec(), vec![2.0]);

        let bad = KernelConfig::Custom {
            size: 3,
            weights: vec![1.0; 4],
        };
        assert!(matches!(
            bad.build(),
            Err(FilterError::KernelLength {
                expected: 9,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_unknown_op_rejected() {
        let result: std::result::Result<RunConfig, _> =
            serde_json::from_str(r#"{ "input": "a.png", "operation": { "op": "blur" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Path::new("/no/such/config.json")).unwrap_err();
        assert!(err.starts_with("Failed to read config"));
    }
}
