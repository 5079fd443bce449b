//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which runs one entry through the pipeline) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation lets archive and preview logic be tested against a mock backend.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`SizeSpec`]: Target box plus the filename prefix used for sequenced names.
//! - [`SizePreset`]: The fixed set of selectable sizes; a preset is always chosen whole.
//! - [`OutputPolicy`]: Keep the source container format, or force JPEG.
//! - [`TransformParams`]: Everything one pipeline run needs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// Highest quality. Used whenever the pipeline forces JPEG output so a
    /// sharpened image is not degraded a second time by the encoder.
    pub fn max() -> Self {
        Self(100)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::max()
    }
}

/// Target output box and the prefix that sequenced filenames start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    pub width: u32,
    pub height: u32,
    pub prefix: &'static str,
}

/// The selectable output sizes.
///
/// | Preset | Box | Prefix | Typical use |
/// |---|---|---|---|
/// | `web` | 1200×628 | `c` | Website headers, OGP cards |
/// | `social` | 1080×1080 | `s` | Square social posts |
/// | `blog` | 600×400 | `m` | Blog thumbnails |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    #[default]
    Web,
    Social,
    Blog,
}

impl SizePreset {
    pub const ALL: [SizePreset; 3] = [SizePreset::Web, SizePreset::Social, SizePreset::Blog];

    pub fn spec(self) -> SizeSpec {
        match self {
            SizePreset::Web => SizeSpec {
                width: 1200,
                height: 628,
                prefix: "c",
            },
            SizePreset::Social => SizeSpec {
                width: 1080,
                height: 1080,
                prefix: "s",
            },
            SizePreset::Blog => SizeSpec {
                width: 600,
                height: 400,
                prefix: "m",
            },
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SizePreset::Web => "website / OGP",
            SizePreset::Social => "square social post",
            SizePreset::Blog => "blog thumbnail",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SizePreset::Web => "web",
            SizePreset::Social => "social",
            SizePreset::Blog => "blog",
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.spec();
        write!(f, "{}x{}", spec.width, spec.height)
    }
}

/// Which container the encoder writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPolicy {
    /// Re-encode in the format the input was detected as.
    PreserveSource,
    /// Always write JPEG at maximum quality.
    ForceJpeg,
}

/// Parameters for one run of the transform pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformParams {
    pub size: SizeSpec,
    pub sharpen: bool,
    pub output: OutputPolicy,
}
