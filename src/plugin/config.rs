//! Plugin configuration
//!
//! [`ObservatoryConfig`] holds everything needed to (re)build an
//! [`ObservatoryLike`](super::ObservatoryLike) plugin. It is plain serde data
//! and can be read from or written to JSON.

use crate::error::{Result, SkyFitError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default first active analysis bin
pub const DEFAULT_MIN_CHANNEL: u32 = 0;

/// Default last active analysis bin
pub const DEFAULT_MAX_CHANNEL: u32 = 9;

fn default_min_channel() -> u32 {
    DEFAULT_MIN_CHANNEL
}

fn default_max_channel() -> u32 {
    DEFAULT_MAX_CHANNEL
}

/// A circular region of interest on the sky
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    /// Centre right ascension, degrees
    pub ra: f64,
    /// Centre declination, degrees
    pub dec: f64,
    /// Radius, degrees
    pub radius: f64,
    /// Keep the region fixed instead of letting the backend adapt it to the model
    #[serde(default)]
    pub fixed: bool,
}

impl RegionOfInterest {
    pub fn new(ra: f64, dec: f64, radius: f64, fixed: bool) -> Result<Self> {
        let roi = Self {
            ra,
            dec,
            radius,
            fixed,
        };
        roi.validate()?;
        Ok(roi)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=360.0).contains(&self.ra) {
            return Err(SkyFitError::InvalidConfig(format!(
                "ROI right ascension {} is outside [0, 360]",
                self.ra
            )));
        }
        if !(-90.0..=90.0).contains(&self.dec) {
            return Err(SkyFitError::InvalidConfig(format!(
                "ROI declination {} is outside [-90, 90]",
                self.dec
            )));
        }
        if !(self.radius > 0.0 && self.radius <= 180.0) {
            return Err(SkyFitError::InvalidConfig(format!(
                "ROI radius {} is outside (0, 180]",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Configuration of an observatory likelihood plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservatoryConfig {
    /// Dataset name, also used as the plugin name
    pub name: String,
    /// Binned data (map tree) file
    pub maptree: PathBuf,
    /// Detector response file
    pub response: PathBuf,
    /// Number of transits to scale the exposure to, if not the one in the map tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_transits: Option<f64>,
    #[serde(default = "default_min_channel")]
    pub min_channel: u32,
    #[serde(default = "default_max_channel")]
    pub max_channel: u32,
    /// Load the whole sky instead of a disc around the sources; needs a ROI
    #[serde(default)]
    pub fullsky: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<RegionOfInterest>,
}

impl ObservatoryConfig {
    /// Configuration with default channels, no transit override and no ROI
    pub fn new(name: &str, maptree: impl Into<PathBuf>, response: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            maptree: maptree.into(),
            response: response.into(),
            n_transits: None,
            min_channel: DEFAULT_MIN_CHANNEL,
            max_channel: DEFAULT_MAX_CHANNEL,
            fullsky: false,
            roi: None,
        }
    }

    pub fn with_n_transits(mut self, n_transits: f64) -> Self {
        self.n_transits = Some(n_transits);
        self
    }

    pub fn with_fullsky(mut self, fullsky: bool) -> Self {
        self.fullsky = fullsky;
        self
    }

    pub fn with_channels(mut self, min_channel: u32, max_channel: u32) -> Self {
        self.min_channel = min_channel;
        self.max_channel = max_channel;
        self
    }

    pub fn with_roi(mut self, roi: RegionOfInterest) -> Self {
        self.roi = Some(roi);
        self
    }

    /// Check values that do not depend on the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SkyFitError::InvalidConfig(
                "plugin name must not be empty".to_string(),
            ));
        }
        if self.min_channel > self.max_channel {
            return Err(SkyFitError::InvalidConfig(format!(
                "min channel {} is above max channel {}",
                self.min_channel, self.max_channel
            )));
        }
        if let Some(n) = self.n_transits {
            if !(n > 0.0 && n.is_finite()) {
                return Err(SkyFitError::InvalidConfig(format!(
                    "number of transits must be positive, got {}",
                    n
                )));
            }
        }
        if let Some(roi) = &self.roi {
            roi.validate()?;
        }
        Ok(())
    }

    /// Expand and absolutise both input paths, then check they can be read
    pub(crate) fn resolve_paths(&mut self) -> Result<()> {
        self.maptree = sanitize_path(&self.maptree)?;
        self.response = sanitize_path(&self.response)?;

        check_readable("MapTree", &self.maptree)?;
        check_readable("Response", &self.response)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Save the configuration as JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path and make it absolute
///
/// Unknown variables are an `InvalidConfig` error.
pub fn sanitize_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let mut expanded = expand_variables(&raw)?;

    if expanded == "~" || expanded.starts_with("~/") {
        let home = std::env::var("HOME").map_err(|_| {
            SkyFitError::InvalidConfig(format!("cannot expand '~' in {}: HOME is not set", raw))
        })?;
        expanded = format!("{}{}", home, &expanded[1..]);
    }

    let expanded = PathBuf::from(expanded);
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(std::env::current_dir()?.join(expanded))
    }
}

fn expand_variables(input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            let end = braced.find('}').ok_or_else(|| {
                SkyFitError::InvalidConfig(format!("unterminated variable in path {}", input))
            })?;
            (&braced[..end], end + 2)
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        if name.is_empty() {
            out.push('$');
            rest = after;
            continue;
        }

        let value = std::env::var(name).map_err(|_| {
            SkyFitError::InvalidConfig(format!(
                "environment variable {} in path {} is not set",
                name, input
            ))
        })?;
        out.push_str(&value);
        rest = &after[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

fn check_readable(kind: &'static str, path: &Path) -> Result<()> {
    let readable = path.is_file() && File::open(path).is_ok();
    if readable {
        Ok(())
    } else {
        Err(SkyFitError::FileNotReadable {
            kind,
            path: path.to_path_buf(),
        })
    }
}
