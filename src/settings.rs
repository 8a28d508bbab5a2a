//! Layered configuration.
//!
//! Built-in defaults are overridden by `<config dir>/rsdos/config.toml`, which is
//! overridden in turn by a file given on the command line. A config file looks like
//!
//! ```toml
//! palette     = ["blue", "red", "green"]
//! total_color = "black"
//!
//! [defaults]
//! xmin     = 0.0
//! xmax     = 28.0
//! ymin     = -8.0
//! ymax     = 2.0
//! legend_y = 0.26
//! ```

use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    bail,
    ensure,
    Context,
};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{
        Format,
        Serialized,
        Toml,
    },
};
use log::{
    debug,
    info,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    selection::is_valid_color,
    types::Result,
};


/// Fallback axis limits and legend position, used wherever the caller leaves a value unset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotDefaults {
    pub xmin:     f64,
    /// Also the x upper limit when the energy window selects no sample.
    pub xmax:     f64,
    pub ymin:     f64,
    pub ymax:     f64,
    pub legend_y: f64,
}

impl Default for PlotDefaults {
    fn default() -> Self {
        Self {
            xmin:     0.0,
            xmax:     28.0,
            ymin:     -8.0,
            ymax:     2.0,
            legend_y: 0.26,
        }
    }
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub defaults:    PlotDefaults,
    /// Species colours, assigned in Mendeleev order and cycled.
    pub palette:     Vec<String>,
    pub total_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            defaults:    PlotDefaults::default(),
            palette:     ["blue", "red", "green", "gray", "black", "orange", "purple", "pink", "silver"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            total_color: "black".to_owned(),
        }
    }
}


impl Settings {
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rsdos")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// Merge built-in defaults, the user config file and `extra`, in this order.
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = Self::user_config_path() {
            if path.is_file() {
                info!("Reading settings from {:?}", &path);
                figment = figment.merge(Toml::file(path));
            } else {
                debug!("No user settings found at {:?}", &path);
            }
        }

        if let Some(path) = extra {
            ensure!(path.is_file(), "Settings file {:?} does not exist.", path);
            info!("Reading settings from {:?}", path);
            figment = figment.merge(Toml::file(path));
        }

        let settings: Self = figment.extract()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(txt: &str) -> Result<Self> {
        let settings: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(txt))
            .extract()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        ensure!(d.ymin < d.ymax, "Default energy window is empty: ymin = {}, ymax = {}", d.ymin, d.ymax);
        ensure!(d.xmin < d.xmax, "Default DOS range is empty: xmin = {}, xmax = {}", d.xmin, d.xmax);
        ensure!((0.0 ..= 1.0).contains(&d.legend_y), "legend_y must be within [0, 1], got {}", d.legend_y);
        ensure!(!self.palette.is_empty(), "Colour palette must not be empty.");

        for c in self.palette.iter().chain(std::iter::once(&self.total_color)) {
            if !is_valid_color(c) {
                bail!("Invalid colour {:?} in settings, use a CSS named colour or a hex code.", c);
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default() {
        let s = Settings::default();
        assert_eq!(s.defaults.xmax, 28.0);
        assert_eq!(s.defaults.ymin, -8.0);
        assert_eq!(s.palette.len(), 9);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_from_toml_str() {
        let s = Settings::from_toml_str(r#"
total_color = "navy"

[defaults]
ymin = -4.0
"#).unwrap();
        assert_eq!(s.total_color, "navy");
        assert_eq!(s.defaults.ymin, -4.0);
        assert_eq!(s.defaults.ymax, 2.0);
        assert_eq!(s.palette, Settings::default().palette);
    }

    #[test]
    fn test_invalid() {
        assert!(Settings::from_toml_str("[defaults]\nymin = 3.0\n").is_err());
        assert!(Settings::from_toml_str("[defaults]\nlegend_y = 1.5\n").is_err());
        assert!(Settings::from_toml_str("palette = []\n").is_err());
        assert!(Settings::from_toml_str("total_color = \"notacolour\"\n").is_err());
    }
}
