//! Configuration file loading

use anyhow::Result;
use camino::Utf8PathBuf;
use verdict_core::VerdictConfig;

/// Load from an explicit path (errors surface) or from the default
/// `.verdict.toml` discovery (absent file is fine, a broken one is not).
pub fn load_config(path: Option<&Utf8PathBuf>) -> Result<Option<VerdictConfig>> {
    match path {
        Some(p) => Ok(Some(VerdictConfig::from_file(p.as_std_path())?)),
        None => Ok(VerdictConfig::load_default_strict()?),
    }
}
