use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::clock::ClockKind;
use crate::error::Error;

#[cfg(target_os = "android")]
const TMP_DIR: &str = "/data/local/tmp";
#[cfg(not(target_os = "android"))]
const TMP_DIR: &str = "/tmp";

const DATA_FILE_NAME: &str = "iobench.dat";

/// Platform temp location of the I/O benchmark's data file.
pub fn default_data_file() -> PathBuf {
    Path::new(TMP_DIR).join(DATA_FILE_NAME)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// No default: a run must name its clock source explicitly.
    pub source: Option<ClockKind>,
    pub rtc_device: PathBuf,
    pub output: PathBuf,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            source: None,
            rtc_device: PathBuf::from("/dev/rtc1"),
            output: PathBuf::from("logs.txt"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IoBenchConfig {
    pub data_file: PathBuf,
    /// Fixed shuffle seed; random mode is non-reproducible when unset.
    pub seed: Option<u64>,
}

impl Default for IoBenchConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub clock: ClockConfig,
    pub iobench: IoBenchConfig,
}

/// Load configuration from a TOML file.
///
/// - If `explicit_path` is `Some` and the file is missing, returns an error.
/// - If `explicit_path` is `None`, tries `/etc/guestbench.toml`; if missing, returns defaults.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, Error> {
    let path = match explicit_path {
        Some(p) => {
            if !p.exists() {
                return Err(Error::InvalidArgs(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => {
            let default = Path::new("/etc/guestbench.toml");
            if !default.exists() {
                return Ok(Config::default());
            }
            default.to_path_buf()
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        Error::InvalidArgs(format!("failed to read config {}: {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| {
        Error::InvalidArgs(format!("failed to parse config {}: {}", path.display(), e))
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.clock.source, None);
        assert_eq!(cfg.clock.rtc_device, PathBuf::from("/dev/rtc1"));
        assert_eq!(cfg.clock.output, PathBuf::from("logs.txt"));
        assert_eq!(cfg.iobench.seed, None);
        assert!(cfg.iobench.data_file.ends_with("iobench.dat"));
    }

    #[test]
    #[cfg(not(target_os = "android"))]
    fn test_default_data_file_in_tmp() {
        assert_eq!(default_data_file(), PathBuf::from("/tmp/iobench.dat"));
    }

    #[test]
    fn test_toml_parsing() {
        let path = std::env::temp_dir().join("guestbench_test_config.toml");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            write!(
                f,
                r#"
[clock]
source = "monotonic"

[iobench]
data_file = "/var/tmp/bench.dat"
seed = 7
"#
            )
            .unwrap();
        }
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.clock.source, Some(ClockKind::Monotonic));
        assert_eq!(config.iobench.data_file, PathBuf::from("/var/tmp/bench.dat"));
        assert_eq!(config.iobench.seed, Some(7));
        // Unset fields should get defaults
        assert_eq!(config.clock.output, PathBuf::from("logs.txt"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_clock_source_rejected() {
        let path = std::env::temp_dir().join("guestbench_test_bad_source.toml");
        std::fs::write(&path, "[clock]\nsource = \"sundial\"\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_explicit_config_errors() {
        let path = Path::new("/tmp/guestbench_nonexistent_config.toml");
        let result = load_config(Some(path));
        assert!(result.is_err());
    }
}
