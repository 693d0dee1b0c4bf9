use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};

use quickprint_core::{PrintSettings, SessionConfig, SizeBudget, DEFAULT_SIZE_LIMIT};
use quickprint_engine::{EncodeSettings, DEFAULT_CHUNK_SIZE};
use quickprint_logging::{qp_info, qp_warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "quickprint.ron";
pub const DEFAULT_CALLBACK_ADDR: &str = "127.0.0.1:8765";
pub const DEFAULT_CALLBACK_PATH: &str = "/print/callback";

/// User-tunable settings, stored as RON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Largest Base64 payload, in bytes, that is put on an agent URL.
    pub size_limit: u64,
    pub chunk_size: usize,
    /// Address the callback listener binds to. Port 0 picks a free port.
    pub callback_addr: String,
    pub callback_path: String,
    pub data_dir: PathBuf,
    pub print_defaults: PrintSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            callback_addr: DEFAULT_CALLBACK_ADDR.to_string(),
            callback_path: DEFAULT_CALLBACK_PATH.to_string(),
            data_dir: default_data_dir(),
            print_defaults: PrintSettings::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path`, or `quickprint.ron` in the default data directory.
    /// Unreadable or malformed files fall back to defaults with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_data_dir().join(CONFIG_FILENAME));
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                qp_warn!("Failed to read config from {:?}: {}", path, err);
                return Self::default();
            }
        };
        match Self::from_ron(&content) {
            Ok(config) => {
                qp_info!("Loaded config from {:?}", path);
                config
            }
            Err(err) => {
                qp_warn!("Failed to parse config from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(content)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
    }

    /// Callback base for a listener bound at `addr`. A wildcard bind address
    /// is replaced by loopback so the agent gets a host it can navigate to.
    pub fn callback_base_for(&self, addr: SocketAddr) -> String {
        format!("http://{}{}", navigable_addr(addr), self.callback_path)
    }

    /// Callback base derived from `callback_addr` alone, used when no
    /// listener could be bound.
    pub fn configured_callback_base(&self) -> String {
        match self.callback_addr.parse::<SocketAddr>() {
            Ok(addr) => self.callback_base_for(addr),
            Err(_) => format!("http://{}{}", self.callback_addr, self.callback_path),
        }
    }

    pub fn session_config(&self, callback_base: String) -> SessionConfig {
        SessionConfig {
            budget: SizeBudget::new(self.size_limit),
            callback_base,
            default_settings: self.print_defaults,
        }
    }

    pub fn encode_settings(&self) -> EncodeSettings {
        EncodeSettings {
            chunk_size: self.chunk_size,
        }
    }
}

fn navigable_addr(addr: SocketAddr) -> SocketAddr {
    if !addr.ip().is_unspecified() {
        return addr;
    }
    let loopback = match addr.ip() {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
    };
    SocketAddr::new(loopback, addr.port())
}

/// `<local data dir>/quickprint`, or `./.quickprint` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("quickprint"))
        .unwrap_or_else(|| PathBuf::from(".quickprint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickprint_core::Rotation;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(Some(&temp.path().join("absent.ron")));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.size_limit, 768_000);
        assert_eq!(config.chunk_size, 65_535);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(size_limit: 1000, callback_addr: "127.0.0.1:0", print_defaults: (fitToWidth: false, rotation: Some(270)))"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path));
        assert_eq!(config.size_limit, 1000);
        assert_eq!(config.callback_addr, "127.0.0.1:0");
        assert_eq!(config.callback_path, DEFAULT_CALLBACK_PATH);
        assert!(!config.print_defaults.fit_to_width);
        assert_eq!(config.print_defaults.rotation, Some(Rotation::Clockwise270));
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(size_limit: \"big\"").unwrap();
        assert_eq!(AppConfig::load(Some(&path)), AppConfig::default());
    }

    #[test]
    fn printed_config_reads_back() {
        let mut config = AppConfig::default();
        config.data_dir = PathBuf::from("/tmp/qp");
        let text = config.to_ron().unwrap();
        assert_eq!(AppConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn session_config_uses_limit_and_defaults() {
        let config = AppConfig {
            size_limit: 2048,
            ..AppConfig::default()
        };
        let base = config.callback_base_for("127.0.0.1:9000".parse().unwrap());
        assert_eq!(base, "http://127.0.0.1:9000/print/callback");

        let session = config.session_config(base.clone());
        assert_eq!(session.budget.limit(), 2048);
        assert_eq!(session.callback_base, base);
        assert_eq!(session.default_settings, PrintSettings::default());
    }

    #[test]
    fn wildcard_bind_address_becomes_loopback() {
        let config = AppConfig::default();
        assert_eq!(
            config.callback_base_for("0.0.0.0:8765".parse().unwrap()),
            "http://127.0.0.1:8765/print/callback"
        );
        assert_eq!(
            config.callback_base_for("[::]:8765".parse().unwrap()),
            "http://[::1]:8765/print/callback"
        );
        assert_eq!(
            config.callback_base_for("192.168.1.20:8765".parse().unwrap()),
            "http://192.168.1.20:8765/print/callback"
        );
    }

    #[test]
    fn configured_base_used_without_listener() {
        let config = AppConfig {
            callback_addr: "0.0.0.0:9100".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.configured_callback_base(),
            "http://127.0.0.1:9100/print/callback"
        );

        let config = AppConfig {
            callback_addr: "printhost:9100".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.configured_callback_base(),
            "http://printhost:9100/print/callback"
        );
    }
}
