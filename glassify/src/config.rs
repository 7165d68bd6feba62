use anyhow::{Context, Result};
use platform_dirs::AppDirs;
use relay::{ApiConfig, RelayServerConfig};
use relay_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::PathBuf, time::Duration};

const APP_NAME: &str = "glassify";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(default)]
    pub relay: Relay,

    #[serde(default)]
    pub upstream: Upstream,

    #[serde(default)]
    pub client: Client,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct Relay {
    #[derivative(Default(value = "\"0.0.0.0:8000\".to_string()"))]
    pub listen_addr: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct Upstream {
    #[derivative(Default(value = "remove_bg::DEFAULT_API_BASE_URL.to_string()"))]
    pub api_base_url: String,

    #[derivative(Default(value = "30"))]
    pub timeout_secs: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct Client {
    #[derivative(Default(value = "\"http://127.0.0.1:8000/remove-bg\".to_string()"))]
    pub relay_url: String,

    #[derivative(Default(value = "60"))]
    pub timeout_secs: u64,
}

impl Config {
    /// Loads `path`, or `<config dir>/glassify/glassify.toml` when none is given.
    pub fn init(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => {
                let app_dirs = AppDirs::new(Some(APP_NAME), true)
                    .context("no config directory on this platform")?;
                app_dirs.config_dir.join(format!("{APP_NAME}.toml"))
            }
        };

        let config = Self::load(config_path).context("load config file failed")?;
        log::debug!("{config:?}");
        Ok(config)
    }

    fn load(config_path: PathBuf) -> Result<Self> {
        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut config = Self {
            config_path,
            ..Default::default()
        };

        match fs::read_to_string(&config.config_path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(mut c) => {
                    c.config_path = config.config_path;
                    Ok(c)
                }
                Err(e) => {
                    log::warn!(
                        "broken config {}: {e}, restoring defaults",
                        config.config_path.display()
                    );
                    config.restore_defaults()?;
                    Ok(config)
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                config.is_first_run = true;
                config.save()?;
                Ok(config)
            }
            Err(e) => {
                log::warn!(
                    "unreadable config {}: {e}, restoring defaults",
                    config.config_path.display()
                );
                config.restore_defaults()?;
                Ok(config)
            }
        }
    }

    // Keeps the old file as `<name>.bak` before writing defaults over it.
    fn restore_defaults(&mut self) -> Result<()> {
        self.is_first_run = true;

        let mut bak_file = self.config_path.clone().into_os_string();
        bak_file.push(".bak");
        fs::copy(&self.config_path, &bak_file).with_context(|| {
            format!("backup {} failed", self.config_path.display())
        })?;

        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        fs::write(&self.config_path, text)
            .with_context(|| format!("write {} failed", self.config_path.display()))?;
        Ok(())
    }

    pub fn relay_server_config(&self) -> RelayServerConfig {
        RelayServerConfig::new(self.relay.listen_addr.clone())
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::default()
            .with_api_base_url(self.upstream.api_base_url.clone())
            .with_timeout(Duration::from_secs(self.upstream.timeout_secs))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_relay_url(self.client.relay_url.clone())
            .with_timeout(Duration::from_secs(self.client.timeout_secs))
    }
}
