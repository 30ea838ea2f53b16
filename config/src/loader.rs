use crate::{ConfigError, SubspaceConfig};
use regex::Regex;
use std::path::PathBuf;

pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".config/subspace/subspace.yaml"));
        }
        search_paths.push(PathBuf::from("./subspace.yaml"));

        #[cfg(unix)]
        search_paths.insert(0, PathBuf::from("/etc/subspace/subspace.yaml"));

        Self {
            explicit_file: None,
            search_paths,
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    pub fn load(&self) -> Result<SubspaceConfig, ConfigError> {
        let mut config = if let Ok(env_path) = std::env::var("SUBSPACE_CONFIG") {
            self.read_file(&PathBuf::from(env_path))?
        } else if let Some(ref explicit) = self.explicit_file {
            self.read_file(explicit)?
        } else {
            self.merge_search_paths()?
        };

        self.apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Layer every existing search path over the defaults, later paths winning.
    fn merge_search_paths(&self) -> Result<SubspaceConfig, ConfigError> {
        let mut config = SubspaceConfig::default();
        for path in &self.search_paths {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(path) {
                    tracing::debug!(path = %path.display(), "merging config file");
                    config = self.merge_yaml(&config, &content)?;
                }
            }
        }
        Ok(config)
    }

    fn read_file(&self, path: &PathBuf) -> Result<SubspaceConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.clone(),
            source: e,
        })?;
        self.parse_yaml(&content)
    }

    fn parse_yaml(&self, content: &str) -> Result<SubspaceConfig, ConfigError> {
        let expanded = self.expand_env_vars(content);
        Ok(serde_yaml::from_str(&expanded)?)
    }

    fn merge_yaml(&self, base: &SubspaceConfig, content: &str) -> Result<SubspaceConfig, ConfigError> {
        let overlay = self.parse_yaml(content)?;
        Ok(self.merge_configs(base, &overlay))
    }

    fn merge_configs(&self, base: &SubspaceConfig, overlay: &SubspaceConfig) -> SubspaceConfig {
        let defaults = SubspaceConfig::default();
        let mut result = base.clone();

        if overlay.server.hostname != defaults.server.hostname {
            result.server.hostname = overlay.server.hostname.clone();
        }
        if overlay.server.users != defaults.server.users {
            result.server.users = overlay.server.users.clone();
        }
        if overlay.server.system_directories != defaults.server.system_directories {
            result.server.system_directories = overlay.server.system_directories.clone();
        }
        if overlay.shell != defaults.shell {
            result.shell = overlay.shell.clone();
        }
        if overlay.logging != defaults.logging {
            result.logging = overlay.logging.clone();
        }

        result
    }

    fn expand_env_vars(&self, content: &str) -> String {
        // The pattern is a literal; it always compiles.
        let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
            return content.to_string();
        };
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_default()
        })
        .to_string()
    }

    fn apply_env_overrides(&self, config: &mut SubspaceConfig) {
        if let Ok(hostname) = std::env::var("SUBSPACE_HOSTNAME") {
            if !hostname.is_empty() {
                config.server.hostname = hostname;
            }
        }
        if let Ok(users) = std::env::var("SUBSPACE_USERS") {
            let users: Vec<String> = users
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !users.is_empty() {
                config.server.users = users;
            }
        }
        if let Ok(user) = std::env::var("SUBSPACE_USER") {
            if !user.is_empty() {
                config.shell.user = user;
            }
        }
        if let Ok(level) = std::env::var("SUBSPACE_LOG_LEVEL") {
            if let Ok(l) = serde_yaml::from_str(&level) {
                config.logging.level = l;
            }
        }
    }
}
