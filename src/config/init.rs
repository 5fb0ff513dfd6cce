// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates a commented caravel.yml template.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ProcessName;

use super::{CONFIG_FILENAME, Config, HOST_ENV, KEY_ENV, USER_ENV};

pub fn init_config(dir: &Path, app: Option<&str>, root: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(name) = app {
        config.app = ProcessName::new(name).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.remote.root = format!("/var/www/{}", config.app);
    }

    if let Some(root) = root {
        config.remote.root = root.to_string();
    }

    config.validate()?;

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"app: {app}

# Connection secrets are read from the environment at deploy time.
server:
  host: {{ env: {HOST_ENV} }}
  user: {{ env: {USER_ENV} }}
  key: {{ env: {KEY_ENV} }}
  port: 22
  # Unknown host keys are rejected unless this is set or known_hosts is pre-populated
  # trust_first_connection: true

remote:
  root: {root}
  retain_snapshots: {retain}

build:
  command: "{command}"
  output_dir: {output}

install:
  command: "{install}"

healthcheck:
  settle: 10s
  attempts: 2
  interval: 5s
  accept: [200, 301, 302]
"#,
        app = config.app,
        root = config.remote.root,
        retain = config.remote.retain_snapshots,
        command = config.build.command,
        output = config.build.output_dir,
        install = config.install.command,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_yaml_parses_back() {
        let yaml = generate_template_yaml(&Config::template());
        let config = Config::from_yaml(&yaml).expect("template should parse");
        assert_eq!(config.app.as_str(), "my-app");
        assert_eq!(config.remote.root, "/var/www/my-app");
        assert_eq!(config.healthcheck.accept, vec![200, 301, 302]);
    }
}
