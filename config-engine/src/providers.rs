//! Figment layering for [`Settings`]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};

use crate::error::Result;
use crate::settings::{Settings, DEFAULT_SETTINGS_FILE};
use crate::validation::validate;

/// Prefix of the structured environment overrides
pub const ENV_PREFIX: &str = "CURATB_";

/// Variable the backend URL has always been configured with
pub const BACKEND_URL_VAR: &str = "SPRING_API_URL";

/// Build the layered figment without extracting it.
///
/// A missing settings file is not an error; figment skips absent files.
pub fn figment(path: Option<&Path>) -> Figment {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let figment = Figment::from(Serialized::defaults(Settings::default()));
    let figment = if is_yaml {
        figment.merge(Yaml::file(path))
    } else {
        figment.merge(Toml::file(path))
    };

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(
            Env::raw()
                .only(&[BACKEND_URL_VAR])
                .map(|_| "server.backend_url".into()),
        )
}

impl Settings {
    /// Load and validate settings from every layer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::ParseError`] when a layer cannot be read or
    /// has the wrong shape, and [`crate::ConfigError::ValidationError`] when
    /// the merged values are unusable.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_figment(&figment(path))
    }

    /// Extract and validate settings from an already built figment
    ///
    /// # Errors
    ///
    /// Same as [`Settings::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let settings: Settings = figment.extract()?;
        validate(&settings)?;
        tracing::debug!(
            backend_url = %settings.server.backend_url,
            proxy_url = %settings.client.proxy_url,
            "Settings loaded"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AgePolicy, ProbeFailurePolicy, StatusStoreKind};
    use figment::Jail;

    fn load(path: Option<&Path>) -> figment::error::Result<Settings> {
        Settings::load(path).map_err(|e| e.to_string().into())
    }

    #[test]
    fn test_defaults_without_any_layer() {
        Jail::expect_with(|_jail| {
            let settings = load(None)?;
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.server.backend_url, "http://localhost:8080");
            assert_eq!(settings.server.bind_address, "0.0.0.0:3000");
            assert_eq!(settings.server.max_upload_bytes, 50 * 1024 * 1024);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "curatb.toml",
                r#"
                [server]
                backend_url = "http://from-file:8080"
                status_store = "memory"
                probe_failure = "assume_trained"

                [client]
                age_policy = "one_to_100"
                "#,
            )?;
            jail.set_env("CURATB_SERVER__BIND_ADDRESS", "127.0.0.1:4000");

            let settings = load(None)?;
            assert_eq!(settings.server.backend_url, "http://from-file:8080");
            assert_eq!(settings.server.bind_address, "127.0.0.1:4000");
            assert_eq!(settings.server.status_store, StatusStoreKind::Memory);
            assert_eq!(settings.server.probe_failure, ProbeFailurePolicy::AssumeTrained);
            assert_eq!(settings.client.age_policy, AgePolicy::OneTo100);
            Ok(())
        });
    }

    #[test]
    fn test_spring_api_url_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("CURATB_SERVER__BACKEND_URL", "http://prefixed:8080");
            jail.set_env("SPRING_API_URL", "http://rna.internal:9090/");

            let settings = load(None)?;
            assert_eq!(settings.server.backend_url, "http://rna.internal:9090/");
            assert_eq!(settings.server.backend_base(), "http://rna.internal:9090");
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "settings.yaml",
                "client:\n  proxy_url: \"http://proxy:3000/\"\n",
            )?;
            let settings = load(Some(Path::new("settings.yaml")))?;
            assert_eq!(settings.client.proxy_base(), "http://proxy:3000");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("CURATB_SERVER__MAX_UPLOAD_BYTES", "0");
            assert!(Settings::load(None).is_err());
            Ok(())
        });
    }
}
