use crate::timezone::{detect_system_timezone, normalize_timezone_input};
use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use rollover_core::asana::{DEFAULT_API_BASE_URL, MAX_PAGE_SIZE};
use rollover_core::error::CoreError;
use rollover_core::models::{RunMode, TaskSelector};
use rollover_core::timezone::parse_timezone;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use url::Url;

/// Unvalidated configuration as read from defaults, the TOML file and the environment.
#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    /// Asana personal access token
    #[serde(default, deserialize_with = "text_or_number")]
    pub asana_token: Option<String>,
    /// Workspace whose tasks assigned to the current user are moved in production
    #[serde(default, deserialize_with = "text_or_number")]
    pub workspace_id: Option<String>,
    /// Project whose tasks are moved in test mode
    #[serde(default, deserialize_with = "text_or_number")]
    pub test_project_id: Option<String>,
    /// `test` selects the test project, anything else is production
    pub environment: String,
    /// IANA timezone used to decide what "today" is; detected when absent
    pub timezone: Option<String>,
    /// Base URL of the Asana REST API
    pub api_base_url: Url,
    /// Tasks requested per page
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asana_token: None,
            workspace_id: None,
            test_project_id: None,
            environment: "production".to_string(),
            timezone: None,
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("Cannot parse default API URL."),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("asana_token", &self.asana_token.as_ref().map(|_| "<redacted>"))
            .field("workspace_id", &self.workspace_id)
            .field("test_project_id", &self.test_project_id)
            .field("environment", &self.environment)
            .field("timezone", &self.timezone)
            .field("api_base_url", &self.api_base_url.as_str())
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Config {
    /// Layers defaults, the TOML file, the plain variables (`ASANA_TOKEN`, ...)
    /// and finally `ROLLOVER_*` variables.
    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::raw().only(&[
                "asana_token",
                "workspace_id",
                "test_project_id",
                "environment",
            ]))
            .merge(Env::prefixed("ROLLOVER_"))
    }

    /// Checks required values and resolves the run mode, selector and timezone.
    pub fn into_settings(self) -> Result<Settings, CoreError> {
        let mode = RunMode::from(self.environment.as_str());
        let token = present(self.asana_token);
        let workspace = present(self.workspace_id);
        let test_project = present(self.test_project_id);

        let mut missing = Vec::new();
        if token.is_none() {
            missing.push("ASANA_TOKEN");
        }
        if workspace.is_none() {
            missing.push("WORKSPACE_ID");
        }
        if mode == RunMode::Test && test_project.is_none() {
            missing.push("TEST_PROJECT_ID");
        }

        let (Some(token), Some(workspace), true) = (token, workspace, missing.is_empty()) else {
            return Err(CoreError::Configuration(format!(
                "Missing required environment variables: {}. Please ensure they are set in your environment or .env file",
                missing.join(", ")
            )));
        };

        let selector = TaskSelector::for_mode(mode, &workspace, test_project.as_deref())?;

        let timezone_name = match present(self.timezone) {
            Some(input) => normalize_timezone_input(&input)?,
            None => detect_system_timezone(),
        };

        Ok(Settings {
            token,
            mode,
            selector,
            timezone: parse_timezone(&timezone_name)?,
            api_base_url: self.api_base_url,
            page_size: self.page_size,
        })
    }
}

/// Environment values such as `WORKSPACE_ID=1200` reach serde as numbers.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Value>::deserialize(deserializer)?.map(|value| match value {
        Value::Text(text) => text,
        Value::Number(number) => number.to_string(),
    }))
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validated configuration that a pass runs with.
pub struct Settings {
    pub token: String,
    pub mode: RunMode,
    pub selector: TaskSelector,
    pub timezone: Tz,
    pub api_base_url: Url,
    pub page_size: u32,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("token", &"<redacted>")
            .field("mode", &self.mode)
            .field("selector", &self.selector)
            .field("timezone", &self.timezone)
            .field("api_base_url", &self.api_base_url.as_str())
            .field("page_size", &self.page_size)
            .finish()
    }
}
