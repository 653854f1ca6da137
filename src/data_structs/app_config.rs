use std::env;
use std::fs;
use std::io::ErrorKind;
use std::time::Duration;

use log::info;
use yaml_rust::{Yaml, YamlLoader};

use crate::data_structs::course_watch::{CourseWatch, SearchRequest};
use crate::errors::ConfigError;

pub const UVM_SEARCH_URL: &str = "https://soc.uvm.edu/api/?page=fose&route=details";
pub const USER_AGENT: &str = "UVM-Seat-Checker/2.0 (personal; 1req/15min)";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";
const CURRENT_TERM: &str = "202601";

/// Everything a run needs. Built once at startup and never mutated afterwards.
#[derive(Debug, PartialEq, Eq)]
#[derive(Clone)]
pub struct CheckerConfig {
    pub search_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub webhook_url: Option<String>,
    pub courses: Vec<CourseWatch>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        return CheckerConfig {
            search_url: UVM_SEARCH_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: REQUEST_TIMEOUT,
            webhook_url: None,
            courses: vec![
                CourseWatch::new("ANTH 1140", 15447, CURRENT_TERM),
                CourseWatch::new("BUS 2620", 11518, CURRENT_TERM),
                CourseWatch::new("NR 1100", 13970, CURRENT_TERM),
            ],
        }
    }
}

impl CheckerConfig {

    /// Built-in defaults, overlaid by `config.yml` (or `$SEAT_CHECKER_CONFIG`)
    /// when present, then by `$WEBHOOK_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let (path, explicit) = match env::var("SEAT_CHECKER_CONFIG") {
            Ok(path) if !path.is_empty() => (path, true),
            _ => (DEFAULT_CONFIG_PATH.to_string(), false),
        };
        Self::load_from(&path, explicit, env::var("WEBHOOK_URL").ok())
    }

    /// A missing file is only an error when it was named `explicit`ly. A
    /// non-empty `env_webhook` takes priority over the file's `webhook-url`.
    pub fn load_from(path: &str, explicit: bool, env_webhook: Option<String>) -> Result<Self, ConfigError> {
        let config = match fs::read_to_string(path) {
            Ok(buf) => {
                info!("Loading configurations from {}", path);
                Self::from_yaml_str(&buf)?
            }
            Err(e) if e.kind() == ErrorKind::NotFound && !explicit => Self::default(),
            Err(source) => return Err(ConfigError::Io { path: path.to_string(), source }),
        };

        let webhook_url = non_empty(env_webhook)
            .or_else(|| config.webhook_url.clone());
        Ok(config.with_webhook_url(webhook_url))
    }

    /// Parses a yaml overlay. Keys that are absent keep their built-in value.
    pub fn from_yaml_str(buf: &str) -> Result<Self, ConfigError> {
        let docs = YamlLoader::load_from_str(buf)?;
        let mut config = Self::default();
        let doc = match docs.first() {
            Some(doc) => doc,
            None => return Ok(config),
        };

        if let Some(url) = optional_string(&doc["search-url"], "search-url")? {
            config.search_url = url;
        }
        if let Some(agent) = optional_string(&doc["user-agent"], "user-agent")? {
            config.user_agent = agent;
        }
        config.webhook_url = non_empty(optional_string(&doc["webhook-url"], "webhook-url")?);

        match &doc["timeout-secs"] {
            Yaml::BadValue | Yaml::Null => {}
            Yaml::Integer(secs) if *secs > 0 => config.timeout = Duration::from_secs(*secs as u64),
            _ => return Err(invalid("timeout-secs", "expected a positive integer")),
        }

        match &doc["courses"] {
            Yaml::BadValue | Yaml::Null => {}
            Yaml::Array(entries) => {
                config.courses = entries.iter()
                    .enumerate()
                    .map(|(i, entry)| parse_course(entry, i))
                    .collect::<Result<Vec<_>, _>>()?;
            }
            _ => return Err(invalid("courses", "expected a list")),
        }

        Ok(config)
    }

    /// Sets the webhook; an empty string counts as unset.
    pub fn with_webhook_url(mut self, webhook_url: Option<String>) -> Self {
        self.webhook_url = non_empty(webhook_url);
        self
    }

}

fn parse_course(entry: &Yaml, index: usize) -> Result<CourseWatch, ConfigError> {
    let field = |name: &str| format!("courses[{}].{}", index, name);
    let required = |name: &str| -> Result<String, ConfigError> {
        optional_string(&entry[name], &field(name))?
            .ok_or_else(|| ConfigError::MissingField(field(name)))
    };

    let name = required("name")?;
    if name.trim().is_empty() {
        return Err(invalid(&field("name"), "must not be empty"));
    }

    Ok(CourseWatch {
        name,
        body: SearchRequest {
            group: required("group")?,
            key: required("key")?,
            srcdb: required("srcdb")?,
            matched: optional_string(&entry["matched"], &field("matched"))?.unwrap_or_default(),
        },
    })
}

// term ids and CRNs are often written unquoted, so integers are accepted too
fn optional_string(value: &Yaml, field: &str) -> Result<Option<String>, ConfigError> {
    match value {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::String(s) => Ok(Some(s.clone())),
        Yaml::Integer(i) => Ok(Some(i.to_string())),
        _ => Err(invalid(field, "expected a string")),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidField { field: field.to_string(), reason: reason.to_string() }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_watch_three_courses_in_order() {
        let config = CheckerConfig::default();
        let names: Vec<&str> = config.courses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![
            "ANTH 1140 (CRN 15447)",
            "BUS 2620 (CRN 11518)",
            "NR 1100 (CRN 13970)",
        ]);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn empty_yaml_keeps_defaults() {
        assert_eq!(CheckerConfig::from_yaml_str("").unwrap(), CheckerConfig::default());
    }

    #[test]
    fn yaml_overrides_courses_and_endpoint() {
        let config = CheckerConfig::from_yaml_str(r#"
search-url: http://localhost:9000/api
timeout-secs: 3
courses:
  - name: CS 2100 (CRN 10001)
    group: "code:CS 2100"
    key: "crn:10001"
    srcdb: 202609
"#).unwrap();

        assert_eq!(config.search_url, "http://localhost:9000/api");
        assert_eq!(config.user_agent, USER_AGENT);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.courses.len(), 1);
        assert_eq!(config.courses[0].body.srcdb, "202609");
        assert_eq!(config.courses[0].body.matched, "");
    }

    #[test]
    fn missing_course_field_is_reported() {
        let err = CheckerConfig::from_yaml_str(r#"
courses:
  - name: CS 2100
    group: "code:CS 2100"
    srcdb: "202609"
"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "courses[0].key"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = CheckerConfig::from_yaml_str("timeout-secs: 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { .. }));
    }

    #[test]
    fn blank_webhook_counts_as_unset() {
        let config = CheckerConfig::default().with_webhook_url(Some(String::from("  ")));
        assert!(config.webhook_url.is_none());

        let config = CheckerConfig::from_yaml_str("webhook-url: ''").unwrap();
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn missing_default_file_uses_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);

        let config = CheckerConfig::load_from(path.to_str().unwrap(), false, None).unwrap();
        assert_eq!(config, CheckerConfig::default());
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.yml");

        let err = CheckerConfig::load_from(path.to_str().unwrap(), true, None).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn named_file_is_read() {
        let file = config_file("search-url: http://localhost:9000/api\nwebhook-url: http://hooks.test/file\n");

        let config = CheckerConfig::load_from(file.path().to_str().unwrap(), true, None).unwrap();
        assert_eq!(config.search_url, "http://localhost:9000/api");
        assert_eq!(config.webhook_url.as_deref(), Some("http://hooks.test/file"));
    }

    #[test]
    fn env_webhook_beats_file() {
        let file = config_file("webhook-url: http://hooks.test/file\n");

        let config = CheckerConfig::load_from(
            file.path().to_str().unwrap(), true, Some(String::from("http://hooks.test/env"))
        ).unwrap();
        assert_eq!(config.webhook_url.as_deref(), Some("http://hooks.test/env"));
    }

    #[test]
    fn empty_env_webhook_falls_back_to_file() {
        let file = config_file("webhook-url: http://hooks.test/file\n");

        let config = CheckerConfig::load_from(
            file.path().to_str().unwrap(), true, Some(String::new())
        ).unwrap();
        assert_eq!(config.webhook_url.as_deref(), Some("http://hooks.test/file"));
    }
}
