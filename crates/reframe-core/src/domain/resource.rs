//! Browser-side resource descriptors.
//!
//! Browser config files are declared as paths rather than loaded values
//! because the browser bundle is built separately from the server.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DomainError;

/// A browser-side config file contributed by a plugin.
///
/// Invariant: `disk_path` is absolute once it has passed
/// [`ResourceDescriptor::from_value`] or [`ResourceDescriptor::validated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub disk_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
}

/// Loose shape accepted from config files before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    disk_path: Option<PathBuf>,
    config_name: Option<String>,
}

impl ResourceDescriptor {
    pub fn new(disk_path: impl Into<PathBuf>) -> Self {
        Self {
            disk_path: disk_path.into(),
            config_name: None,
        }
    }

    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = Some(name.into());
        self
    }

    pub fn disk_path(&self) -> &Path {
        &self.disk_path
    }

    /// Validate the `browserConfig` option of `plugin`.
    pub fn from_value(plugin: &str, value: &Value) -> Result<Self, DomainError> {
        let invalid = |reason: String, disk_path: Option<PathBuf>| {
            DomainError::InvalidResourceDescriptor {
                plugin: plugin.to_string(),
                reason,
                disk_path,
            }
        };

        if !value.is_object() {
            return Err(invalid(
                format!("expected a table, found {}", value_kind(value)),
                None,
            ));
        }

        let raw: RawDescriptor = serde_json::from_value(value.clone())
            .map_err(|e| invalid(format!("malformed descriptor: {e}"), None))?;

        let disk_path = raw
            .disk_path
            .ok_or_else(|| invalid("missing `diskPath`".into(), None))?;

        Self {
            disk_path,
            config_name: raw.config_name,
        }
        .validated(plugin)
    }

    /// Check a descriptor built in code by `plugin`.
    pub fn validated(self, plugin: &str) -> Result<Self, DomainError> {
        let invalid = |reason: String, disk_path: Option<PathBuf>| {
            DomainError::InvalidResourceDescriptor {
                plugin: plugin.to_string(),
                reason,
                disk_path,
            }
        };

        if self.disk_path.as_os_str().is_empty() {
            return Err(invalid("missing `diskPath`".into(), None));
        }
        if !self.disk_path.is_absolute() {
            return Err(invalid(
                format!("`diskPath` must be absolute, got '{}'", self.disk_path.display()),
                Some(self.disk_path),
            ));
        }
        Ok(self)
    }
}

/// Human name of a JSON value's type, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[cfg(unix)]
    const ABS: &str = "/srv/app/browser.js";
    #[cfg(windows)]
    const ABS: &str = "C:\\srv\\app\\browser.js";

    #[test]
    fn absolute_path_is_accepted() {
        let d = ResourceDescriptor::from_value("p", &json!({ "diskPath": ABS, "configName": "router" }))
            .unwrap();
        assert_eq!(d.disk_path(), Path::new(ABS));
        assert_eq!(d.config_name.as_deref(), Some("router"));
    }

    #[test]
    fn relative_path_is_rejected() {
        let err = ResourceDescriptor::from_value("p", &json!({ "diskPath": "browser.js" }))
            .unwrap_err();
        match err {
            DomainError::InvalidResourceDescriptor { disk_path, .. } => {
                assert_eq!(disk_path, Some(PathBuf::from("browser.js")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_path_is_rejected() {
        assert!(matches!(
            ResourceDescriptor::from_value("p", &json!({ "configName": "x" })),
            Err(DomainError::InvalidResourceDescriptor { disk_path: None, .. })
        ));
        assert!(matches!(
            ResourceDescriptor::from_value("p", &json!({ "diskPath": "" })),
            Err(DomainError::InvalidResourceDescriptor { .. })
        ));
    }

    #[test]
    fn descriptors_built_in_code_are_checked_too() {
        assert!(ResourceDescriptor::new(ABS).validated("p").is_ok());
        assert!(matches!(
            ResourceDescriptor::new("browser.js").validated("p"),
            Err(DomainError::InvalidResourceDescriptor { disk_path: Some(_), .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_survive() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/srv/app/\xff.js"));
        let d = ResourceDescriptor::new(path).validated("p").unwrap();
        assert_eq!(d.disk_path(), path);
    }

    #[test]
    fn non_table_is_rejected() {
        let err = ResourceDescriptor::from_value("p", &json!(ABS)).unwrap_err();
        assert!(err.to_string().contains("found string"));
    }
}
