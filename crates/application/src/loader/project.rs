//! Schema, environment and scenario documents.

use caliper_domain::{ApiSchema, EnvironmentConfig, Scenario};

use super::source::{SourceDocument, SourceError};

/// Reads an API schema (`request.json`).
///
/// # Errors
///
/// Returns `SourceError::InvalidShape` if `base_path` is missing or a known
/// key has the wrong type.
pub fn load_schema(source: &SourceDocument) -> Result<ApiSchema, SourceError> {
    source.deserialize()
}

/// Selects one environment from `envconfig.yml`.
///
/// # Errors
///
/// Returns `SourceError::EnvironmentNotFound` if the environment is not a
/// top-level key.
pub fn load_environment(
    source: &SourceDocument,
    environment: &str,
) -> Result<EnvironmentConfig, SourceError> {
    let entry = source
        .mapping()?
        .get(environment)
        .ok_or_else(|| SourceError::EnvironmentNotFound {
            environment: environment.to_string(),
            origin: source.origin().to_string(),
        })?;
    serde_json::from_value(entry.clone()).map_err(|e| source.invalid(e.to_string()))
}

/// Reads a scenario file.
///
/// # Errors
///
/// Returns `SourceError::InvalidShape` for unknown step actions or missing
/// fields.
pub fn load_scenario(source: &SourceDocument) -> Result<Scenario, SourceError> {
    source.deserialize()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::loader::source::SourceFormat;
    use caliper_domain::Step;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_schema() {
        let doc = SourceDocument::parse(
            "request.json",
            r#"{"base_path": "/users", "request": {"id": "(user_id)"}}"#,
            SourceFormat::Json,
        )
        .unwrap();
        let schema = load_schema(&doc).unwrap();
        assert_eq!(schema.base_path, "/users");
        assert!(schema.request.is_some());
    }

    #[test]
    fn test_load_schema_requires_base_path() {
        let doc = SourceDocument::parse("request.json", "{}", SourceFormat::Json).unwrap();
        assert!(matches!(
            load_schema(&doc).unwrap_err(),
            SourceError::InvalidShape { .. }
        ));
    }

    #[test]
    fn test_load_environment() {
        let yaml = "dev:\n  host_uri: http://localhost:8080\nqa:\n  host_uri: https://qa.test\n";
        let doc = SourceDocument::parse("envconfig.yml", yaml, SourceFormat::Yaml).unwrap();
        assert_eq!(
            load_environment(&doc, "qa").unwrap().host_uri,
            "https://qa.test"
        );
        assert!(matches!(
            load_environment(&doc, "prod").unwrap_err(),
            SourceError::EnvironmentNotFound { .. }
        ));
    }

    #[test]
    fn test_load_scenario_rejects_unknown_action() {
        let yaml = "name: x\nsteps:\n  - action: teleport\n";
        let doc = SourceDocument::parse("s.yml", yaml, SourceFormat::Yaml).unwrap();
        assert!(load_scenario(&doc).is_err());

        let yaml = "name: x\nsteps:\n  - action: use_api\n    api: users\n";
        let doc = SourceDocument::parse("s.yml", yaml, SourceFormat::Yaml).unwrap();
        assert_eq!(
            load_scenario(&doc).unwrap().steps,
            vec![Step::UseApi {
                api: "users".to_string()
            }]
        );
    }
}
