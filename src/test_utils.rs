//! Test utilities for Linkrec
//!
//! Temporary directories, file fixtures and error assertions shared by the
//! unit tests.

use crate::config::Config;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error's display contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Configuration YAML covering every section
pub fn test_config_yaml() -> String {
    r#"
api:
  base_url: http://127.0.0.1:8000
  timeout_seconds: 5

session:
  backend: file
  redirect_delay_ms: 0
  dashboard_url: /home

recommendations:
  default_limit: 5
  max_generated: 3
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionBackend;
    use crate::error::LinkrecError;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(LinkrecError::Validation("Please fill in all fields".to_string()).into());
        assert_error_contains(result, "fill in");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_test_config_yaml_parses_and_validates() {
        let config: Config = serde_yaml::from_str(&test_config_yaml()).unwrap();
        assert_eq!(config.session.backend, SessionBackend::File);
        assert_eq!(config.recommendations.max_generated, 3);
        assert!(config.validate().is_ok());
    }
}
