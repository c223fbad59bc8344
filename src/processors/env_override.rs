//! Environment-variable override post-processor.

use super::PostProcessor;
use crate::core::Settings;
use crate::providers::{SettingProvider, SystemEnvironmentProvider};

/// The environment variable name that can override `key`.
///
/// Every character that is not an ASCII letter or digit becomes `_`, then the
/// result is uppercased.
///
/// # Examples
///
/// ```rust
/// use stratum_config::processors::env_var_name;
///
/// assert_eq!(env_var_name("my.property"), "MY_PROPERTY");
/// assert_eq!(env_var_name("some.thing/param"), "SOME_THING_PARAM");
/// ```
pub fn env_var_name(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

/// Replaces resolved values with environment variables when present.
///
/// For each key, the variable named by [`env_var_name`] is looked up; if it
/// exists its value replaces the resolved one. Keys are never added.
pub struct EnvironmentOverridingPostProcessor {
    variables: Box<dyn SettingProvider>,
}

impl EnvironmentOverridingPostProcessor {
    /// Read overrides from the process environment.
    ///
    /// The environment is captured when the processor is created.
    pub fn new() -> Self {
        Self::with_variables(SystemEnvironmentProvider::new())
    }

    /// Read overrides from `variables` instead of the process environment.
    pub fn with_variables<P: SettingProvider + 'static>(variables: P) -> Self {
        Self {
            variables: Box::new(variables),
        }
    }
}

impl Default for EnvironmentOverridingPostProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PostProcessor for EnvironmentOverridingPostProcessor {
    fn process(&self, mut settings: Settings) -> Settings {
        for (key, value) in settings.iter_mut() {
            let variable = env_var_name(key);
            match self.variables.get_property("", &variable) {
                Ok(Some(replacement)) => {
                    tracing::debug!(
                        key = %key,
                        variable = %variable,
                        "Overriding {} with environment variable",
                        key
                    );
                    *value = replacement;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        key = %key,
                        variable = %variable,
                        error = %e,
                        "environment lookup failed"
                    );
                }
            }
        }
        settings
    }
}

#[cfg(test)]
#[allow(unsafe_code)] // For env var manipulation in tests
mod tests {
    use super::*;
    use crate::providers::MapProvider;
    use serial_test::serial;

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("my.property"), "MY_PROPERTY");
        assert_eq!(env_var_name("some.ssm/parameter"), "SOME_SSM_PARAMETER");
        assert_eq!(env_var_name("monitoring.env"), "MONITORING_ENV");
        assert_eq!(env_var_name("already_UPPER_9"), "ALREADY_UPPER_9");
        assert_eq!(env_var_name("naïve-key"), "NA_VE_KEY");
    }

    #[test]
    fn test_overrides_matching_keys_only() {
        let processor = EnvironmentOverridingPostProcessor::with_variables(MapProvider::new([
            ("MY_PROPERTY", "from-env"),
            ("NOT_A_SETTING", "ignored"),
        ]));

        let mut settings = Settings::new();
        settings.insert("my.property".into(), "from-config".into());
        settings.insert("other.property".into(), "untouched".into());

        let output = processor.process(settings);

        assert_eq!(output["my.property"], "from-env");
        assert_eq!(output["other.property"], "untouched");
        assert_eq!(output.len(), 2);
    }

    #[test]
    #[serial]
    fn test_reads_process_environment() {
        unsafe {
            std::env::set_var("STRATUM_TEST_OVERRIDE_KEY", "from-process");
        }
        let processor = EnvironmentOverridingPostProcessor::new();
        unsafe {
            std::env::remove_var("STRATUM_TEST_OVERRIDE_KEY");
        }

        let mut settings = Settings::new();
        settings.insert("stratum.test.override-key".into(), "original".into());

        let output = processor.process(settings);
        assert_eq!(output["stratum.test.override-key"], "from-process");
    }
}
