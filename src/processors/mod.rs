//! Post-processing of resolved settings.
//!
//! Post-processors run after resolution succeeds. A [`Pipeline`] applies them
//! left to right, each one receiving the previous one's output.

mod env_override;

pub use env_override::{EnvironmentOverridingPostProcessor, env_var_name};

use crate::core::Settings;

/// A transform applied to resolved settings.
pub trait PostProcessor: Send + Sync {
    /// Transform `settings`.
    fn process(&self, settings: Settings) -> Settings;
}

impl<F> PostProcessor for F
where
    F: Fn(Settings) -> Settings + Send + Sync,
{
    fn process(&self, settings: Settings) -> Settings {
        self(settings)
    }
}

/// An ordered list of post-processors.
///
/// An empty pipeline returns its input unchanged.
///
/// # Examples
///
/// ```rust
/// use stratum_config::core::Settings;
/// use stratum_config::processors::Pipeline;
///
/// let pipeline = Pipeline::new()
///     .with_processor(|mut settings: Settings| {
///         settings.insert("stage".into(), "first".into());
///         settings
///     })
///     .with_processor(|mut settings: Settings| {
///         settings.insert("stage".into(), "second".into());
///         settings
///     });
///
/// let settings = pipeline.process(Settings::new());
/// assert_eq!(settings["stage"], "second");
/// ```
#[derive(Default)]
pub struct Pipeline {
    processors: Vec<Box<dyn PostProcessor>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a processor (builder pattern).
    pub fn with_processor<P: PostProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Append a boxed processor.
    pub fn add_processor(&mut self, processor: Box<dyn PostProcessor>) {
        self.processors.push(processor);
    }

    /// Number of processors.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Whether the pipeline has no processors.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run every processor in order.
    pub fn process(&self, settings: Settings) -> Settings {
        self.processors
            .iter()
            .fold(settings, |settings, processor| processor.process(settings))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("processors", &self.processors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let input = settings(&[("a", "1")]);
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.process(input.clone()), input);
    }

    #[test]
    fn test_processors_compose_left_to_right() {
        let pipeline = Pipeline::new()
            .with_processor(|mut s: Settings| {
                let value = format!("{}+a", s["trace"]);
                s.insert("trace".into(), value);
                s
            })
            .with_processor(|mut s: Settings| {
                let value = format!("{}+b", s["trace"]);
                s.insert("trace".into(), value);
                s
            });

        let output = pipeline.process(settings(&[("trace", "start")]));
        assert_eq!(output["trace"], "start+a+b");
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_processor_may_add_keys() {
        let mut pipeline = Pipeline::new();
        pipeline.add_processor(Box::new(|mut s: Settings| {
            s.insert("test.property".into(), "test.value".into());
            s
        }));

        let output = pipeline.process(Settings::new());
        assert_eq!(output["test.property"], "test.value");
    }
}
