//! The `GenerativeModel` trait -- the adapter interface for text models.
//!
//! The trait is object-safe so callers can hold `Arc<dyn GenerativeModel>`
//! and swap implementations without touching the pipeline.

use anyhow::Result;
use async_trait::async_trait;

/// A text-in, text-out language model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Human-readable name for this model (e.g. "gemini-1.5-flash").
    fn name(&self) -> &str;

    /// Send a single prompt and return the model's raw text response.
    ///
    /// Fails on transport errors, non-success responses, or responses that
    /// carry no text (e.g. blocked by safety filters).
    async fn generate(&self, prompt: &str) -> Result<String>;
}

// Compile-time assertion: GenerativeModel must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn GenerativeModel) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes the prompt back, used only to prove the trait can be used as
    /// `dyn GenerativeModel`.
    struct EchoModel;

    #[async_trait]
    impl GenerativeModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn model_is_object_safe() {
        let model: Box<dyn GenerativeModel> = Box::new(EchoModel);
        assert_eq!(model.name(), "echo");
        assert_eq!(model.generate("hello").await.unwrap(), "hello");
    }
}
