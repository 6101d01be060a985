mod error;
mod result;
mod validation;

// Re-export public types
pub use error::PipelineError;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::file_processor::create_processor_from_preferences;
use crate::logging;
use crate::sink::{CollectedTokens, TokenCollector, TokenConsumer};
use std::path::Path;
use std::time::Instant;

/// Tokenize a grammar file into a collected token stream (file -> lexical -> collector)
pub fn process_file(file_path: &str) -> Result<PipelineResult<CollectedTokens>, PipelineError> {
    process_file_with(file_path, TokenCollector::new())
}

/// Tokenize a grammar file, streaming tokens to `consumer`
pub fn process_file_with<C: TokenConsumer>(
    file_path: &str,
    consumer: C,
) -> Result<PipelineResult<C::Output>, PipelineError> {
    process_file_with_config(file_path, consumer, &RuntimeConfig::default())
}

pub fn process_file_with_config<C: TokenConsumer>(
    file_path: &str,
    consumer: C,
    config: &RuntimeConfig,
) -> Result<PipelineResult<C::Output>, PipelineError> {
    let start_time = Instant::now();

    // Set up file context for global logging
    logging::with_file_context(Path::new(file_path), || {
        crate::log_info!("Starting grammar tokenization", "file" => file_path);

        // Stage 1: File processing
        let processor = create_processor_from_preferences(&config.file_processor);
        let source = processor.open(file_path)?;

        // Stage 2: Lexical analysis streamed to the consumer
        let outcome =
            crate::lexical::tokenize_with(source.reader, consumer, config.lexical.clone())?;

        let result = PipelineResult {
            file_metadata: source.metadata,
            output: outcome.output,
            registries: outcome.registries,
            lexical_metrics: outcome.metrics,
            processing_duration: start_time.elapsed(),
        };

        result.log_success(file_path);

        Ok(result)
    })
}
