use crate::file_processor::FileMetadata;
use crate::lexical::LexicalMetrics;
use crate::symbols::Registries;
use std::time::Duration;

/// Everything one grammar file produced
#[derive(Debug)]
pub struct PipelineResult<O> {
    pub file_metadata: FileMetadata,
    /// What the token consumer built from the stream
    pub output: O,
    pub registries: Registries,
    pub lexical_metrics: LexicalMetrics,
    pub processing_duration: Duration,
}

impl<O> PipelineResult<O> {
    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        crate::log_success!(
            crate::logging::codes::success::FILE_PROCESSING_SUCCESS,
            "Grammar file tokenized",
            "file" => file_path,
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "tokens" => self.lexical_metrics.total_tokens,
            "declared_tokens" => self.registries.tokens().len(),
            "declared_states" => self.registries.states().len(),
            "processing_rate_bytes_per_sec" => format!("{:.0}",
                self.file_metadata.size as f64 / seconds),
            "processing_rate_tokens_per_sec" => format!("{:.0}",
                self.lexical_metrics.total_tokens as f64 / seconds)
        );
    }
}
