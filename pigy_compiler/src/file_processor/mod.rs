//! File processor: validates and opens grammar files for streaming

mod processor;

pub use processor::{
    FileMetadata, FileProcessor, FileProcessorError, GrammarSource, GRAMMAR_EXTENSION,
};

use crate::config::runtime::FileProcessorPreferences;

/// Open a grammar file with preferences taken from the environment
pub fn open_grammar(file_path: &str) -> Result<GrammarSource, FileProcessorError> {
    FileProcessor::new().open(file_path)
}

pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Get the compile-time maximum file size limit
pub fn get_max_file_size() -> u64 {
    FileProcessor::max_file_size()
}
