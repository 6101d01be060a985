//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_ENCODING: Code = Code::new("E020");
    pub const INPUT_READ_FAILURE: Code = Code::new("E021");
    pub const STACK_UNDERFLOW: Code = Code::new("E022");
    pub const STACK_OVERFLOW: Code = Code::new("E023");
    pub const LEXEME_TOO_LONG: Code = Code::new("E024");
    pub const UNCLASSIFIED_IDENTIFIER: Code = Code::new("E025");
    pub const HALTED: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const UNKNOWN_DIRECTIVE: Code = Code::new("E028");
    pub const MALFORMED_DIRECTIVE: Code = Code::new("E029");
}

/// Token sink error codes
pub mod sink {
    use super::Code;

    pub const SINK_CLOSED: Code = Code::new("E060");
    pub const CONSUMER_PANICKED: Code = Code::new("E061");
    pub const CONSUMER_OUTPUT_FAILURE: Code = Code::new("E062");
}

/// Success codes (informational)
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const DIRECTIVE_APPLIED: Code = Code::new("I021");
    pub const GRAMMAR_SECTION_ENTERED: Code = Code::new("I022");
    pub const CONSUMER_DRAINED: Code = Code::new("I030");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

#[rustfmt::skip]
const ERROR_TABLE: &[(&str, &str, Severity, bool, bool, &str, &str)] = &[
    // System errors
    ("ERR001", "System", Severity::Critical, false, true,
        "Critical internal system error",
        "File a bug report with the grammar file that triggered it"),
    ("ERR002", "System", Severity::Critical, false, true,
        "System initialization failure",
        "Check logging configuration and environment variables"),

    // File processing errors
    ("E005", "FileProcessing", Severity::Medium, false, true,
        "Grammar file not found at specified path",
        "Check the -y path and ensure the file exists"),
    ("E006", "FileProcessing", Severity::Low, true, false,
        "Grammar file does not have the .pigy extension",
        "Rename the file or disable PIGY_REQUIRE_PIGY_EXTENSION"),
    ("E007", "FileProcessing", Severity::Medium, false, true,
        "Grammar file exceeds maximum size limit",
        "Split the grammar or raise max_file_size in the build profile"),
    ("E009", "FileProcessing", Severity::Medium, false, true,
        "Permission denied accessing grammar file",
        "Check file permissions and user access rights"),
    ("E011", "FileProcessing", Severity::Medium, false, true,
        "I/O error while opening grammar file",
        "Check disk, permissions and file system integrity"),
    ("E012", "FileProcessing", Severity::Medium, false, true,
        "Path does not name a regular file",
        "Provide the path of a grammar file, not a directory"),

    // Lexical errors
    ("E020", "Lexical", Severity::High, false, true,
        "Input is not valid UTF-8 text",
        "Convert the grammar file to UTF-8"),
    ("E021", "Lexical", Severity::High, false, true,
        "Reading the input source failed",
        "Check that the input source is still readable"),
    ("E022", "Lexical", Severity::Critical, false, true,
        "Context stack would have been emptied",
        "File a bug report with the grammar file that triggered it"),
    ("E023", "Lexical", Severity::Critical, false, true,
        "Context stack exceeded its maximum depth",
        "Raise max_stack_depth in the build profile"),
    ("E024", "Lexical", Severity::High, false, true,
        "Pending lexeme exceeded its maximum length",
        "Break the construct up or raise max_lexeme_length"),
    ("E025", "Lexical", Severity::Low, true, false,
        "Identifier in an action matches no keyword, token or state",
        "Declare it with %token or %state, or fix the spelling"),
    ("E026", "Lexical", Severity::High, false, true,
        "Lexer entered its error state",
        "Inspect the reported lexeme for the offending construct"),
    ("E027", "Lexical", Severity::High, false, true,
        "Token count limit exceeded",
        "Split the grammar or raise max_token_count"),
    ("E028", "Lexical", Severity::Low, true, false,
        "Directive name is not recognized",
        "Use one of yacc, token, state, only, except, include, output, alias"),
    ("E029", "Lexical", Severity::Low, true, false,
        "Directive is missing required arguments",
        "Check the directive syntax"),

    // Sink errors
    ("E060", "Sink", Severity::High, false, true,
        "Token consumer stopped receiving",
        "Check the consumer for an earlier failure"),
    ("E061", "Sink", Severity::Critical, false, true,
        "Token consumer thread panicked",
        "File a bug report with the grammar file that triggered it"),
    ("E062", "Sink", Severity::Medium, true, false,
        "Token consumer could not write its output",
        "Check the output destination"),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        ERROR_TABLE
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Unknown codes are treated as Medium severity
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|m| m.recoverable)
        .unwrap_or(false)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|m| m.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    if let Some(metadata) = get_error_metadata(code) {
        return metadata.category;
    }
    match code.chars().next() {
        Some('I') => "Success",
        Some('W') => "Warning",
        Some('D') => "Debug",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::PERMISSION_DENIED,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            lexical::INVALID_ENCODING,
            lexical::INPUT_READ_FAILURE,
            lexical::STACK_UNDERFLOW,
            lexical::STACK_OVERFLOW,
            lexical::LEXEME_TOO_LONG,
            lexical::UNCLASSIFIED_IDENTIFIER,
            lexical::HALTED,
            lexical::TOO_MANY_TOKENS,
            lexical::UNKNOWN_DIRECTIVE,
            lexical::MALFORMED_DIRECTIVE,
            sink::SINK_CLOSED,
            sink::CONSUMER_PANICKED,
            sink::CONSUMER_OUTPUT_FAILURE,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_unclassified_identifier_is_recoverable() {
        let code = lexical::UNCLASSIFIED_IDENTIFIER.as_str();
        assert!(is_recoverable(code));
        assert!(!requires_halt(code));
        assert_eq!(get_category(code), "Lexical");
    }

    #[test]
    fn test_stack_underflow_halts() {
        let code = lexical::STACK_UNDERFLOW.as_str();
        assert!(requires_halt(code));
        assert_eq!(get_severity(code), Severity::Critical);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_category("I020"), "Success");
        assert_eq!(get_category("D000"), "Debug");
        assert_eq!(get_severity("X999"), Severity::Medium);
    }
}
