// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    sink: SinkLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_lexeme_length: usize,
    max_token_count: usize,
    max_stack_depth: usize,
}

#[derive(serde::Deserialize)]
struct SinkLimits {
    channel_capacity: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PIGY_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=PIGY_CONFIG_DIR");

    let profile = env::var("PIGY_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("PIGY_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of pigy_compiler directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_STACK_DEPTH: usize = 1_024;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.lexical.max_lexeme_length == 0 {
        panic!("LIMITS: max_lexeme_length cannot be zero");
    }

    if config.lexical.max_token_count == 0 {
        panic!("LIMITS: max_token_count cannot be zero");
    }

    // base frame + directive + slash/comment + star run
    if config.lexical.max_stack_depth < 4 {
        panic!("LIMITS: max_stack_depth must allow at least 4 nested frames");
    }

    if config.lexical.max_stack_depth > ABSOLUTE_MAX_STACK_DEPTH {
        panic!("LIMITS: max_stack_depth exceeds absolute maximum");
    }

    if config.logging.log_buffer_size == 0 {
        panic!("LIMITS: log_buffer_size cannot be zero");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
    }}

    pub mod lexical {{
        pub const MAX_LEXEME_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_STACK_DEPTH: usize = {};
    }}

    pub mod sink {{
        pub const CHANNEL_CAPACITY: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.file_processing.max_file_size,
        config.lexical.max_lexeme_length,
        config.lexical.max_token_count,
        config.lexical.max_stack_depth,
        config.sink.channel_capacity,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
