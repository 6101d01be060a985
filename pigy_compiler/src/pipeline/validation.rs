use crate::logging::codes;

/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    let file_codes = [
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::INVALID_EXTENSION,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::IO_ERROR,
        codes::file_processing::INVALID_PATH,
    ];
    for code in &file_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processing code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::lexical::validate_tokenization()?;

    crate::log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "max_file_size" => crate::file_processor::get_max_file_size(),
        "profile" => crate::config::build_info::profile()
    );

    Ok(())
}
