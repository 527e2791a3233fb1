// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    template_file: TemplateFileLimits,
    segmenter: SegmenterLimits,
    assembler: AssemblerLimits,
    execution: ExecutionLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct TemplateFileLimits {
    max_file_size: u64,
    large_file_threshold: u64,
}

#[derive(serde::Deserialize)]
struct SegmenterLimits {
    max_template_size: usize,
    max_statement_units: usize,
    max_segment_count: usize,
}

#[derive(serde::Deserialize)]
struct AssemblerLimits {
    max_assemble_depth: usize,
    max_error_history: usize,
}

#[derive(serde::Deserialize)]
struct ExecutionLimits {
    max_execution_depth: usize,
    default_max_loop_iterations: u64,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=K2HR3_TEMPLATE_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=K2HR3_TEMPLATE_CONFIG_DIR");

    let profile =
        env::var("K2HR3_TEMPLATE_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("K2HR3_TEMPLATE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of k2hr3_template directory)
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
    const ABSOLUTE_MAX_TEMPLATE_SIZE: usize = 100_000_000;
    const ABSOLUTE_MAX_DEPTH: usize = 10_000;

    if config.segmenter.max_template_size > ABSOLUTE_MAX_TEMPLATE_SIZE {
        panic!("LIMITS: max_template_size exceeds absolute maximum");
    }

    if config.template_file.max_file_size > ABSOLUTE_MAX_TEMPLATE_SIZE as u64 {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.assembler.max_assemble_depth == 0
        || config.assembler.max_assemble_depth > ABSOLUTE_MAX_DEPTH
    {
        panic!("LIMITS: max_assemble_depth must be within 1..={}", ABSOLUTE_MAX_DEPTH);
    }

    if config.execution.max_execution_depth == 0
        || config.execution.max_execution_depth > ABSOLUTE_MAX_DEPTH
    {
        panic!("LIMITS: max_execution_depth must be within 1..={}", ABSOLUTE_MAX_DEPTH);
    }

    if config.logging.security_min_log_level > 2 {
        panic!("LIMITS: security_min_log_level too high (max: 2)");
    }

    if profile == "production" && config.execution.default_max_loop_iterations == 0 {
        panic!("PRODUCTION: default_max_loop_iterations must bound loops in production");
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
    pub mod template_file {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
    }}

    pub mod segmenter {{
        pub const MAX_TEMPLATE_SIZE: usize = {};
        pub const MAX_STATEMENT_UNITS: usize = {};
        pub const MAX_SEGMENT_COUNT: usize = {};
    }}

    pub mod assembler {{
        pub const MAX_ASSEMBLE_DEPTH: usize = {};
        pub const MAX_ERROR_HISTORY: usize = {};
    }}

    pub mod execution {{
        pub const MAX_EXECUTION_DEPTH: usize = {};
        pub const DEFAULT_MAX_LOOP_ITERATIONS: u64 = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        config.template_file.max_file_size,
        config.template_file.large_file_threshold,
        config.segmenter.max_template_size,
        config.segmenter.max_statement_units,
        config.segmenter.max_segment_count,
        config.assembler.max_assemble_depth,
        config.assembler.max_error_history,
        config.execution.max_execution_depth,
        config.execution.default_max_loop_iterations,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
