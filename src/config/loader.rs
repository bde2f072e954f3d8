//! Options loader with TOML parsing and environment variable overrides

use super::schema::StoreOptions;
use crate::domain::errors::StrataError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads store options from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`StoreOptions`]
/// 4. Applies environment variable overrides (`STRATA_*` prefix)
/// 5. Validates the options
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use strata::config::loader::load_options;
///
/// let options = load_options("strata.toml").expect("Failed to load options");
/// ```
pub fn load_options(path: impl AsRef<Path>) -> Result<StoreOptions> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StrataError::Configuration(format!(
            "Options file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        StrataError::Configuration(format!(
            "Failed to read options file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut options: StoreOptions = toml::from_str(&contents)
        .map_err(|e| StrataError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut options)?;

    options
        .validate()
        .map_err(|e| StrataError::Configuration(format!("Options validation failed: {}", e)))?;

    Ok(options)
}

/// Default options with `STRATA_*` environment overrides applied
///
/// # Errors
///
/// Returns an error if an override does not parse
pub fn options_from_env() -> Result<StoreOptions> {
    let mut options = StoreOptions::default();
    apply_env_overrides(&mut options)?;
    Ok(options)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| StrataError::Configuration(format!("invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(StrataError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `STRATA_*` prefix
///
/// `STRATA_CONF_DIR` is a platform path list; its directories are searched
/// before any configured in the file.
fn apply_env_overrides(options: &mut StoreOptions) -> Result<()> {
    if let Some(val) = std::env::var_os("STRATA_CONF_DIR") {
        let mut dirs: Vec<_> = std::env::split_paths(&val)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        dirs.append(&mut options.search_path);
        options.search_path = dirs;
    }
    if let Ok(val) = std::env::var("STRATA_LOAD_DEFAULTS") {
        options.load_defaults = parse_flag("STRATA_LOAD_DEFAULTS", &val)?;
    }
    if let Ok(val) = std::env::var("STRATA_ALLOW_NULL_VALUES") {
        options.allow_null_values = parse_flag("STRATA_ALLOW_NULL_VALUES", &val)?;
    }
    if let Ok(val) = std::env::var("STRATA_MAX_SUBSTITUTION_DEPTH") {
        options.max_substitution_depth = val.trim().parse().map_err(|_| {
            StrataError::Configuration(format!(
                "STRATA_MAX_SUBSTITUTION_DEPTH must be a positive integer, got '{val}'"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("STRATA_LOGGING_LOCAL_ENABLED") {
        options.logging.local_enabled = parse_flag("STRATA_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("STRATA_LOGGING_LOCAL_PATH") {
        options.logging.local_path = val;
    }

    Ok(())
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(StrataError::Configuration(format!(
            "{name} must be true or false, got '{value}'"
        ))),
    }
}
