use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, StressArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    args: &mut StressArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "endpoint")
        && let Some(endpoint) = config.endpoint.clone()
    {
        args.endpoint = Some(endpoint);
    }

    if !is_explicit(matches, "policy")
        && let Some(policy) = config.policy.clone()
    {
        args.policy = Some(policy);
    }

    if !is_explicit(matches, "username")
        && let Some(username) = config.username.clone()
    {
        args.username = Some(username);
    }

    if !is_explicit(matches, "batch")
        && let Some(batch) = config.batch
    {
        args.batch = ensure_positive_usize(batch, "batch")?;
    }

    if !is_explicit(matches, "length")
        && let Some(length) = config.length
    {
        args.length = ensure_positive_usize(length, "length")?;
    }

    if !is_explicit(matches, "bulk")
        && let Some(bulk) = config.bulk
    {
        args.bulk = bulk;
    }

    if !is_explicit(matches, "fresh")
        && let Some(fresh) = config.fresh
    {
        args.fresh = fresh;
    }

    if !is_explicit(matches, "file")
        && let Some(file) = config.file.clone()
    {
        args.file = Some(file);
    }

    if !is_explicit(matches, "file_encoding")
        && let Some(encoding) = config.file_encoding
    {
        args.file_encoding = encoding;
    }

    if !is_explicit(matches, "charset")
        && let Some(charset) = config.charset
    {
        args.charset = charset;
    }

    if !is_explicit(matches, "export_json")
        && let Some(path) = config.export_json.clone()
    {
        args.export_json = Some(path);
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
