use clap::Parser;

use crate::error::{AppError, AppResult};

use super::StressArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<StressArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    StressArgs::try_parse_from(args).map_err(AppError::from)
}
