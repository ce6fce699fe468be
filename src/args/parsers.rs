use super::types::PositiveUsize;
use crate::error::{AppError, AppResult};

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}
