//! Skip / limit paging over a result list

/// Applies skip and limit to result lists
pub struct Pager;

impl Pager {
    /// Drops the first `skip` items, then keeps at most `limit`.
    ///
    /// - skip None or <= 0: nothing skipped; skip >= len: empty result
    /// - limit None or negative: no limit; limit >= len: no truncation
    pub fn apply_skip_and_limit<T>(skip: Option<i64>, limit: Option<i64>, mut items: Vec<T>) -> Vec<T> {
        if let Some(skip) = skip.filter(|s| *s > 0) {
            let skip = usize::try_from(skip).unwrap_or(usize::MAX);
            if skip >= items.len() {
                return Vec::new();
            }
            items.drain(..skip);
        }

        if let Some(limit) = limit.filter(|l| *l >= 0) {
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            items.truncate(limit);
        }

        items
    }
}
