use tracing::trace;

use super::HeaderRule;
use crate::pipeline::{upsert_header, HeaderVec};

/// Merge matched rules into one ordered header mapping
///
/// Header names are lower-cased. A later rule for the same name replaces the
/// earlier value but keeps the earlier position, so the result is
/// deterministic for a given rule order.
pub fn merge_headers<'a, I>(rules: I) -> HeaderVec
where
    I: IntoIterator<Item = &'a HeaderRule>,
{
    let mut merged = HeaderVec::new();
    for rule in rules {
        trace!(header = %rule.key, "Applying header rule");
        upsert_header(&mut merged, &rule.key, rule.value.clone());
    }
    merged
}
