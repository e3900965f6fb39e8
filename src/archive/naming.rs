//! Archive tag naming.

use std::collections::BTreeMap;

/// Prefix every archive tag carries.
pub const ARCHIVE_TAG_PREFIX: &str = "archive/";

/// Derive the archive tag name for a branch.
///
/// Format: `archive/{branch}` with every `/` in the branch replaced by `-`.
/// Example: `release/2.0` -> `archive/release-2.0`
pub fn tag_name_for(branch: &str) -> String {
    format!("{}{}", ARCHIVE_TAG_PREFIX, branch.replace('/', "-"))
}

/// Distinct branches that derive the same archive tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCollision {
    /// The shared tag name.
    pub tag: String,
    /// Branches mapping to it, in first-seen order.
    pub branches: Vec<String>,
}

/// Find groups of branches whose derived tag names coincide (`a/b` and `a-b`).
///
/// The mapping is not injective; collisions are reported, never resolved.
pub fn find_tag_collisions<S: AsRef<str>>(branches: &[S]) -> Vec<TagCollision> {
    let mut by_tag: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for branch in branches {
        let branch = branch.as_ref();
        let group = by_tag.entry(tag_name_for(branch)).or_default();
        if !group.iter().any(|b| b == branch) {
            group.push(branch.to_string());
        }
    }

    by_tag
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(tag, branches)| TagCollision { tag, branches })
        .collect()
}
