use std::collections::HashSet;

/// Entities sharing one physical id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGroup {
    pub id: i64,
    /// Positions in the tagged sequence carrying `id`, ascending.
    pub indices: Vec<usize>,
}

/// Gathers a tagged sequence into one group per distinct id.
///
/// Scans for the current target id, collects every match, then picks the
/// first id not yet gathered as the next target. Ids may repeat and appear
/// in any order; groups come out in order of first appearance and the scan
/// ends after each distinct id has been visited once.
#[must_use]
pub fn group_by_id(ids: &[i64]) -> Vec<IdGroup> {
    let mut groups = Vec::new();
    let mut gathered = HashSet::new();
    let mut target = ids.first().copied();

    while let Some(id) = target {
        let indices = ids
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == id)
            .map(|(i, _)| i)
            .collect();
        groups.push(IdGroup { id, indices });
        gathered.insert(id);
        target = ids.iter().copied().find(|v| !gathered.contains(v));
    }
    groups
}
