use std::collections::HashSet;

/// Finds the line positions where a shared boundary between two shapes
/// begins or ends.
///
/// Every unordered pair of distinct shapes is cross-compared once: a
/// position is shared when its line id also occurs anywhere in the other
/// shape's range. A breakpoint is recorded wherever the shared status (the
/// partner shape, if any) differs from the previous position of the same
/// shape, and at the start of a shape that opens on a shared line.
///
/// The result is sorted, deduplicated, starts with 0 and ends with the line
/// count.
#[must_use]
pub fn shared_breakpoints(line_ids: &[usize], shapes: &[usize]) -> Vec<usize> {
    let line_count = line_ids.len();
    let partners = shared_partners(line_ids, shapes);

    let mut breakpoints = vec![0];
    for w in shapes.windows(2) {
        let (start, end) = (w[0], w[1]);
        if start > 0 && start < line_count && partners[start].is_some() {
            breakpoints.push(start);
        }
        breakpoints.extend((start + 1..end).filter(|&p| partners[p] != partners[p - 1]));
    }
    if line_count > 0 {
        breakpoints.push(line_count);
    }
    breakpoints.dedup();

    tracing::debug!(
        shared = partners.iter().filter(|p| p.is_some()).count(),
        breakpoints = breakpoints.len(),
        "shared boundaries mapped"
    );
    breakpoints
}

/// For every line position, the first other shape containing the same line
/// id.
fn shared_partners(line_ids: &[usize], shapes: &[usize]) -> Vec<Option<usize>> {
    let mut partners = vec![None; line_ids.len()];
    let ranges: Vec<_> = shapes.windows(2).map(|w| w[0]..w[1]).collect();
    let id_sets: Vec<HashSet<usize>> = ranges
        .iter()
        .map(|r| line_ids[r.clone()].iter().copied().collect())
        .collect();

    for i in 0..ranges.len() {
        for j in i + 1..ranges.len() {
            for p in ranges[i].clone() {
                if partners[p].is_none() && id_sets[j].contains(&line_ids[p]) {
                    partners[p] = Some(j);
                }
            }
            for p in ranges[j].clone() {
                if partners[p].is_none() && id_sets[i].contains(&line_ids[p]) {
                    partners[p] = Some(i);
                }
            }
        }
    }
    partners
}
