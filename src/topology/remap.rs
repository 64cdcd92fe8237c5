use std::ops::Range;

/// Re-expresses `coarse` boundaries in units of `fine` entries.
///
/// For each coarse value the result holds the number of fine boundaries
/// strictly below it. When `fine` refines `coarse` (every coarse value is
/// also a fine value) this is the index of that value in `fine`, so slicing
/// the fine objects with consecutive results yields the objects of each
/// coarse entity: segments per loop, segments per boundary run, loops per
/// shape.
#[must_use]
pub fn map_between(fine: &[usize], coarse: &[usize]) -> Vec<usize> {
    coarse
        .iter()
        .map(|&v| fine.partition_point(|&f| f < v))
        .collect()
}

/// Consecutive ranges delimited by a boundary array.
pub fn ranges(bounds: &[usize]) -> impl Iterator<Item = Range<usize>> + '_ {
    bounds.windows(2).map(|w| w[0]..w[1])
}
