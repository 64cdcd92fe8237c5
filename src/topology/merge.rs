use std::collections::{BTreeSet, HashMap};

use super::LineIndex;
use crate::error::DomainError;

/// Merges breakpoint streams into segment boundaries.
///
/// The streams are walked in lockstep: the smallest head becomes the next
/// boundary and every stream whose head equals it advances. The walk stops
/// once the boundary reaches `line_count`, so the result is strictly
/// increasing, starts at 0 and ends at `line_count`. Each consecutive pair
/// delimits one segment, a maximal run of lines that crosses no
/// breakpoint.
///
/// # Errors
///
/// Returns `DomainError::InvalidBoundaries` if a stream is empty, does not
/// run from 0 to `line_count`, or is not strictly increasing.
pub fn merge_breakpoints(
    boundary_runs: &[usize],
    loops: &[usize],
    intersections: &[usize],
    line_count: usize,
) -> Result<Vec<usize>, DomainError> {
    merge_streams(
        &[
            ("boundary run", boundary_runs),
            ("loop", loops),
            ("intersection", intersections),
        ],
        line_count,
    )
}

fn merge_streams(
    streams: &[(&'static str, &[usize])],
    line_count: usize,
) -> Result<Vec<usize>, DomainError> {
    for &(name, stream) in streams {
        validate(name, stream, line_count)?;
    }

    let mut heads = vec![0; streams.len()];
    let mut segments = Vec::new();
    loop {
        // Every stream ends at `line_count`, so no head runs past its end
        // before the walk stops.
        let next = streams
            .iter()
            .zip(&heads)
            .map(|((_, s), &h)| s[h])
            .min()
            .unwrap_or(line_count);
        for ((_, s), h) in streams.iter().zip(heads.iter_mut()) {
            if s[*h] == next {
                *h += 1;
            }
        }
        segments.push(next);
        if next == line_count {
            break;
        }
    }

    tracing::debug!(segments = segments.len() - 1, "breakpoints merged");
    Ok(segments)
}

/// Copies segment boundaries across shared lines until both sides of every
/// shared boundary are cut at the same places.
///
/// A cut at the start of a shared line maps to the start of each partner
/// position traversing the line the same way and to the end of each one
/// traversing it backwards; a cut at the end maps the other way round. New
/// cuts are propagated again, so a loop start or boundary-id change on one
/// side splits the matching run on the other.
#[must_use]
pub fn align_shared(segments: &[usize], lines: &LineIndex) -> Vec<usize> {
    let mut positions: HashMap<usize, Vec<usize>> = HashMap::new();
    for pos in 0..lines.len() {
        if !lines.is_degenerate(pos) {
            positions.entry(lines.id(pos)).or_default().push(pos);
        }
    }
    positions.retain(|_, shared| shared.len() > 1);

    let mut cuts: BTreeSet<usize> = segments.iter().copied().collect();
    let mut pending = segments.to_vec();
    while let Some(cut) = pending.pop() {
        let starts = (cut < lines.len()).then_some((cut, true));
        let ends = cut.checked_sub(1).map(|pos| (pos, false));
        for (pos, at_start) in starts.into_iter().chain(ends) {
            let Some(shared) = positions.get(&lines.id(pos)) else {
                continue;
            };
            let forward = lines.signed_id(pos) > 0;
            for &other in shared.iter().filter(|&&other| other != pos) {
                let same = (lines.signed_id(other) > 0) == forward;
                let mapped = if at_start == same { other } else { other + 1 };
                if cuts.insert(mapped) {
                    pending.push(mapped);
                }
            }
        }
    }

    if cuts.len() > segments.len() {
        tracing::debug!(added = cuts.len() - segments.len(), "shared cuts aligned");
    }
    cuts.into_iter().collect()
}

fn validate(name: &'static str, stream: &[usize], line_count: usize) -> Result<(), DomainError> {
    let invalid = |reason: String| DomainError::InvalidBoundaries { name, reason };
    if stream.first() != Some(&0) || stream.last() != Some(&line_count) {
        return Err(invalid(format!("must run from 0 to {line_count}")));
    }
    if stream.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("not strictly increasing".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_well_formed(segments: &[usize], line_count: usize) {
        assert_eq!(segments.first(), Some(&0));
        assert_eq!(segments.last(), Some(&line_count));
        assert!(segments.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn union_of_all_streams() {
        let segments = merge_breakpoints(&[0, 3, 8], &[0, 4, 8], &[0, 1, 2, 7, 8], 8).unwrap();
        assert_eq!(segments, vec![0, 1, 2, 3, 4, 7, 8]);
        assert_well_formed(&segments, 8);
    }

    #[test]
    fn coincident_heads_advance_together() {
        let segments = merge_breakpoints(&[0, 4, 8], &[0, 4, 8], &[0, 4, 8], 8).unwrap();
        assert_eq!(segments, vec![0, 4, 8]);
    }

    #[test]
    fn single_segment_when_no_breakpoints() {
        let segments = merge_breakpoints(&[0, 5], &[0, 5], &[0, 5], 5).unwrap();
        assert_eq!(segments, vec![0, 5]);
    }

    #[test]
    fn every_stream_value_is_a_boundary() {
        let runs = [0, 2, 5, 9, 12];
        let loops = [0, 6, 12];
        let shared = [0, 3, 4, 10, 12];
        let segments = merge_breakpoints(&runs, &loops, &shared, 12).unwrap();
        assert_well_formed(&segments, 12);
        for v in runs.iter().chain(&loops).chain(&shared) {
            assert!(segments.contains(v));
        }
        assert_eq!(segments.len(), 9);
    }

    #[test]
    fn malformed_streams_are_rejected() {
        assert!(matches!(
            merge_breakpoints(&[0, 4], &[0, 4], &[0, 3], 4),
            Err(DomainError::InvalidBoundaries { name: "intersection", .. })
        ));
        assert!(matches!(
            merge_breakpoints(&[0, 2, 2, 4], &[0, 4], &[0, 4], 4),
            Err(DomainError::InvalidBoundaries { name: "boundary run", .. })
        ));
        assert!(merge_breakpoints(&[], &[0, 4], &[0, 4], 4).is_err());
    }

    mod shared {
        use super::super::align_shared;
        use crate::domain::DomainBuilder;
        use crate::math::Point3;
        use crate::topology::{LineIndex, PointIndex};

        fn pt(x: f64, y: f64) -> Point3 {
            Point3::new(x, y, 0.0)
        }

        fn lines_of(b: DomainBuilder) -> LineIndex {
            let domain = b.build().unwrap();
            let points = PointIndex::build(domain.points());
            LineIndex::build(&domain, &points)
        }

        #[test]
        fn partner_loop_start_splits_the_run() {
            // Right edge of the left square is split at (1, 0.5); the right
            // square's ring starts there, so its side of the run is cut at
            // its loop start.
            let lines = lines_of(
                DomainBuilder::new()
                    .shape(1)
                    .ring(
                        &[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 0.5), pt(1.0, 1.0), pt(0.0, 1.0)],
                        &[Some(1); 5],
                    )
                    .shape(2)
                    .ring(
                        &[pt(1.0, 0.5), pt(1.0, 0.0), pt(2.0, 0.0), pt(2.0, 1.0), pt(1.0, 1.0)],
                        &[Some(2); 5],
                    ),
            );
            let aligned = align_shared(&[0, 1, 3, 5, 6, 9, 10], &lines);
            assert_eq!(aligned, vec![0, 1, 2, 3, 5, 6, 9, 10]);
        }

        #[test]
        fn boundary_id_change_crosses_to_partner() {
            let lines = lines_of(
                DomainBuilder::new()
                    .shape(1)
                    .ring(
                        &[pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 0.5), pt(1.0, 1.0), pt(0.0, 1.0)],
                        &[Some(1), Some(7), Some(8), Some(1), Some(1)],
                    )
                    .shape(2)
                    .ring(
                        &[pt(1.0, 0.0), pt(2.0, 0.0), pt(2.0, 1.0), pt(1.0, 1.0), pt(1.0, 0.5)],
                        &[Some(2); 5],
                    ),
            );
            // Shape 2 traces the shared run backwards at positions 8 and 9.
            let aligned = align_shared(&[0, 1, 2, 3, 5, 8, 10], &lines);
            assert_eq!(aligned, vec![0, 1, 2, 3, 5, 8, 9, 10]);
        }

        #[test]
        fn aligned_cuts_are_left_alone() {
            let square = |x: f64| [pt(x, 0.0), pt(x + 1.0, 0.0), pt(x + 1.0, 1.0), pt(x, 1.0)];
            let lines = lines_of(
                DomainBuilder::new()
                    .shape(1)
                    .ring(&square(0.0), &[Some(1); 4])
                    .shape(2)
                    .ring(&square(1.0), &[Some(2); 4]),
            );
            let segments = [0, 1, 2, 4, 7, 8];
            assert_eq!(align_shared(&segments, &lines), segments.to_vec());
        }
    }
}
