/// A physical group as written to the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalGroup {
    pub id: i64,
    /// Curve or surface tags gathered under `id`.
    pub members: Vec<i64>,
}

/// What the emitter wrote and what it deliberately left out.
///
/// Every id slot of every stage appears either in its primitive list or in
/// the matching repeat list, so consumers can line indices up with the
/// domain even when primitives were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Number of distinct points declared, pole points excluded.
    pub point_count: usize,
    /// Line ids that are part of an emitted primitive.
    pub emitted_lines: Vec<usize>,
    /// Zero-length line ids left out of every primitive.
    pub repeat_lines: Vec<usize>,
    /// Top-level curve tag per segment, negative when the segment runs
    /// against the curve; `None` for segments without length.
    pub segment_curves: Vec<Option<i64>>,
    /// Curve tags whose slot was left empty.
    pub repeat_curves: Vec<i64>,
    /// Line loop tag per loop.
    pub loops: Vec<Option<i64>>,
    pub repeat_loops: Vec<i64>,
    /// Plane surface tag per shape.
    pub surfaces: Vec<Option<i64>>,
    pub repeat_surfaces: Vec<i64>,
    pub physical_lines: Vec<PhysicalGroup>,
    pub physical_surfaces: Vec<PhysicalGroup>,
}
