//! Straight-ray tracking through the cell set.
//!
//! A [`LineTrack`] is a transient query object: construct it for one
//! start/end pair, call [`LineTrack::calculate`], read the recorded
//! segments, discard it. Crossing distances are strictly increasing and
//! the walk is complete once the accumulated distance reaches the
//! requested length within [`TRACK_TOL`].

use nalgebra::{Point3, Vector3};

use cellgeom_foundation::{Error, Result, SurfaceRegistry};
use cellgeom_rule::{Crossing, TRACK_TOL};

use crate::cell::ObjectIndex;

/// Hard cap on walk iterations; a well-formed geometry never gets close,
/// so hitting it means a cell rule failed to advance the ray.
const MAX_STEPS: usize = 10_000;

/// One traversed piece of the ray.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackSegment {
    /// The signed surface crossed at the segment's far end; `None` when
    /// the segment ends at the requested total distance or at escape.
    pub surface: Option<i32>,
    /// The cell traversed; `None` for the escaped remainder of the ray.
    pub cell: Option<i32>,
    /// Material of the traversed cell; `None` for the escaped remainder.
    pub material: Option<i32>,
    /// Length of this segment.
    pub length: f64,
    /// Cumulative distance from the start at the segment's far end.
    pub distance: f64,
}

/// A straight-ray walk from a start point to an end point.
#[derive(Clone, Debug)]
pub struct LineTrack {
    start: Point3<f64>,
    direction: Vector3<f64>,
    total_length: f64,
    segments: Vec<TrackSegment>,
    covered: f64,
    escaped: bool,
}

impl LineTrack {
    /// Creates a track between two points.
    #[must_use]
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        let seg = end - start;
        let total_length = seg.norm();
        let direction = if total_length > TRACK_TOL {
            seg / total_length
        } else {
            Vector3::zeros()
        };
        Self {
            start,
            direction,
            total_length,
            segments: Vec::new(),
            covered: 0.0,
            escaped: false,
        }
    }

    /// Creates a track from a start point, a direction, and a length.
    #[must_use]
    pub fn from_direction(start: Point3<f64>, direction: Vector3<f64>, length: f64) -> Self {
        Self::new(start, start + direction.normalize() * length)
    }

    /// Walks the ray through the cell set, recording one segment per
    /// traversed cell. A span covered by no cell is recorded as a segment
    /// with no cell or material and the walk resumes at the next cell
    /// boundary ahead, so a ray may enter the geometry from outside.
    /// When no cell lies ahead at all, the remainder is recorded as a
    /// final escaped segment instead of failing. A zero-length request
    /// completes immediately with no segments.
    ///
    /// The optional `hint` names the cell expected to contain the start
    /// point and short-circuits the initial containment search.
    ///
    /// # Errors
    /// Returns an error for an unknown hint id, for unregistered surfaces
    /// in any consulted rule, or if the walk fails to advance.
    pub fn calculate(
        &mut self,
        index: &ObjectIndex,
        registry: &SurfaceRegistry,
        hint: Option<i32>,
    ) -> Result<()> {
        self.segments.clear();
        self.covered = 0.0;
        self.escaped = false;
        if self.total_length <= TRACK_TOL {
            return Ok(());
        }

        let mut hint = hint;
        for _ in 0..MAX_STEPS {
            if self.is_complete() {
                return Ok(());
            }
            // Sample just past the last crossing so boundary points
            // resolve into the next cell rather than the one behind.
            let probe = self.start + self.direction * (self.covered + TRACK_TOL);

            let cell = match self.take_hinted_cell(&mut hint, &probe, index, registry)? {
                Some(cell) => cell,
                None => match index.find_cell(&probe, registry)? {
                    Some(cell) => cell,
                    None => {
                        if self.cross_gap(index, registry)? {
                            continue;
                        }
                        return Ok(());
                    }
                },
            };

            let here = self.start + self.direction * self.covered;
            match cell.rule.track_surf_intersect(&here, &self.direction, registry)? {
                None => {
                    // The cell never hands the ray back: traverse to the
                    // requested end inside it.
                    self.record_to_end(cell.id, cell.material);
                    return Ok(());
                }
                Some(crossing) => {
                    let exit = self.covered + crossing.distance;
                    if exit >= self.total_length - TRACK_TOL {
                        self.record_to_end(cell.id, cell.material);
                        return Ok(());
                    }
                    self.segments.push(TrackSegment {
                        surface: Some(crossing.surface),
                        cell: Some(cell.id),
                        material: Some(cell.material),
                        length: exit - self.covered,
                        distance: exit,
                    });
                    self.covered = exit;
                }
            }
        }
        Err(Error::internal("line track failed to advance"))
    }

    /// Advances across a span covered by no cell. Every cell is invalid
    /// at the current position, so the nearest validity flip over all
    /// cells is the entry into whichever cell the ray reaches first; the
    /// uncovered span up to it is recorded with no cell or material.
    /// Returns `false`, recording the remainder as the escaped tail, when
    /// no cell lies ahead or the next entry is past the requested
    /// distance.
    fn cross_gap(&mut self, index: &ObjectIndex, registry: &SurfaceRegistry) -> Result<bool> {
        let here = self.start + self.direction * self.covered;
        let mut entry: Option<Crossing> = None;
        for cell in index.cells() {
            if let Some(crossing) =
                cell.rule.track_surf_intersect(&here, &self.direction, registry)?
            {
                if entry
                    .as_ref()
                    .is_none_or(|best| crossing.distance < best.distance)
                {
                    entry = Some(crossing);
                }
            }
        }
        let Some(entry) = entry else {
            self.record_escape();
            return Ok(false);
        };
        let enter = self.covered + entry.distance;
        if enter >= self.total_length - TRACK_TOL {
            self.record_escape();
            return Ok(false);
        }
        self.segments.push(TrackSegment {
            surface: Some(entry.surface),
            cell: None,
            material: None,
            length: enter - self.covered,
            distance: enter,
        });
        self.covered = enter;
        Ok(true)
    }

    /// Consumes the hint if its cell contains the probe point.
    fn take_hinted_cell<'i>(
        &self,
        hint: &mut Option<i32>,
        probe: &Point3<f64>,
        index: &'i ObjectIndex,
        registry: &SurfaceRegistry,
    ) -> Result<Option<&'i crate::cell::Cell>> {
        let Some(id) = hint.take() else {
            return Ok(None);
        };
        let cell = index.cell(id)?;
        if cell.rule.is_valid(probe, registry)? {
            Ok(Some(cell))
        } else {
            Ok(None)
        }
    }

    fn record_to_end(&mut self, cell: i32, material: i32) {
        self.segments.push(TrackSegment {
            surface: None,
            cell: Some(cell),
            material: Some(material),
            length: self.total_length - self.covered,
            distance: self.total_length,
        });
        self.covered = self.total_length;
    }

    fn record_escape(&mut self) {
        self.segments.push(TrackSegment {
            surface: None,
            cell: None,
            material: None,
            length: self.total_length - self.covered,
            distance: self.total_length,
        });
        self.covered = self.total_length;
        self.escaped = true;
    }

    /// The recorded segments, in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    /// Requested total distance.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Whether the accumulated distance reached the requested distance.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.covered >= self.total_length - TRACK_TOL
    }

    /// Whether the walk ended with no further cell ahead of the ray
    /// before the requested distance. Interior gaps the ray crosses and
    /// re-enters from do not count as escapes.
    #[must_use]
    pub fn escaped(&self) -> bool {
        self.escaped
    }

    /// Post-processes the crossings into parallel material/length arrays,
    /// merging consecutive segments of the same material (a cell split
    /// for unrelated geometric reasons should read as one material
    /// thickness). Escaped remainder segments carry no material and are
    /// skipped.
    #[must_use]
    pub fn material_path(&self) -> (Vec<i32>, Vec<f64>) {
        let mut materials = Vec::new();
        let mut lengths: Vec<f64> = Vec::new();
        for segment in &self.segments {
            let Some(material) = segment.material else {
                continue;
            };
            if materials.last() == Some(&material) {
                if let Some(last) = lengths.last_mut() {
                    *last += segment.length;
                }
            } else {
                materials.push(material);
                lengths.push(segment.length);
            }
        }
        (materials, lengths)
    }
}
