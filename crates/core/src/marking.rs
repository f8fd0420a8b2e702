//! Point-marking session for flame photographs
//!
//! Models the click-driven collection of the three measurement points as an
//! explicit state machine over the marked-point count (0 -> 1 -> 2 -> 3)
//! instead of list-length checks scattered across input handlers. Marks are
//! rejected before an image is loaded or outside the displayed canvas, a
//! fourth mark is rejected until the session is cleared, and completion of
//! the triple is reported exactly once, on the third accepted mark. A
//! rejected mark never mutates the buffer, so the session stays usable after
//! any failure.

use tracing::{debug, info};

use crate::core_types::PixelPoint;
use crate::geometry::PointTriple;

/// Semantic role of a marked point, assigned by marking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRole {
    /// First mark: left end of the base reference segment
    BaseLeft,
    /// Second mark: right end of the base reference segment
    BaseRight,
    /// Third mark: flame tip
    Apex,
}

impl PointRole {
    fn from_index(index: usize) -> Self {
        match index {
            0 => PointRole::BaseLeft,
            1 => PointRole::BaseRight,
            _ => PointRole::Apex,
        }
    }
}

/// Outcome of an accepted mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkOutcome {
    /// Point stored; more marks are needed
    Accepted {
        /// Role assigned to the stored point
        role: PointRole,
        /// Points marked so far, including this one
        marked: usize,
    },
    /// Third point stored; the triple is ready for geometry resolution
    Complete(PointTriple),
}

/// Errors from the marking session
#[derive(Debug, Clone, PartialEq)]
pub enum MarkingError {
    /// A mark was attempted before an image was loaded
    NoImageLoaded,
    /// The marked point lies outside the displayed canvas
    OutOfBounds {
        /// Marked x coordinate (px)
        x: f64,
        /// Marked y coordinate (px)
        y: f64,
        /// Canvas width (px)
        width: f64,
        /// Canvas height (px)
        height: f64,
    },
    /// Three points are already marked; clear the session before remarking
    TripleComplete,
    /// Geometry was requested before all three points were marked
    IncompleteSelection {
        /// Points marked so far
        marked: usize,
    },
}

impl std::fmt::Display for MarkingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkingError::NoImageLoaded => {
                write!(f, "No image loaded. Please load an image first")
            }
            MarkingError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Point ({x}, {y}) is outside the {width}x{height} canvas"
            ),
            MarkingError::TripleComplete => {
                write!(f, "Three points are already marked; clear before marking again")
            }
            MarkingError::IncompleteSelection { marked } => {
                write!(f, "Please mark three points on the image ({marked} of 3 marked)")
            }
        }
    }
}

impl std::error::Error for MarkingError {}

/// Collects up to three marked points for one measurement.
///
/// Owned by the calling UI session; the core holds no other state.
#[derive(Debug, Clone, Default)]
pub struct MarkingSession {
    /// Displayed canvas dimensions, set when an image is loaded
    canvas_px: Option<(f64, f64)>,
    /// Marked points in click order, at most three
    points: Vec<PixelPoint>,
}

impl MarkingSession {
    /// Create an empty session with no image loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an image of the given displayed size is on the canvas.
    ///
    /// Any previous marks are discarded, matching the workflow of loading a
    /// fresh photograph. Bounds apply in the displayed image's pixel space.
    pub fn load_image(&mut self, width_px: f64, height_px: f64) {
        self.canvas_px = Some((width_px, height_px));
        self.points.clear();
        info!(width_px, height_px, "image loaded, marks cleared");
    }

    /// Number of points marked so far (0-3).
    #[must_use]
    pub fn marked(&self) -> usize {
        self.points.len()
    }

    /// Whether the triple is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.len() == 3
    }

    /// Store one marked point.
    ///
    /// Returns [`MarkOutcome::Complete`] exactly once, on the third accepted
    /// mark.
    ///
    /// # Errors
    /// Returns `NoImageLoaded` before [`MarkingSession::load_image`],
    /// `OutOfBounds` for points outside the canvas, and `TripleComplete`
    /// once three points exist; the buffer is unchanged on every error
    pub fn mark(&mut self, point: PixelPoint) -> Result<MarkOutcome, MarkingError> {
        let Some((width, height)) = self.canvas_px else {
            return Err(MarkingError::NoImageLoaded);
        };
        if self.points.len() >= 3 {
            return Err(MarkingError::TripleComplete);
        }
        // The positive phrasing also rejects NaN coordinates, which fail
        // every comparison
        let inside =
            point.x >= 0.0 && point.x <= width && point.y >= 0.0 && point.y <= height;
        if !inside {
            return Err(MarkingError::OutOfBounds {
                x: point.x,
                y: point.y,
                width,
                height,
            });
        }

        let role = PointRole::from_index(self.points.len());
        self.points.push(point);
        debug!(?role, x = point.x, y = point.y, "point marked");

        if self.points.len() == 3 {
            let triple = PointTriple::new(self.points[0], self.points[1], self.points[2]);
            info!("point triple complete");
            Ok(MarkOutcome::Complete(triple))
        } else {
            Ok(MarkOutcome::Accepted {
                role,
                marked: self.points.len(),
            })
        }
    }

    /// The completed triple, for a calculation request.
    ///
    /// # Errors
    /// Returns `IncompleteSelection` until three points are marked
    pub fn triple(&self) -> Result<PointTriple, MarkingError> {
        if self.points.len() == 3 {
            Ok(PointTriple::new(
                self.points[0],
                self.points[1],
                self.points[2],
            ))
        } else {
            Err(MarkingError::IncompleteSelection {
                marked: self.points.len(),
            })
        }
    }

    /// Discard all marks, keeping the loaded image and its bounds.
    pub fn clear(&mut self) {
        self.points.clear();
        debug!("marks cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_session() -> MarkingSession {
        let mut session = MarkingSession::new();
        session.load_image(900.0, 600.0);
        session
    }

    #[test]
    fn test_mark_before_image_rejected() {
        let mut session = MarkingSession::new();
        let result = session.mark(PixelPoint::new(10.0, 10.0));
        assert_eq!(result, Err(MarkingError::NoImageLoaded));
        assert_eq!(session.marked(), 0);
    }

    #[test]
    fn test_out_of_bounds_mark_rejected() {
        let mut session = loaded_session();
        let result = session.mark(PixelPoint::new(901.0, 10.0));
        assert!(matches!(result, Err(MarkingError::OutOfBounds { .. })));
        // Rejected mark leaves the buffer unchanged
        assert_eq!(session.marked(), 0);
    }

    #[test]
    fn test_non_finite_mark_rejected() {
        let mut session = loaded_session();

        let nan = session.mark(PixelPoint::new(f64::NAN, f64::NAN));
        assert!(matches!(nan, Err(MarkingError::OutOfBounds { .. })));

        let infinite = session.mark(PixelPoint::new(10.0, f64::INFINITY));
        assert!(matches!(infinite, Err(MarkingError::OutOfBounds { .. })));

        assert_eq!(session.marked(), 0);
    }

    #[test]
    fn test_completion_fires_exactly_once_on_third_mark() {
        let mut session = loaded_session();

        let first = session.mark(PixelPoint::new(100.0, 400.0)).unwrap();
        assert_eq!(
            first,
            MarkOutcome::Accepted {
                role: PointRole::BaseLeft,
                marked: 1
            }
        );

        let second = session.mark(PixelPoint::new(300.0, 400.0)).unwrap();
        assert_eq!(
            second,
            MarkOutcome::Accepted {
                role: PointRole::BaseRight,
                marked: 2
            }
        );

        let third = session.mark(PixelPoint::new(200.0, 100.0)).unwrap();
        let MarkOutcome::Complete(triple) = third else {
            panic!("third mark must complete the triple");
        };
        assert_eq!(triple.apex, PixelPoint::new(200.0, 100.0));
        assert!(session.is_complete());
    }

    #[test]
    fn test_fourth_mark_rejected_until_cleared() {
        let mut session = loaded_session();
        session.mark(PixelPoint::new(100.0, 400.0)).unwrap();
        session.mark(PixelPoint::new(300.0, 400.0)).unwrap();
        session.mark(PixelPoint::new(200.0, 100.0)).unwrap();

        let fourth = session.mark(PixelPoint::new(50.0, 50.0));
        assert_eq!(fourth, Err(MarkingError::TripleComplete));
        assert_eq!(session.marked(), 3);

        session.clear();
        assert_eq!(session.marked(), 0);
        // Image stays loaded, so marking works immediately after clear
        assert!(session.mark(PixelPoint::new(50.0, 50.0)).is_ok());
    }

    #[test]
    fn test_triple_requires_three_marks() {
        let mut session = loaded_session();
        assert_eq!(
            session.triple(),
            Err(MarkingError::IncompleteSelection { marked: 0 })
        );

        session.mark(PixelPoint::new(100.0, 400.0)).unwrap();
        session.mark(PixelPoint::new(300.0, 400.0)).unwrap();
        assert_eq!(
            session.triple(),
            Err(MarkingError::IncompleteSelection { marked: 2 })
        );

        session.mark(PixelPoint::new(200.0, 100.0)).unwrap();
        let triple = session.triple().unwrap();
        assert_eq!(triple.base_left, PixelPoint::new(100.0, 400.0));
        assert_eq!(triple.base_right, PixelPoint::new(300.0, 400.0));
    }

    #[test]
    fn test_load_image_clears_marks() {
        let mut session = loaded_session();
        session.mark(PixelPoint::new(100.0, 400.0)).unwrap();
        session.mark(PixelPoint::new(300.0, 400.0)).unwrap();

        session.load_image(900.0, 600.0);
        assert_eq!(session.marked(), 0);
    }
}
