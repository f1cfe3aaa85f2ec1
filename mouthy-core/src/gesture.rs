//! Landmark geometry: turns one frame of face-mesh points into the two
//! aperture ratios the gates consume.

use serde::{Deserialize, Serialize};

use crate::constants::DEGENERATE_SPAN;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One frame of landmarks in window pixel space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Scale model-normalised `[0, 1]` coordinates into a `width` x `height`
    /// window.
    pub fn from_normalized(points: &[(f32, f32)], width: f32, height: f32) -> Self {
        Self {
            points: points
                .iter()
                .map(|&(x, y)| Point::new(x * width, y * height))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// Six landmark indices describing an opening: two corners spanning it
/// horizontally and two upper/lower pairs measured vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApertureIndices {
    pub left: usize,
    pub right: usize,
    pub upper: [usize; 2],
    pub lower: [usize; 2],
}

impl ApertureIndices {
    fn max_index(&self) -> usize {
        self.left
            .max(self.right)
            .max(self.upper[0])
            .max(self.upper[1])
            .max(self.lower[0])
            .max(self.lower[1])
    }

    /// Mean vertical span over horizontal span. `None` if any index is
    /// missing from `landmarks`.
    pub fn ratio(&self, landmarks: &LandmarkSet) -> Option<f32> {
        let left = landmarks.get(self.left)?;
        let right = landmarks.get(self.right)?;
        let upper0 = landmarks.get(self.upper[0])?;
        let upper1 = landmarks.get(self.upper[1])?;
        let lower0 = landmarks.get(self.lower[0])?;
        let lower1 = landmarks.get(self.lower[1])?;

        let horizontal = left.distance(right);
        if horizontal < DEGENERATE_SPAN {
            return Some(0.0);
        }
        let vertical = (upper0.distance(lower0) + upper1.distance(lower1)) / 2.0;
        Some(vertical / horizontal)
    }
}

/// Index layout for the face-mesh model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceLayout {
    pub right_eye: ApertureIndices,
    pub left_eye: ApertureIndices,
    pub mouth: ApertureIndices,
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self::FACE_MESH
    }
}

impl FaceLayout {
    pub const FACE_MESH: FaceLayout = FaceLayout {
        right_eye: ApertureIndices {
            left: 33,
            right: 133,
            upper: [160, 158],
            lower: [144, 153],
        },
        left_eye: ApertureIndices {
            left: 263,
            right: 362,
            upper: [387, 385],
            lower: [373, 380],
        },
        mouth: ApertureIndices {
            left: 78,
            right: 308,
            upper: [13, 82],
            lower: [14, 312],
        },
    };

    /// Smallest landmark count that satisfies every index.
    pub fn required_len(&self) -> usize {
        self.right_eye
            .max_index()
            .max(self.left_eye.max_index())
            .max(self.mouth.max_index())
            + 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureRatios {
    pub eye_aspect_ratio: f32,
    pub mouth_aspect_ratio: f32,
}

/// Stateless landmark → ratio conversion.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureSignalExtractor {
    layout: FaceLayout,
}

impl GestureSignalExtractor {
    pub fn new(layout: FaceLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &FaceLayout {
        &self.layout
    }

    /// `None` means "no observation": no face this frame, or a landmark set
    /// too short for the layout. Callers must not treat it as a zero ratio.
    pub fn extract(&self, landmarks: Option<&LandmarkSet>) -> Option<GestureRatios> {
        let landmarks = landmarks?;
        if landmarks.len() < self.layout.required_len() {
            return None;
        }

        let right = self.layout.right_eye.ratio(landmarks)?;
        let left = self.layout.left_eye.ratio(landmarks)?;
        let mouth = self.layout.mouth.ratio(landmarks)?;

        Some(GestureRatios {
            // Either eye closing counts.
            eye_aspect_ratio: right.min(left),
            mouth_aspect_ratio: mouth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FACE_MESH_LANDMARKS;

    fn blank_face() -> Vec<Point> {
        vec![Point::default(); FACE_MESH_LANDMARKS]
    }

    fn place(points: &mut [Point], idx: ApertureIndices, width: f32, height: f32) {
        points[idx.left] = Point::new(0.0, 0.0);
        points[idx.right] = Point::new(width, 0.0);
        points[idx.upper[0]] = Point::new(width * 0.33, -height / 2.0);
        points[idx.lower[0]] = Point::new(width * 0.33, height / 2.0);
        points[idx.upper[1]] = Point::new(width * 0.66, -height / 2.0);
        points[idx.lower[1]] = Point::new(width * 0.66, height / 2.0);
    }

    fn face(right_eye_h: f32, left_eye_h: f32, mouth_h: f32) -> LandmarkSet {
        let layout = FaceLayout::FACE_MESH;
        let mut points = blank_face();
        place(&mut points, layout.right_eye, 30.0, right_eye_h);
        place(&mut points, layout.left_eye, 30.0, left_eye_h);
        place(&mut points, layout.mouth, 50.0, mouth_h);
        LandmarkSet::new(points)
    }

    #[test]
    fn ratios_follow_vertical_over_horizontal() {
        let extractor = GestureSignalExtractor::default();
        let ratios = extractor
            .extract(Some(&face(15.0, 15.0, 20.0)))
            .expect("full face should be observed");
        assert!((ratios.eye_aspect_ratio - 0.5).abs() < 1e-5);
        assert!((ratios.mouth_aspect_ratio - 0.4).abs() < 1e-5);
    }

    #[test]
    fn eye_ratio_is_minimum_of_both_eyes() {
        let extractor = GestureSignalExtractor::default();
        let ratios = extractor
            .extract(Some(&face(15.0, 3.0, 0.0)))
            .expect("observed");
        assert!((ratios.eye_aspect_ratio - 0.1).abs() < 1e-5);
    }

    #[test]
    fn degenerate_span_reports_zero() {
        let landmarks = LandmarkSet::new(blank_face());
        let ratios = GestureSignalExtractor::default()
            .extract(Some(&landmarks))
            .expect("all-zero face is still an observation");
        assert_eq!(ratios.eye_aspect_ratio, 0.0);
        assert_eq!(ratios.mouth_aspect_ratio, 0.0);
    }

    #[test]
    fn missing_face_is_no_observation() {
        assert_eq!(GestureSignalExtractor::default().extract(None), None);
    }

    #[test]
    fn truncated_landmarks_are_no_observation() {
        let landmarks = LandmarkSet::new(vec![Point::new(1.0, 1.0); 100]);
        assert_eq!(
            GestureSignalExtractor::default().extract(Some(&landmarks)),
            None
        );
    }

    #[test]
    fn face_mesh_layout_fits_model_output() {
        assert!(FaceLayout::FACE_MESH.required_len() <= FACE_MESH_LANDMARKS);
    }

    #[test]
    fn normalized_points_scale_to_window() {
        let set = LandmarkSet::from_normalized(&[(0.5, 0.25)], 960.0, 540.0);
        assert_eq!(set.get(0), Some(Point::new(480.0, 135.0)));
    }
}
