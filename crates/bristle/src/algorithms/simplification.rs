use crate::{traits::ShapeSimplifier, types::Contour};

/// Douglas-Peucker approximation of a closed contour using geo's implementation.
///
/// The curve is cut at the point farthest from its first point and the two
/// halves are simplified as open lines, so the result does not depend on a
/// degenerate closing segment.
#[derive(Debug, Clone, Default)]
pub struct DouglasPeuckerSimplifier;

impl ShapeSimplifier for DouglasPeuckerSimplifier {
    fn simplify(&self, contour: &Contour, tolerance: f32) -> Vec<[f32; 2]> {
        use geo::Simplify;

        let points = &contour.points;
        if points.len() < 3 {
            return points.clone();
        }

        let start = points[0];
        let (split, farthest) = points
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &[x, y])| {
                let dx = x - start[0];
                let dy = y - start[1];
                (i, dx * dx + dy * dy)
            })
            .fold((0, 0.0f32), |best, candidate| if candidate.1 > best.1 { candidate } else { best });

        if farthest == 0.0 {
            // Every point sits on the start
            return vec![start];
        }

        let simplify_open = |section: &[[f32; 2]]| -> Vec<[f32; 2]> {
            Contour::line_string(section)
                .simplify(&tolerance)
                .coords()
                .map(|coord| [coord.x, coord.y])
                .collect()
        };

        let mut vertices = simplify_open(&points[..=split]);

        let mut back_half = points[split..].to_vec();
        back_half.push(start);
        let back = simplify_open(&back_half);

        // Both ends of the back half are already in `vertices`
        if back.len() > 2 {
            vertices.extend_from_slice(&back[1..back.len() - 1]);
        }

        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_there_and_back(length: u32) -> Contour {
        // Outer border of a one pixel thick horizontal line
        let forward = (0..=length).map(|x| [x as f32, 0.0]);
        let back = (1..length).rev().map(|x| [x as f32, 0.0]);
        Contour::new(forward.chain(back).collect())
    }

    fn pixel_square(size: u32) -> Contour {
        let last = (size - 1) as f32;
        let mut points = Vec::new();
        points.extend((0..size).map(|x| [x as f32, 0.0]));
        points.extend((1..size).map(|y| [last, y as f32]));
        points.extend((0..size - 1).rev().map(|x| [x as f32, last]));
        points.extend((1..size - 1).rev().map(|y| [0.0, y as f32]));
        Contour::new(points)
    }

    #[test]
    fn test_straight_line_collapses_to_two_vertices() {
        let vertices = DouglasPeuckerSimplifier.simplify(&line_there_and_back(100), 2.0);
        assert_eq!(vertices, vec![[0.0, 0.0], [100.0, 0.0]]);
    }

    #[test]
    fn test_square_keeps_its_corners() {
        let vertices = DouglasPeuckerSimplifier.simplify(&pixel_square(20), 2.0);
        assert_eq!(vertices.len(), 4);
        for corner in [[0.0, 0.0], [19.0, 0.0], [19.0, 19.0], [0.0, 19.0]] {
            assert!(vertices.contains(&corner), "missing corner {corner:?}");
        }
    }

    #[test]
    fn test_small_wiggle_is_smoothed_away() {
        // One pixel bumps stay inside a tolerance of 2
        let mut points: Vec<[f32; 2]> = (0..=60).map(|x| [x as f32, (x % 2) as f32]).collect();
        points.extend((1..60).rev().map(|x| [x as f32, 3.0 + (x % 2) as f32]));
        let vertices = DouglasPeuckerSimplifier.simplify(&Contour::new(points), 2.0);
        assert!(vertices.len() <= 4, "got {} vertices", vertices.len());
    }

    #[test]
    fn test_short_contours_are_returned_unchanged() {
        let contour = Contour::new(vec![[1.0, 1.0], [5.0, 1.0]]);
        assert_eq!(DouglasPeuckerSimplifier.simplify(&contour, 2.0), contour.points);
    }

    #[test]
    fn test_coincident_points_collapse_to_one() {
        let contour = Contour::new(vec![[3.0, 3.0]; 5]);
        assert_eq!(DouglasPeuckerSimplifier.simplify(&contour, 2.0), vec![[3.0, 3.0]]);
    }
}
