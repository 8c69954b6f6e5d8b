use nalgebra::Point3;

pub fn segment_length(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// Axis-aligned bounds of a point cloud as `(min, max)` corners.
///
/// Returns `None` for an empty input.
pub fn bounding_box<'a, I>(points: I) -> Option<(Point3<f64>, Point3<f64>)>
where
    I: IntoIterator<Item = &'a Point3<f64>>,
{
    let mut iter = points.into_iter();
    let first = *iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), p| {
        (
            Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
            Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_length_is_euclidean_distance() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert_eq!(segment_length(&a, &b), 5.0);
        assert_eq!(segment_length(&b, &a), 5.0);
    }

    #[test]
    fn bounding_box_covers_all_points() {
        let points = [
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
        ];
        let (lo, hi) = bounding_box(points.iter()).unwrap();
        assert_eq!(lo, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, Point3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn bounding_box_of_nothing_is_none() {
        assert!(bounding_box(std::iter::empty()).is_none());
    }
}
