use crate::types::{BoundingBox, BoxColor, Corners, Point};

fn first_set_color<'a>(colors: impl IntoIterator<Item = &'a BoxColor>) -> BoxColor {
    colors
        .into_iter()
        .find(|c| !c.is_unset())
        .copied()
        .unwrap_or(BoxColor::UNSET)
}

/// Per-field integer mean of the corners and centers of `boxes`.
fn average_geometry(boxes: &[&BoundingBox]) -> (Point, Corners) {
    let n = boxes.len() as i64;
    let mean = |field: fn(&BoundingBox) -> i32| -> i32 {
        (boxes.iter().map(|b| field(*b) as i64).sum::<i64>() / n) as i32
    };

    let center = Point::new(mean(|b| b.center.row), mean(|b| b.center.col));
    let corners = Corners::new(
        mean(|b| b.corners.top),
        mean(|b| b.corners.left),
        mean(|b| b.corners.bottom),
        mean(|b| b.corners.right),
    );
    (center, corners)
}

/// Pairs every box of `boxes_a` with every box of `boxes_b` whose center
/// lies strictly within `max_deviation` on both axes.
///
/// Only boxes of the same image are paired. Within an image this is a full
/// cross product: one box may take part in several fused boxes. Color
/// prefers `a`, then `b`; owner and shape come from `a` first.
pub fn fuse(boxes_a: &[BoundingBox], boxes_b: &[BoundingBox], max_deviation: i32) -> Vec<BoundingBox> {
    let mut fused = Vec::new();

    for a in boxes_a {
        for b in boxes_b {
            if a.owner_index != b.owner_index
                || (a.center.row - b.center.row).abs() >= max_deviation
                || (a.center.col - b.center.col).abs() >= max_deviation
            {
                continue;
            }

            let (center, corners) = average_geometry(&[a, b]);
            fused.push(BoundingBox {
                center,
                corners,
                color: first_set_color([&a.color, &b.color]),
                shape: a.shape.or(b.shape),
                owner_index: a.owner_index,
            });
        }
    }

    fused
}

/// Collapses near-duplicate boxes of the same image into their average.
///
/// Clusters grow around a seed only: in input order, each unclaimed box
/// claims every later unclaimed box of the same owner whose center lies
/// within `max_deviation` (inclusive) of its own. Closeness to a non-seed
/// member does not count.
pub fn merge_duplicates(boxes: &[BoundingBox], max_deviation: i32) -> Vec<BoundingBox> {
    let mut visited = vec![false; boxes.len()];
    let mut merged = Vec::new();

    for (i, seed) in boxes.iter().enumerate() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let mut cluster = vec![seed];

        for (j, candidate) in boxes.iter().enumerate().skip(i + 1) {
            if visited[j] || candidate.owner_index != seed.owner_index {
                continue;
            }
            if (seed.center.row - candidate.center.row).abs() <= max_deviation
                && (seed.center.col - candidate.center.col).abs() <= max_deviation
            {
                visited[j] = true;
                cluster.push(candidate);
            }
        }

        let (center, corners) = average_geometry(&cluster);
        merged.push(BoundingBox {
            center,
            corners,
            color: first_set_color(cluster.iter().map(|b| &b.color)),
            shape: seed.shape,
            owner_index: seed.owner_index,
        });
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeKind;

    fn boxed(center: (i32, i32), half: i32, color: BoxColor, owner_index: usize) -> BoundingBox {
        let (row, col) = center;
        BoundingBox {
            center: Point::new(row, col),
            corners: Corners::new(row - half, col - half, row + half, col + half),
            color,
            shape: None,
            owner_index,
        }
    }

    #[test]
    fn test_fuse_pair() {
        let a = BoundingBox {
            center: Point::new(10, 10),
            corners: Corners::new(6, 6, 14, 14),
            color: BoxColor::RED,
            shape: None,
            owner_index: 0,
        };
        let b = BoundingBox {
            center: Point::new(12, 11),
            corners: Corners::new(7, 7, 17, 15),
            color: BoxColor::UNSET,
            shape: Some(ShapeKind::Rectangle),
            owner_index: 0,
        };

        let fused = fuse(&[a], &[b], 15);
        assert_eq!(fused.len(), 1);
        let f = &fused[0];
        assert_eq!(f.center, Point::new(11, 10));
        assert_eq!(f.corners, Corners::new(6, 6, 15, 14));
        assert_eq!(f.height(), 10);
        assert_eq!(f.width(), 9);
        assert_eq!(f.area(), 90);
        assert_eq!(f.color, BoxColor::RED);
        assert_eq!(f.shape, Some(ShapeKind::Rectangle));
        assert_eq!(f.owner_index, 0);
    }

    #[test]
    fn test_fuse_keeps_images_apart() {
        let a = [boxed((10, 10), 3, BoxColor::RED, 0)];
        let b = [
            boxed((10, 10), 3, BoxColor::UNSET, 1),
            boxed((11, 11), 3, BoxColor::UNSET, 2),
        ];
        assert!(fuse(&a, &b, 15).is_empty());

        let same = [boxed((12, 12), 3, BoxColor::UNSET, 0)];
        let both: Vec<_> = b.iter().chain(&same).cloned().collect();
        let fused = fuse(&a, &both, 15);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].owner_index, 0);
        assert_eq!(fused[0].center, Point::new(11, 11));
    }

    #[test]
    fn test_averaged_size_comes_from_averaged_corners() {
        let a = BoundingBox {
            center: Point::new(1, 1),
            corners: Corners::new(0, 0, 3, 3),
            color: BoxColor::RED,
            shape: None,
            owner_index: 0,
        };
        let b = BoundingBox {
            center: Point::new(3, 3),
            corners: Corners::new(1, 1, 5, 5),
            color: BoxColor::UNSET,
            shape: None,
            owner_index: 0,
        };

        // Corners (0, 0, 4, 4), not the mean of the 4x4 and 5x5 sizes.
        let fused = fuse(&[a.clone()], &[b.clone()], 15);
        assert_eq!(fused[0].corners, Corners::new(0, 0, 4, 4));
        assert_eq!((fused[0].height(), fused[0].width(), fused[0].area()), (5, 5, 25));

        let merged = merge_duplicates(&[a, b], 5);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].corners, Corners::new(0, 0, 4, 4));
        assert_eq!(merged[0].area(), 25);
    }

    #[test]
    fn test_fuse_deviation_is_exclusive() {
        let a = boxed((10, 10), 3, BoxColor::RED, 0);
        let b = boxed((25, 10), 3, BoxColor::UNSET, 0);
        assert!(fuse(&[a.clone()], &[b.clone()], 15).is_empty());
        assert_eq!(fuse(&[a], &[b], 16).len(), 1);
    }

    #[test]
    fn test_fuse_is_a_cross_product() {
        let a = [boxed((10, 10), 3, BoxColor::RED, 0)];
        let b = [
            boxed((12, 12), 3, BoxColor::UNSET, 0),
            boxed((8, 9), 3, BoxColor::UNSET, 0),
            boxed((60, 60), 3, BoxColor::UNSET, 0),
        ];
        assert_eq!(fuse(&a, &b, 15).len(), 2);
        assert_eq!(fuse(&b, &a, 15).len(), 2);
    }

    #[test]
    fn test_fuse_color_precedence() {
        let red = [boxed((10, 10), 3, BoxColor::RED, 0)];
        let blue = [boxed((11, 11), 3, BoxColor::BLUE, 0)];
        let unset = [boxed((11, 11), 3, BoxColor::UNSET, 0)];

        assert_eq!(fuse(&red, &blue, 15)[0].color, BoxColor::RED);
        assert_eq!(fuse(&blue, &red, 15)[0].color, BoxColor::BLUE);
        assert_eq!(fuse(&unset, &blue, 15)[0].color, BoxColor::BLUE);
        assert_eq!(fuse(&unset, &unset, 15)[0].color, BoxColor::UNSET);

        let ab = fuse(&red, &blue, 15);
        let ba = fuse(&blue, &red, 15);
        assert_eq!(ab[0].corners, ba[0].corners);
        assert_eq!(ab[0].center, ba[0].center);
    }

    #[test]
    fn test_fuse_empty_inputs() {
        let a = [boxed((10, 10), 3, BoxColor::RED, 0)];
        assert!(fuse(&a, &[], 15).is_empty());
        assert!(fuse(&[], &a, 15).is_empty());
    }

    #[test]
    fn test_merge_cluster_and_owner_scope() {
        let boxes = vec![
            boxed((50, 50), 5, BoxColor::UNSET, 0),
            boxed((55, 52), 5, BoxColor::YELLOW, 0),
            boxed((58, 49), 5, BoxColor::RED, 0),
            boxed((50, 50), 5, BoxColor::BLUE, 1),
        ];

        let merged = merge_duplicates(&boxes, 20);
        assert_eq!(merged.len(), 2);

        let first = &merged[0];
        assert_eq!(first.owner_index, 0);
        assert_eq!(first.center, Point::new(54, 50));
        assert_eq!(first.corners, Corners::new(49, 45, 59, 55));
        assert_eq!(first.color, BoxColor::YELLOW);

        let second = &merged[1];
        assert_eq!(second.owner_index, 1);
        assert_eq!(second.center, Point::new(50, 50));
        assert_eq!(second.color, BoxColor::BLUE);
    }

    #[test]
    fn test_merge_deviation_is_inclusive() {
        let boxes = vec![
            boxed((10, 10), 2, BoxColor::RED, 0),
            boxed((20, 20), 2, BoxColor::RED, 0),
        ];
        assert_eq!(merge_duplicates(&boxes, 10).len(), 1);
        assert_eq!(merge_duplicates(&boxes, 9).len(), 2);
    }

    #[test]
    fn test_merge_is_seed_relative() {
        // B and C are each within 10 of A but 16 apart; D is close to C only.
        let boxes = vec![
            boxed((50, 50), 2, BoxColor::RED, 0),
            boxed((42, 50), 2, BoxColor::RED, 0),
            boxed((58, 50), 2, BoxColor::RED, 0),
            boxed((66, 50), 2, BoxColor::RED, 0),
        ];

        let merged = merge_duplicates(&boxes, 10);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].center, Point::new(50, 50));
        assert_eq!(merged[1].center, Point::new(66, 50));
    }

    #[test]
    fn test_merge_keeps_seed_shape() {
        let mut seed = boxed((10, 10), 2, BoxColor::UNSET, 0);
        seed.shape = Some(ShapeKind::Triangle);
        let mut other = boxed((11, 11), 2, BoxColor::UNSET, 0);
        other.shape = Some(ShapeKind::Circle);

        let merged = merge_duplicates(&[seed, other], 5);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].shape, Some(ShapeKind::Triangle));
        assert!(merged[0].color.is_unset());
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_duplicates(&[], 10).is_empty());
    }
}
