use nalgebra::{Rotation3, Unit, Vector3};

const TETRAHEDRAL_ANGLE_DEG: f64 = 109.5;
const WATER_ANGLE_DEG: f64 = 104.5;

/// Picks a unit vector guaranteed not to be parallel to `v`.
fn orthogonal_seed(v: &Vector3<f64>) -> Vector3<f64> {
    if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    }
}

/// Returns a unit vector perpendicular to `v`, biased towards `seed`.
fn perpendicular_to(v: &Vector3<f64>, seed: &Vector3<f64>) -> Vector3<f64> {
    let projected = seed - v * v.dot(seed);
    if projected.norm_squared() < 1e-12 {
        let fallback = orthogonal_seed(v);
        (fallback - v * v.dot(&fallback)).normalize()
    } else {
        projected.normalize()
    }
}

/// Builds unit directions for hydrogens on an sp3 center.
///
/// `neighbors` are unit vectors from the center towards its existing bonded
/// substituents (0 to 3 of them). The returned directions complete the
/// tetrahedron; `count` of them are produced, staggered evenly where the
/// geometry leaves rotational freedom.
pub fn tetrahedral_directions(neighbors: &[Vector3<f64>], count: usize) -> Vec<Vector3<f64>> {
    let count = count.min(4 - neighbors.len().min(3));
    match neighbors {
        [] => ideal_tetrahedron().into_iter().take(count).collect(),
        [n1] => {
            let axis = Unit::new_normalize(*n1);
            let tilt = Rotation3::from_axis_angle(
                &Unit::new_normalize(n1.cross(&perpendicular_to(n1, &orthogonal_seed(n1)))),
                TETRAHEDRAL_ANGLE_DEG.to_radians(),
            );
            let first = (tilt * n1).normalize();
            let spin = Rotation3::from_axis_angle(&axis, 120.0_f64.to_radians());
            let second = spin * first;
            let third = spin * second;
            [first, second, third].into_iter().take(count).collect()
        }
        [n1, n2] => {
            let bisector = -(n1 + n2).normalize();
            let normal = n1.cross(n2);
            if normal.norm_squared() < 1e-12 {
                // Colinear neighbors; fall back to an arbitrary perpendicular pair.
                let perp = perpendicular_to(n1, &orthogonal_seed(n1));
                return [perp, -perp].into_iter().take(count).collect();
            }
            let normal = normal.normalize();
            let half_angle = TETRAHEDRAL_ANGLE_DEG.to_radians() / 2.0;
            let first = (bisector * half_angle.cos() + normal * half_angle.sin()).normalize();
            let second = (bisector * half_angle.cos() - normal * half_angle.sin()).normalize();
            [first, second].into_iter().take(count).collect()
        }
        [n1, n2, n3, ..] => {
            let sum = n1 + n2 + n3;
            let direction = if sum.norm_squared() < 1e-12 {
                perpendicular_to(n1, &orthogonal_seed(n1))
            } else {
                -sum.normalize()
            };
            vec![direction].into_iter().take(count).collect()
        }
    }
}

/// Builds unit directions for hydrogens on a trigonal-planar center.
///
/// With two neighbors the single in-plane direction opposes their bisector
/// (amide and aromatic C-H/N-H). With one neighbor a `plane_reference`
/// (a unit vector from the neighbor towards one of its own substituents)
/// fixes the plane, and the two returned directions sit at 120 degrees on
/// either side of the bond (amide NH2).
pub fn trigonal_directions(
    neighbors: &[Vector3<f64>],
    plane_reference: Option<&Vector3<f64>>,
    count: usize,
) -> Vec<Vector3<f64>> {
    match neighbors {
        [n1, n2] => {
            let sum = n1 + n2;
            let direction = if sum.norm_squared() < 1e-12 {
                perpendicular_to(n1, &orthogonal_seed(n1))
            } else {
                -sum.normalize()
            };
            vec![direction].into_iter().take(count).collect()
        }
        [n1] => {
            let seed = plane_reference.copied().unwrap_or_else(|| orthogonal_seed(n1));
            let normal = n1.cross(&seed);
            let normal = if normal.norm_squared() < 1e-12 {
                Unit::new_normalize(n1.cross(&orthogonal_seed(n1)))
            } else {
                Unit::new_normalize(normal)
            };
            let to_plus = Rotation3::from_axis_angle(&normal, 120.0_f64.to_radians());
            let to_minus = Rotation3::from_axis_angle(&normal, -120.0_f64.to_radians());
            [to_plus * n1, to_minus * n1]
                .into_iter()
                .take(count)
                .collect()
        }
        _ => tetrahedral_directions(neighbors, count),
    }
}

/// Builds the unit direction for a hydroxyl or thiol hydrogen.
///
/// The hydrogen sits at the tetrahedral angle from the heavy-atom bond, with
/// its torsion turned away from `reference` (a unit vector from the neighbor
/// towards one of its other substituents) when one is available.
pub fn bent_direction(
    neighbor: &Vector3<f64>,
    reference: Option<&Vector3<f64>>,
) -> Vector3<f64> {
    let perp = match reference {
        Some(reference) => perpendicular_to(neighbor, &-reference),
        None => perpendicular_to(neighbor, &orthogonal_seed(neighbor)),
    };
    let angle = TETRAHEDRAL_ANGLE_DEG.to_radians();
    (neighbor * angle.cos() + perp * angle.sin()).normalize()
}

/// Returns the two unit directions of an isolated water molecule's hydrogens.
pub fn water_directions() -> [Vector3<f64>; 2] {
    let half = (WATER_ANGLE_DEG / 2.0).to_radians();
    [
        Vector3::new(half.sin(), half.cos(), 0.0),
        Vector3::new(-half.sin(), half.cos(), 0.0),
    ]
}

fn ideal_tetrahedron() -> [Vector3<f64>; 4] {
    let inv_sqrt3 = 1.0 / 3.0_f64.sqrt();
    [
        Vector3::new(inv_sqrt3, inv_sqrt3, inv_sqrt3),
        Vector3::new(inv_sqrt3, -inv_sqrt3, -inv_sqrt3),
        Vector3::new(-inv_sqrt3, inv_sqrt3, -inv_sqrt3),
        Vector3::new(-inv_sqrt3, -inv_sqrt3, inv_sqrt3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
        a.angle(b).to_degrees()
    }

    #[test]
    fn tetrahedral_with_one_neighbor_yields_staggered_triplet() {
        let n1 = Vector3::x();
        let dirs = tetrahedral_directions(&[n1], 3);
        assert_eq!(dirs.len(), 3);
        for dir in &dirs {
            assert!((dir.norm() - 1.0).abs() < 1e-9);
            assert!((angle_deg(dir, &n1) - 109.5).abs() < 1.0);
        }
        assert!((angle_deg(&dirs[0], &dirs[1]) - 109.5).abs() < 2.0);
    }

    #[test]
    fn tetrahedral_with_two_neighbors_yields_symmetric_pair() {
        let n1 = Vector3::new(1.0, 1.0, 0.0).normalize();
        let n2 = Vector3::new(-1.0, 1.0, 0.0).normalize();
        let dirs = tetrahedral_directions(&[n1, n2], 2);
        assert_eq!(dirs.len(), 2);
        assert!((angle_deg(&dirs[0], &dirs[1]) - 109.5).abs() < 1.0);
        // Both point away from the neighbor bisector.
        let bisector = (n1 + n2).normalize();
        assert!(dirs[0].dot(&bisector) < 0.0);
        assert!(dirs[1].dot(&bisector) < 0.0);
    }

    #[test]
    fn tetrahedral_with_three_neighbors_opposes_their_sum() {
        let dirs = tetrahedral_directions(
            &[Vector3::x(), Vector3::y(), Vector3::z()],
            1,
        );
        assert_eq!(dirs.len(), 1);
        let expected = -Vector3::new(1.0, 1.0, 1.0).normalize();
        assert!((dirs[0] - expected).norm() < 1e-9);
    }

    #[test]
    fn tetrahedral_with_no_neighbors_uses_ideal_frame() {
        let dirs = tetrahedral_directions(&[], 4);
        assert_eq!(dirs.len(), 4);
        assert!((angle_deg(&dirs[0], &dirs[1]) - 109.47).abs() < 0.1);
    }

    #[test]
    fn tetrahedral_count_never_exceeds_open_valences() {
        let dirs = tetrahedral_directions(&[Vector3::x(), Vector3::y(), Vector3::z()], 3);
        assert_eq!(dirs.len(), 1);
    }

    #[test]
    fn trigonal_with_two_neighbors_bisects_them() {
        let n1 = Vector3::new(1.0, 1.0, 0.0).normalize();
        let n2 = Vector3::new(-1.0, 1.0, 0.0).normalize();
        let dirs = trigonal_directions(&[n1, n2], None, 1);
        assert_eq!(dirs.len(), 1);
        assert!((dirs[0] - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn trigonal_with_one_neighbor_stays_in_reference_plane() {
        let n1 = Vector3::x();
        let reference = Vector3::y();
        let dirs = trigonal_directions(&[n1], Some(&reference), 2);
        assert_eq!(dirs.len(), 2);
        for dir in &dirs {
            assert!(dir.z.abs() < 1e-9);
            assert!((angle_deg(dir, &n1) - 120.0).abs() < 1.0);
        }
        assert!((angle_deg(&dirs[0], &dirs[1]) - 120.0).abs() < 1.0);
    }

    #[test]
    fn bent_direction_makes_tetrahedral_angle_with_bond() {
        let neighbor = Vector3::x();
        let dir = bent_direction(&neighbor, Some(&Vector3::y()));
        assert!((dir.norm() - 1.0).abs() < 1e-9);
        assert!((angle_deg(&dir, &neighbor) - 109.5).abs() < 1.0);
    }

    #[test]
    fn water_directions_open_the_water_angle() {
        let [d1, d2] = water_directions();
        assert!((angle_deg(&d1, &d2) - 104.5).abs() < 1e-6);
        assert!((d1.norm() - 1.0).abs() < 1e-9);
    }
}
