pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Solves `a*t^2 + b*t + c = 0`, returning the two real roots (possibly equal)
/// in unspecified order. Returns `None` if `a` is (numerically) zero or the
/// discriminant is negative.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() < f64::EPSILON {
        return None;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t1 = (-b + sqrt_d) / (2.0 * a);
    let t2 = (-b - sqrt_d) / (2.0 * a);
    Some((t1, t2))
}

pub fn kinetic_energy(mass: f64, speed: f64) -> f64 {
    0.5 * mass * speed * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-12, 1e-9));
        assert!(!approx_eq(1.0, 1.1, 1e-9));
    }

    #[test]
    fn test_solve_quadratic() {
        // t^2 - 3t + 2 = 0 -> roots 1, 2
        let (t1, t2) = solve_quadratic(1.0, -3.0, 2.0).unwrap();
        let mut roots = [t1, t2];
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!(approx_eq(roots[0], 1.0, 1e-12));
        assert!(approx_eq(roots[1], 2.0, 1e-12));

        assert!(solve_quadratic(1.0, 0.0, 1.0).is_none());
        assert!(solve_quadratic(0.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_kinetic_energy() {
        assert_eq!(kinetic_energy(2.0, 3.0), 9.0);
    }
}
