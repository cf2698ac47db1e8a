//! Lagrange basis functions over uniformly spaced nodes.
//!
//! A curve through `count` nodes places node `i` at parameter `i / (count - 1)`.
//! Both the basis and its derivative read node positions from [`node`], so the
//! position curve and its tangent always agree on the node spacing.

/// Parametric position of node `i` out of `count` nodes.
///
/// `count` must be at least 2.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn node(i: usize, count: usize) -> f64 {
    debug_assert!(count >= 2, "node spacing needs at least two nodes");
    i as f64 / (count - 1) as f64
}

/// Lagrange basis polynomial `L_i(t)` for `count` uniformly spaced nodes.
///
/// `L_i` is `1` at node `i` and `0` at every other node.
#[must_use]
pub fn basis(t: f64, i: usize, count: usize) -> f64 {
    let xi = node(i, count);
    (0..count)
        .filter(|&j| j != i)
        .map(|j| {
            let xj = node(j, count);
            (t - xj) / (xi - xj)
        })
        .product()
}

/// Derivative `L_i'(t)` of the Lagrange basis polynomial.
///
/// Uses the product rule expansion
/// `L_i'(t) = Σ_{j≠i} 1/(x_i - x_j) · Π_{k≠i,j} (t - x_k)/(x_i - x_k)`.
#[must_use]
pub fn derivative_basis(t: f64, i: usize, count: usize) -> f64 {
    let xi = node(i, count);
    let mut result = 0.0;
    for j in (0..count).filter(|&j| j != i) {
        let xj = node(j, count);
        let product: f64 = (0..count)
            .filter(|&k| k != i && k != j)
            .map(|k| {
                let xk = node(k, count);
                (t - xk) / (xi - xk)
            })
            .product();
        result += product / (xi - xj);
    }
    result
}
