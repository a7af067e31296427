//! Graph extraction with range masks.
//!
//! 1D graphs are masked on x alone; the 2D surface is masked on x and y.
//! The same mask is applied to every parallel array.

use ns_core::Result;

use crate::binned::{ExtractOptions, Window};
use crate::kind::{Representation, Source};
use crate::view::{GraphObject, GraphPoints, graph_view};

/// Mask over `x`: `min <= x <= max`.
pub fn mask_1d(x: &[f64], xw: &Window) -> Vec<bool> {
    x.iter().map(|&v| xw.contains(v)).collect()
}

/// Mask over `(x, y)` pairs.
pub fn mask_2d(x: &[f64], y: &[f64], xw: &Window, yw: &Window) -> Vec<bool> {
    x.iter().zip(y).map(|(&a, &b)| xw.contains(a) && yw.contains(b)).collect()
}

/// Keep the entries of `values` whose mask bit is set.
pub fn apply_mask(values: &[f64], mask: &[bool]) -> Vec<f64> {
    values.iter().zip(mask).filter(|(_, keep)| **keep).map(|(v, _)| *v).collect()
}

/// Mask every array of a graph.
pub fn mask_points(points: &GraphPoints, opts: &ExtractOptions) -> GraphPoints {
    let (xw, yw) = (opts.x_window(), opts.y_window());
    match points {
        GraphPoints::Plain { x, y } => {
            let mask = mask_1d(x, &xw);
            GraphPoints::Plain { x: apply_mask(x, &mask), y: apply_mask(y, &mask) }
        }
        GraphPoints::Symmetric { x, y, ex, ey } => {
            let mask = mask_1d(x, &xw);
            GraphPoints::Symmetric {
                x: apply_mask(x, &mask),
                y: apply_mask(y, &mask),
                ex: apply_mask(ex, &mask),
                ey: apply_mask(ey, &mask),
            }
        }
        GraphPoints::Asymmetric { x, y, exl, exh, eyl, eyh } => {
            let mask = mask_1d(x, &xw);
            GraphPoints::Asymmetric {
                x: apply_mask(x, &mask),
                y: apply_mask(y, &mask),
                exl: apply_mask(exl, &mask),
                exh: apply_mask(exh, &mask),
                eyl: apply_mask(eyl, &mask),
                eyh: apply_mask(eyh, &mask),
            }
        }
        GraphPoints::Surface { x, y, z } => {
            let mask = mask_2d(x, y, &xw, &yw);
            GraphPoints::Surface {
                x: apply_mask(x, &mask),
                y: apply_mask(y, &mask),
                z: apply_mask(z, &mask),
            }
        }
    }
}

/// Classify a graph from either representation, inject it and apply the
/// range mask. The returned object carries the masked arrays.
pub fn extract_graph<'a>(
    src: impl Into<Source<'a>>,
    opts: &ExtractOptions,
    repr: Representation,
) -> Result<GraphObject> {
    opts.validate()?;
    let mut obj = graph_view(src.into(), repr)?;
    let before = obj.points.len();
    obj.points = mask_points(&obj.points, opts);
    tracing::debug!(kind = %obj.kind, kept = obj.points.len(), of = before, "graph extraction");
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::Graph;

    #[test]
    fn test_plain_graph_xmin() {
        let g = Graph::new(vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]).unwrap();
        let opts = ExtractOptions { xmin: Some(2.0), ..Default::default() };
        let out = extract_graph(&g, &opts, Representation::Native).unwrap();
        assert_eq!(out.points, GraphPoints::Plain { x: vec![2.0, 3.0], y: vec![20.0, 30.0] });
    }

    #[test]
    fn test_surface_masks_on_both_axes() {
        let g = Graph::surface(vec![0.0, 1.0, 2.0], vec![5.0, 0.5, 1.5], vec![1.0, 2.0, 3.0]).unwrap();
        let opts = ExtractOptions { xmin: Some(0.5), ymax: Some(1.0), ..Default::default() };
        let out = extract_graph(&g, &opts, Representation::Native).unwrap();
        assert_eq!(out.points, GraphPoints::Surface { x: vec![1.0], y: vec![0.5], z: vec![2.0] });
    }

    #[test]
    fn test_y_window_ignored_for_1d_graphs() {
        let g = Graph::with_errors(vec![1.0, 2.0], vec![100.0, 200.0], vec![0.1; 2], vec![1.0; 2]).unwrap();
        let opts = ExtractOptions { ymax: Some(0.0), ..Default::default() };
        let out = extract_graph(&g, &opts, Representation::Native).unwrap();
        assert_eq!(out.points.len(), 2);
    }

    #[test]
    fn test_apply_mask() {
        assert_eq!(apply_mask(&[1.0, 2.0, 3.0], &[true, false, true]), vec![1.0, 3.0]);
    }
}
