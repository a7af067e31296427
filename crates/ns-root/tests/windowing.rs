//! Windowing behaviour of the binned and graph extractors.

use ns_root::native::{Graph, Hist, NativeObject};
use ns_root::view::GraphPoints;
use ns_root::{
    Arrays, ExtractOptions, ReaderModel, Representation, extract_binned, extract_graph, graph_name,
    to_numpy,
};
use proptest::prelude::*;

fn coords(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-10.0f64..10.0, n)
}

fn any_graph() -> impl Strategy<Value = Graph> {
    (1usize..24).prop_flat_map(|n| {
        (0u8..4, coords(n), coords(n), coords(n), coords(n), coords(n), coords(n)).prop_map(
            |(family, x, y, a, b, c, d)| match family {
                0 => Graph::new(x, y).unwrap(),
                1 => Graph::with_errors(x, y, a, b).unwrap(),
                2 => Graph::with_asymm_errors(x, y, a, b, c, d).unwrap(),
                _ => Graph::surface(x, y, a).unwrap(),
            },
        )
    })
}

fn window() -> impl Strategy<Value = (Option<f64>, Option<f64>)> {
    (prop::option::of(-10.0f64..10.0), prop::option::of(-10.0f64..10.0))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn graph_columns_stay_aligned(g in any_graph(), (xmin, xmax) in window(), (ymin, ymax) in window()) {
        let opts = ExtractOptions { xmin, xmax, ymin, ymax };
        let points = extract_graph(&g, &opts, Representation::Native).unwrap().points;
        let n = points.len();
        for (field, col) in points.columns() {
            prop_assert_eq!(col.len(), n, "{}", field);
        }

        let surface = matches!(points, GraphPoints::Surface { .. });
        let xs = points.columns()[0].1.to_vec();
        let ys = points.columns()[1].1.to_vec();
        for (x, y) in xs.iter().zip(&ys) {
            prop_assert!(xmin.is_none_or(|m| *x >= m) && xmax.is_none_or(|m| *x <= m));
            if surface {
                prop_assert!(ymin.is_none_or(|m| *y >= m) && ymax.is_none_or(|m| *y <= m));
            }
        }

        // Every surviving point is one of the inputs, in input order.
        let kept: Vec<f64> = g.x().iter().copied().filter(|&x| {
            xmin.is_none_or(|m| x >= m) && xmax.is_none_or(|m| x <= m)
        }).collect();
        if !surface {
            prop_assert_eq!(xs, kept);
        }
    }

    #[test]
    fn reader_and_native_agree(g in any_graph(), (xmin, xmax) in window()) {
        let opts = ExtractOptions { xmin, xmax, ..Default::default() };
        let native: NativeObject = g.into();
        let reader = ReaderModel::from_native(&native);
        prop_assert_eq!(to_numpy(&native, &opts).unwrap(), to_numpy(&reader, &opts).unwrap());
    }

    #[test]
    fn graph_naming_is_idempotent(name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}") {
        let once = graph_name(&name);
        prop_assert!(once.starts_with("gr_"));
        prop_assert_eq!(graph_name(&once), once.clone());
    }
}

#[test]
fn window_keeps_fully_contained_bins() {
    let h = Hist::th1d("h", "", 5, 0.0, 5.0).unwrap();
    let opts = ExtractOptions::default().x_range(1.0, 4.0);
    let out = extract_binned(&h, &opts, Representation::Native).unwrap();
    let b = out.as_1d().unwrap();
    assert_eq!(b.x, vec![1.5, 2.5, 3.5]);
    assert_eq!(b.x_edges, vec![1.0, 2.0, 3.0, 4.0]);

    // A window edge inside a bin drops that bin.
    let opts = ExtractOptions::default().x_range(0.5, 4.5);
    let out = extract_binned(&h, &opts, Representation::Native).unwrap();
    assert_eq!(out.as_1d().unwrap().x, vec![1.5, 2.5, 3.5]);
}

#[test]
fn window_outside_range_gives_empty_arrays() {
    let h = Hist::th1d("h", "", 5, 0.0, 5.0).unwrap();
    let opts = ExtractOptions::default().x_range(10.0, 20.0);
    let out = extract_binned(&h, &opts, Representation::Native).unwrap();
    let b = out.as_1d().unwrap();
    assert!(b.is_empty());
    assert!(b.x_edges.is_empty());
}

#[test]
fn two_dimensional_window_on_both_axes() {
    let mut h = Hist::th2d("h", "", (4, 0.0, 4.0), (3, 0.0, 3.0)).unwrap();
    h.fill_2d(2.5, 1.5, 7.0).unwrap();
    let opts = ExtractOptions::default().x_range(2.0, 4.0).y_range(1.0, 2.0);

    let reader = ReaderModel::from_hist(&h);
    let native = to_numpy(&h, &opts).unwrap();
    assert_eq!(native, to_numpy(&reader, &opts).unwrap());

    let Arrays::Binned(out) = native else { panic!("expected binned arrays") };
    let b = out.as_2d().unwrap();
    assert_eq!(b.x, vec![2.5, 3.5]);
    assert_eq!(b.y, vec![1.5]);
    assert_eq!((b.values.nrows(), b.values.ncols()), (1, 2));
    assert_eq!(b.values[(0, 0)], 7.0);
    assert_eq!(b.values[(0, 1)], 0.0);
}
