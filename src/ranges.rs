use log::debug;
use ndarray::ArrayView1;
use serde::{
    Deserialize,
    Serialize,
};

use crate::settings::PlotDefaults;


/// Upper x (DOS) limit that fits the curve inside the energy window `[ymin, ymax]`.
///
/// Returns `ceil(1.1 * max)` over samples with `ymin <= energy <= ymax`, or
/// `fallback` when the window holds no sample.
pub fn estimate_xmax(energy: ArrayView1<f64>, dos: ArrayView1<f64>, ymin: f64, ymax: f64, fallback: f64) -> f64 {
    let max = energy.iter()
        .zip(dos.iter())
        .filter(|(e, _)| **e >= ymin && **e <= ymax)
        .map(|(_, d)| *d)
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))));

    match max {
        Some(max) => (1.1 * max).ceil(),
        None => fallback,
    }
}


/// Axis limits requested by the user, `None` means automatic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub xmin: Option<f64>,
    pub xmax: Option<f64>,
    pub ymin: Option<f64>,
    pub ymax: Option<f64>,
}


/// Final plot ranges, x is DOS and y is energy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AxisRanges {
    pub x: [f64; 2],
    pub y: [f64; 2],
}


impl AxisRanges {
    /// Fill unset limits from `defaults`. The x upper limit is only estimated when
    /// the user left it unset, an explicit value is always kept as is.
    pub fn resolve(limits: &AxisLimits, defaults: &PlotDefaults, energy: ArrayView1<f64>, total: ArrayView1<f64>) -> Self {
        let ymin = limits.ymin.unwrap_or(defaults.ymin);
        let ymax = limits.ymax.unwrap_or(defaults.ymax);
        let xmin = limits.xmin.unwrap_or(defaults.xmin);
        let xmax = match limits.xmax {
            Some(xmax) => xmax,
            None => {
                let xmax = estimate_xmax(energy, total, ymin, ymax, defaults.xmax);
                debug!("Estimated DOS upper limit {} within energy window [{}, {}]", xmax, ymin, ymax);
                xmax
            },
        };

        Self {
            x: [xmin, xmax],
            y: [ymin, ymax],
        }
    }

    /// Ranges after an explicit reset: every limit back to its default, x upper
    /// limit re-estimated over the default energy window.
    pub fn reset(defaults: &PlotDefaults, energy: ArrayView1<f64>, total: ArrayView1<f64>) -> Self {
        Self::resolve(&AxisLimits::default(), defaults, energy, total)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_estimate_xmax() {
        let energy = arr1(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        let dos    = arr1(&[ 0.0,  1.0, 2.0, 5.0, 3.0]);
        assert_eq!(estimate_xmax(energy.view(), dos.view(), -1.0, 1.0, 28.0), 6.0);
        assert_eq!(estimate_xmax(energy.view(), dos.view(), -2.0, -1.0, 28.0), 2.0);
        assert_eq!(estimate_xmax(energy.view(), dos.view(), 2.0, 2.0, 28.0), 4.0);
        assert_eq!(estimate_xmax(energy.view(), dos.view(), 3.0, 9.0, 28.0), 28.0);
    }

    #[test]
    fn test_explicit_xmax_wins() {
        let energy = arr1(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        let dos    = arr1(&[ 0.0,  1.0, 2.0, 5.0, 3.0]);
        let limits = AxisLimits { xmax: Some(15.0), ..Default::default() };
        let ranges = AxisRanges::resolve(&limits, &PlotDefaults::default(), energy.view(), dos.view());
        assert_eq!(ranges.x, [0.0, 15.0]);
        assert_eq!(ranges.y, [-8.0, 2.0]);
    }

    #[test]
    fn test_resolve_and_reset() {
        let energy = arr1(&[-9.0, -1.0, 0.0, 1.0, 2.5]);
        let dos    = arr1(&[45.0,  1.0, 2.0, 5.0, 30.0]);
        let defaults = PlotDefaults::default();

        let limits = AxisLimits { xmin: Some(1.0), ymin: Some(-10.0), ymax: Some(3.0), xmax: None };
        let ranges = AxisRanges::resolve(&limits, &defaults, energy.view(), dos.view());
        assert_eq!(ranges.x, [1.0, 50.0]);
        assert_eq!(ranges.y, [-10.0, 3.0]);

        let ranges = AxisRanges::reset(&defaults, energy.view(), dos.view());
        assert_eq!(ranges.x, [0.0, 6.0]);
        assert_eq!(ranges.y, [-8.0, 2.0]);
    }
}
