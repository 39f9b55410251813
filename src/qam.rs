use ndarray::Array2;
use num::Integer;
use num::integer::Roots;
use num_complex::Complex;

use crate::{
    Symbol,
    bitstream::MAX_WIDTH,
    error::{ModemError, ModemResult},
};

/// Half-width of the square the decision grid is laid over.
///
/// The table is peak-normalized, so both axes of the grid span `[-1, 1]`.
const DECISION_SCALE: f64 = 1f64;

/// Slack allowed on the `[-1, 1]` decision square for rounding in the rotor.
const DECISION_TOLERANCE: f64 = 1e-9;

/// Square QAM constellation and its demapping grid.
///
/// Symbols are numbered row-major, starting in the most negative corner:
/// symbol `s` sits in column `s % dim` (in-phase) and row `s / dim`
/// (quadrature).
#[derive(Debug, Clone, PartialEq)]
pub struct QamConstellation {
    order: usize,
    dim: usize,
    points: Vec<Complex<f64>>,
    grid: Array2<Symbol>,
}

fn get_qam_symbols(order: usize, dim: usize) -> Vec<Complex<f64>> {
    let raw: Vec<Complex<f64>> = (0..order)
        .map(|s| {
            let (row, col) = s.div_rem(&dim);
            Complex::new(
                (2 * col + 1) as f64 - dim as f64,
                (2 * row + 1) as f64 - dim as f64,
            )
        })
        .collect();

    // Normalize the peak amplitude on each axis to one.
    let peak = raw
        .iter()
        .map(|point| point.im.powi(2))
        .fold(0f64, f64::max)
        .sqrt();
    raw.into_iter().map(|point| point / peak).collect()
}

impl QamConstellation {
    /// Build the constellation for a square `order`.
    ///
    /// `order` must be a perfect square of at least 4 whose side fits in a
    /// single bit stream word.
    pub fn new(order: usize) -> ModemResult<Self> {
        let dim = order.sqrt();
        if order < 4 || dim * dim != order || dim > MAX_WIDTH {
            return Err(ModemError::InvalidOrder(order));
        }

        let points = get_qam_symbols(order, dim);
        let grid = Array2::from_shape_fn((dim, dim), |(row, col)| (col + row * dim) as Symbol);

        tracing::debug!(order, dim, "built square QAM constellation");
        Ok(Self {
            order,
            dim,
            points,
            grid,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Points per axis.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Unrotated points, indexed by symbol.
    pub fn points(&self) -> &[Complex<f64>] {
        &self.points
    }

    /// Symbol at each `(row, col)` of the decision grid.
    pub fn grid(&self) -> &Array2<Symbol> {
        &self.grid
    }

    pub fn point(&self, symbol: Symbol) -> ModemResult<Complex<f64>> {
        usize::try_from(symbol)
            .ok()
            .and_then(|idx| self.points.get(idx).copied())
            .ok_or(ModemError::InvalidSymbol {
                symbol,
                order: self.order,
            })
    }

    /// Quantize an unrotated sample to the nearest grid symbol.
    pub fn demap(&self, point: Complex<f64>) -> ModemResult<Symbol> {
        let out_of_range = ModemError::OutOfRange {
            re: point.re,
            im: point.im,
        };
        let limit = DECISION_SCALE + DECISION_TOLERANCE;
        // Written so NaN components fail too.
        if !(point.re.abs() <= limit && point.im.abs() <= limit) {
            return Err(out_of_range);
        }

        match (self.axis_index(point.im), self.axis_index(point.re)) {
            (Some(row), Some(col)) => Ok(self.grid[[row, col]]),
            _ => Err(out_of_range),
        }
    }

    fn axis_index(&self, component: f64) -> Option<usize> {
        // [-1, 1] -> [0, 2] -> [0, dim - 1]
        let coord = (component + DECISION_SCALE) / DECISION_SCALE;
        let index = (coord * (self.dim - 1) as f64 / 2f64).round();
        if index < 0f64 || index >= self.dim as f64 {
            None
        } else {
            Some(index as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(4)]
    #[case(9)]
    #[case(16)]
    #[case(36)]
    #[case(64)]
    #[case(256)]
    #[case(4096)]
    fn peak_normalized(#[case] order: usize) {
        let qam = QamConstellation::new(order).unwrap();
        assert_eq!(qam.points().len(), order);

        let peak = qam
            .points()
            .iter()
            .flat_map(|point| [point.re.abs(), point.im.abs()])
            .fold(0f64, f64::max);
        assert_approx_eq!(peak, 1f64);

        // Evenly spaced and centered on the origin.
        let mean: Complex<f64> = qam.points().iter().sum::<Complex<f64>>() / order as f64;
        assert_approx_eq!(mean.norm(), 0f64);
        let spacing = 2f64 / (qam.dim() - 1) as f64;
        assert_approx_eq!((qam.points()[1] - qam.points()[0]).re, spacing);
    }

    #[rstest]
    #[case(4)]
    #[case(9)]
    #[case(16)]
    #[case(36)]
    #[case(64)]
    #[case(1024)]
    fn demap_every_point(#[case] order: usize) {
        let qam = QamConstellation::new(order).unwrap();
        for (symbol, &point) in qam.points().iter().enumerate() {
            assert_eq!(qam.demap(point).unwrap(), symbol as Symbol);
        }
    }

    #[test]
    fn qam16_corners() {
        let qam = QamConstellation::new(16).unwrap();
        assert_eq!(qam.dim(), 4);

        let first = qam.point(0).unwrap();
        let last = qam.point(15).unwrap();
        assert_approx_eq!(first.re, -1f64);
        assert_approx_eq!(first.im, -1f64);
        assert_approx_eq!(last.re, 1f64);
        assert_approx_eq!(last.im, 1f64);

        for point in qam.points() {
            assert!(first.re <= point.re && first.im <= point.im);
            assert!(last.re >= point.re && last.im >= point.im);
        }

        // Symbol 1 steps along the in-phase axis, symbol 4 along quadrature.
        let one = qam.point(1).unwrap();
        let four = qam.point(4).unwrap();
        assert_approx_eq!(one.re, -1f64 / 3f64);
        assert_approx_eq!(one.im, -1f64);
        assert_approx_eq!(four.re, -1f64);
        assert_approx_eq!(four.im, -1f64 / 3f64);
    }

    #[test]
    fn grid_layout() {
        let qam = QamConstellation::new(9).unwrap();
        assert_eq!(qam.grid().shape(), &[3, 3]);
        assert_eq!(qam.grid()[[0, 0]], 0);
        assert_eq!(qam.grid()[[0, 2]], 2);
        assert_eq!(qam.grid()[[1, 0]], 3);
        assert_eq!(qam.grid()[[2, 1]], 7);
    }

    #[test]
    fn demap_quantizes() {
        let qam = QamConstellation::new(4).unwrap();
        assert_eq!(qam.demap(Complex::new(-0.2, -0.9)).unwrap(), 0);
        assert_eq!(qam.demap(Complex::new(0.1, -0.4)).unwrap(), 1);
        assert_eq!(qam.demap(Complex::new(-0.7, 0.3)).unwrap(), 2);
        assert_eq!(qam.demap(Complex::new(0.6, 0.6)).unwrap(), 3);
    }

    #[rstest]
    #[case(Complex::new(1.5, 0f64))]
    #[case(Complex::new(0f64, -1.01))]
    #[case(Complex::new(f64::NAN, 0f64))]
    #[case(Complex::new(0f64, f64::INFINITY))]
    fn demap_out_of_range(#[case] point: Complex<f64>) {
        let qam = QamConstellation::new(16).unwrap();
        assert!(matches!(
            qam.demap(point),
            Err(ModemError::OutOfRange { .. })
        ));
    }

    #[test]
    fn invalid_symbol() {
        let qam = QamConstellation::new(16).unwrap();
        assert_eq!(
            qam.point(16),
            Err(ModemError::InvalidSymbol {
                symbol: 16,
                order: 16
            })
        );
        assert!(qam.point(u64::MAX).is_err());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(8)]
    #[case(15)]
    #[case(17)]
    #[case(65 * 65)]
    fn invalid_order(#[case] order: usize) {
        assert_eq!(
            QamConstellation::new(order),
            Err(ModemError::InvalidOrder(order))
        );
    }
}
