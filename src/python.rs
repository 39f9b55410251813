//! Python extension module.

use num_complex::Complex;
use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::{BitStream, ModemError, Modulator, Symbol};

impl From<ModemError> for PyErr {
    fn from(err: ModemError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[pyclass(name = "BitStream")]
#[derive(Default)]
struct PyBitStream {
    inner: BitStream,
}

#[pymethods]
impl PyBitStream {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    fn write(&mut self, value: u64, width: usize) {
        self.inner.write(value, width);
    }

    fn writeall(&mut self, values: Vec<u64>, width: usize) {
        self.inner.writeall(values, width);
    }

    fn read(&mut self, width: usize) -> PyResult<Option<u64>> {
        Ok(self.inner.read(width)?)
    }

    fn readall(&mut self, width: usize) -> PyResult<Vec<u64>> {
        Ok(self.inner.readall(width)?.collect())
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

#[pyclass(name = "Modulator")]
struct PyModulator {
    inner: Modulator,
}

#[pymethods]
impl PyModulator {
    #[new]
    #[pyo3(signature = (order=4))]
    fn new(order: usize) -> PyResult<Self> {
        Ok(Self {
            inner: Modulator::new(order)?,
        })
    }

    #[getter]
    fn rotation(&self) -> f64 {
        self.inner.rotation
    }

    #[setter]
    fn set_rotation(&mut self, rotation: f64) {
        self.inner.rotation = rotation;
    }

    #[getter]
    fn order(&self) -> usize {
        self.inner.order()
    }

    #[getter]
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn iq_mod(&self, symbol: Symbol) -> PyResult<Complex<f64>> {
        Ok(self.inner.iq_mod(symbol)?)
    }

    fn iq_dem(&self, sample: Complex<f64>) -> PyResult<Symbol> {
        Ok(self.inner.iq_dem(sample)?)
    }

    fn modulate(&self, data: Vec<u8>) -> PyResult<Vec<Complex<f64>>> {
        Ok(self.inner.modulate(data)?)
    }

    fn demodulate(&self, samples: Vec<Complex<f64>>) -> PyResult<Vec<u8>> {
        Ok(self.inner.demodulate(samples)?)
    }

    /// Unrotated constellation points, indexed by symbol.
    fn constellation<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<Complex<f64>>> {
        PyArray1::from_iter(py, self.inner.constellation().points().iter().copied())
    }
}

#[pymodule]
#[pyo3(name = "bitqam")]
fn module_with_functions(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBitStream>()?;
    m.add_class::<PyModulator>()?;
    Ok(())
}
