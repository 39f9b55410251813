use num_complex::Complex;

use crate::{Symbol, bitstream::BitStream, error::ModemResult, qam::QamConstellation};

/// Application data is always carried as bytes.
pub const DATA_BITS_LEN: usize = 8;

/// Square QAM modulator with an adjustable constellation rotation.
///
/// Symbols are cut from the data stream in chunks as wide as the grid
/// dimension, so the bit width of a symbol is `dim`, not `log2(order)`. For
/// orders 4, 9 and 16 every chunk is a valid symbol. From 25-QAM up a chunk
/// can exceed the table and [`Modulator::modulate`] rejects it.
#[derive(Debug, Clone, PartialEq)]
pub struct Modulator {
    constellation: QamConstellation,
    /// Phase offset in radians applied to every transmitted point and
    /// removed from every received one.
    pub rotation: f64,
}

impl Modulator {
    pub fn new(order: usize) -> ModemResult<Self> {
        Ok(Self {
            constellation: QamConstellation::new(order)?,
            rotation: 0f64,
        })
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn order(&self) -> usize {
        self.constellation.order()
    }

    pub fn dim(&self) -> usize {
        self.constellation.dim()
    }

    /// Width of the bit stream chunk behind each symbol.
    pub fn symbol_bits(&self) -> usize {
        self.constellation.dim()
    }

    pub fn constellation(&self) -> &QamConstellation {
        &self.constellation
    }

    #[inline]
    fn rotor(&self) -> Complex<f64> {
        Complex::from_polar(1f64, self.rotation)
    }

    /// Map one symbol to its rotated constellation point.
    pub fn iq_mod(&self, symbol: Symbol) -> ModemResult<Complex<f64>> {
        Ok(self.constellation.point(symbol)? * self.rotor())
    }

    /// Undo the rotation and decide which symbol `sample` carries.
    pub fn iq_dem(&self, sample: Complex<f64>) -> ModemResult<Symbol> {
        self.constellation.demap(sample * self.rotor().conj())
    }

    /// Generate IQ samples from a byte sequence.
    ///
    /// Bits that do not fill a final symbol are dropped, so the output only
    /// covers `8 * len / dim` whole symbols.
    pub fn modulate<I: IntoIterator<Item = u8>>(
        &self,
        data: I,
    ) -> ModemResult<Vec<Complex<f64>>> {
        let mut stream = BitStream::new();
        stream.writeall(data.into_iter().map(u64::from), DATA_BITS_LEN);

        let samples = stream
            .readall(self.symbol_bits())?
            .map(|symbol| self.iq_mod(symbol))
            .collect::<ModemResult<Vec<Complex<f64>>>>()?;

        if !stream.is_empty() {
            tracing::debug!(dropped_bits = stream.len(), "partial symbol discarded");
        }
        tracing::trace!(samples = samples.len(), "modulated");
        Ok(samples)
    }

    /// Recover bytes from a sequence of IQ samples.
    ///
    /// Bits that do not fill a final byte are dropped.
    pub fn demodulate<I: IntoIterator<Item = Complex<f64>>>(
        &self,
        samples: I,
    ) -> ModemResult<Vec<u8>> {
        let mut stream = BitStream::new();
        for sample in samples {
            stream.write(self.iq_dem(sample)?, self.symbol_bits());
        }

        // Every chunk is DATA_BITS_LEN wide, so it fits a byte.
        let data: Vec<u8> = stream
            .readall(DATA_BITS_LEN)?
            .map(|byte| byte as u8)
            .collect();

        if !stream.is_empty() {
            tracing::debug!(dropped_bits = stream.len(), "partial byte discarded");
        }
        tracing::trace!(bytes = data.len(), "demodulated");
        Ok(data)
    }
}
