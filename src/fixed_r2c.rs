/*
 * // Copyright (c) Radzivon Bartoshyk 6/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
//! Fixed-point real FFT through the same packed half-length split as the
//! floating wrapper. The half-length complex pass runs with per-stage
//! scaling, so the forward output sits at X[k] / N with no overflow risk.
//! The inverse folds the spectrum back, runs the complex pass unscaled
//! (gain N/2) and restores the last factor of two with one left shift.
use crate::err::{FftError, try_vec};
use crate::fixed::{FixedScalar, c_mul_q, c_sat_add};
use crate::fixed_pipeline::FixedMixedRadixFft;
use crate::twiddles::split_rfft_tables;
use crate::{FftDirection, FixedFftExecutor, Scaling};
use num_complex::Complex;

fn quantized_split_tables<Q: FixedScalar>(
    real_length: usize,
    weight: f64,
) -> Result<(Vec<Complex<Q>>, Vec<Complex<Q>>), FftError> {
    let (a, b) = split_rfft_tables::<f64>(real_length)?;
    let table_a = a
        .iter()
        .map(|w| Complex {
            re: Q::from_f64(w.re * weight),
            im: Q::from_f64(w.im * weight),
        })
        .collect();
    let table_b = b
        .iter()
        .map(|w| Complex {
            re: Q::from_f64(w.re * weight),
            im: Q::from_f64(w.im * weight),
        })
        .collect();
    Ok((table_a, table_b))
}

#[inline]
fn conj_q<Q: FixedScalar>(v: Complex<Q>) -> Complex<Q> {
    Complex {
        re: v.re,
        im: v.im.sat_neg(),
    }
}

pub struct FixedRealFftForward<Q> {
    fft: FixedMixedRadixFft<Q>,
    table_a: Vec<Complex<Q>>,
    table_b: Vec<Complex<Q>>,
    real_length: usize,
}

impl<Q: FixedScalar> FixedRealFftForward<Q> {
    pub fn new(real_length: usize) -> Result<FixedRealFftForward<Q>, FftError> {
        if real_length < 2 || !real_length.is_power_of_two() {
            return Err(FftError::UnsupportedLength(real_length));
        }
        // Half-weight tables: the scaled half-length pass leaves Z / (N/2),
        // and the extra half in the combine lands every interior bin at
        // X[k] / N, the same scale the shifted DC and Nyquist terms get.
        let (table_a, table_b) = quantized_split_tables(real_length, 0.5)?;
        Ok(FixedRealFftForward {
            fft: FixedMixedRadixFft::new(
                real_length / 2,
                FftDirection::Forward,
                Scaling::PerStage,
            )?,
            table_a,
            table_b,
            real_length,
        })
    }

    /// Transforms `src` into the `N/2 + 1` non-redundant bins at `X[k] / N`.
    pub fn execute(&self, src: &[Q], dst: &mut [Complex<Q>]) -> Result<(), FftError> {
        let half = self.real_length / 2;
        if src.len() != self.real_length {
            return Err(FftError::SizeMismatch(self.real_length, src.len()));
        }
        if dst.len() != half + 1 {
            return Err(FftError::SizeMismatch(half + 1, dst.len()));
        }
        let mut packed = try_vec![Complex::<Q>::default(); half];
        for (slot, pair) in packed.iter_mut().zip(src.chunks_exact(2)) {
            *slot = Complex {
                re: pair[0],
                im: pair[1],
            };
        }
        self.fft.execute(&mut packed)?;

        // The scaled pass already divided by N/2; one more half lands DC and
        // Nyquist at X / N, matching the half-weight tables on the interior.
        dst[0] = Complex {
            re: packed[0].re.shr(1).sat_add(packed[0].im.shr(1)),
            im: Q::default(),
        };
        dst[half] = Complex {
            re: packed[0].re.shr(1).sat_sub(packed[0].im.shr(1)),
            im: Q::default(),
        };
        for k in 1..half {
            let zk = packed[k];
            let zr = conj_q(packed[half - k]);
            dst[k] = c_sat_add(
                c_mul_q(zk, self.table_a[k]),
                c_mul_q(zr, self.table_b[k]),
            );
        }
        Ok(())
    }

    pub fn real_length(&self) -> usize {
        self.real_length
    }

    pub fn complex_length(&self) -> usize {
        self.real_length / 2 + 1
    }
}

pub struct FixedRealFftInverse<Q> {
    fft: FixedMixedRadixFft<Q>,
    table_a: Vec<Complex<Q>>,
    table_b: Vec<Complex<Q>>,
    real_length: usize,
}

impl<Q: FixedScalar> FixedRealFftInverse<Q> {
    pub fn new(real_length: usize) -> Result<FixedRealFftInverse<Q>, FftError> {
        if real_length < 2 || !real_length.is_power_of_two() {
            return Err(FftError::UnsupportedLength(real_length));
        }
        // Full-weight tables: the decombine takes bins at X[k] / N and must
        // hand the unscaled inverse pass a spectrum at Z / N.
        let (table_a, table_b) = quantized_split_tables(real_length, 1.0)?;
        Ok(FixedRealFftInverse {
            fft: FixedMixedRadixFft::new(real_length / 2, FftDirection::Inverse, Scaling::None)?,
            table_a,
            table_b,
            real_length,
        })
    }

    /// Rebuilds the real signal from `N/2 + 1` bins holding `X[k] / N`.
    pub fn execute(&self, src: &[Complex<Q>], dst: &mut [Q]) -> Result<(), FftError> {
        let half = self.real_length / 2;
        if src.len() != half + 1 {
            return Err(FftError::SizeMismatch(half + 1, src.len()));
        }
        if dst.len() != self.real_length {
            return Err(FftError::SizeMismatch(self.real_length, dst.len()));
        }
        let mut packed = try_vec![Complex::<Q>::default(); half];
        for (k, slot) in packed.iter_mut().enumerate() {
            let gk = src[k];
            let gr = conj_q(src[half - k]);
            *slot = c_sat_add(
                c_mul_q(gk, conj_q(self.table_a[k])),
                c_mul_q(gr, conj_q(self.table_b[k])),
            );
        }
        self.fft.execute(&mut packed)?;
        // Unscaled inverse of a 1/N spectrum leaves x / 2.
        for (pair, value) in dst.chunks_exact_mut(2).zip(packed.iter()) {
            pair[0] = value.re.sat_shl(1);
            pair[1] = value.im.sat_shl(1);
        }
        Ok(())
    }

    pub fn real_length(&self) -> usize {
        self.real_length
    }

    pub fn complex_length(&self) -> usize {
        self.real_length / 2 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::MixedRadixFft;
    use crate::FftExecutor;
    use rand::Rng;

    fn random_fixed_real<Q: FixedScalar>(n: usize, amplitude: f64) -> Vec<Q> {
        let mut rng = rand::rng();
        (0..n)
            .map(|_| Q::from_f64(rng.random_range(-amplitude..amplitude)))
            .collect()
    }

    #[test]
    fn test_q31_forward_matches_float_reference() {
        let n = 64usize;
        let signal: Vec<i32> = random_fixed_real(n, 0.9);
        let rfft = FixedRealFftForward::<i32>::new(n).unwrap();
        let mut spectrum = vec![Complex { re: 0i32, im: 0i32 }; n / 2 + 1];
        rfft.execute(&signal, &mut spectrum).unwrap();

        let mut full: Vec<Complex<f64>> = signal
            .iter()
            .map(|&v| Complex::new(v.to_f64(), 0.0))
            .collect();
        let reference = MixedRadixFft::<f64>::new(n, FftDirection::Forward).unwrap();
        reference.execute(&mut full).unwrap();

        for (k, (a, b)) in spectrum.iter().zip(full.iter()).enumerate() {
            let expected = b / n as f64;
            assert!(
                (a.re.to_f64() - expected.re).abs() < 1e-6
                    && (a.im.to_f64() - expected.im).abs() < 1e-6,
                "bin {k}"
            );
        }
    }

    #[test]
    fn test_q31_real_round_trip() {
        for n in [8usize, 32, 128] {
            let signal: Vec<i32> = random_fixed_real(n, 0.25);
            let rfft = FixedRealFftForward::<i32>::new(n).unwrap();
            let irfft = FixedRealFftInverse::<i32>::new(n).unwrap();
            let mut spectrum = vec![Complex { re: 0i32, im: 0i32 }; n / 2 + 1];
            let mut recovered = vec![0i32; n];
            rfft.execute(&signal, &mut spectrum).unwrap();
            irfft.execute(&spectrum, &mut recovered).unwrap();
            for (a, b) in recovered.iter().zip(signal.iter()) {
                assert!(
                    (a.to_f64() - b.to_f64()).abs() < 1e-4,
                    "{a} != {b} for n = {n}"
                );
            }
        }
    }

    #[test]
    fn test_q15_real_round_trip() {
        let n = 64usize;
        let signal: Vec<i16> = random_fixed_real(n, 0.25);
        let rfft = FixedRealFftForward::<i16>::new(n).unwrap();
        let irfft = FixedRealFftInverse::<i16>::new(n).unwrap();
        let mut spectrum = vec![Complex { re: 0i16, im: 0i16 }; n / 2 + 1];
        let mut recovered = vec![0i16; n];
        rfft.execute(&signal, &mut spectrum).unwrap();
        irfft.execute(&spectrum, &mut recovered).unwrap();
        for (a, b) in recovered.iter().zip(signal.iter()) {
            assert!(
                (a.to_f64() - b.to_f64()).abs() < 0.02,
                "{a} != {b} for n = {n}"
            );
        }
    }

    #[test]
    fn test_q31_dc_bin_is_scaled_mean() {
        let n = 32usize;
        let signal = vec![i32::from_f64(0.5); n];
        let rfft = FixedRealFftForward::<i32>::new(n).unwrap();
        let mut spectrum = vec![Complex { re: 0i32, im: 0i32 }; n / 2 + 1];
        rfft.execute(&signal, &mut spectrum).unwrap();
        // X[0] / N is the mean of the signal.
        assert!((spectrum[0].re.to_f64() - 0.5).abs() < 1e-6);
        assert_eq!(spectrum[0].im, 0);
        for bin in spectrum.iter().skip(1) {
            assert!(bin.re.to_f64().abs() < 1e-6 && bin.im.to_f64().abs() < 1e-6);
        }
    }

    #[test]
    fn test_q31_interior_bin_matches_dc_scale() {
        // x[n] = 0.25 + 0.5 cos(2 pi n / N) puts 0.25 in both X[0] / N and
        // X[1] / N, so DC and the interior share one output scale.
        let n = 64usize;
        let signal: Vec<i32> = (0..n)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                i32::from_f64(0.25 + 0.5 * phase.cos())
            })
            .collect();
        let rfft = FixedRealFftForward::<i32>::new(n).unwrap();
        let mut spectrum = vec![Complex { re: 0i32, im: 0i32 }; n / 2 + 1];
        rfft.execute(&signal, &mut spectrum).unwrap();
        assert!((spectrum[0].re.to_f64() - 0.25).abs() < 1e-6);
        assert!((spectrum[1].re.to_f64() - 0.25).abs() < 1e-6);
        assert!(spectrum[1].im.to_f64().abs() < 1e-6);
        for (k, bin) in spectrum.iter().enumerate().skip(2) {
            assert!(
                bin.re.to_f64().abs() < 1e-6 && bin.im.to_f64().abs() < 1e-6,
                "bin {k}"
            );
        }
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        assert_eq!(
            FixedRealFftForward::<i32>::new(24).err().unwrap(),
            FftError::UnsupportedLength(24)
        );
        assert_eq!(
            FixedRealFftInverse::<i16>::new(0).err().unwrap(),
            FftError::UnsupportedLength(0)
        );
    }
}
