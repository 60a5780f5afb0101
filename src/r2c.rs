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
//! Real-input FFT through the packed half-length trick: a real signal of
//! even length N is folded into N/2 complex samples, transformed once, and
//! the Hermitian halves are split apart with the A/B coefficient tables.
//! Forward output is the N/2 + 1 non-redundant bins; the inverse consumes
//! the same layout and rebuilds the N real samples.
use crate::err::{FftError, try_vec};
use crate::pipeline::MixedRadixFft;
use crate::traits::FftSample;
use crate::twiddles::split_rfft_tables;
use crate::{C2RFftExecutor, FftDirection, FftExecutor, R2CFftExecutor};
use crate::butterflies::c_mul_fast;
use num_complex::Complex;
use num_traits::AsPrimitive;

pub struct RealFftForward<T> {
    fft: MixedRadixFft<T>,
    table_a: Vec<Complex<T>>,
    table_b: Vec<Complex<T>>,
    real_length: usize,
}

impl<T: FftSample> RealFftForward<T>
where
    f64: AsPrimitive<T>,
{
    pub fn new(real_length: usize) -> Result<RealFftForward<T>, FftError> {
        if real_length < 2 || !real_length.is_multiple_of(2) {
            return Err(FftError::UnsupportedLength(real_length));
        }
        let (table_a, table_b) = split_rfft_tables(real_length)?;
        Ok(RealFftForward {
            fft: MixedRadixFft::new(real_length / 2, FftDirection::Forward)?,
            table_a,
            table_b,
            real_length,
        })
    }
}

impl<T: FftSample> R2CFftExecutor<T> for RealFftForward<T>
where
    f64: AsPrimitive<T>,
{
    fn execute(&self, src: &[T], dst: &mut [Complex<T>]) -> Result<(), FftError> {
        let mut scratch = try_vec![Complex::<T>::default(); self.scratch_length()];
        self.execute_with_scratch(src, dst, &mut scratch)
    }

    fn execute_with_scratch(
        &self,
        src: &[T],
        dst: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        let half = self.real_length / 2;
        if src.len() != self.real_length {
            return Err(FftError::SizeMismatch(self.real_length, src.len()));
        }
        if dst.len() != half + 1 {
            return Err(FftError::SizeMismatch(half + 1, dst.len()));
        }
        if scratch.len() < self.scratch_length() {
            return Err(FftError::ScratchTooSmall(
                self.scratch_length(),
                scratch.len(),
            ));
        }
        let (packed, fft_scratch) = scratch.split_at_mut(half);
        for (slot, pair) in packed.iter_mut().zip(src.chunks_exact(2)) {
            *slot = Complex {
                re: pair[0],
                im: pair[1],
            };
        }
        self.fft.execute_with_scratch(packed, fft_scratch)?;

        // DC and Nyquist come straight out of bin zero; both are purely real.
        dst[0] = Complex {
            re: packed[0].re + packed[0].im,
            im: T::zero(),
        };
        dst[half] = Complex {
            re: packed[0].re - packed[0].im,
            im: T::zero(),
        };
        for k in 1..half {
            let zk = packed[k];
            let zr = packed[half - k].conj();
            dst[k] = c_mul_fast(zk, self.table_a[k]) + c_mul_fast(zr, self.table_b[k]);
        }
        Ok(())
    }

    fn real_length(&self) -> usize {
        self.real_length
    }

    fn complex_length(&self) -> usize {
        self.real_length / 2 + 1
    }

    fn scratch_length(&self) -> usize {
        self.real_length / 2 + self.fft.scratch_length()
    }
}

pub struct RealFftInverse<T> {
    fft: MixedRadixFft<T>,
    table_a: Vec<Complex<T>>,
    table_b: Vec<Complex<T>>,
    real_length: usize,
}

impl<T: FftSample> RealFftInverse<T>
where
    f64: AsPrimitive<T>,
{
    pub fn new(real_length: usize) -> Result<RealFftInverse<T>, FftError> {
        if real_length < 2 || !real_length.is_multiple_of(2) {
            return Err(FftError::UnsupportedLength(real_length));
        }
        let (table_a, table_b) = split_rfft_tables(real_length)?;
        Ok(RealFftInverse {
            fft: MixedRadixFft::new(real_length / 2, FftDirection::Inverse)?,
            table_a,
            table_b,
            real_length,
        })
    }
}

impl<T: FftSample> C2RFftExecutor<T> for RealFftInverse<T>
where
    f64: AsPrimitive<T>,
{
    fn execute(&self, src: &[Complex<T>], dst: &mut [T]) -> Result<(), FftError> {
        let mut scratch = try_vec![Complex::<T>::default(); self.scratch_length()];
        self.execute_with_scratch(src, dst, &mut scratch)
    }

    fn execute_with_scratch(
        &self,
        src: &[Complex<T>],
        dst: &mut [T],
        scratch: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        let half = self.real_length / 2;
        if src.len() != half + 1 {
            return Err(FftError::SizeMismatch(half + 1, src.len()));
        }
        if dst.len() != self.real_length {
            return Err(FftError::SizeMismatch(self.real_length, dst.len()));
        }
        if scratch.len() < self.scratch_length() {
            return Err(FftError::ScratchTooSmall(
                self.scratch_length(),
                scratch.len(),
            ));
        }
        let (packed, fft_scratch) = scratch.split_at_mut(half);
        // Fold the split spectrum back into the packed half-length one; the
        // conjugated tables undo the forward recombination.
        for (k, slot) in packed.iter_mut().enumerate() {
            let gk = src[k];
            let gr = src[half - k].conj();
            *slot = c_mul_fast(gk, self.table_a[k].conj())
                + c_mul_fast(gr, self.table_b[k].conj());
        }
        self.fft.execute_with_scratch(packed, fft_scratch)?;
        for (pair, value) in dst.chunks_exact_mut(2).zip(packed.iter()) {
            pair[0] = value.re;
            pair[1] = value.im;
        }
        Ok(())
    }

    fn real_length(&self) -> usize {
        self.real_length
    }

    fn complex_length(&self) -> usize {
        self.real_length / 2 + 1
    }

    fn scratch_length(&self) -> usize {
        self.real_length / 2 + self.fft.scratch_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_real(n: usize) -> Vec<f64> {
        let mut rng = rand::rng();
        (0..n).map(|_| rng.random_range(-1f64..1f64)).collect()
    }

    #[test]
    fn test_forward_matches_full_complex_fft() {
        for n in [2usize, 4, 6, 8, 12, 16, 24, 30, 64, 100] {
            let signal = random_real(n);
            let rfft = RealFftForward::<f64>::new(n).unwrap();
            let mut spectrum = vec![Complex::<f64>::default(); n / 2 + 1];
            rfft.execute(&signal, &mut spectrum).unwrap();

            let mut full: Vec<Complex<f64>> =
                signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
            let reference = MixedRadixFft::<f64>::new(n, FftDirection::Forward).unwrap();
            reference.execute(&mut full).unwrap();

            for (k, (a, b)) in spectrum.iter().zip(full.iter()).enumerate() {
                assert!(
                    (a.re - b.re).abs() < 1e-9 && (a.im - b.im).abs() < 1e-9,
                    "bin {k}: {a} != {b} for n = {n}"
                );
            }
        }
    }

    #[test]
    fn test_dc_and_nyquist_are_real() {
        let n = 32usize;
        let signal = random_real(n);
        let rfft = RealFftForward::<f32>::new(n).unwrap();
        let mut spectrum = vec![Complex::<f32>::default(); n / 2 + 1];
        let signal_f32: Vec<f32> = signal.iter().map(|&v| v as f32).collect();
        rfft.execute(&signal_f32, &mut spectrum).unwrap();
        assert_eq!(spectrum[0].im, 0.0);
        assert_eq!(spectrum[n / 2].im, 0.0);
        let sum: f32 = signal_f32.iter().sum();
        assert!((spectrum[0].re - sum).abs() < 1e-4);
        // Nyquist is the alternating sum.
        let alt: f32 = signal_f32
            .iter()
            .enumerate()
            .map(|(i, &v)| if i % 2 == 0 { v } else { -v })
            .sum();
        assert!((spectrum[n / 2].re - alt).abs() < 1e-4);
    }

    #[test]
    fn test_real_round_trip() {
        for n in [4usize, 6, 16, 30, 64, 128] {
            let signal = random_real(n);
            let rfft = RealFftForward::<f64>::new(n).unwrap();
            let irfft = RealFftInverse::<f64>::new(n).unwrap();
            let mut spectrum = vec![Complex::<f64>::default(); n / 2 + 1];
            let mut recovered = vec![0f64; n];
            rfft.execute(&signal, &mut spectrum).unwrap();
            irfft.execute(&spectrum, &mut recovered).unwrap();
            for (a, b) in recovered.iter().zip(signal.iter()) {
                assert!((a - b).abs() < 1e-9, "{a} != {b} for n = {n}");
            }
        }
    }

    #[test]
    fn test_odd_length_rejected() {
        assert_eq!(
            RealFftForward::<f32>::new(15).err().unwrap(),
            FftError::UnsupportedLength(15)
        );
        assert_eq!(
            RealFftInverse::<f32>::new(1).err().unwrap(),
            FftError::UnsupportedLength(1)
        );
    }

    #[test]
    fn test_output_length_checked() {
        let rfft = RealFftForward::<f32>::new(16).unwrap();
        let signal = vec![0f32; 16];
        let mut spectrum = vec![Complex::<f32>::default(); 8];
        assert_eq!(
            rfft.execute(&signal, &mut spectrum).unwrap_err(),
            FftError::SizeMismatch(9, 8)
        );
    }

    #[test]
    fn test_scratch_reuse_shared_between_directions() {
        let n = 48usize;
        let rfft = RealFftForward::<f32>::new(n).unwrap();
        let irfft = RealFftInverse::<f32>::new(n).unwrap();
        let mut scratch = vec![
            Complex::<f32>::default();
            rfft.scratch_length().max(irfft.scratch_length())
        ];
        let signal: Vec<f32> = (0..n).map(|i| (i as f32 * 0.37).sin()).collect();
        let mut spectrum = vec![Complex::<f32>::default(); n / 2 + 1];
        let mut recovered = vec![0f32; n];
        rfft.execute_with_scratch(&signal, &mut spectrum, &mut scratch)
            .unwrap();
        irfft
            .execute_with_scratch(&spectrum, &mut recovered, &mut scratch)
            .unwrap();
        for (a, b) in recovered.iter().zip(signal.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
    }
}
