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
use crate::FftDirection;
use crate::err::{FftError, try_vec};
use crate::factor::FactorDescriptor;
use crate::traits::FftTrigonometry;
use num_complex::Complex;
use num_integer::Integer;
use num_traits::{AsPrimitive, Float};

pub(crate) fn compute_twiddle<T: Float + FftTrigonometry + 'static>(
    index: usize,
    fft_len: usize,
    direction: FftDirection,
) -> Complex<T>
where
    f64: AsPrimitive<T>,
{
    let angle = (-2. * index as f64 / fft_len as f64).as_();
    let (v_sin, v_cos) = angle.sincos_pi();

    let result = Complex {
        re: v_cos,
        im: v_sin,
    };

    match direction {
        FftDirection::Forward => result,
        FftDirection::Inverse => result.conj(),
    }
}

/// Per-stage twiddle table of the mixed-radix pipeline.
///
/// Layout per stage k (radix r, butterfly span `len`): `len` runs of `r - 1`
/// entries, entry `(j, q)` holding W(len * r)^(j * q) for q = 1..r. The run
/// at j = 0 is all ones and is skipped by the stage loop, but kept in the
/// table so indexing stays a plain `j * (r - 1)`.
pub(crate) fn stage_twiddles<T: Float + FftTrigonometry + Default + 'static>(
    descriptor: &FactorDescriptor,
    direction: FftDirection,
) -> Result<Vec<Complex<T>>, FftError>
where
    f64: AsPrimitive<T>,
{
    let mut count = 0usize;
    let mut len = 1usize;
    for radix in descriptor.radices() {
        count += len * (radix.size() - 1);
        len *= radix.size();
    }

    let mut twiddles = try_vec![Complex::<T>::default(); count];
    let mut cursor = 0usize;
    let mut len = 1usize;
    for radix in descriptor.radices() {
        let r = radix.size();
        let cross_len = len * r;
        for j in 0..len {
            for q in 1..r {
                twiddles[cursor] = compute_twiddle(j * q, cross_len, direction);
                cursor += 1;
            }
        }
        len = cross_len;
    }
    Ok(twiddles)
}

/// Digit-reversal permutation matching the descriptor's stage order: entry p
/// holds the source index feeding butterfly slot p of the first stage.
pub(crate) fn digit_reverse_indices(
    descriptor: &FactorDescriptor,
) -> Result<Vec<usize>, FftError> {
    let n = descriptor.length();
    let mut indices = try_vec![0usize; n];
    for (p, slot) in indices.iter_mut().enumerate() {
        let mut x = p;
        let mut rev = 0usize;
        for (radix, stride) in descriptor.radices().iter().zip(descriptor.strides()) {
            let (q, digit) = x.div_rem(&radix.size());
            rev += digit * stride;
            x = q;
        }
        *slot = rev;
    }
    Ok(indices)
}

/// Split-combine coefficient tables for the real FFT wrapper.
///
/// A[k] = ((1 - sin θ) - i cos θ) / 2 and B[k] = ((1 + sin θ) + i cos θ) / 2
/// with θ = 2πk/N, for k = 0..N/2-1. The forward recombination is
/// X[k] = Z[k]·A[k] + conj(Z[N/2-k])·B[k]; the inverse uses the conjugated
/// tables. The one-half factor of the Hermitian split lives in the tables.
pub(crate) fn split_rfft_tables<T: Float + FftTrigonometry + Default + 'static>(
    real_len: usize,
) -> Result<(Vec<Complex<T>>, Vec<Complex<T>>), FftError>
where
    f64: AsPrimitive<T>,
{
    let half = real_len / 2;
    let mut table_a = try_vec![Complex::<T>::default(); half];
    let mut table_b = try_vec![Complex::<T>::default(); half];
    for k in 0..half {
        let turns: T = (2.0 * k as f64 / real_len as f64).as_();
        let (v_sin, v_cos) = turns.sincos_pi();
        let one_half: T = 0.5f64.as_();
        table_a[k] = Complex {
            re: (T::one() - v_sin) * one_half,
            im: -v_cos * one_half,
        };
        table_b[k] = Complex {
            re: (T::one() + v_sin) * one_half,
            im: v_cos * one_half,
        };
    }
    Ok((table_a, table_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::FactorDescriptor;

    #[test]
    fn test_compute_twiddle_conjugate_pair() {
        let fw: Complex<f64> = compute_twiddle(3, 16, FftDirection::Forward);
        let inv: Complex<f64> = compute_twiddle(3, 16, FftDirection::Inverse);
        assert_eq!(fw.re, inv.re);
        assert_eq!(fw.im, -inv.im);
        let quarter: Complex<f64> = compute_twiddle(4, 16, FftDirection::Forward);
        assert_eq!(quarter, Complex::new(0.0, -1.0));
    }

    #[test]
    fn test_digit_reversal_is_permutation() {
        for n in [1usize, 2, 6, 8, 12, 15, 16, 24, 36, 60, 64, 100, 210, 256] {
            let descriptor = FactorDescriptor::factorize(n).unwrap();
            let mut rev = digit_reverse_indices(&descriptor).unwrap();
            rev.sort_unstable();
            assert!(rev.iter().enumerate().all(|(i, &v)| i == v), "n = {n}");
        }
    }

    #[test]
    fn test_digit_reversal_single_stage_is_identity() {
        // One butterfly stage consumes natural order directly.
        let descriptor = FactorDescriptor::factorize(8).unwrap();
        let rev = digit_reverse_indices(&descriptor).unwrap();
        assert_eq!(rev, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_digit_reversal_mixed_six() {
        // Stages [3, 2]: the radix-3 stage wants the even and odd
        // subsequences laid out as contiguous triples.
        let descriptor = FactorDescriptor::factorize(6).unwrap();
        let rev = digit_reverse_indices(&descriptor).unwrap();
        assert_eq!(rev, vec![0, 2, 4, 1, 3, 5]);
    }

    #[test]
    fn test_stage_twiddles_unit_heads() {
        let descriptor = FactorDescriptor::factorize(48).unwrap();
        let twiddles: Vec<Complex<f64>> =
            stage_twiddles(&descriptor, FftDirection::Forward).unwrap();
        // j = 0 run of the first stage is all exact ones.
        let first = descriptor.radices()[0].size();
        for w in twiddles.iter().take(first - 1) {
            assert_eq!(*w, Complex::new(1.0, 0.0));
        }
        for w in twiddles.iter() {
            assert!((w.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_split_tables_sum_to_one() {
        let (a, b) = split_rfft_tables::<f64>(32).unwrap();
        assert_eq!(a.len(), 16);
        for (x, y) in a.iter().zip(b.iter()) {
            let s = x + y;
            assert!((s.re - 1.0).abs() < 1e-15);
            assert!(s.im.abs() < 1e-15);
        }
        assert_eq!(a[0], Complex::new(0.5, -0.5));
        assert_eq!(b[0], Complex::new(0.5, 0.5));
    }
}
