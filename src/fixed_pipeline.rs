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
//! Fixed-point complex pipeline for Q31 and Q15 signals. Same ping-pong
//! stage driver as the floating path, restricted to power-of-two lengths so
//! every stage is radix 8, 4 or 2.
//!
//! `Scaling::PerStage` right-shifts every stage input by ceil(log2 r) before
//! the butterfly, which rules out accumulator overflow and leaves the
//! forward output at X[k] / N. `Scaling::None` skips the shifts and lets
//! every sum saturate instead of wrapping. Running forward with `PerStage`
//! and inverse with `None` recovers the input at full amplitude.
use crate::err::{FftError, try_vec};
use crate::factor::{FactorDescriptor, Radix};
use crate::fixed::{FixedScalar, c_mul_q, c_sat_add, c_sat_sub, c_shr, rotate_90_q};
use crate::twiddles::{compute_twiddle, digit_reverse_indices, stage_twiddles};
use crate::{FftDirection, FixedFftExecutor, Scaling};
use num_complex::Complex;

/// Stage kernel selector resolved at construction. Power-of-two lengths
/// factor into these three radices only, so the stage loop never has to
/// reject a radix mid-transform.
#[derive(Clone, Copy)]
enum FixedStageKernel {
    Radix2,
    Radix4,
    Radix8,
}

impl FixedStageKernel {
    #[inline]
    fn size(self) -> usize {
        match self {
            FixedStageKernel::Radix2 => 2,
            FixedStageKernel::Radix4 => 4,
            FixedStageKernel::Radix8 => 8,
        }
    }

    #[inline]
    fn scale_bits(self) -> u32 {
        match self {
            FixedStageKernel::Radix2 => 1,
            FixedStageKernel::Radix4 => 2,
            FixedStageKernel::Radix8 => 3,
        }
    }
}

#[inline]
fn quantize<Q: FixedScalar>(w: Complex<f64>) -> Complex<Q> {
    Complex {
        re: Q::from_f64(w.re),
        im: Q::from_f64(w.im),
    }
}

#[inline(always)]
fn fixed_butterfly2<Q: FixedScalar>(v: &mut [Complex<Q>; 2]) {
    let u0 = v[0];
    let u1 = v[1];
    v[0] = c_sat_add(u0, u1);
    v[1] = c_sat_sub(u0, u1);
}

#[inline(always)]
fn fixed_butterfly4<Q: FixedScalar>(v: &mut [Complex<Q>; 4], direction: FftDirection) {
    let a = v[0];
    let b = v[1];
    let c = v[2];
    let d = v[3];

    let t0 = c_sat_add(a, c);
    let t1 = c_sat_sub(a, c);
    let t2 = c_sat_add(b, d);
    let t3 = rotate_90_q(c_sat_sub(b, d), direction);

    v[0] = c_sat_add(t0, t2);
    v[1] = c_sat_add(t1, t3);
    v[2] = c_sat_sub(t0, t2);
    v[3] = c_sat_sub(t1, t3);
}

#[inline(always)]
fn fixed_butterfly8<Q: FixedScalar>(
    v: &mut [Complex<Q>; 8],
    direction: FftDirection,
    w1: Complex<Q>,
    w3: Complex<Q>,
) {
    let mut evens = [v[0], v[2], v[4], v[6]];
    let mut odds = [v[1], v[3], v[5], v[7]];

    fixed_butterfly4(&mut evens, direction);
    fixed_butterfly4(&mut odds, direction);

    let o0 = odds[0];
    let o1 = c_mul_q(odds[1], w1);
    let o2 = rotate_90_q(odds[2], direction);
    let o3 = c_mul_q(odds[3], w3);

    v[0] = c_sat_add(evens[0], o0);
    v[4] = c_sat_sub(evens[0], o0);
    v[1] = c_sat_add(evens[1], o1);
    v[5] = c_sat_sub(evens[1], o1);
    v[2] = c_sat_add(evens[2], o2);
    v[6] = c_sat_sub(evens[2], o2);
    v[3] = c_sat_add(evens[3], o3);
    v[7] = c_sat_sub(evens[3], o3);
}

/// Fixed-point mixed-radix transform instance. Tables are quantized once at
/// construction; unity twiddles land on the positive rail (1 - 2^-B), the
/// closest representable value.
pub struct FixedMixedRadixFft<Q> {
    descriptor: FactorDescriptor,
    kernels: Vec<FixedStageKernel>,
    reversal: Vec<usize>,
    twiddles: Vec<Complex<Q>>,
    w8_1: Complex<Q>,
    w8_3: Complex<Q>,
    direction: FftDirection,
    scaling: Scaling,
    length: usize,
}

impl<Q: FixedScalar> FixedMixedRadixFft<Q> {
    pub fn new(
        n: usize,
        direction: FftDirection,
        scaling: Scaling,
    ) -> Result<FixedMixedRadixFft<Q>, FftError> {
        if !n.is_power_of_two() {
            return Err(FftError::UnsupportedLength(n));
        }
        let descriptor = FactorDescriptor::factorize(n)?;
        let kernels = descriptor
            .radices()
            .iter()
            .map(|radix| match radix {
                Radix::Radix2 => Ok(FixedStageKernel::Radix2),
                Radix::Radix4 => Ok(FixedStageKernel::Radix4),
                Radix::Radix8 => Ok(FixedStageKernel::Radix8),
                _ => Err(FftError::UnsupportedLength(n)),
            })
            .collect::<Result<Vec<_>, FftError>>()?;
        let reversal = digit_reverse_indices(&descriptor)?;
        let float_twiddles: Vec<Complex<f64>> = stage_twiddles(&descriptor, direction)?;
        let twiddles = float_twiddles.iter().map(|w| quantize(*w)).collect();
        Ok(FixedMixedRadixFft {
            descriptor,
            kernels,
            reversal,
            twiddles,
            w8_1: quantize(compute_twiddle::<f64>(1, 8, direction)),
            w8_3: quantize(compute_twiddle::<f64>(3, 8, direction)),
            direction,
            scaling,
            length: n,
        })
    }

    /// Total right shift a `Scaling::PerStage` pass applies, log2 N for a
    /// power-of-two length. Zero under `Scaling::None`.
    pub fn scale_bits(&self) -> u32 {
        match self.scaling {
            Scaling::PerStage => self.descriptor.total_scale_bits(),
            Scaling::None => 0,
        }
    }

    fn run(&self, src: &[Complex<Q>], dst: &mut [Complex<Q>], ping: &mut [Complex<Q>]) {
        let stages = self.kernels.len();
        let (mut front, mut back): (&mut [Complex<Q>], &mut [Complex<Q>]) =
            if stages % 2 == 0 { (dst, ping) } else { (ping, dst) };

        for (slot, &idx) in front.iter_mut().zip(self.reversal.iter()) {
            *slot = src[idx];
        }

        let mut len = 1usize;
        let mut cursor = 0usize;
        for kernel in self.kernels.iter() {
            let r = kernel.size();
            let count = len * (r - 1);
            let stage_tw = &self.twiddles[cursor..cursor + count];
            let shift = match self.scaling {
                Scaling::PerStage => kernel.scale_bits(),
                Scaling::None => 0,
            };
            let m = len * r;
            match kernel {
                FixedStageKernel::Radix2 => {
                    for (src_b, dst_b) in
                        front.chunks_exact(m).zip(back.chunks_exact_mut(m))
                    {
                        for j in 0..len {
                            let mut v = [
                                c_shr(src_b[j], shift),
                                c_shr(src_b[j + len], shift),
                            ];
                            if j != 0 {
                                v[1] = c_mul_q(v[1], stage_tw[j]);
                            }
                            fixed_butterfly2(&mut v);
                            dst_b[j] = v[0];
                            dst_b[j + len] = v[1];
                        }
                    }
                }
                FixedStageKernel::Radix4 => {
                    for (src_b, dst_b) in
                        front.chunks_exact(m).zip(back.chunks_exact_mut(m))
                    {
                        for j in 0..len {
                            let mut v = [
                                c_shr(src_b[j], shift),
                                c_shr(src_b[j + len], shift),
                                c_shr(src_b[j + 2 * len], shift),
                                c_shr(src_b[j + 3 * len], shift),
                            ];
                            if j != 0 {
                                for (q, slot) in v.iter_mut().enumerate().skip(1) {
                                    *slot = c_mul_q(*slot, stage_tw[3 * j + (q - 1)]);
                                }
                            }
                            fixed_butterfly4(&mut v, self.direction);
                            for (q, value) in v.iter().enumerate() {
                                dst_b[j + q * len] = *value;
                            }
                        }
                    }
                }
                FixedStageKernel::Radix8 => {
                    for (src_b, dst_b) in
                        front.chunks_exact(m).zip(back.chunks_exact_mut(m))
                    {
                        for j in 0..len {
                            let mut v = [
                                c_shr(src_b[j], shift),
                                c_shr(src_b[j + len], shift),
                                c_shr(src_b[j + 2 * len], shift),
                                c_shr(src_b[j + 3 * len], shift),
                                c_shr(src_b[j + 4 * len], shift),
                                c_shr(src_b[j + 5 * len], shift),
                                c_shr(src_b[j + 6 * len], shift),
                                c_shr(src_b[j + 7 * len], shift),
                            ];
                            if j != 0 {
                                for (q, slot) in v.iter_mut().enumerate().skip(1) {
                                    *slot = c_mul_q(*slot, stage_tw[7 * j + (q - 1)]);
                                }
                            }
                            fixed_butterfly8(&mut v, self.direction, self.w8_1, self.w8_3);
                            for (q, value) in v.iter().enumerate() {
                                dst_b[j + q * len] = *value;
                            }
                        }
                    }
                }
            }
            std::mem::swap(&mut front, &mut back);
            cursor += count;
            len = m;
        }
    }
}

impl<Q: FixedScalar> FixedFftExecutor<Q> for FixedMixedRadixFft<Q> {
    fn execute(&self, in_place: &mut [Complex<Q>]) -> Result<(), FftError> {
        let mut scratch = try_vec![Complex::<Q>::default(); self.scratch_length()];
        self.execute_with_scratch(in_place, &mut scratch)
    }

    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<Q>],
        scratch: &mut [Complex<Q>],
    ) -> Result<(), FftError> {
        if in_place.len() != self.length {
            return Err(FftError::SizeMismatch(self.length, in_place.len()));
        }
        if scratch.len() < self.scratch_length() {
            return Err(FftError::ScratchTooSmall(
                self.scratch_length(),
                scratch.len(),
            ));
        }
        let (tmp, rest) = scratch.split_at_mut(self.length);
        tmp.copy_from_slice(in_place);
        self.run(tmp, in_place, &mut rest[..self.length]);
        Ok(())
    }

    fn direction(&self) -> FftDirection {
        self.direction
    }

    fn scaling(&self) -> Scaling {
        self.scaling
    }

    fn length(&self) -> usize {
        self.length
    }

    fn scratch_length(&self) -> usize {
        2 * self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::MixedRadixFft;
    use crate::FftExecutor;
    use rand::Rng;

    fn random_fixed_signal<Q: FixedScalar>(n: usize, amplitude: f64) -> Vec<Complex<Q>> {
        let mut rng = rand::rng();
        (0..n)
            .map(|_| Complex {
                re: Q::from_f64(rng.random_range(-amplitude..amplitude)),
                im: Q::from_f64(rng.random_range(-amplitude..amplitude)),
            })
            .collect()
    }

    fn to_float<Q: FixedScalar>(data: &[Complex<Q>]) -> Vec<Complex<f64>> {
        data.iter()
            .map(|v| Complex::new(v.re.to_f64(), v.im.to_f64()))
            .collect()
    }

    #[test]
    fn test_q31_round_trip_scaled_then_unscaled() {
        for n in [16usize, 64, 256, 1024] {
            let src: Vec<Complex<i32>> = random_fixed_signal(n, 0.25);
            let mut data = src.clone();
            let forward =
                FixedMixedRadixFft::<i32>::new(n, FftDirection::Forward, Scaling::PerStage)
                    .unwrap();
            let inverse =
                FixedMixedRadixFft::<i32>::new(n, FftDirection::Inverse, Scaling::None).unwrap();
            forward.execute(&mut data).unwrap();
            inverse.execute(&mut data).unwrap();

            for (a, b) in to_float(&data).iter().zip(to_float(&src).iter()) {
                assert!(
                    (a.re - b.re).abs() < 1e-4 && (a.im - b.im).abs() < 1e-4,
                    "{a} != {b} for n = {n}"
                );
            }
        }
    }

    #[test]
    fn test_q15_round_trip_scaled_then_unscaled() {
        for n in [16usize, 64] {
            let src: Vec<Complex<i16>> = random_fixed_signal(n, 0.25);
            let mut data = src.clone();
            let forward =
                FixedMixedRadixFft::<i16>::new(n, FftDirection::Forward, Scaling::PerStage)
                    .unwrap();
            let inverse =
                FixedMixedRadixFft::<i16>::new(n, FftDirection::Inverse, Scaling::None).unwrap();
            forward.execute(&mut data).unwrap();
            inverse.execute(&mut data).unwrap();

            for (a, b) in to_float(&data).iter().zip(to_float(&src).iter()) {
                assert!(
                    (a.re - b.re).abs() < 0.02 && (a.im - b.im).abs() < 0.02,
                    "{a} != {b} for n = {n}"
                );
            }
        }
    }

    #[test]
    fn test_q31_matches_float_reference() {
        let n = 32usize;
        let src: Vec<Complex<i32>> = random_fixed_signal(n, 0.9);
        let forward =
            FixedMixedRadixFft::<i32>::new(n, FftDirection::Forward, Scaling::PerStage).unwrap();
        let mut fixed_out = src.clone();
        forward.execute(&mut fixed_out).unwrap();

        let mut float_out = to_float(&src);
        let reference = MixedRadixFft::<f64>::new(n, FftDirection::Forward).unwrap();
        reference.execute(&mut float_out).unwrap();

        // Scaled fixed forward yields X[k] / N.
        for (a, b) in to_float(&fixed_out).iter().zip(float_out.iter()) {
            let expected = b / n as f64;
            assert!(
                (a.re - expected.re).abs() < 1e-6 && (a.im - expected.im).abs() < 1e-6,
                "{a} != {expected}"
            );
        }
    }

    #[test]
    fn test_q15_matches_float_reference() {
        let n = 32usize;
        let src: Vec<Complex<i16>> = random_fixed_signal(n, 0.9);
        let forward =
            FixedMixedRadixFft::<i16>::new(n, FftDirection::Forward, Scaling::PerStage).unwrap();
        let mut fixed_out = src.clone();
        forward.execute(&mut fixed_out).unwrap();

        let mut float_out = to_float(&src);
        let reference = MixedRadixFft::<f64>::new(n, FftDirection::Forward).unwrap();
        reference.execute(&mut float_out).unwrap();

        for (a, b) in to_float(&fixed_out).iter().zip(float_out.iter()) {
            let expected = b / n as f64;
            assert!(
                (a.re - expected.re).abs() < 1e-3 && (a.im - expected.im).abs() < 1e-3,
                "{a} != {expected}"
            );
        }
    }

    #[test]
    fn test_q31_impulse_is_exact() {
        // Stages for 16 are [8, 2]; the impulse never meets a non-unity
        // twiddle, so the per-stage shifts are the only arithmetic.
        let n = 16usize;
        let mut data = vec![Complex { re: 0i32, im: 0i32 }; n];
        data[0].re = i32::MAX;
        let forward =
            FixedMixedRadixFft::<i32>::new(n, FftDirection::Forward, Scaling::PerStage).unwrap();
        assert_eq!(forward.scale_bits(), 4);
        forward.execute(&mut data).unwrap();
        for (k, bin) in data.iter().enumerate() {
            assert_eq!(bin.re, i32::MAX >> forward.scale_bits(), "bin {k}");
            assert_eq!(bin.im, 0, "bin {k}");
        }
    }

    #[test]
    fn test_unscaled_saturates_instead_of_wrapping() {
        let n = 16usize;
        let mut data = vec![
            Complex {
                re: i32::MAX,
                im: 0i32
            };
            n
        ];
        let forward =
            FixedMixedRadixFft::<i32>::new(n, FftDirection::Forward, Scaling::None).unwrap();
        forward.execute(&mut data).unwrap();
        // The DC sum pins at the positive rail; a wrapping implementation
        // would flip negative.
        assert_eq!(data[0].re, i32::MAX);
        assert!(data.iter().all(|v| v.re > i32::MIN / 2));
    }

    #[test]
    fn test_all_power_of_two_lengths_build_and_run() {
        // Walks every stage-kernel combination the factorization can emit,
        // so kernel selection is proven to settle at construction.
        let mut n = 2usize;
        while n <= 4096 {
            let fft =
                FixedMixedRadixFft::<i32>::new(n, FftDirection::Forward, Scaling::PerStage)
                    .unwrap();
            let mut data = vec![
                Complex {
                    re: i32::from_f64(0.5),
                    im: 0i32
                };
                n
            ];
            fft.execute(&mut data).unwrap();
            assert!(
                (data[0].re.to_f64() - 0.5).abs() < 1e-6,
                "dc bin for n = {n}"
            );
            n *= 2;
        }
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        assert_eq!(
            FixedMixedRadixFft::<i32>::new(12, FftDirection::Forward, Scaling::PerStage)
                .err()
                .unwrap(),
            FftError::UnsupportedLength(12)
        );
        assert_eq!(
            FixedMixedRadixFft::<i16>::new(0, FftDirection::Forward, Scaling::None)
                .err()
                .unwrap(),
            FftError::UnsupportedLength(0)
        );
    }

    #[test]
    fn test_scratch_too_small_reported() {
        let fft =
            FixedMixedRadixFft::<i32>::new(16, FftDirection::Forward, Scaling::PerStage).unwrap();
        let mut data = vec![Complex { re: 0i32, im: 0i32 }; 16];
        let mut scratch = vec![Complex { re: 0i32, im: 0i32 }; 8];
        assert_eq!(
            fft.execute_with_scratch(&mut data, &mut scratch).unwrap_err(),
            FftError::ScratchTooSmall(32, 8)
        );
    }
}
