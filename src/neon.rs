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
//! NEON backend for the f32 pipeline. Radix-2 and radix-4 stages process two
//! butterfly columns per iteration on `float32x4_t`; every other stage kind
//! drops back to the scalar kernel, so the backend accepts the same lengths
//! as the scalar pipeline and produces results within rounding of it.
use crate::butterflies::{butterfly4, c_mul_fast};
use crate::err::{FftError, try_vec};
use crate::pipeline::{PipelineTables, StageKernel, run_stage_scalar};
use crate::{FftDirection, FftExecutor};
use num_complex::Complex;
use std::arch::aarch64::*;

#[inline(always)]
unsafe fn mul_complex_f32(lhs: float32x4_t, rhs: float32x4_t) -> float32x4_t {
    unsafe {
        let temp1 = vtrn1q_f32(rhs, rhs);
        let temp2 = vtrn2q_f32(rhs, vnegq_f32(rhs));
        let temp3 = vmulq_f32(temp2, lhs);
        let temp4 = vrev64q_f32(temp3);
        vfmaq_f32(temp4, temp1, lhs)
    }
}

#[inline(always)]
unsafe fn mulh_complex_f32(lhs: float32x2_t, rhs: float32x2_t) -> float32x2_t {
    unsafe {
        let temp1 = vtrn1_f32(rhs, rhs);
        let temp2 = vtrn2_f32(rhs, vneg_f32(rhs));
        let temp3 = vmul_f32(temp2, lhs);
        let temp4 = vrev64_f32(temp3);
        vfma_f32(temp4, temp1, lhs)
    }
}

#[inline(always)]
unsafe fn v_rotate90_f32(values: float32x4_t, sign: float32x4_t) -> float32x4_t {
    unsafe {
        let temp = vrev64q_f32(values);
        vreinterpretq_f32_u32(veorq_u32(
            vreinterpretq_u32_f32(temp),
            vreinterpretq_u32_f32(sign),
        ))
    }
}

pub(crate) struct NeonMixedRadixFft {
    tables: PipelineTables<f32>,
    direction: FftDirection,
    length: usize,
}

impl NeonMixedRadixFft {
    pub(crate) fn new(n: usize, direction: FftDirection) -> Result<NeonMixedRadixFft, FftError> {
        let tables = PipelineTables::build(n, direction)?;
        Ok(NeonMixedRadixFft {
            tables,
            direction,
            length: n,
        })
    }

    #[inline]
    unsafe fn stage_radix2(
        &self,
        len: usize,
        twiddles: &[Complex<f32>],
        src: &[Complex<f32>],
        dst: &mut [Complex<f32>],
    ) {
        unsafe {
            let m = len * 2;
            for (src_b, dst_b) in src.chunks_exact(m).zip(dst.chunks_exact_mut(m)) {
                let mut j = 0usize;
                while j + 2 <= len {
                    let u0 = vld1q_f32(src_b.get_unchecked(j..).as_ptr().cast());
                    let u1 = vld1q_f32(src_b.get_unchecked(j + len..).as_ptr().cast());
                    let tw = vld1q_f32(twiddles.get_unchecked(j..).as_ptr().cast());
                    let t = mul_complex_f32(u1, tw);
                    vst1q_f32(
                        dst_b.get_unchecked_mut(j..).as_mut_ptr().cast(),
                        vaddq_f32(u0, t),
                    );
                    vst1q_f32(
                        dst_b.get_unchecked_mut(j + len..).as_mut_ptr().cast(),
                        vsubq_f32(u0, t),
                    );
                    j += 2;
                }
                for j in j..len {
                    let u0 = vld1_f32(src_b.get_unchecked(j..).as_ptr().cast());
                    let u1 = vld1_f32(src_b.get_unchecked(j + len..).as_ptr().cast());
                    let tw = vld1_f32(twiddles.get_unchecked(j..).as_ptr().cast());
                    let t = mulh_complex_f32(u1, tw);
                    vst1_f32(
                        dst_b.get_unchecked_mut(j..).as_mut_ptr().cast(),
                        vadd_f32(u0, t),
                    );
                    vst1_f32(
                        dst_b.get_unchecked_mut(j + len..).as_mut_ptr().cast(),
                        vsub_f32(u0, t),
                    );
                }
            }
        }
    }

    #[inline]
    unsafe fn stage_radix4(
        &self,
        len: usize,
        twiddles: &[Complex<f32>],
        sign: float32x4_t,
        src: &[Complex<f32>],
        dst: &mut [Complex<f32>],
    ) {
        unsafe {
            let m = len * 4;
            for (src_b, dst_b) in src.chunks_exact(m).zip(dst.chunks_exact_mut(m)) {
                let mut j = 0usize;
                while j + 2 <= len {
                    let a = vld1q_f32(src_b.get_unchecked(j..).as_ptr().cast());
                    let mut b = vld1q_f32(src_b.get_unchecked(j + len..).as_ptr().cast());
                    let mut c = vld1q_f32(src_b.get_unchecked(j + 2 * len..).as_ptr().cast());
                    let mut d = vld1q_f32(src_b.get_unchecked(j + 3 * len..).as_ptr().cast());

                    // Twiddles sit three per column, so the pair loads are split.
                    let w1 = vcombine_f32(
                        vld1_f32(twiddles.get_unchecked(3 * j..).as_ptr().cast()),
                        vld1_f32(twiddles.get_unchecked(3 * j + 3..).as_ptr().cast()),
                    );
                    let w2 = vcombine_f32(
                        vld1_f32(twiddles.get_unchecked(3 * j + 1..).as_ptr().cast()),
                        vld1_f32(twiddles.get_unchecked(3 * j + 4..).as_ptr().cast()),
                    );
                    let w3 = vcombine_f32(
                        vld1_f32(twiddles.get_unchecked(3 * j + 2..).as_ptr().cast()),
                        vld1_f32(twiddles.get_unchecked(3 * j + 5..).as_ptr().cast()),
                    );
                    b = mul_complex_f32(b, w1);
                    c = mul_complex_f32(c, w2);
                    d = mul_complex_f32(d, w3);

                    let t0 = vaddq_f32(a, c);
                    let t1 = vsubq_f32(a, c);
                    let t2 = vaddq_f32(b, d);
                    let t3 = v_rotate90_f32(vsubq_f32(b, d), sign);

                    vst1q_f32(
                        dst_b.get_unchecked_mut(j..).as_mut_ptr().cast(),
                        vaddq_f32(t0, t2),
                    );
                    vst1q_f32(
                        dst_b.get_unchecked_mut(j + len..).as_mut_ptr().cast(),
                        vaddq_f32(t1, t3),
                    );
                    vst1q_f32(
                        dst_b.get_unchecked_mut(j + 2 * len..).as_mut_ptr().cast(),
                        vsubq_f32(t0, t2),
                    );
                    vst1q_f32(
                        dst_b.get_unchecked_mut(j + 3 * len..).as_mut_ptr().cast(),
                        vsubq_f32(t1, t3),
                    );
                    j += 2;
                }
                for j in j..len {
                    let mut v = [
                        src_b[j],
                        src_b[j + len],
                        src_b[j + 2 * len],
                        src_b[j + 3 * len],
                    ];
                    if j != 0 {
                        v[1] = c_mul_fast(v[1], twiddles[3 * j]);
                        v[2] = c_mul_fast(v[2], twiddles[3 * j + 1]);
                        v[3] = c_mul_fast(v[3], twiddles[3 * j + 2]);
                    }
                    butterfly4(&mut v, self.direction);
                    dst_b[j] = v[0];
                    dst_b[j + len] = v[1];
                    dst_b[j + 2 * len] = v[2];
                    dst_b[j + 3 * len] = v[3];
                }
            }
        }
    }

    fn run(
        &self,
        src: &[Complex<f32>],
        dst: &mut [Complex<f32>],
        scratch: &mut [Complex<f32>],
    ) -> Result<(), FftError> {
        let n = self.length;
        let (ping, rest) = scratch.split_at_mut(n);
        let gather = &mut rest[..2 * self.tables.max_radix];

        let stages = self.tables.descriptor.stages();
        let (mut front, mut back): (&mut [Complex<f32>], &mut [Complex<f32>]) =
            if stages % 2 == 0 { (dst, ping) } else { (ping, dst) };

        for (slot, &idx) in front.iter_mut().zip(self.tables.reversal.iter()) {
            *slot = src[idx];
        }

        let rotate_sign = match self.direction {
            FftDirection::Forward => [0.0f32, -0.0, 0.0, -0.0],
            FftDirection::Inverse => [-0.0f32, 0.0, -0.0, 0.0],
        };

        let mut len = 1usize;
        let mut cursor = 0usize;
        for (kernel, radix) in self
            .tables
            .kernels
            .iter()
            .zip(self.tables.descriptor.radices())
        {
            let r = radix.size();
            let count = len * (r - 1);
            let stage_tw = &self.tables.stage_twiddles[cursor..cursor + count];
            match kernel {
                StageKernel::Radix2 => unsafe {
                    self.stage_radix2(len, stage_tw, front, back);
                },
                StageKernel::Radix4 => unsafe {
                    let sign = vld1q_f32(rotate_sign.as_ptr());
                    self.stage_radix4(len, stage_tw, sign, front, back);
                },
                _ => {
                    run_stage_scalar(kernel, len, stage_tw, self.direction, front, back, gather);
                }
            }
            std::mem::swap(&mut front, &mut back);
            cursor += count;
            len *= r;
        }

        if self.direction == FftDirection::Inverse {
            let scale = 1.0f32 / n as f32;
            for value in front.iter_mut() {
                *value = Complex {
                    re: value.re * scale,
                    im: value.im * scale,
                };
            }
        }
        Ok(())
    }
}

impl FftExecutor<f32> for NeonMixedRadixFft {
    fn execute(&self, in_place: &mut [Complex<f32>]) -> Result<(), FftError> {
        let mut scratch = try_vec![Complex::<f32>::default(); self.scratch_length()];
        self.execute_with_scratch(in_place, &mut scratch)
    }

    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<f32>],
        scratch: &mut [Complex<f32>],
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
        self.run(tmp, in_place, rest)
    }

    fn execute_out_of_place(
        &self,
        src: &[Complex<f32>],
        dst: &mut [Complex<f32>],
    ) -> Result<(), FftError> {
        let mut scratch =
            try_vec![Complex::<f32>::default(); self.out_of_place_scratch_length()];
        self.execute_out_of_place_with_scratch(src, dst, &mut scratch)
    }

    fn execute_out_of_place_with_scratch(
        &self,
        src: &[Complex<f32>],
        dst: &mut [Complex<f32>],
        scratch: &mut [Complex<f32>],
    ) -> Result<(), FftError> {
        if src.len() != self.length {
            return Err(FftError::SizeMismatch(self.length, src.len()));
        }
        if dst.len() != self.length {
            return Err(FftError::SizeMismatch(self.length, dst.len()));
        }
        if scratch.len() < self.out_of_place_scratch_length() {
            return Err(FftError::ScratchTooSmall(
                self.out_of_place_scratch_length(),
                scratch.len(),
            ));
        }
        self.run(src, dst, scratch)
    }

    fn direction(&self) -> FftDirection {
        self.direction
    }

    fn length(&self) -> usize {
        self.length
    }

    fn scratch_length(&self) -> usize {
        self.length + self.out_of_place_scratch_length()
    }

    fn out_of_place_scratch_length(&self) -> usize {
        self.length + 2 * self.tables.max_radix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::MixedRadixFft;
    use rand::Rng;

    fn random_signal(n: usize) -> Vec<Complex<f32>> {
        let mut rng = rand::rng();
        (0..n)
            .map(|_| Complex {
                re: rng.random_range(-1f32..1f32),
                im: rng.random_range(-1f32..1f32),
            })
            .collect()
    }

    #[test]
    fn test_neon_matches_scalar_pipeline() {
        for n in [2usize, 4, 8, 12, 16, 20, 24, 48, 64, 100, 256] {
            for direction in [FftDirection::Forward, FftDirection::Inverse] {
                let src = random_signal(n);
                let mut fast = src.clone();
                let mut reference = src.clone();
                let neon = NeonMixedRadixFft::new(n, direction).unwrap();
                let scalar = MixedRadixFft::<f32>::new(n, direction).unwrap();
                neon.execute(&mut fast).unwrap();
                scalar.execute(&mut reference).unwrap();
                for (a, b) in fast.iter().zip(reference.iter()) {
                    assert!(
                        (a.re - b.re).abs() < 1e-5 && (a.im - b.im).abs() < 1e-5,
                        "{a} != {b} for n = {n}, direction = {direction:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_neon_round_trip() {
        let n = 480usize;
        let src = random_signal(n);
        let mut data = src.clone();
        let forward = NeonMixedRadixFft::new(n, FftDirection::Forward).unwrap();
        let inverse = NeonMixedRadixFft::new(n, FftDirection::Inverse).unwrap();
        forward.execute(&mut data).unwrap();
        inverse.execute(&mut data).unwrap();
        for (a, b) in data.iter().zip(src.iter()) {
            assert!((a.re - b.re).abs() < 1e-4 && (a.im - b.im).abs() < 1e-4);
        }
    }
}
