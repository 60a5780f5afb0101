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
use crate::butterflies::{
    butterfly2, butterfly3, butterfly4, butterfly5, butterfly8, butterfly_generic, c_mul_fast,
};
use crate::err::{FftError, try_vec};
use crate::factor::{FactorDescriptor, Radix};
use crate::traits::FftSample;
use crate::twiddles::{compute_twiddle, digit_reverse_indices, stage_twiddles};
use crate::{FftDirection, FftExecutor};
use num_complex::Complex;
use num_traits::AsPrimitive;

/// Stage kernel selector with the per-radix rotation constants baked in for
/// the instance direction.
pub(crate) enum StageKernel<T> {
    Radix2,
    Radix3 {
        tw: Complex<T>,
    },
    Radix4,
    Radix5 {
        tw1: Complex<T>,
        tw2: Complex<T>,
    },
    Radix8 {
        tw1: Complex<T>,
        tw3: Complex<T>,
    },
    Generic {
        roots: Vec<Complex<T>>,
    },
}

/// Read-only tables shared by the scalar pipeline and the SIMD backends:
/// factorization, per-stage twiddles, digit-reversal permutation.
pub(crate) struct PipelineTables<T> {
    pub(crate) descriptor: FactorDescriptor,
    pub(crate) kernels: Vec<StageKernel<T>>,
    pub(crate) stage_twiddles: Vec<Complex<T>>,
    pub(crate) reversal: Vec<usize>,
    pub(crate) max_radix: usize,
}

impl<T: FftSample> PipelineTables<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn build(n: usize, direction: FftDirection) -> Result<PipelineTables<T>, FftError> {
        let descriptor = FactorDescriptor::factorize(n)?;
        let twiddles = stage_twiddles(&descriptor, direction)?;
        let reversal = digit_reverse_indices(&descriptor)?;
        let kernels = descriptor
            .radices()
            .iter()
            .map(|radix| match radix {
                Radix::Radix2 => StageKernel::Radix2,
                Radix::Radix3 => StageKernel::Radix3 {
                    tw: compute_twiddle(1, 3, direction),
                },
                Radix::Radix4 => StageKernel::Radix4,
                Radix::Radix5 => StageKernel::Radix5 {
                    tw1: compute_twiddle(1, 5, direction),
                    tw2: compute_twiddle(2, 5, direction),
                },
                Radix::Radix8 => StageKernel::Radix8 {
                    tw1: compute_twiddle(1, 8, direction),
                    tw3: compute_twiddle(3, 8, direction),
                },
                Radix::Generic(p) => StageKernel::Generic {
                    roots: (0..*p).map(|k| compute_twiddle(k, *p, direction)).collect(),
                },
            })
            .collect();
        let max_radix = descriptor.max_radix();
        Ok(PipelineTables {
            descriptor,
            kernels,
            stage_twiddles: twiddles,
            reversal,
            max_radix,
        })
    }
}

/// One butterfly stage: reads every block of `src`, writes the same window of
/// `dst`. Buffers must not alias; the ping-pong driver guarantees that.
pub(crate) fn run_stage_scalar<T: FftSample>(
    kernel: &StageKernel<T>,
    len: usize,
    twiddles: &[Complex<T>],
    direction: FftDirection,
    src: &[Complex<T>],
    dst: &mut [Complex<T>],
    gather: &mut [Complex<T>],
) where
    f64: AsPrimitive<T>,
{
    match kernel {
        StageKernel::Radix2 => {
            let m = len * 2;
            for (src_b, dst_b) in src.chunks_exact(m).zip(dst.chunks_exact_mut(m)) {
                for j in 0..len {
                    let mut v = [src_b[j], src_b[j + len]];
                    if j != 0 {
                        v[1] = c_mul_fast(v[1], twiddles[j]);
                    }
                    butterfly2(&mut v);
                    dst_b[j] = v[0];
                    dst_b[j + len] = v[1];
                }
            }
        }
        StageKernel::Radix3 { tw } => {
            let m = len * 3;
            for (src_b, dst_b) in src.chunks_exact(m).zip(dst.chunks_exact_mut(m)) {
                for j in 0..len {
                    let mut v = [src_b[j], src_b[j + len], src_b[j + 2 * len]];
                    if j != 0 {
                        v[1] = c_mul_fast(v[1], twiddles[2 * j]);
                        v[2] = c_mul_fast(v[2], twiddles[2 * j + 1]);
                    }
                    butterfly3(&mut v, *tw);
                    dst_b[j] = v[0];
                    dst_b[j + len] = v[1];
                    dst_b[j + 2 * len] = v[2];
                }
            }
        }
        StageKernel::Radix4 => {
            let m = len * 4;
            for (src_b, dst_b) in src.chunks_exact(m).zip(dst.chunks_exact_mut(m)) {
                for j in 0..len {
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
                    butterfly4(&mut v, direction);
                    dst_b[j] = v[0];
                    dst_b[j + len] = v[1];
                    dst_b[j + 2 * len] = v[2];
                    dst_b[j + 3 * len] = v[3];
                }
            }
        }
        StageKernel::Radix5 { tw1, tw2 } => {
            let m = len * 5;
            for (src_b, dst_b) in src.chunks_exact(m).zip(dst.chunks_exact_mut(m)) {
                for j in 0..len {
                    let mut v = [
                        src_b[j],
                        src_b[j + len],
                        src_b[j + 2 * len],
                        src_b[j + 3 * len],
                        src_b[j + 4 * len],
                    ];
                    if j != 0 {
                        for (q, slot) in v.iter_mut().enumerate().skip(1) {
                            *slot = c_mul_fast(*slot, twiddles[4 * j + (q - 1)]);
                        }
                    }
                    butterfly5(&mut v, *tw1, *tw2);
                    for (q, value) in v.iter().enumerate() {
                        dst_b[j + q * len] = *value;
                    }
                }
            }
        }
        StageKernel::Radix8 { tw1, tw3 } => {
            let m = len * 8;
            for (src_b, dst_b) in src.chunks_exact(m).zip(dst.chunks_exact_mut(m)) {
                for j in 0..len {
                    let mut v = [
                        src_b[j],
                        src_b[j + len],
                        src_b[j + 2 * len],
                        src_b[j + 3 * len],
                        src_b[j + 4 * len],
                        src_b[j + 5 * len],
                        src_b[j + 6 * len],
                        src_b[j + 7 * len],
                    ];
                    if j != 0 {
                        for (q, slot) in v.iter_mut().enumerate().skip(1) {
                            *slot = c_mul_fast(*slot, twiddles[7 * j + (q - 1)]);
                        }
                    }
                    butterfly8(&mut v, direction, *tw1, *tw3);
                    for (q, value) in v.iter().enumerate() {
                        dst_b[j + q * len] = *value;
                    }
                }
            }
        }
        StageKernel::Generic { roots } => {
            let p = roots.len();
            let m = len * p;
            let (g_in, g_out) = gather.split_at_mut(p);
            for (src_b, dst_b) in src.chunks_exact(m).zip(dst.chunks_exact_mut(m)) {
                for j in 0..len {
                    g_in[0] = src_b[j];
                    for q in 1..p {
                        let x = src_b[j + q * len];
                        g_in[q] = if j == 0 {
                            x
                        } else {
                            c_mul_fast(x, twiddles[(p - 1) * j + (q - 1)])
                        };
                    }
                    butterfly_generic(g_in, &mut g_out[..p], roots);
                    for (q, value) in g_out[..p].iter().enumerate() {
                        dst_b[j + q * len] = *value;
                    }
                }
            }
        }
    }
}

/// Mixed-radix transform instance: factorization, twiddle and reversal
/// tables plus direction. Read-only after construction, so one instance can
/// serve any number of sequential calls.
pub struct MixedRadixFft<T> {
    tables: PipelineTables<T>,
    direction: FftDirection,
    length: usize,
}

impl<T: FftSample> MixedRadixFft<T>
where
    f64: AsPrimitive<T>,
{
    pub fn new(n: usize, direction: FftDirection) -> Result<MixedRadixFft<T>, FftError> {
        let tables = PipelineTables::build(n, direction)?;
        Ok(MixedRadixFft {
            tables,
            direction,
            length: n,
        })
    }

    fn run(
        &self,
        src: &[Complex<T>],
        dst: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        let n = self.length;
        let (ping, rest) = scratch.split_at_mut(n);
        let gather = &mut rest[..2 * self.tables.max_radix];

        let stages = self.tables.descriptor.stages();
        let (mut front, mut back): (&mut [Complex<T>], &mut [Complex<T>]) =
            if stages % 2 == 0 { (dst, ping) } else { (ping, dst) };

        for (slot, &idx) in front.iter_mut().zip(self.tables.reversal.iter()) {
            *slot = src[idx];
        }

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
            run_stage_scalar(kernel, len, stage_tw, self.direction, front, back, gather);
            std::mem::swap(&mut front, &mut back);
            cursor += count;
            len *= r;
        }

        if self.direction == FftDirection::Inverse {
            let scale: T = (1.0 / n as f64).as_();
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

impl<T: FftSample> FftExecutor<T> for MixedRadixFft<T>
where
    f64: AsPrimitive<T>,
{
    fn execute(&self, in_place: &mut [Complex<T>]) -> Result<(), FftError> {
        let mut scratch = try_vec![Complex::<T>::default(); self.scratch_length()];
        self.execute_with_scratch(in_place, &mut scratch)
    }

    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
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
        src: &[Complex<T>],
        dst: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        let mut scratch =
            try_vec![Complex::<T>::default(); self.out_of_place_scratch_length()];
        self.execute_out_of_place_with_scratch(src, dst, &mut scratch)
    }

    fn execute_out_of_place_with_scratch(
        &self,
        src: &[Complex<T>],
        dst: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
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
