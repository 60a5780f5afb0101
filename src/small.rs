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
//! Closed-form executors for N in {1, 2, 3, 4}. Stage scheduling overhead
//! dominates at these sizes, so the planner bypasses the pipeline entirely.
//! They share the pipeline's butterfly primitives, so results match the
//! general path element for element.
use crate::butterflies::{butterfly2, butterfly3, butterfly4};
use crate::err::FftError;
use crate::traits::FftSample;
use crate::twiddles::compute_twiddle;
use crate::{FftDirection, FftExecutor};
use num_complex::Complex;
use num_traits::AsPrimitive;

macro_rules! small_executor_boilerplate {
    ($n: expr) => {
        fn execute(&self, in_place: &mut [Complex<T>]) -> Result<(), FftError> {
            self.execute_with_scratch(in_place, &mut [])
        }

        fn execute_out_of_place(
            &self,
            src: &[Complex<T>],
            dst: &mut [Complex<T>],
        ) -> Result<(), FftError> {
            self.execute_out_of_place_with_scratch(src, dst, &mut [])
        }

        fn execute_out_of_place_with_scratch(
            &self,
            src: &[Complex<T>],
            dst: &mut [Complex<T>],
            _: &mut [Complex<T>],
        ) -> Result<(), FftError> {
            if src.len() != $n {
                return Err(FftError::SizeMismatch($n, src.len()));
            }
            if dst.len() != $n {
                return Err(FftError::SizeMismatch($n, dst.len()));
            }
            dst.copy_from_slice(src);
            self.execute_with_scratch(dst, &mut [])
        }

        fn direction(&self) -> FftDirection {
            self.direction
        }

        fn length(&self) -> usize {
            $n
        }

        fn scratch_length(&self) -> usize {
            0
        }

        fn out_of_place_scratch_length(&self) -> usize {
            0
        }
    };
}

pub(crate) struct Butterfly1<T> {
    direction: FftDirection,
    phantom: std::marker::PhantomData<T>,
}

impl<T: FftSample> Butterfly1<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn new(direction: FftDirection) -> Self {
        Butterfly1 {
            direction,
            phantom: std::marker::PhantomData,
        }
    }
}

impl<T: FftSample> FftExecutor<T> for Butterfly1<T>
where
    f64: AsPrimitive<T>,
{
    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<T>],
        _: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if in_place.len() != 1 {
            return Err(FftError::SizeMismatch(1, in_place.len()));
        }
        Ok(())
    }

    small_executor_boilerplate!(1);
}

pub(crate) struct SmallButterfly2<T> {
    direction: FftDirection,
    phantom: std::marker::PhantomData<T>,
}

impl<T: FftSample> SmallButterfly2<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn new(direction: FftDirection) -> Self {
        SmallButterfly2 {
            direction,
            phantom: std::marker::PhantomData,
        }
    }
}

impl<T: FftSample> FftExecutor<T> for SmallButterfly2<T>
where
    f64: AsPrimitive<T>,
{
    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<T>],
        _: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if in_place.len() != 2 {
            return Err(FftError::SizeMismatch(2, in_place.len()));
        }
        let mut v = [in_place[0], in_place[1]];
        butterfly2(&mut v);
        if self.direction == FftDirection::Inverse {
            let scale: T = 0.5f64.as_();
            v[0] = Complex {
                re: v[0].re * scale,
                im: v[0].im * scale,
            };
            v[1] = Complex {
                re: v[1].re * scale,
                im: v[1].im * scale,
            };
        }
        in_place[0] = v[0];
        in_place[1] = v[1];
        Ok(())
    }

    small_executor_boilerplate!(2);
}

pub(crate) struct SmallButterfly3<T> {
    direction: FftDirection,
    twiddle: Complex<T>,
}

impl<T: FftSample> SmallButterfly3<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn new(direction: FftDirection) -> Self {
        SmallButterfly3 {
            direction,
            twiddle: compute_twiddle(1, 3, direction),
        }
    }
}

impl<T: FftSample> FftExecutor<T> for SmallButterfly3<T>
where
    f64: AsPrimitive<T>,
{
    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<T>],
        _: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if in_place.len() != 3 {
            return Err(FftError::SizeMismatch(3, in_place.len()));
        }
        let mut v = [in_place[0], in_place[1], in_place[2]];
        butterfly3(&mut v, self.twiddle);
        if self.direction == FftDirection::Inverse {
            let scale: T = (1.0 / 3.0f64).as_();
            for value in v.iter_mut() {
                *value = Complex {
                    re: value.re * scale,
                    im: value.im * scale,
                };
            }
        }
        in_place.copy_from_slice(&v);
        Ok(())
    }

    small_executor_boilerplate!(3);
}

pub(crate) struct SmallButterfly4<T> {
    direction: FftDirection,
    phantom: std::marker::PhantomData<T>,
}

impl<T: FftSample> SmallButterfly4<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn new(direction: FftDirection) -> Self {
        SmallButterfly4 {
            direction,
            phantom: std::marker::PhantomData,
        }
    }
}

impl<T: FftSample> FftExecutor<T> for SmallButterfly4<T>
where
    f64: AsPrimitive<T>,
{
    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<T>],
        _: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if in_place.len() != 4 {
            return Err(FftError::SizeMismatch(4, in_place.len()));
        }
        let mut v = [in_place[0], in_place[1], in_place[2], in_place[3]];
        butterfly4(&mut v, self.direction);
        if self.direction == FftDirection::Inverse {
            let scale: T = 0.25f64.as_();
            for value in v.iter_mut() {
                *value = Complex {
                    re: value.re * scale,
                    im: value.im * scale,
                };
            }
        }
        in_place.copy_from_slice(&v);
        Ok(())
    }

    small_executor_boilerplate!(4);
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

    fn run_small(
        n: usize,
        direction: FftDirection,
        data: &mut [Complex<f32>],
    ) {
        match n {
            1 => Butterfly1::new(direction).execute(data).unwrap(),
            2 => SmallButterfly2::new(direction).execute(data).unwrap(),
            3 => SmallButterfly3::new(direction).execute(data).unwrap(),
            4 => SmallButterfly4::new(direction).execute(data).unwrap(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_small_sizes_match_pipeline_bitwise() {
        for n in 1usize..=4 {
            for direction in [FftDirection::Forward, FftDirection::Inverse] {
                let src = random_signal(n);
                let mut direct = src.clone();
                run_small(n, direction, &mut direct);

                let mut general = src.clone();
                let pipeline = MixedRadixFft::<f32>::new(n, direction).unwrap();
                pipeline.execute(&mut general).unwrap();

                // Shared butterfly primitives make the two paths identical,
                // not merely close.
                assert_eq!(direct, general, "n = {n}, direction = {direction:?}");
            }
        }
    }

    #[test]
    fn test_small_size_mismatch() {
        let mut data = vec![Complex::<f32>::default(); 3];
        assert_eq!(
            SmallButterfly4::new(FftDirection::Forward)
                .execute(&mut data)
                .unwrap_err(),
            FftError::SizeMismatch(4, 3)
        );
    }
}
