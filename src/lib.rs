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
//! Mixed-radix FFT engine with floating-point (f32/f64) and fixed-point
//! (Q31/Q15) paths plus real-input wrappers.
//!
//! Complex transforms of any length run through the radix-8/5/4/3/2 pipeline
//! with a generic stage for leftover primes. Fixed-point transforms are
//! restricted to power-of-two lengths and choose between per-stage scaling
//! (overflow-proof, output at `X[k] / N`) and unscaled saturating
//! accumulation. Real transforms fold N real samples into an N/2 complex
//! pass and split the Hermitian halves afterwards.
//!
//! ```
//! use mixfft::{FftDirection, make_fft_f32};
//! use num_complex::Complex;
//!
//! let fft = make_fft_f32(1024, FftDirection::Forward).unwrap();
//! let mut signal = vec![Complex::<f32>::default(); 1024];
//! signal[1] = Complex::new(1.0, 0.0);
//! fft.execute(&mut signal).unwrap();
//! ```

mod butterflies;
mod err;
mod factor;
mod fixed;
mod fixed_pipeline;
mod fixed_r2c;
#[cfg(all(target_arch = "aarch64", feature = "neon"))]
mod neon;
mod pipeline;
mod r2c;
mod small;
mod traits;
mod twiddles;

use num_complex::Complex;

pub use err::FftError;
pub use factor::{FactorDescriptor, Radix};
pub use fixed::FixedScalar;
pub use fixed_pipeline::FixedMixedRadixFft;
pub use fixed_r2c::{FixedRealFftForward, FixedRealFftInverse};
pub use pipeline::MixedRadixFft;
pub use r2c::{RealFftForward, RealFftInverse};
pub use traits::{FftSample, FftTrigonometry};

/// Transform direction. Forward uses the e^(-2πi/N) kernel; the inverse
/// conjugates it and divides floating outputs by N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FftDirection {
    Forward,
    Inverse,
}

/// Overflow policy of the fixed-point paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scaling {
    /// No conditioning shifts; sums saturate at the rails instead of
    /// wrapping. The caller owns the headroom budget.
    None,
    /// Arithmetic right shift by ceil(log2 r) ahead of every radix-r stage.
    /// Immune to overflow; the forward transform lands at `X[k] / N`.
    PerStage,
}

/// Sample formats the engine operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    F32,
    F64,
    Q31,
    Q15,
}

/// Complex transform over floating samples. Instances are immutable after
/// construction and shareable across threads.
pub trait FftExecutor<T> {
    /// In-place transform; allocates its own scratch.
    fn execute(&self, in_place: &mut [Complex<T>]) -> Result<(), FftError>;
    /// In-place transform against caller-provided scratch of at least
    /// [`FftExecutor::scratch_length`] elements.
    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), FftError>;
    fn execute_out_of_place(
        &self,
        src: &[Complex<T>],
        dst: &mut [Complex<T>],
    ) -> Result<(), FftError>;
    fn execute_out_of_place_with_scratch(
        &self,
        src: &[Complex<T>],
        dst: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), FftError>;
    fn direction(&self) -> FftDirection;
    fn length(&self) -> usize;
    fn scratch_length(&self) -> usize;
    fn out_of_place_scratch_length(&self) -> usize;
}

/// Complex transform over Q31/Q15 samples.
pub trait FixedFftExecutor<Q: FixedScalar> {
    fn execute(&self, in_place: &mut [Complex<Q>]) -> Result<(), FftError>;
    fn execute_with_scratch(
        &self,
        in_place: &mut [Complex<Q>],
        scratch: &mut [Complex<Q>],
    ) -> Result<(), FftError>;
    fn direction(&self) -> FftDirection;
    fn scaling(&self) -> Scaling;
    fn length(&self) -> usize;
    fn scratch_length(&self) -> usize;
}

/// Real-to-complex forward transform: N reals in, N/2 + 1 bins out.
pub trait R2CFftExecutor<T> {
    fn execute(&self, src: &[T], dst: &mut [Complex<T>]) -> Result<(), FftError>;
    fn execute_with_scratch(
        &self,
        src: &[T],
        dst: &mut [Complex<T>],
        scratch: &mut [Complex<T>],
    ) -> Result<(), FftError>;
    fn real_length(&self) -> usize;
    fn complex_length(&self) -> usize;
    fn scratch_length(&self) -> usize;
}

/// Complex-to-real inverse transform: N/2 + 1 bins in, N reals out.
pub trait C2RFftExecutor<T> {
    fn execute(&self, src: &[Complex<T>], dst: &mut [T]) -> Result<(), FftError>;
    fn execute_with_scratch(
        &self,
        src: &[Complex<T>],
        dst: &mut [T],
        scratch: &mut [Complex<T>],
    ) -> Result<(), FftError>;
    fn real_length(&self) -> usize;
    fn complex_length(&self) -> usize;
    fn scratch_length(&self) -> usize;
}

macro_rules! dispatch_small {
    ($n: expr, $direction: expr, $t: ty) => {
        match $n {
            1 => {
                return Ok(Box::new(crate::small::Butterfly1::<$t>::new($direction)));
            }
            2 => {
                return Ok(Box::new(crate::small::SmallButterfly2::<$t>::new($direction)));
            }
            3 => {
                return Ok(Box::new(crate::small::SmallButterfly3::<$t>::new($direction)));
            }
            4 => {
                return Ok(Box::new(crate::small::SmallButterfly4::<$t>::new($direction)));
            }
            _ => {}
        }
    };
}

/// Plans an f32 complex transform of any length.
pub fn make_fft_f32(
    n: usize,
    direction: FftDirection,
) -> Result<Box<dyn FftExecutor<f32> + Send + Sync>, FftError> {
    if n == 0 {
        return Err(FftError::ZeroSizedFft);
    }
    dispatch_small!(n, direction, f32);
    #[cfg(all(target_arch = "aarch64", feature = "neon"))]
    {
        return Ok(Box::new(crate::neon::NeonMixedRadixFft::new(n, direction)?));
    }
    #[cfg(not(all(target_arch = "aarch64", feature = "neon")))]
    {
        Ok(Box::new(MixedRadixFft::<f32>::new(n, direction)?))
    }
}

/// Plans an f64 complex transform of any length.
pub fn make_fft_f64(
    n: usize,
    direction: FftDirection,
) -> Result<Box<dyn FftExecutor<f64> + Send + Sync>, FftError> {
    if n == 0 {
        return Err(FftError::ZeroSizedFft);
    }
    dispatch_small!(n, direction, f64);
    Ok(Box::new(MixedRadixFft::<f64>::new(n, direction)?))
}

pub fn make_forward_fft_f32(
    n: usize,
) -> Result<Box<dyn FftExecutor<f32> + Send + Sync>, FftError> {
    make_fft_f32(n, FftDirection::Forward)
}

pub fn make_inverse_fft_f32(
    n: usize,
) -> Result<Box<dyn FftExecutor<f32> + Send + Sync>, FftError> {
    make_fft_f32(n, FftDirection::Inverse)
}

pub fn make_forward_fft_f64(
    n: usize,
) -> Result<Box<dyn FftExecutor<f64> + Send + Sync>, FftError> {
    make_fft_f64(n, FftDirection::Forward)
}

pub fn make_inverse_fft_f64(
    n: usize,
) -> Result<Box<dyn FftExecutor<f64> + Send + Sync>, FftError> {
    make_fft_f64(n, FftDirection::Inverse)
}

/// Plans a Q31 complex transform; the length must be a power of two.
pub fn make_fft_q31(
    n: usize,
    direction: FftDirection,
    scaling: Scaling,
) -> Result<Box<dyn FixedFftExecutor<i32> + Send + Sync>, FftError> {
    Ok(Box::new(FixedMixedRadixFft::<i32>::new(
        n, direction, scaling,
    )?))
}

/// Plans a Q15 complex transform; the length must be a power of two.
pub fn make_fft_q15(
    n: usize,
    direction: FftDirection,
    scaling: Scaling,
) -> Result<Box<dyn FixedFftExecutor<i16> + Send + Sync>, FftError> {
    Ok(Box::new(FixedMixedRadixFft::<i16>::new(
        n, direction, scaling,
    )?))
}

/// Plans an f32 real-input forward transform of even length.
pub fn make_real_fft_forward_f32(
    n: usize,
) -> Result<Box<dyn R2CFftExecutor<f32> + Send + Sync>, FftError> {
    Ok(Box::new(RealFftForward::<f32>::new(n)?))
}

pub fn make_real_fft_inverse_f32(
    n: usize,
) -> Result<Box<dyn C2RFftExecutor<f32> + Send + Sync>, FftError> {
    Ok(Box::new(RealFftInverse::<f32>::new(n)?))
}

pub fn make_real_fft_forward_f64(
    n: usize,
) -> Result<Box<dyn R2CFftExecutor<f64> + Send + Sync>, FftError> {
    Ok(Box::new(RealFftForward::<f64>::new(n)?))
}

pub fn make_real_fft_inverse_f64(
    n: usize,
) -> Result<Box<dyn C2RFftExecutor<f64> + Send + Sync>, FftError> {
    Ok(Box::new(RealFftInverse::<f64>::new(n)?))
}

pub fn make_real_fft_forward_q31(n: usize) -> Result<FixedRealFftForward<i32>, FftError> {
    FixedRealFftForward::new(n)
}

pub fn make_real_fft_inverse_q31(n: usize) -> Result<FixedRealFftInverse<i32>, FftError> {
    FixedRealFftInverse::new(n)
}

pub fn make_real_fft_forward_q15(n: usize) -> Result<FixedRealFftForward<i16>, FftError> {
    FixedRealFftForward::new(n)
}

pub fn make_real_fft_inverse_q15(n: usize) -> Result<FixedRealFftInverse<i16>, FftError> {
    FixedRealFftInverse::new(n)
}

/// Scratch requirement of a planned complex transform, in bytes, for callers
/// that manage raw arenas rather than typed slices.
pub fn complex_fft_scratch_bytes(format: SampleFormat, n: usize) -> Result<usize, FftError> {
    match format {
        SampleFormat::F32 => {
            let fft = make_fft_f32(n, FftDirection::Forward)?;
            Ok(fft.scratch_length() * std::mem::size_of::<Complex<f32>>())
        }
        SampleFormat::F64 => {
            let fft = make_fft_f64(n, FftDirection::Forward)?;
            Ok(fft.scratch_length() * std::mem::size_of::<Complex<f64>>())
        }
        SampleFormat::Q31 => {
            let fft = FixedMixedRadixFft::<i32>::new(n, FftDirection::Forward, Scaling::PerStage)?;
            Ok(fft.scratch_length() * std::mem::size_of::<Complex<i32>>())
        }
        SampleFormat::Q15 => {
            let fft = FixedMixedRadixFft::<i16>::new(n, FftDirection::Forward, Scaling::PerStage)?;
            Ok(fft.scratch_length() * std::mem::size_of::<Complex<i16>>())
        }
    }
}

/// Scratch requirement of a planned real transform, in bytes. The fixed
/// real paths buffer internally and need no caller scratch.
pub fn real_fft_scratch_bytes(format: SampleFormat, n: usize) -> Result<usize, FftError> {
    match format {
        SampleFormat::F32 => {
            let rfft = make_real_fft_forward_f32(n)?;
            Ok(rfft.scratch_length() * std::mem::size_of::<Complex<f32>>())
        }
        SampleFormat::F64 => {
            let rfft = make_real_fft_forward_f64(n)?;
            Ok(rfft.scratch_length() * std::mem::size_of::<Complex<f64>>())
        }
        SampleFormat::Q31 => {
            make_real_fft_forward_q31(n)?;
            Ok(0)
        }
        SampleFormat::Q15 => {
            make_real_fft_forward_q15(n)?;
            Ok(0)
        }
    }
}
