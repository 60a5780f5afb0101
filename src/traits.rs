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
use num_traits::{AsPrimitive, Float, MulAdd};

/// Sine and cosine of `self * π`.
///
/// Twiddle generation goes through this instead of plain `sin_cos` so that
/// angles landing on quarter turns produce exact 0/±1 components. Butterfly
/// identities on those twiddles then hold bit-exactly.
pub trait FftTrigonometry {
    fn sincos_pi(self) -> (Self, Self)
    where
        Self: Sized;
}

impl FftTrigonometry for f32 {
    #[inline]
    fn sincos_pi(self) -> (f32, f32) {
        // Reduce into (-1, 1] turns of π first, then pin the quarter points.
        let r = self - (self * 0.5).round() * 2.0;
        if r == 0.0 {
            (0.0, 1.0)
        } else if r == 0.5 {
            (1.0, 0.0)
        } else if r == -0.5 {
            (-1.0, 0.0)
        } else if r == 1.0 || r == -1.0 {
            (0.0, -1.0)
        } else {
            (r * std::f32::consts::PI).sin_cos()
        }
    }
}

impl FftTrigonometry for f64 {
    #[inline]
    fn sincos_pi(self) -> (f64, f64) {
        let r = self - (self * 0.5).round() * 2.0;
        if r == 0.0 {
            (0.0, 1.0)
        } else if r == 0.5 {
            (1.0, 0.0)
        } else if r == -0.5 {
            (-1.0, 0.0)
        } else if r == 1.0 || r == -1.0 {
            (0.0, -1.0)
        } else {
            (r * std::f64::consts::PI).sin_cos()
        }
    }
}

/// Umbrella bound for the floating-point kernels.
pub trait FftSample:
    Copy
    + Default
    + Float
    + FftTrigonometry
    + MulAdd<Self, Self, Output = Self>
    + Send
    + Sync
    + 'static
where
    f64: AsPrimitive<Self>,
{
}

impl FftSample for f32 {}
impl FftSample for f64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sincos_pi_quarters() {
        assert_eq!(0f64.sincos_pi(), (0.0, 1.0));
        assert_eq!(0.5f64.sincos_pi(), (1.0, 0.0));
        assert_eq!(1f64.sincos_pi(), (0.0, -1.0));
        assert_eq!((-0.5f64).sincos_pi(), (-1.0, 0.0));
        assert_eq!((-1f64).sincos_pi(), (0.0, -1.0));
        assert_eq!(2f64.sincos_pi(), (0.0, 1.0));
        assert_eq!((-1.5f32).sincos_pi(), (1.0, 0.0));
    }

    #[test]
    fn test_sincos_pi_generic_angle() {
        let (s, c) = 0.25f64.sincos_pi();
        assert!((s - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-15);
        assert!((c - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-15);
    }
}
