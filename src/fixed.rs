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
//! Saturating fixed-point arithmetic shared by the Q31 and Q15 transform
//! paths. Values are fractions in [-1, 1): Q31 in `i32`, Q15 in `i16`.
//! Products widen into `i64`, sums stay wide until the final narrowing, and
//! every narrowing step rounds to nearest and clamps. Overflow therefore
//! pins at the rail instead of wrapping around.
use crate::FftDirection;
use num_complex::Complex;

pub trait FixedScalar:
    Copy + Default + PartialEq + Eq + Ord + std::fmt::Debug + Send + Sync + 'static
{
    /// Fractional bit count of the format: 31 for Q31, 15 for Q15.
    const FRACT_BITS: u32;
    const MAX: Self;
    const MIN: Self;

    /// Widening multiply; the result carries `2 * FRACT_BITS` fractional bits.
    fn wmul(self, rhs: Self) -> i64;
    /// Narrows a wide accumulator back to the format, rounding to nearest
    /// and saturating.
    fn narrow(acc: i64) -> Self;
    fn sat_add(self, rhs: Self) -> Self;
    fn sat_sub(self, rhs: Self) -> Self;
    fn sat_neg(self) -> Self;
    /// Arithmetic right shift, the per-stage conditioning step of the scaled
    /// pipeline. Truncating, matching the hardware shift.
    fn shr(self, bits: u32) -> Self;
    fn sat_shl(self, bits: u32) -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl FixedScalar for i32 {
    const FRACT_BITS: u32 = 31;
    const MAX: i32 = i32::MAX;
    const MIN: i32 = i32::MIN;

    #[inline(always)]
    fn wmul(self, rhs: i32) -> i64 {
        self as i64 * rhs as i64
    }

    #[inline(always)]
    fn narrow(acc: i64) -> i32 {
        let rounded = (acc + (1i64 << 30)) >> 31;
        rounded.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    #[inline(always)]
    fn sat_add(self, rhs: i32) -> i32 {
        self.saturating_add(rhs)
    }

    #[inline(always)]
    fn sat_sub(self, rhs: i32) -> i32 {
        self.saturating_sub(rhs)
    }

    #[inline(always)]
    fn sat_neg(self) -> i32 {
        self.saturating_neg()
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> i32 {
        self >> bits
    }

    #[inline(always)]
    fn sat_shl(self, bits: u32) -> i32 {
        self.saturating_mul(1i32 << bits)
    }

    #[inline]
    fn from_f64(v: f64) -> i32 {
        let scaled = (v * (1u64 << 31) as f64).round();
        scaled.clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64 / (1u64 << 31) as f64
    }
}

impl FixedScalar for i16 {
    const FRACT_BITS: u32 = 15;
    const MAX: i16 = i16::MAX;
    const MIN: i16 = i16::MIN;

    #[inline(always)]
    fn wmul(self, rhs: i16) -> i64 {
        self as i64 * rhs as i64
    }

    #[inline(always)]
    fn narrow(acc: i64) -> i16 {
        let rounded = (acc + (1i64 << 14)) >> 15;
        rounded.clamp(i16::MIN as i64, i16::MAX as i64) as i16
    }

    #[inline(always)]
    fn sat_add(self, rhs: i16) -> i16 {
        self.saturating_add(rhs)
    }

    #[inline(always)]
    fn sat_sub(self, rhs: i16) -> i16 {
        self.saturating_sub(rhs)
    }

    #[inline(always)]
    fn sat_neg(self) -> i16 {
        self.saturating_neg()
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> i16 {
        self >> bits
    }

    #[inline(always)]
    fn sat_shl(self, bits: u32) -> i16 {
        self.saturating_mul(1i16 << bits)
    }

    #[inline]
    fn from_f64(v: f64) -> i16 {
        let scaled = (v * (1u32 << 15) as f64).round();
        scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i16
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64 / (1u32 << 15) as f64
    }
}

#[inline(always)]
pub(crate) fn c_sat_add<Q: FixedScalar>(a: Complex<Q>, b: Complex<Q>) -> Complex<Q> {
    Complex {
        re: a.re.sat_add(b.re),
        im: a.im.sat_add(b.im),
    }
}

#[inline(always)]
pub(crate) fn c_sat_sub<Q: FixedScalar>(a: Complex<Q>, b: Complex<Q>) -> Complex<Q> {
    Complex {
        re: a.re.sat_sub(b.re),
        im: a.im.sat_sub(b.im),
    }
}

/// Complex product with both cross terms accumulated wide, so only the final
/// narrowing can saturate.
#[inline(always)]
pub(crate) fn c_mul_q<Q: FixedScalar>(a: Complex<Q>, b: Complex<Q>) -> Complex<Q> {
    let re = a.re.wmul(b.re) - a.im.wmul(b.im);
    let im = a.re.wmul(b.im) + a.im.wmul(b.re);
    Complex {
        re: Q::narrow(re),
        im: Q::narrow(im),
    }
}

/// Multiplication by -j (forward) or +j (inverse) without touching the
/// multiplier.
#[inline(always)]
pub(crate) fn rotate_90_q<Q: FixedScalar>(a: Complex<Q>, direction: FftDirection) -> Complex<Q> {
    match direction {
        FftDirection::Forward => Complex {
            re: a.im,
            im: a.re.sat_neg(),
        },
        FftDirection::Inverse => Complex {
            re: a.im.sat_neg(),
            im: a.re,
        },
    }
}

#[inline(always)]
pub(crate) fn c_shr<Q: FixedScalar>(a: Complex<Q>, bits: u32) -> Complex<Q> {
    Complex {
        re: a.re.shr(bits),
        im: a.im.shr(bits),
    }
}
