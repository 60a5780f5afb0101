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
use crate::traits::FftSample;
use num_complex::Complex;
use num_traits::{AsPrimitive, MulAdd};
use std::ops::Neg;

#[inline(always)]
pub(crate) fn fmla<T: Copy + MulAdd<T, T, Output = T>>(a: T, b: T, c: T) -> T {
    a.mul_add(b, c)
}

#[inline(always)]
pub(crate) fn c_mul_fast<T: FftSample>(a: Complex<T>, b: Complex<T>) -> Complex<T>
where
    f64: AsPrimitive<T>,
{
    Complex {
        re: fmla(a.re, b.re, -(a.im * b.im)),
        im: fmla(a.re, b.im, a.im * b.re),
    }
}

/// Multiplication by -j (forward) or j (inverse).
#[inline(always)]
pub(crate) fn rotate_90<T: Copy + Neg<Output = T>>(
    value: Complex<T>,
    direction: FftDirection,
) -> Complex<T> {
    match direction {
        FftDirection::Forward => Complex {
            re: value.im,
            im: -value.re,
        },
        FftDirection::Inverse => Complex {
            re: -value.im,
            im: value.re,
        },
    }
}

#[inline(always)]
pub(crate) fn butterfly2<T: FftSample>(v: &mut [Complex<T>; 2])
where
    f64: AsPrimitive<T>,
{
    let u0 = v[0];
    let u1 = v[1];
    v[0] = u0 + u1;
    v[1] = u0 - u1;
}

/// `twiddle` is W3^1 for the instance direction.
#[inline(always)]
pub(crate) fn butterfly3<T: FftSample>(v: &mut [Complex<T>; 3], twiddle: Complex<T>)
where
    f64: AsPrimitive<T>,
{
    let u0 = v[0];
    let u1 = v[1];
    let u2 = v[2];

    let xp = u1 + u2;
    let xn = u1 - u2;
    let sum = u0 + xp;

    let w_1 = Complex {
        re: fmla(twiddle.re, xp.re, u0.re),
        im: fmla(twiddle.re, xp.im, u0.im),
    };

    v[0] = sum;
    v[1] = Complex {
        re: fmla(-twiddle.im, xn.im, w_1.re),
        im: fmla(twiddle.im, xn.re, w_1.im),
    };
    v[2] = Complex {
        re: fmla(twiddle.im, xn.im, w_1.re),
        im: fmla(-twiddle.im, xn.re, w_1.im),
    };
}

#[inline(always)]
pub(crate) fn butterfly4<T: FftSample>(v: &mut [Complex<T>; 4], direction: FftDirection)
where
    f64: AsPrimitive<T>,
{
    let a = v[0];
    let b = v[1];
    let c = v[2];
    let d = v[3];

    let t0 = a + c;
    let t1 = a - c;
    let t2 = b + d;
    let t3 = rotate_90(b - d, direction);

    v[0] = t0 + t2;
    v[1] = t1 + t3;
    v[2] = t0 - t2;
    v[3] = t1 - t3;
}

/// `twiddle1`/`twiddle2` are W5^1 and W5^2 for the instance direction.
#[inline(always)]
pub(crate) fn butterfly5<T: FftSample>(
    v: &mut [Complex<T>; 5],
    twiddle1: Complex<T>,
    twiddle2: Complex<T>,
) where
    f64: AsPrimitive<T>,
{
    let u0 = v[0];
    let u1 = v[1];
    let u2 = v[2];
    let u3 = v[3];
    let u4 = v[4];

    let x14p = u1 + u4;
    let x14n = u1 - u4;
    let x23p = u2 + u3;
    let x23n = u2 - u3;
    let y0 = u0 + x14p + x23p;

    let b14re_a = fmla(twiddle2.re, x23p.re, fmla(twiddle1.re, x14p.re, u0.re));
    let b14re_b = fmla(twiddle1.im, x14n.im, twiddle2.im * x23n.im);
    let b23re_a = fmla(twiddle1.re, x23p.re, fmla(twiddle2.re, x14p.re, u0.re));
    let b23re_b = fmla(twiddle2.im, x14n.im, -twiddle1.im * x23n.im);

    let b14im_a = fmla(twiddle2.re, x23p.im, fmla(twiddle1.re, x14p.im, u0.im));
    let b14im_b = fmla(twiddle1.im, x14n.re, twiddle2.im * x23n.re);
    let b23im_a = fmla(twiddle1.re, x23p.im, fmla(twiddle2.re, x14p.im, u0.im));
    let b23im_b = fmla(twiddle2.im, x14n.re, -twiddle1.im * x23n.re);

    v[0] = y0;
    v[1] = Complex {
        re: b14re_a - b14re_b,
        im: b14im_a + b14im_b,
    };
    v[2] = Complex {
        re: b23re_a - b23re_b,
        im: b23im_a + b23im_b,
    };
    v[3] = Complex {
        re: b23re_a + b23re_b,
        im: b23im_a - b23im_b,
    };
    v[4] = Complex {
        re: b14re_a + b14re_b,
        im: b14im_a - b14im_b,
    };
}

/// Two interleaved radix-4 halves recombined through the W8 rotations.
/// `twiddle1`/`twiddle3` are W8^1 and W8^3 for the instance direction.
#[inline(always)]
pub(crate) fn butterfly8<T: FftSample>(
    v: &mut [Complex<T>; 8],
    direction: FftDirection,
    twiddle1: Complex<T>,
    twiddle3: Complex<T>,
) where
    f64: AsPrimitive<T>,
{
    let mut evens = [v[0], v[2], v[4], v[6]];
    let mut odds = [v[1], v[3], v[5], v[7]];

    butterfly4(&mut evens, direction);
    butterfly4(&mut odds, direction);

    let o0 = odds[0];
    let o1 = c_mul_fast(odds[1], twiddle1);
    let o2 = rotate_90(odds[2], direction);
    let o3 = c_mul_fast(odds[3], twiddle3);

    v[0] = evens[0] + o0;
    v[4] = evens[0] - o0;
    v[1] = evens[1] + o1;
    v[5] = evens[1] - o1;
    v[2] = evens[2] + o2;
    v[6] = evens[2] - o2;
    v[3] = evens[3] + o3;
    v[7] = evens[3] - o3;
}

/// Direct size-p DFT for a generic prime stage. `roots` holds Wp^k for
/// k = 0..p-1 in the instance direction; `scratch` carries the gathered
/// inputs and `out` receives all p results.
#[inline]
pub(crate) fn butterfly_generic<T: FftSample>(
    scratch: &[Complex<T>],
    out: &mut [Complex<T>],
    roots: &[Complex<T>],
) where
    f64: AsPrimitive<T>,
{
    let p = scratch.len();
    for (m, dst) in out.iter_mut().enumerate() {
        let mut sum = scratch[0];
        let mut idx = 0usize;
        for src in scratch.iter().skip(1) {
            idx += m;
            if idx >= p {
                idx -= p;
            }
            let w = unsafe { *roots.get_unchecked(idx) };
            sum = Complex {
                re: fmla(src.re, w.re, fmla(-src.im, w.im, sum.re)),
                im: fmla(src.re, w.im, fmla(src.im, w.re, sum.im)),
            };
        }
        *dst = sum;
    }
}
