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
use crate::err::{FftError, try_vec};

/// Radix of a single butterfly stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Radix2,
    Radix3,
    Radix4,
    Radix5,
    Radix8,
    /// Fallback stage for any remaining prime factor; executed as a direct
    /// size-p DFT butterfly.
    Generic(usize),
}

impl Radix {
    #[inline]
    pub fn size(self) -> usize {
        match self {
            Radix::Radix2 => 2,
            Radix::Radix3 => 3,
            Radix::Radix4 => 4,
            Radix::Radix5 => 5,
            Radix::Radix8 => 8,
            Radix::Generic(p) => p,
        }
    }

    /// Right shift applied per stage in `Scaling::PerStage` mode, sized so a
    /// radix-r accumulation cannot overflow: ceil(log2(r)).
    #[inline]
    pub(crate) fn scale_bits(self) -> u32 {
        (self.size() as u32).next_power_of_two().trailing_zeros()
    }
}

/// Ordered stage decomposition of a transform length.
///
/// `radices[k]` is the radix of stage k in execution order; `strides[k]` is
/// the number of independent blocks remaining after stage k, so strides
/// decrease monotonically and end at 1. The same stride values double as the
/// digit weights of the input reordering permutation.
#[derive(Debug, Clone)]
pub struct FactorDescriptor {
    length: usize,
    radices: Vec<Radix>,
    strides: Vec<usize>,
}

impl FactorDescriptor {
    /// Decomposes `n` into butterfly stages, always reducing by the largest
    /// supported radix that evenly divides the remaining length. Remaining
    /// prime factors become generic stages, so any n >= 1 factorizes.
    pub fn factorize(n: usize) -> Result<FactorDescriptor, FftError> {
        if n == 0 {
            return Err(FftError::ZeroSizedFft);
        }
        let mut radices = try_vec![];
        let mut rem = n;
        while rem > 1 {
            let radix = if rem.is_multiple_of(8) {
                Radix::Radix8
            } else if rem.is_multiple_of(5) {
                Radix::Radix5
            } else if rem.is_multiple_of(4) {
                Radix::Radix4
            } else if rem.is_multiple_of(3) {
                Radix::Radix3
            } else if rem.is_multiple_of(2) {
                Radix::Radix2
            } else {
                Radix::Generic(smallest_prime_factor(rem))
            };
            rem /= radix.size();
            radices.push(radix);
        }

        let mut strides = try_vec![];
        let mut span = 1usize;
        for radix in radices.iter() {
            span *= radix.size();
            strides.push(n / span);
        }

        Ok(FactorDescriptor {
            length: n,
            radices,
            strides,
        })
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn stages(&self) -> usize {
        self.radices.len()
    }

    #[inline]
    pub fn radices(&self) -> &[Radix] {
        &self.radices
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Largest stage radix, sizing the gather buffer of the stage loop.
    pub(crate) fn max_radix(&self) -> usize {
        self.radices.iter().map(|r| r.size()).max().unwrap_or(1)
    }

    /// Total right shift accumulated by a `Scaling::PerStage` pass.
    pub(crate) fn total_scale_bits(&self) -> u32 {
        self.radices.iter().map(|r| r.scale_bits()).sum()
    }
}

fn smallest_prime_factor(n: usize) -> usize {
    debug_assert!(n % 2 != 0 && n % 3 != 0 && n % 5 != 0);
    let mut p = 7usize;
    while p * p <= n {
        if n.is_multiple_of(p) {
            return p;
        }
        p += 2;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_largest_radix() {
        let d = FactorDescriptor::factorize(32).unwrap();
        assert_eq!(d.radices(), &[Radix::Radix8, Radix::Radix4]);
        let d = FactorDescriptor::factorize(16).unwrap();
        assert_eq!(d.radices(), &[Radix::Radix8, Radix::Radix2]);
        let d = FactorDescriptor::factorize(8).unwrap();
        assert_eq!(d.radices(), &[Radix::Radix8]);
        let d = FactorDescriptor::factorize(20).unwrap();
        assert_eq!(d.radices(), &[Radix::Radix5, Radix::Radix4]);
        let d = FactorDescriptor::factorize(6).unwrap();
        assert_eq!(d.radices(), &[Radix::Radix3, Radix::Radix2]);
    }

    #[test]
    fn test_generic_fallback() {
        let d = FactorDescriptor::factorize(14).unwrap();
        assert_eq!(d.radices(), &[Radix::Radix2, Radix::Generic(7)]);
        let d = FactorDescriptor::factorize(11).unwrap();
        assert_eq!(d.radices(), &[Radix::Generic(11)]);
        let d = FactorDescriptor::factorize(49).unwrap();
        assert_eq!(d.radices(), &[Radix::Generic(7), Radix::Generic(7)]);
    }

    #[test]
    fn test_radices_multiply_to_length() {
        for n in 1..=512 {
            let d = FactorDescriptor::factorize(n).unwrap();
            let product: usize = d.radices().iter().map(|r| r.size()).product();
            assert_eq!(product, n, "bad factorization for {n}");
        }
    }

    #[test]
    fn test_strides_decrease_to_one() {
        let d = FactorDescriptor::factorize(240).unwrap();
        let strides = d.strides();
        for w in strides.windows(2) {
            assert!(w[0] > w[1]);
        }
        assert_eq!(*strides.last().unwrap(), 1);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert_eq!(
            FactorDescriptor::factorize(0).unwrap_err(),
            FftError::ZeroSizedFft
        );
    }

    #[test]
    fn test_scale_bits() {
        assert_eq!(Radix::Radix2.scale_bits(), 1);
        assert_eq!(Radix::Radix3.scale_bits(), 2);
        assert_eq!(Radix::Radix4.scale_bits(), 2);
        assert_eq!(Radix::Radix5.scale_bits(), 3);
        assert_eq!(Radix::Radix8.scale_bits(), 3);
        let d = FactorDescriptor::factorize(64).unwrap();
        assert_eq!(d.total_scale_bits(), 6);
    }
}
