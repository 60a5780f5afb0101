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
use std::error::Error;
use std::fmt::Formatter;

/// Status taxonomy of the transform engine.
///
/// Saturation on the fixed-point paths is a defined numeric outcome and is
/// never reported through this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FftError {
    /// The requested length cannot be served by the selected numeric path.
    /// Reported at construction time, never at transform time.
    UnsupportedLength(usize),
    /// A caller-supplied buffer disagrees with the configured length.
    /// First field is the expected element count, second the supplied one.
    SizeMismatch(usize, usize),
    /// A caller-supplied scratch buffer is smaller than the instance requires.
    /// First field is the required element count, second the supplied one.
    ScratchTooSmall(usize, usize),
    OutOfMemory(usize),
    ZeroSizedFft,
}

impl Error for FftError {}

impl std::fmt::Display for FftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FftError::UnsupportedLength(n) => {
                f.write_fmt(format_args!("Length {n} is not supported on this path"))
            }
            FftError::SizeMismatch(expected, got) => f.write_fmt(format_args!(
                "Buffer length expected to be {expected}, but it was {got}"
            )),
            FftError::ScratchTooSmall(required, got) => f.write_fmt(format_args!(
                "Scratch buffer size must be at least {required} but it is {got}"
            )),
            FftError::OutOfMemory(length) => {
                f.write_fmt(format_args!("Cannot allocate {length} bytes to vector"))
            }
            FftError::ZeroSizedFft => f.write_str("Cannot execute FFT on zero-sized buffers"),
        }
    }
}

macro_rules! try_vec {
    () => {
        Vec::new()
    };
    ($elem:expr; $n:expr) => {{
        let mut v = Vec::new();
        v.try_reserve_exact($n)
            .map_err(|_| crate::err::FftError::OutOfMemory($n))?;
        v.resize($n, $elem);
        v
    }};
}

pub(crate) use try_vec;
