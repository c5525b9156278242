//! This module contains the definition of the [`TargetConfig`] struct that
//! parameterizes the type trait table, as well as utilities for parsing a
//! compact textual description of a target.
//!
//! # Target Descriptions
//!
//! A target description is written in the style of an LLVM data-layout string,
//! as a `-`-separated list of segments:
//!
//! - `a:<arch>` selects the architecture, one of `x86`, `x64`, `arm`, `arm64`,
//!   `loongarch64`, and `riscv64`.
//! - `p<bits>` specifies the width of a pointer in bits.
//! - `v` enables vector types, while `nv` disables them.
//!
//! Anything left unspecified is defaulted from the architecture, so `a:arm64`
//! and `a:arm64-p64-v` describe the same target.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chumsky::{
    prelude::{choice, end, just},
    Parser,
};
use tyreg_errors::registry::{Error, Result};

/// The instruction set architectures for which a type trait table can be
/// built.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Architecture {
    /// 32-bit x86.
    X86,

    /// 64-bit x86.
    #[default]
    X64,

    /// 32-bit ARM.
    Arm,

    /// 64-bit ARM.
    Arm64,

    /// 64-bit LoongArch.
    LoongArch64,

    /// 64-bit RISC-V.
    RiscV64,
}

impl Architecture {
    /// Gets the word size that the architecture always uses.
    #[must_use]
    pub const fn word_size(self) -> WordSize {
        match self {
            Self::X86 | Self::Arm => WordSize::Bits32,
            Self::X64 | Self::Arm64 | Self::LoongArch64 | Self::RiscV64 => WordSize::Bits64,
        }
    }

    /// Returns `true` if the compiler can represent SIMD vector types on this
    /// architecture, and `false` otherwise.
    #[must_use]
    pub const fn supports_vectors(self) -> bool {
        matches!(self, Self::X86 | Self::X64 | Self::Arm64)
    }

    /// Returns `true` if the architecture has 32-byte vector registers, and
    /// `false` otherwise.
    #[must_use]
    pub const fn supports_wide_vectors(self) -> bool {
        matches!(self, Self::X86 | Self::X64)
    }

    /// Parses the architecture segment of a target description.
    ///
    /// Longer names must come before their prefixes, as [`choice`] does not
    /// backtrack into an alternative once it has succeeded.
    fn parser() -> impl parsing::TargetParser<Architecture> {
        just("a:")
            .ignore_then(choice((
                just("x86").to(Architecture::X86),
                just("x64").to(Architecture::X64),
                just("arm64").to(Architecture::Arm64),
                just("arm").to(Architecture::Arm),
                just("loongarch64").to(Architecture::LoongArch64),
                just("riscv64").to(Architecture::RiscV64),
            )))
            .then_ignore(end())
    }
}

impl Display for Architecture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::LoongArch64 => "loongarch64",
            Self::RiscV64 => "riscv64",
        };
        write!(f, "{name}")
    }
}

/// The width of a native integer, and hence of a pointer, on the target.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum WordSize {
    /// 32-bit words.
    Bits32,

    /// 64-bit words.
    Bits64,
}

impl WordSize {
    /// Gets the word size for a width of `bits`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedWordSize`] if no supported target uses words of
    ///   `bits` bits.
    pub fn from_bits(bits: usize) -> Result<Self> {
        match bits {
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            _ => Err(Error::UnsupportedWordSize(bits)),
        }
    }

    /// Gets the width of a word in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Gets the width of a word in bytes.
    #[must_use]
    pub const fn bytes(self) -> u8 {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }
}

/// The facts about the compilation target that determine the contents of a
/// type trait table.
///
/// A configuration can only be obtained through validating constructors, so
/// holding one means that it is inside the supported target matrix.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TargetConfig {
    /// The architecture being targeted.
    architecture: Architecture,

    /// The width of a native integer on the target.
    word_size: WordSize,

    /// Whether SIMD vector types are enabled.
    vectors: bool,
}

impl TargetConfig {
    /// Constructs a target configuration for `architecture` with words of
    /// `word_bits` bits, enabling vector types if `vectors` is set.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedWordSize`] if `word_bits` is neither 32 nor 64.
    /// - [`Error::ContradictoryWordSize`] if the architecture does not use
    ///   words of `word_bits` bits.
    /// - [`Error::VectorsUnsupported`] if `vectors` is set but the
    ///   architecture has no vector support.
    pub fn new(architecture: Architecture, word_bits: usize, vectors: bool) -> Result<Self> {
        let word_size = WordSize::from_bits(word_bits)?;
        if architecture.word_size() != word_size {
            Err(Error::ContradictoryWordSize(
                architecture.to_string(),
                word_bits,
            ))?;
        }
        if vectors && !architecture.supports_vectors() {
            Err(Error::VectorsUnsupported(architecture.to_string()))?;
        }

        Ok(Self {
            architecture,
            word_size,
            vectors,
        })
    }

    /// Constructs the default configuration for `architecture`, which uses
    /// its natural word size and enables vectors wherever they are supported.
    #[must_use]
    pub const fn for_architecture(architecture: Architecture) -> Self {
        Self {
            architecture,
            word_size: architecture.word_size(),
            vectors: architecture.supports_vectors(),
        }
    }

    /// Parses a target configuration from the provided `description`.
    ///
    /// If the architecture is not specified it is taken to be `x86` when the
    /// description asks for 32-bit pointers and `x64` otherwise. Other missing
    /// parts are defaulted as in [`Self::for_architecture`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTargetSpecification`] if any segment of the
    ///   `description` cannot be parsed.
    /// - [`Error::ContradictorySegment`] if a segment gives a different value
    ///   for something an earlier segment already set. Repeating a segment
    ///   verbatim is allowed.
    /// - Any of the errors returned by [`Self::new`] if the description parses
    ///   but does not describe a supported target.
    pub fn parse(description: &str) -> Result<Self> {
        let mut architecture = None;
        let mut word_bits = None;
        let mut vectors = None;

        let mut offset = 0;
        for part in description.split('-') {
            let start = offset;
            offset += part.len() + 1;

            let consistent = if let Ok(arch) = Architecture::parser().parse(part) {
                settle(&mut architecture, arch)
            } else if let Ok(bits) = parsing::pointer_width().parse(part) {
                settle(&mut word_bits, bits)
            } else if let Ok(enabled) = parsing::vectors().parse(part) {
                settle(&mut vectors, enabled)
            } else if part.is_empty() {
                // Trailing and doubled separators are harmless, so we are
                // permissive about them.
                true
            } else {
                return Err(Error::InvalidTargetSpecification(
                    description.to_string(),
                    part.to_string(),
                    start,
                ));
            };

            if !consistent {
                Err(Error::ContradictorySegment(
                    description.to_string(),
                    part.to_string(),
                    start,
                ))?;
            }
        }

        let architecture = architecture.unwrap_or(match word_bits {
            Some(32) => Architecture::X86,
            _ => Architecture::X64,
        });
        let word_bits = word_bits.unwrap_or(architecture.word_size().bits() as usize);
        let vectors = vectors.unwrap_or(architecture.supports_vectors());

        Self::new(architecture, word_bits, vectors)
    }

    /// Gets the architecture being targeted.
    #[must_use]
    pub const fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Gets the width of a native integer on the target.
    #[must_use]
    pub const fn word_size(&self) -> WordSize {
        self.word_size
    }

    /// Returns `true` if vector types are enabled for the target.
    #[must_use]
    pub const fn vectors(&self) -> bool {
        self.vectors
    }

    /// Returns `true` if the 32-byte vector type is available on the target.
    #[must_use]
    pub const fn wide_vectors(&self) -> bool {
        self.vectors && self.architecture.supports_wide_vectors()
    }
}

/// Records `value` in `slot`, returning `false` if the slot already holds a
/// different value.
fn settle<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    match slot {
        Some(existing) => *existing == value,
        None => {
            *slot = Some(value);
            true
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::for_architecture(Architecture::default())
    }
}

/// Prints the fully-specified description, which [`TargetConfig::parse`]
/// accepts.
impl Display for TargetConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let vectors = if self.vectors { "v" } else { "nv" };
        write!(
            f,
            "a:{}-p{}-{vectors}",
            self.architecture,
            self.word_size.bits()
        )
    }
}

impl FromStr for TargetConfig {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for TargetConfig {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for TargetConfig {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Utility parsing functions to aid in the parsing of target descriptions but
/// that are not associated directly with any type.
pub mod parsing {
    use chumsky::{
        error::Simple,
        prelude::{choice, end, just},
        text::int,
        Parser,
    };

    /// Simply to avoid typing out the whole parser type parameter specification
    /// every single time given it only varies in one parameter.
    pub trait TargetParser<T>: Parser<char, T, Error = Simple<char>> {}

    /// A blanket impl to make this work.
    impl<T, U> TargetParser<T> for U where U: Parser<char, T, Error = Simple<char>> {}

    /// Parses a positive integer in the specified `radix`.
    #[must_use]
    pub fn pos_int(radix: u32) -> impl TargetParser<usize> {
        int(radix).try_map(|num: String, span| {
            num.parse::<usize>().map_err(|_| {
                Simple::custom(span, format!("Could not parse {num} as a positive integer"))
            })
        })
    }

    /// Parses the pointer width segment of a target description.
    ///
    /// Any width is accepted here, and it is left to
    /// [`super::TargetConfig::new`] to reject the unsupported ones.
    #[must_use]
    pub fn pointer_width() -> impl TargetParser<usize> {
        just("p").ignore_then(pos_int(10)).then_ignore(end())
    }

    /// Parses the vector support segment of a target description.
    #[must_use]
    pub fn vectors() -> impl TargetParser<bool> {
        choice((just("v").to(true), just("nv").to(false))).then_ignore(end())
    }
}
