use std::fmt;

use crate::error::{Result, ScanError};

use super::image::DARK;

/// QR code version (1-40), fixing the symbol size at `17 + 4 * version` modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolVersion(u8);

impl SymbolVersion {
    /// Smallest valid version
    pub const MIN: u8 = 1;
    /// Largest valid version
    pub const MAX: u8 = 40;

    /// Validate a version number. Out-of-range values are rejected, never clamped.
    pub fn new(version: i32) -> Result<Self> {
        if (Self::MIN as i32..=Self::MAX as i32).contains(&version) {
            Ok(Self(version as u8))
        } else {
            Err(ScanError::InvalidVersion(version))
        }
    }

    /// Version for a symbol of `size` modules per side
    pub fn from_size(size: usize) -> Result<Self> {
        if size < 21 || (size - 17) % 4 != 0 {
            return Err(ScanError::InvalidVersion(size as i32));
        }
        Self::new(((size - 17) / 4) as i32)
    }

    /// Version number (1-40)
    pub fn number(self) -> u8 {
        self.0
    }

    /// Side length in modules
    pub fn size(self) -> usize {
        17 + 4 * self.0 as usize
    }

    /// Character count indicator tier: 0 for v1-9, 1 for v10-26, 2 for v27-40
    pub fn count_tier(self) -> usize {
        match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        }
    }

    /// Versions 7 and up carry two encoded version blocks
    pub fn has_version_info(self) -> bool {
        self.0 >= 7
    }
}

impl fmt::Display for SymbolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// Level from the two format-information bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// The two format-information bits for this level
    pub fn format_bits(self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Row index into the per-level block tables (L, M, Q, H)
    pub fn index(self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

/// Data mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (x + y) % 2 == 0
    Pattern0,
    /// y % 2 == 0
    Pattern1,
    /// x % 3 == 0
    Pattern2,
    /// (x + y) % 3 == 0
    Pattern3,
    /// (y / 2 + x / 3) % 2 == 0
    Pattern4,
    /// (x * y) % 2 + (x * y) % 3 == 0
    Pattern5,
    /// ((x * y) % 2 + (x * y) % 3) % 2 == 0
    Pattern6,
    /// ((x + y) % 2 + (x * y) % 3) % 2 == 0
    Pattern7,
}

impl MaskPattern {
    /// Mask pattern from the low three format-information bits
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MaskPattern::Pattern0,
            1 => MaskPattern::Pattern1,
            2 => MaskPattern::Pattern2,
            3 => MaskPattern::Pattern3,
            4 => MaskPattern::Pattern4,
            5 => MaskPattern::Pattern5,
            6 => MaskPattern::Pattern6,
            _ => MaskPattern::Pattern7,
        }
    }

    /// Mask index (0-7)
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Whether the module at column `x`, row `y` is inverted by this mask
    pub fn is_masked(self, x: usize, y: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (x + y) % 2 == 0,
            MaskPattern::Pattern1 => y % 2 == 0,
            MaskPattern::Pattern2 => x % 3 == 0,
            MaskPattern::Pattern3 => (x + y) % 3 == 0,
            // Integer division; no floating point boundary cases.
            MaskPattern::Pattern4 => (y / 2 + x / 3) % 2 == 0,
            MaskPattern::Pattern5 => (x * y) % 2 + (x * y) % 3 == 0,
            MaskPattern::Pattern6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            MaskPattern::Pattern7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
        }
    }
}

/// Decoded format information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Data mask applied to the data area
    pub mask: MaskPattern,
}

impl FormatInfo {
    /// The 5 data bits of the format codeword (before BCH and masking)
    pub fn data_bits(self) -> u8 {
        (self.ec_level.format_bits() << 3) | self.mask.bits()
    }

    /// Inverse of [`FormatInfo::data_bits`]
    pub fn from_data_bits(bits: u8) -> Self {
        Self {
            ec_level: ECLevel::from_format_bits(bits >> 3),
            mask: MaskPattern::from_bits(bits),
        }
    }
}

/// Module grid resampled from the image, one byte per module (0 = dark, 255 = light)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSymbol {
    version: SymbolVersion,
    modules: Vec<u8>,
}

impl ParsedSymbol {
    /// Wrap a row-major module grid of `version.size()`² bytes
    pub fn new(version: SymbolVersion, modules: Vec<u8>) -> Result<Self> {
        let size = version.size();
        if modules.len() != size * size {
            return Err(ScanError::InvalidImage(format!(
                "module grid has {} entries, version {version} needs {}",
                modules.len(),
                size * size
            )));
        }
        Ok(Self { version, modules })
    }

    /// Symbol version
    pub fn version(&self) -> SymbolVersion {
        self.version
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.version.size()
    }

    /// Module value at column `x`, row `y`
    pub fn module(&self, x: usize, y: usize) -> u8 {
        self.modules[y * self.size() + x]
    }

    /// Whether the module at column `x`, row `y` is dark
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.module(x, y) == DARK
    }

    /// Raw row-major module values
    pub fn modules(&self) -> &[u8] {
        &self.modules
    }
}

impl fmt::Display for ParsedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        for y in 0..size {
            for x in 0..size {
                f.write_str(if self.is_dark(x, y) { "██" } else { "  " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
