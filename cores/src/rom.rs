//! iNES ROM image inspection.
//!
//! The harness itself never validates ROMs; cores that want to check the
//! image they were handed use [`RomImage::parse`]. A fingerprint of the
//! whole image is kept so hosts can log which game is running.

use std::hash::{DefaultHasher, Hash, Hasher};

use thiserror::Error;

/// Identity hash of a whole image, for logs. Stable within one build,
/// not a database checksum.
fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"NES\x1A";
const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_BANK: usize = 16 * 1024;
const CHR_BANK: usize = 8 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RomError {
    #[error("image is {0} bytes, shorter than the 16-byte iNES header")]
    TooShort(usize),

    #[error("missing iNES signature")]
    BadMagic,

    #[error("image declares no PRG ROM")]
    NoProgram,

    #[error("image is {actual} bytes but its header declares {expected}")]
    Truncated { expected: usize, actual: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// Fields of an iNES (v1) header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InesHeader {
    /// PRG ROM size in 16 KiB units.
    pub prg_banks: u8,
    /// CHR ROM size in 8 KiB units (0 means CHR RAM).
    pub chr_banks: u8,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub battery: bool,
    pub trainer: bool,
}

impl InesHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, RomError> {
        if bytes.len() < HEADER_LEN {
            return Err(RomError::TooShort(bytes.len()));
        }
        if &bytes[..4] != MAGIC {
            return Err(RomError::BadMagic);
        }
        let flags6 = bytes[6];
        let flags7 = bytes[7];
        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        Ok(Self {
            prg_banks: bytes[4],
            chr_banks: bytes[5],
            mapper: (flags7 & 0xF0) | (flags6 >> 4),
            mirroring,
            battery: flags6 & 0x02 != 0,
            trainer: flags6 & 0x04 != 0,
        })
    }

    pub fn prg_len(&self) -> usize {
        self.prg_banks as usize * PRG_BANK
    }

    pub fn chr_len(&self) -> usize {
        self.chr_banks as usize * CHR_BANK
    }

    /// Bytes the header promises, including itself and any trainer.
    pub fn image_len(&self) -> usize {
        let trainer = if self.trainer { TRAINER_LEN } else { 0 };
        HEADER_LEN + trainer + self.prg_len() + self.chr_len()
    }
}

// ---------------------------------------------------------------------------
// RomImage
// ---------------------------------------------------------------------------

/// A validated iNES image borrowed from the caller's bytes.
#[derive(Debug)]
pub struct RomImage<'a> {
    pub header: InesHeader,
    pub prg: &'a [u8],
    pub chr: &'a [u8],
    pub fingerprint: u64,
}

impl<'a> RomImage<'a> {
    /// Check the header and that the image holds every bank it declares.
    /// Trailing bytes (title blocks, padding) are tolerated.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, RomError> {
        let header = InesHeader::parse(bytes)?;
        if header.prg_banks == 0 {
            return Err(RomError::NoProgram);
        }
        let expected = header.image_len();
        if bytes.len() < expected {
            return Err(RomError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let prg_start = HEADER_LEN + if header.trainer { TRAINER_LEN } else { 0 };
        let chr_start = prg_start + header.prg_len();
        Ok(Self {
            header,
            prg: &bytes[prg_start..chr_start],
            chr: &bytes[chr_start..chr_start + header.chr_len()],
            fingerprint: fingerprint(bytes),
        })
    }
}

/// Assemble a minimal iNES image with the given bank counts, zero-filled.
#[cfg(any(test, feature = "test-support"))]
pub fn build_ines(prg_banks: u8, chr_banks: u8, flags6: u8) -> Vec<u8> {
    let mut rom = Vec::with_capacity(
        HEADER_LEN + prg_banks as usize * PRG_BANK + chr_banks as usize * CHR_BANK,
    );
    rom.extend_from_slice(MAGIC);
    rom.push(prg_banks);
    rom.push(chr_banks);
    rom.push(flags6);
    rom.push(0); // flags7
    rom.extend_from_slice(&[0u8; 8]);
    if flags6 & 0x04 != 0 {
        rom.resize(rom.len() + TRAINER_LEN, 0);
    }
    rom.resize(rom.len() + prg_banks as usize * PRG_BANK, 0);
    rom.resize(rom.len() + chr_banks as usize * CHR_BANK, 0);
    rom
}
