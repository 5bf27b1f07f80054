//! Binary format definitions for Lenia world snapshots.

use std::io::{self, Read, Write};

use super::SnapshotError;

/// Magic bytes identifying a Lenia world snapshot.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"LNWS";

/// Current format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Compression type for world data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionType {
    /// No compression (raw f32 data).
    #[default]
    None = 0,
    /// LZ4 fast compression (requires the `lz4` feature).
    Lz4 = 1,
}

impl CompressionType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Lz4),
            _ => None,
        }
    }
}

/// File header for a world snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotHeader {
    /// Side length of the square world.
    pub grid_size: u32,
    /// Engine step count when the snapshot was taken.
    pub step: u64,
    /// Compression of the data section.
    pub compression: CompressionType,
}

impl SnapshotHeader {
    /// Size of header in bytes.
    /// Magic(4) + Version(2) + Flags(2) + GridSize(4) + Step(8) + Reserved(12) = 32
    pub const SIZE: usize = 32;

    /// Number of cells in the world.
    ///
    /// Fails when the grid is too large to address on this platform.
    pub fn cell_count(&self) -> Result<usize, SnapshotError> {
        let side = usize::try_from(self.grid_size)
            .map_err(|_| SnapshotError::GridTooLarge(self.grid_size))?;
        side.checked_mul(side).ok_or(SnapshotError::GridTooLarge(self.grid_size))
    }

    /// Size of the uncompressed data section in bytes.
    pub fn data_size(&self) -> Result<usize, SnapshotError> {
        self.cell_count()?
            .checked_mul(4)
            .ok_or(SnapshotError::GridTooLarge(self.grid_size))
    }

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(SNAPSHOT_MAGIC)?;
        w.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
        w.write_all(&(self.compression as u16).to_le_bytes())?;
        w.write_all(&self.grid_size.to_le_bytes())?;
        w.write_all(&self.step.to_le_bytes())?;
        // Reserved bytes
        w.write_all(&[0u8; 12])?;
        Ok(())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, SnapshotError> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(SnapshotError::InvalidMagic(magic));
        }

        let mut buf2 = [0u8; 2];
        let mut buf4 = [0u8; 4];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf2)?;
        let version = u16::from_le_bytes(buf2);
        if version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        r.read_exact(&mut buf2)?;
        let flags = u16::from_le_bytes(buf2);
        let compression = CompressionType::from_u8((flags & 0x0F) as u8)
            .ok_or(SnapshotError::UnknownCompression(flags))?;

        r.read_exact(&mut buf4)?;
        let grid_size = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf8)?;
        let step = u64::from_le_bytes(buf8);

        // Skip reserved bytes
        let mut reserved = [0u8; 12];
        r.read_exact(&mut reserved)?;

        Ok(Self {
            grid_size,
            step,
            compression,
        })
    }
}

/// Encode f32 slice to little-endian bytes.
pub fn encode_world(data: &[f32]) -> Vec<u8> {
    let mut bytes = vec![0u8; data.len() * 4];
    for (chunk, &v) in bytes.chunks_exact_mut(4).zip(data.iter()) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode little-endian bytes to an f32 slice.
pub fn decode_world(bytes: &[u8], output: &mut [f32]) -> Result<(), SnapshotError> {
    if bytes.len() != output.len() * 4 {
        return Err(SnapshotError::DataSizeMismatch {
            expected: output.len() * 4,
            actual: bytes.len(),
        });
    }
    for (v, b) in output.iter_mut().zip(bytes.chunks_exact(4)) {
        *v = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
    }
    Ok(())
}

/// Compress data using LZ4.
#[cfg(feature = "lz4")]
pub fn compress_lz4(data: &[u8]) -> Result<Vec<u8>, SnapshotError> {
    Ok(lz4_flex::compress_prepend_size(data))
}

/// Decompress LZ4 data whose prepended size must equal `expected`.
///
/// The size is checked before anything is allocated.
#[cfg(feature = "lz4")]
pub fn decompress_lz4(data: &[u8], expected: usize) -> Result<Vec<u8>, SnapshotError> {
    let declared = match data {
        [a, b, c, d, ..] => u32::from_le_bytes([*a, *b, *c, *d]) as usize,
        _ => 0,
    };
    if declared != expected {
        return Err(SnapshotError::DataSizeMismatch {
            expected,
            actual: declared,
        });
    }
    lz4_flex::decompress_size_prepended(data)
        .map_err(|e| SnapshotError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(not(feature = "lz4"))]
pub fn compress_lz4(_data: &[u8]) -> Result<Vec<u8>, SnapshotError> {
    Err(SnapshotError::CompressionUnavailable)
}

#[cfg(not(feature = "lz4"))]
pub fn decompress_lz4(_data: &[u8], _expected: usize) -> Result<Vec<u8>, SnapshotError> {
    Err(SnapshotError::CompressionUnavailable)
}
