//! World snapshots for Lenia simulations.
//!
//! A snapshot stores the current world only; there is no history.
//!
//! # File Format
//!
//! ```text
//! Header (32 bytes):
//!   Magic: "LNWS" (4 bytes)
//!   Version: u16
//!   Flags: u16 (compression in lower 4 bits)
//!   Grid size: u32
//!   Step: u64
//!   Reserved: 12 bytes
//!
//! World data (to end of file):
//!   grid_size * grid_size little-endian f32, row-major
//!   Optionally LZ4 compressed (size-prepended)
//! ```

mod format;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use format::{
    CompressionType, SNAPSHOT_MAGIC, SNAPSHOT_VERSION, SnapshotHeader, compress_lz4,
    decode_world, decompress_lz4, encode_world,
};

use crate::compute::Lenia;

/// Snapshot errors.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid snapshot magic bytes {0:?}")]
    InvalidMagic([u8; 4]),
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u16),
    #[error("Unknown snapshot compression flags: {0:#x}")]
    UnknownCompression(u16),
    #[error("LZ4 snapshots need the `lz4` feature")]
    CompressionUnavailable,
    #[error("Snapshot data is {actual} bytes, expected {expected}")]
    DataSizeMismatch { expected: usize, actual: usize },
    #[error("Snapshot grid size {0} is too large")]
    GridTooLarge(u32),
    #[error("World has {cells} cells, which does not match grid size {grid_size}")]
    WorldSizeMismatch { grid_size: usize, cells: usize },
}

/// The current world of an engine, detached from it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub grid_size: usize,
    pub step: u64,
    /// Row-major cell values.
    pub world: Vec<f32>,
}

impl WorldSnapshot {
    /// Copy the current world out of an engine.
    pub fn capture(engine: &Lenia) -> Self {
        Self {
            grid_size: engine.grid_size(),
            step: engine.step_count(),
            world: engine.world().to_vec(),
        }
    }

    /// Serialize to a writer.
    ///
    /// Fails without writing anything if the world is not `grid_size²` cells.
    pub fn write_to<W: Write>(
        &self,
        w: &mut W,
        compression: CompressionType,
    ) -> Result<(), SnapshotError> {
        let mismatch = || SnapshotError::WorldSizeMismatch {
            grid_size: self.grid_size,
            cells: self.world.len(),
        };
        let grid_size = u32::try_from(self.grid_size).map_err(|_| mismatch())?;
        if self.grid_size.checked_mul(self.grid_size) != Some(self.world.len()) {
            return Err(mismatch());
        }

        let header = SnapshotHeader {
            grid_size,
            step: self.step,
            compression,
        };

        let raw = encode_world(&self.world);
        let data = match compression {
            CompressionType::None => raw,
            CompressionType::Lz4 => compress_lz4(&raw)?,
        };

        header.write_to(w)?;
        w.write_all(&data)?;
        Ok(())
    }

    /// Deserialize from a reader.
    ///
    /// The data section must be exactly as long as the header implies; the
    /// world buffer is only allocated once that has been checked.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, SnapshotError> {
        let header = SnapshotHeader::read_from(r)?;
        let expected = header.data_size()?;

        let raw = match header.compression {
            CompressionType::None => {
                // One byte past the expected size exposes trailing garbage
                let mut data = Vec::new();
                r.by_ref().take(expected as u64 + 1).read_to_end(&mut data)?;
                data
            }
            CompressionType::Lz4 => {
                let mut data = Vec::new();
                r.read_to_end(&mut data)?;
                decompress_lz4(&data, expected)?
            }
        };
        if raw.len() != expected {
            return Err(SnapshotError::DataSizeMismatch {
                expected,
                actual: raw.len(),
            });
        }

        let mut world = vec![0.0f32; header.cell_count()?];
        decode_world(&raw, &mut world)?;

        Ok(Self {
            grid_size: header.grid_size as usize,
            step: header.step,
            world,
        })
    }

    /// Write to a file, creating parent directories.
    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
        compression: CompressionType,
    ) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, compression)?;
        writer.flush()?;
        Ok(())
    }

    /// Read from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }

    /// Largest absolute difference to another world of the same size.
    pub fn max_abs_diff(&self, other: &[f32]) -> Option<f32> {
        (self.world.len() == other.len()).then(|| {
            self.world
                .iter()
                .zip(other.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0f32, f32::max)
        })
    }
}
