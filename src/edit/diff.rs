//! Reversible per-voxel change log.
//!
//! A [`DiffLog`] is a flat byte buffer of `(index, old_value, new_value)`
//! entries. Every entry has the same size: an 8-byte little-endian voxel
//! index followed by two `element_size`-byte values. Entries keep insertion
//! order and are never deduplicated, so replay is strictly sequential.
//!
//! Persisted layout (`write_to` / `read_from`):
//!
//! ```text
//! [entry_count: u64 LE][element_size: u32 LE]
//! entry_count x [index: u64 LE][old_value][new_value]
//! ```
//!
//! Values are stored in the byte order of the image they came from.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use bytemuck::Pod;

use crate::core::{Error, Result};
use crate::math::VoxelBounds;
use crate::volume::{Dims, VoxelBuffer, VoxelIndex, VoxelScalar};

const INDEX_SIZE: usize = size_of::<u64>();
const HEADER_SIZE: usize = size_of::<u64>() + size_of::<u32>();
/// Refuse persisted element sizes beyond this (no voxel type is that wide).
const MAX_ELEMENT_SIZE: usize = 64;

/// Read-only view of one entry, borrowed from the log's buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffEntry<'a> {
    pub index: VoxelIndex,
    pub old_value: &'a [u8],
    pub new_value: &'a [u8],
}

/// Append-only record of voxel writes for undo/redo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffLog {
    element_size: usize,
    buffer: Vec<u8>,
}

impl DiffLog {
    /// Create an empty log for `element_size`-byte values, with room for
    /// `reserve_hint` entries.
    pub fn new(element_size: usize, reserve_hint: usize) -> Self {
        assert!(element_size > 0, "diff log element size must be non-zero");
        Self {
            element_size,
            buffer: Vec::with_capacity(reserve_hint * (element_size * 2 + INDEX_SIZE)),
        }
    }

    /// Create an empty log sized for `T` values.
    pub fn for_scalar<T: VoxelScalar>(reserve_hint: usize) -> Self {
        Self::new(size_of::<T>(), reserve_hint)
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Bytes per entry: index plus old and new value.
    pub fn entry_size(&self) -> usize {
        self.element_size * 2 + INDEX_SIZE
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.buffer.len() / self.entry_size()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Raw buffer length in bytes.
    pub fn byte_size(&self) -> usize {
        self.buffer.len()
    }

    /// Reserved buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Append one entry.
    ///
    /// On allocation failure the log is left untouched and every entry
    /// recorded so far stays valid.
    pub fn record(&mut self, index: VoxelIndex, old_value: &[u8], new_value: &[u8]) -> Result<()> {
        debug_assert_eq!(old_value.len(), self.element_size);
        debug_assert_eq!(new_value.len(), self.element_size);

        self.reserve_entry()?;
        self.buffer.extend_from_slice(&(index.get() as u64).to_le_bytes());
        self.buffer.extend_from_slice(old_value);
        self.buffer.extend_from_slice(new_value);
        Ok(())
    }

    /// Typed convenience over [`DiffLog::record`].
    pub fn record_value<T: Pod>(&mut self, index: VoxelIndex, old_value: &T, new_value: &T) -> Result<()> {
        self.record(index, bytemuck::bytes_of(old_value), bytemuck::bytes_of(new_value))
    }

    /// Make room for one more entry, doubling capacity when full.
    fn reserve_entry(&mut self) -> Result<()> {
        let entry_size = self.entry_size();
        if self.buffer.capacity() - self.buffer.len() < entry_size {
            let additional = self.buffer.capacity().max(entry_size);
            self.buffer.try_reserve_exact(additional)?;
        }
        Ok(())
    }

    /// Append all of `other`'s entries after this log's.
    ///
    /// # Panics
    /// If the element sizes differ.
    pub fn concat(&mut self, other: &DiffLog) -> Result<()> {
        assert_eq!(
            self.element_size, other.element_size,
            "cannot concatenate diff logs with different element sizes"
        );
        self.buffer.try_reserve(other.buffer.len())?;
        self.buffer.extend_from_slice(&other.buffer);
        Ok(())
    }

    /// Entry `i`, or `None` past the end. The view stays valid until the
    /// log is next mutated.
    pub fn entry_at(&self, i: usize) -> Option<DiffEntry<'_>> {
        let entry_size = self.entry_size();
        let start = i.checked_mul(entry_size)?;
        let bytes = self.buffer.get(start..start + entry_size)?;
        Some(self.decode(bytes))
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = DiffEntry<'_>> + ExactSizeIterator {
        self.buffer
            .chunks_exact(self.entry_size())
            .map(|bytes| self.decode(bytes))
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> DiffEntry<'a> {
        let (index, values) = bytes.split_at(INDEX_SIZE);
        let (old_value, new_value) = values.split_at(self.element_size);
        let mut raw = [0u8; INDEX_SIZE];
        raw.copy_from_slice(index);
        DiffEntry {
            index: VoxelIndex::new(u64::from_le_bytes(raw) as usize),
            old_value,
            new_value,
        }
    }

    /// Write every `new_value` into `image`, oldest entry first.
    pub fn apply<B: VoxelBuffer + ?Sized>(&self, image: &mut B) {
        debug_assert_eq!(image.element_size(), self.element_size);
        for entry in self.entries() {
            image.set_voxel_bytes(entry.index, entry.new_value);
        }
    }

    /// Write every `old_value` back into `image`, newest entry first, so a
    /// log that touches one voxel several times restores its first value.
    pub fn revert<B: VoxelBuffer + ?Sized>(&self, image: &mut B) {
        debug_assert_eq!(image.element_size(), self.element_size);
        for entry in self.entries().rev() {
            image.set_voxel_bytes(entry.index, entry.old_value);
        }
    }

    /// Voxel bounding box of every entry, `None` for an empty log.
    pub fn touched_bounds(&self, dims: Dims) -> Option<VoxelBounds> {
        let mut entries = self.entries();
        let first = dims.coord_of(entries.next()?.index);
        let mut bounds = VoxelBounds::from_point(first);
        for entry in entries {
            bounds.expand(dims.coord_of(entry.index));
        }
        Some(bounds)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Release reserved but unused capacity.
    pub fn shrink(&mut self) {
        self.buffer.shrink_to_fit();
    }

    /// Serialize the log.
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(&(self.len() as u64).to_le_bytes())?;
        writer.write_all(&(self.element_size as u32).to_le_bytes())?;
        writer.write_all(&self.buffer)?;
        Ok(())
    }

    /// Deserialize a log written by [`DiffLog::write_to`].
    pub fn read_from(reader: &mut impl Read) -> Result<Self> {
        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header).map_err(truncated)?;
        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&header[..8]);
        let mut size_bytes = [0u8; 4];
        size_bytes.copy_from_slice(&header[8..]);
        let entry_count = u64::from_le_bytes(count_bytes);
        let element_size = u32::from_le_bytes(size_bytes) as usize;

        if element_size == 0 || element_size > MAX_ELEMENT_SIZE {
            return Err(Error::DiffFormat(format!("unsupported element size {element_size}")));
        }

        let entry_size = element_size * 2 + INDEX_SIZE;
        let byte_len = usize::try_from(entry_count)
            .ok()
            .and_then(|count| count.checked_mul(entry_size))
            .ok_or_else(|| Error::DiffFormat(format!("entry count {entry_count} too large")))?;

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(byte_len)?;
        buffer.resize(byte_len, 0);
        reader.read_exact(&mut buffer).map_err(truncated)?;

        Ok(Self { element_size, buffer })
    }

    /// Write the log to a file, replacing any existing content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load a log from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

fn truncated(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::DiffFormat("truncated diff log".to_string())
    } else {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Volume;
    use glam::{IVec3, Vec3};

    fn volume_1d(values: &[i16]) -> Volume<i16> {
        Volume::from_vec(Dims::new(values.len(), 1, 1), Vec3::ONE, values.to_vec()).unwrap()
    }

    #[test]
    fn test_record_and_read_back() {
        let mut log = DiffLog::for_scalar::<i16>(0);
        assert_eq!(log.entry_size(), 12);
        log.record_value(VoxelIndex::new(3), &-5i16, &9i16).unwrap();
        log.record_value(VoxelIndex::new(1), &0i16, &2i16).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.byte_size(), 24);
        let entry = log.entry_at(0).unwrap();
        assert_eq!(entry.index, VoxelIndex::new(3));
        assert_eq!(entry.old_value, bytemuck::bytes_of(&-5i16));
        assert_eq!(entry.new_value, bytemuck::bytes_of(&9i16));
        assert_eq!(log.entry_at(1).unwrap().index, VoxelIndex::new(1));
        assert!(log.entry_at(2).is_none());
    }

    #[test]
    fn test_growth_doubles_capacity() {
        let mut log = DiffLog::new(1, 1);
        let entry_size = log.entry_size();
        for i in 0..100 {
            log.record(VoxelIndex::new(i), &[0], &[1]).unwrap();
        }
        assert_eq!(log.len(), 100);
        assert!(log.capacity() >= 100 * entry_size);
        assert!(log.capacity() <= 2 * 128 * entry_size);
        log.shrink();
        assert!(log.capacity() >= log.byte_size());
        assert_eq!(log.len(), 100);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_apply_then_revert_restores_bytes() {
        let original = volume_1d(&[1, 2, 3, 4]);
        let mut image = original.clone();

        let mut log = DiffLog::for_scalar::<i16>(4);
        // Same voxel written twice: revert has to unwind in reverse
        log.record_value(VoxelIndex::new(2), &3i16, &10i16).unwrap();
        log.record_value(VoxelIndex::new(2), &10i16, &20i16).unwrap();
        log.record_value(VoxelIndex::new(0), &1i16, &-1i16).unwrap();

        log.apply(&mut image);
        assert_eq!(image.as_slice(), &[-1, 2, 20, 4]);
        log.revert(&mut image);
        assert_eq!(image.as_bytes(), original.as_bytes());

        // Replaying is idempotent
        log.apply(&mut image);
        log.apply(&mut image);
        assert_eq!(image.as_slice(), &[-1, 2, 20, 4]);
    }

    #[test]
    fn test_concat_equals_sequential_apply() {
        let mut first = DiffLog::for_scalar::<i16>(0);
        first.record_value(VoxelIndex::new(0), &1i16, &5i16).unwrap();
        let mut second = DiffLog::for_scalar::<i16>(0);
        second.record_value(VoxelIndex::new(0), &5i16, &6i16).unwrap();
        second.record_value(VoxelIndex::new(1), &2i16, &7i16).unwrap();

        let mut sequential = volume_1d(&[1, 2]);
        first.apply(&mut sequential);
        second.apply(&mut sequential);

        let mut merged = first.clone();
        merged.concat(&second).unwrap();
        assert_eq!(merged.len(), 3);
        let mut combined = volume_1d(&[1, 2]);
        merged.apply(&mut combined);

        assert_eq!(combined, sequential);
        merged.revert(&mut combined);
        assert_eq!(combined.as_slice(), &[1, 2]);
    }

    #[test]
    #[should_panic(expected = "different element sizes")]
    fn test_concat_size_mismatch_panics() {
        let mut a = DiffLog::new(1, 0);
        let b = DiffLog::new(2, 0);
        let _ = a.concat(&b);
    }

    #[test]
    fn test_touched_bounds() {
        let dims = Dims::new(4, 4, 4);
        let mut log = DiffLog::new(1, 0);
        assert!(log.touched_bounds(dims).is_none());
        for coord in [IVec3::new(1, 2, 0), IVec3::new(3, 0, 2)] {
            log.record(dims.index_of(coord).unwrap(), &[0], &[1]).unwrap();
        }
        let bounds = log.touched_bounds(dims).unwrap();
        assert_eq!(bounds.min, IVec3::new(1, 0, 0));
        assert_eq!(bounds.max, IVec3::new(3, 2, 2));
    }

    #[test]
    fn test_write_read_roundtrip() {
        let mut log = DiffLog::for_scalar::<u16>(0);
        log.record_value(VoxelIndex::new(7), &0u16, &300u16).unwrap();
        log.record_value(VoxelIndex::new(9), &1u16, &2u16).unwrap();

        let mut bytes = Vec::new();
        log.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + log.byte_size());
        assert_eq!(&bytes[..8], &2u64.to_le_bytes());
        assert_eq!(&bytes[8..12], &2u32.to_le_bytes());

        let decoded = DiffLog::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, log);
    }

    #[test]
    fn test_read_rejects_truncated_and_bad_headers() {
        let mut log = DiffLog::new(1, 0);
        log.record(VoxelIndex::new(0), &[0], &[1]).unwrap();
        let mut bytes = Vec::new();
        log.write_to(&mut bytes).unwrap();

        let short = &bytes[..bytes.len() - 1];
        assert!(matches!(DiffLog::read_from(&mut &short[..]), Err(Error::DiffFormat(_))));

        let mut zero_size = bytes.clone();
        zero_size[8..12].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(DiffLog::read_from(&mut zero_size.as_slice()), Err(Error::DiffFormat(_))));

        let mut huge = bytes.clone();
        huge[..8].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(DiffLog::read_from(&mut huge.as_slice()).is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stroke.diff");

        let mut log = DiffLog::for_scalar::<f32>(0);
        log.record_value(VoxelIndex::new(42), &0.0f32, &1.5f32).unwrap();
        log.save(&path).unwrap();

        let loaded = DiffLog::load(&path).unwrap();
        assert_eq!(loaded, log);
        assert!(DiffLog::load(dir.path().join("missing.diff")).is_err());
    }
}
