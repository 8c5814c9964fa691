//! Shared volume handle with scoped exclusive access.
//!
//! The editing operations take `&mut Volume<T>`. When several owners (an
//! editor view, a background saver) hold the same image, they share a
//! [`SharedVolume`] and reach the voxels only through the [`VolumeGuard`]
//! returned by [`SharedVolume::lock`], so every read-modify-write pass runs
//! under the lock for as long as the guard lives.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::{Error, Result};
use super::buffer::Volume;
use super::scalar::VoxelScalar;

/// Reference-counted, lockable volume.
#[derive(Debug)]
pub struct SharedVolume<T: VoxelScalar> {
    inner: Arc<Mutex<Volume<T>>>,
}

impl<T: VoxelScalar> Clone for SharedVolume<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: VoxelScalar> SharedVolume<T> {
    pub fn new(volume: Volume<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(volume)),
        }
    }

    /// Block until exclusive access is granted.
    pub fn lock(&self) -> Result<VolumeGuard<'_, T>> {
        let guard = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        Ok(VolumeGuard { guard })
    }

    /// Take exclusive access without blocking, `None` when someone else holds it.
    pub fn try_lock(&self) -> Option<VolumeGuard<'_, T>> {
        self.inner.try_lock().ok().map(|guard| VolumeGuard { guard })
    }

    /// Recover the volume once this is the last handle.
    pub fn into_inner(self) -> Result<Volume<T>> {
        let mutex = Arc::try_unwrap(self.inner)
            .map_err(|_| Error::Volume("volume is still shared".to_string()))?;
        mutex.into_inner().map_err(|_| Error::LockPoisoned)
    }
}

/// Exclusive access to a [`SharedVolume`] for the guard's lifetime.
pub struct VolumeGuard<'a, T: VoxelScalar> {
    guard: MutexGuard<'a, Volume<T>>,
}

impl<T: VoxelScalar> Deref for VolumeGuard<'_, T> {
    type Target = Volume<T>;

    fn deref(&self) -> &Volume<T> {
        &self.guard
    }
}

impl<T: VoxelScalar> DerefMut for VolumeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Volume<T> {
        &mut self.guard
    }
}
