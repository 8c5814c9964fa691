//! Edit session: one volume, its optional ROI and its undo history.

use glam::IVec3;

use crate::brush::{StrokeConfig, StrokePainter};
use crate::core::{Error, Result};
use crate::edit::{DiffLog, EditHistory};
use crate::math::VoxelBounds;
use crate::region::{GrowConfig, GrowResult, RegionGrower};
use crate::volume::{Volume, VoxelBuffer, VoxelScalar};
use super::config::SessionConfig;
use super::script::{to_coord, EditCommand};

/// Owns a volume and records every edit made through it.
pub struct EditSession<T: VoxelScalar> {
    volume: Volume<T>,
    roi: Option<Volume<u8>>,
    history: EditHistory,
    dirty: Option<VoxelBounds>,
}

impl<T: VoxelScalar> EditSession<T> {
    pub fn new(volume: Volume<T>, config: &SessionConfig) -> Self {
        Self {
            volume,
            roi: None,
            history: EditHistory::new(config.history_depth),
            dirty: None,
        }
    }

    /// Confine strokes and growing to the non-null voxels of `roi`.
    pub fn with_roi(mut self, roi: Volume<u8>) -> Result<Self> {
        if roi.dims() != self.volume.dims() {
            return Err(Error::Volume(format!(
                "ROI is {} but volume is {}",
                roi.dims(),
                self.volume.dims()
            )));
        }
        self.roi = Some(roi);
        Ok(self)
    }

    pub fn volume(&self) -> &Volume<T> {
        &self.volume
    }

    pub fn roi(&self) -> Option<&Volume<u8>> {
        self.roi.as_ref()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn into_volume(self) -> Volume<T> {
        self.volume
    }

    /// Paint a stroke and record it as one undo step.
    /// Returns the number of voxels changed.
    pub fn stroke(&mut self, config: &StrokeConfig, start: IVec3, end: IVec3, value: T) -> Result<usize> {
        let roi = self.roi.as_ref().map(|roi| roi as &dyn VoxelBuffer);
        let diff = StrokePainter::new(&mut self.volume, roi).draw_with(config, start, end, value)?;
        Ok(self.record(diff))
    }

    /// Grow a region labelled `value` directly into the session volume.
    ///
    /// Admission reads a snapshot taken before the fill, so voxels
    /// relabelled during the fill do not change the window test.
    pub fn grow(&mut self, config: &GrowConfig, seeds: &[IVec3], value: T) -> Result<GrowResult> {
        let snapshot = self.volume.clone();
        let roi = self.roi.as_ref().map(|roi| roi as &dyn VoxelBuffer);
        let result = RegionGrower::from_config(config.clone())
            .process_detailed(&snapshot, &mut self.volume, roi, seeds, value)?;
        self.record(result.display_diff.clone());
        Ok(result)
    }

    pub fn undo(&mut self) -> bool {
        let bounds = self.history.peek_undo().and_then(|diff| diff.touched_bounds(self.volume.dims()));
        let undone = self.history.undo(&mut self.volume);
        if undone {
            self.mark_dirty(bounds);
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let bounds = self.history.peek_redo().and_then(|diff| diff.touched_bounds(self.volume.dims()));
        let redone = self.history.redo(&mut self.volume);
        if redone {
            self.mark_dirty(bounds);
        }
        redone
    }

    /// Voxels changed since the last [`EditSession::take_dirty_bounds`].
    pub fn dirty_bounds(&self) -> Option<VoxelBounds> {
        self.dirty
    }

    /// Return and reset the changed region, e.g. once a view has redrawn it.
    pub fn take_dirty_bounds(&mut self) -> Option<VoxelBounds> {
        self.dirty.take()
    }

    /// Execute one script command.
    pub fn run(&mut self, command: &EditCommand) -> Result<()> {
        match command {
            EditCommand::Stroke { start, end, value, config } => {
                let changed = self.stroke(config, to_coord(*start), to_coord(*end), T::from_f64(*value))?;
                log::info!("stroke {:?} -> {:?}: {} voxels changed", start, end, changed);
            }
            EditCommand::Grow { seeds, value, config } => {
                let seeds: Vec<IVec3> = seeds.iter().copied().map(to_coord).collect();
                let result = self.grow(config, &seeds, T::from_f64(*value))?;
                log::info!(
                    "grow from {} seeds: {} accepted, {} changed",
                    seeds.len(),
                    result.accepted,
                    result.display_diff.len()
                );
            }
            EditCommand::Undo => {
                if !self.undo() {
                    log::warn!("undo: nothing to undo");
                }
            }
            EditCommand::Redo => {
                if !self.redo() {
                    log::warn!("redo: nothing to redo");
                }
            }
        }
        Ok(())
    }

    /// Every undoable change as one log, oldest first.
    pub fn flattened_history(&self) -> Result<Option<DiffLog>> {
        self.history.flatten()
    }

    fn record(&mut self, diff: DiffLog) -> usize {
        let changed = diff.len();
        self.mark_dirty(diff.touched_bounds(self.volume.dims()));
        self.history.push(diff);
        changed
    }

    fn mark_dirty(&mut self, bounds: Option<VoxelBounds>) {
        let Some(bounds) = bounds else {
            return;
        };
        log::debug!(
            "Dirty region {}..={} ({} voxels, box {})",
            bounds.min,
            bounds.max,
            bounds.volume(),
            bounds.size()
        );
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.merged(&bounds),
            None => bounds,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::SliceOrientation;
    use crate::region::GrowMode;
    use crate::volume::Dims;
    use glam::Vec3;

    fn session(width: usize) -> EditSession<u8> {
        EditSession::new(Volume::new(Dims::new(width, width, 1), Vec3::ONE), &SessionConfig::default())
    }

    #[test]
    fn test_stroke_undo_redo() {
        let mut session = session(5);
        let config = StrokeConfig::new(SliceOrientation::ZAxis);
        let changed = session.stroke(&config, IVec3::ZERO, IVec3::new(4, 0, 0), 7).unwrap();
        assert_eq!(changed, 5);
        assert_eq!(session.volume().count(7), 5);

        assert!(session.undo());
        assert_eq!(session.volume().count(0), 25);
        assert!(!session.undo());
        assert!(session.redo());
        assert_eq!(session.volume().count(7), 5);
    }

    #[test]
    fn test_noop_stroke_is_not_a_step() {
        let mut session = session(5);
        let config = StrokeConfig::new(SliceOrientation::ZAxis);
        session.stroke(&config, IVec3::ZERO, IVec3::new(4, 0, 0), 7).unwrap();
        let changed = session.stroke(&config, IVec3::ZERO, IVec3::new(4, 0, 0), 7).unwrap();
        assert_eq!(changed, 0);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_grow_in_place() {
        let mut volume: Volume<u8> = Volume::new(Dims::new(6, 1, 1), Vec3::ONE);
        volume.set_at(IVec3::new(3, 0, 0), 50);
        let mut session = EditSession::new(volume, &SessionConfig::default());

        let result = session
            .grow(&GrowConfig::default(), &[IVec3::ZERO], 9)
            .unwrap();
        // Seed value 0 admits only zeros; 50 is a wall
        assert_eq!(result.accepted, 3);
        assert_eq!(session.volume().as_slice(), &[9, 9, 9, 50, 0, 0]);

        session.undo();
        assert_eq!(session.volume().as_slice(), &[0, 0, 0, 50, 0, 0]);
    }

    #[test]
    fn test_roi_must_match() {
        let err = session(4)
            .with_roi(Volume::new(Dims::new(3, 3, 1), Vec3::ONE))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Volume(_)));

        let mut roi: Volume<u8> = Volume::new(Dims::new(4, 4, 1), Vec3::ONE);
        roi.set_at(IVec3::ZERO, 1);
        let mut session = session(4).with_roi(roi).unwrap();
        assert!(session.roi().is_some());
        let result = session.grow(&GrowConfig::default(), &[IVec3::ZERO], 2).unwrap();
        assert_eq!(result.accepted, 1);
    }

    #[test]
    fn test_run_commands() {
        let mut session = session(8);
        let commands = [
            EditCommand::Stroke {
                start: [0, 0, 0],
                end: [7, 0, 0],
                value: 300.0,
                config: StrokeConfig::default(),
            },
            EditCommand::Grow {
                seeds: vec![[0, 4, 0]],
                value: 1.0,
                config: GrowConfig {
                    mode: GrowMode::MinMax,
                    overwrite: false,
                    ..GrowConfig::default()
                },
            },
            EditCommand::Undo,
            EditCommand::Undo,
            EditCommand::Undo,
            EditCommand::Redo,
        ];
        for command in &commands {
            session.run(command).unwrap();
        }
        // 300 saturates to 255; the grow was undone
        assert_eq!(session.volume().count(255), 8);
        assert_eq!(session.volume().count(1), 0);
        assert!(session.history().can_redo());

        let flat = session.flattened_history().unwrap().unwrap();
        assert_eq!(flat.len(), 8);
    }

    #[test]
    fn test_grow_error_keeps_history() {
        let mut session = session(3);
        let err = session
            .grow(&GrowConfig::default(), &[IVec3::new(5, 0, 0)], 1)
            .unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_dirty_bounds_track_edits() {
        let mut session = session(8);
        assert!(session.dirty_bounds().is_none());
        let config = StrokeConfig::default();
        session.stroke(&config, IVec3::new(1, 2, 0), IVec3::new(3, 2, 0), 4).unwrap();
        session.stroke(&config, IVec3::new(6, 5, 0), IVec3::new(6, 5, 0), 4).unwrap();

        let dirty = session.take_dirty_bounds().unwrap();
        assert_eq!(dirty.min, IVec3::new(1, 2, 0));
        assert_eq!(dirty.max, IVec3::new(6, 5, 0));
        assert_eq!(dirty.volume(), 6 * 4);
        assert!(session.dirty_bounds().is_none());

        // Undo reports the region it restored
        assert!(session.undo());
        let dirty = session.take_dirty_bounds().unwrap();
        assert_eq!(dirty.size(), IVec3::ONE);
        assert_eq!(dirty.min, IVec3::new(6, 5, 0));

        // Undo with nothing left leaves the region empty
        session.undo();
        session.take_dirty_bounds();
        assert!(!session.undo());
        assert!(session.dirty_bounds().is_none());
    }

    #[test]
    fn test_history_depth_from_config() {
        let mut session = EditSession::new(
            Volume::<u8>::new(Dims::new(4, 1, 1), Vec3::ONE),
            &SessionConfig::default().with_history_depth(1),
        );
        let config = StrokeConfig::default();
        session.stroke(&config, IVec3::ZERO, IVec3::ZERO, 1).unwrap();
        session.stroke(&config, IVec3::new(3, 0, 0), IVec3::new(3, 0, 0), 1).unwrap();
        assert_eq!(session.history().len(), 1);
        assert!(session.undo());
        assert_eq!(session.volume().as_slice(), &[1, 0, 0, 0]);
    }
}
