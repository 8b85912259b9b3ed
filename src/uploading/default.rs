//! The usual upload pipeline: directory check, then move.

use super::directory::DirectoryStrategy;
use super::move_file::MoveStrategy;
use super::queue::StrategiesQueue;
use super::UploadStrategy;

pub const DIRECTORY_PRIORITY: i64 = 200;
pub const MOVE_PRIORITY: i64 = 100;

/// Queue with a [`DirectoryStrategy`] at [`DIRECTORY_PRIORITY`] followed by
/// a [`MoveStrategy`] at [`MOVE_PRIORITY`].
pub fn default_upload_strategy() -> StrategiesQueue {
    let directory: Box<dyn UploadStrategy> = Box::new(DirectoryStrategy::new());
    let relocation: Box<dyn UploadStrategy> = Box::new(MoveStrategy::new());
    StrategiesQueue::from_distinct(vec![
        (DIRECTORY_PRIORITY, directory),
        (MOVE_PRIORITY, relocation),
    ])
}
