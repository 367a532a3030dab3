//! Cleaner modules for link removal
//! Author: kartik4091

pub mod action_cleaner;
pub mod content_scrubber;

pub use action_cleaner::ActionCleaner;
pub use content_scrubber::{ContentScrubber, PageScrub, ScrubOutcome};
