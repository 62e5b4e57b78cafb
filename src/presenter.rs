//! Presentation adapter seam
//!
//! This module defines the trait through which the session core pushes
//! notifications to the presentation layer. The abstraction keeps the core
//! free of any rendering concern: a terminal UI, a windowed UI, or a test
//! double can all sit behind it.

use super::Notification;

/// Trait for receiving notifications from the session core
///
/// The presentation adapter renders each notification and forwards user
/// actions back into the core as commands. Implementations must not call
/// back into the core from within `show`.
pub trait Presenter {
    /// Delivers a notification to the presentation layer
    ///
    /// # Arguments
    ///
    /// * `notification` - The state change to render
    fn show(&self, notification: &Notification);
}
