//! Display-frame loop driver
//!
//! The browser bridge hands each animation frame to `drive_frame`. The next
//! frame is requested before anything else runs, so a failure while producing
//! or presenting one frame only drops that frame; the loop keeps going.

use std::fmt::Debug;

/// What a display loop needs from its host
pub trait FrameHost {
    type Error: Debug;

    fn is_running(&self) -> bool;

    /// Queue the next display frame
    fn request_frame(&mut self) -> Result<(), Self::Error>;

    /// Advance the world for the frame at `now_ms` and serialize what the page draws
    fn produce(&mut self, now_ms: f64) -> Result<String, Self::Error>;

    /// Hand a produced frame to the page
    fn present(&mut self, frame: &str) -> Result<(), Self::Error>;
}

/// Run one display frame.
///
/// Errors only come back if the next frame could not be requested.
pub fn drive_frame<H: FrameHost>(host: &mut H, now_ms: f64) -> Result<(), H::Error> {
    if !host.is_running() {
        return Ok(());
    }
    host.request_frame()?;

    let presented = host.produce(now_ms).and_then(|frame| host.present(&frame));
    if let Err(e) = presented {
        log::warn!("Frame dropped at {:.1}ms: {:?}", now_ms, e);
    }
    Ok(())
}
