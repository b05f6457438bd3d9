/// Windowing collaborator used by the frame loop.
///
/// Event polling and buffer presentation are not part of this trait: the
/// windowing event loop drives `FrameLoop::run_frame`, and presentation is
/// `Renderer::end_frame`.
pub trait Platform {
    /// True once a close was requested by the user or by `request_close`
    fn should_close(&self) -> bool;

    /// Ask the window to close at the end of the current frame
    fn request_close(&mut self);

    /// Drawable surface size in physical pixels
    fn framebuffer_size(&self) -> (u32, u32);

    /// Monotonic time in seconds
    fn time(&self) -> f64;
}
