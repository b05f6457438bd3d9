/// Platform implementation over a winit window
///
/// Window events are fed in by the application handler; the frame loop only
/// sees the resulting close flag, framebuffer size and clock.

use std::time::Instant;

use freelook_engine::freelook::platform::Platform;

pub struct WinitPlatform {
    start: Instant,
    framebuffer_size: (u32, u32),
    close_requested: bool,
}

impl WinitPlatform {
    pub fn new(framebuffer_size: (u32, u32)) -> Self {
        Self {
            start: Instant::now(),
            framebuffer_size,
            close_requested: false,
        }
    }

    pub fn set_framebuffer_size(&mut self, width: u32, height: u32) {
        self.framebuffer_size = (width, height);
    }
}

impl Platform for WinitPlatform {
    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer_size
    }

    fn time(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_flag() {
        let mut platform = WinitPlatform::new((640, 480));
        assert!(!platform.should_close());
        platform.request_close();
        assert!(platform.should_close());
    }

    #[test]
    fn test_resize_updates_size() {
        let mut platform = WinitPlatform::new((640, 480));
        platform.set_framebuffer_size(0, 0);
        assert_eq!(platform.framebuffer_size(), (0, 0));
    }

    #[test]
    fn test_time_is_monotonic() {
        let platform = WinitPlatform::new((1, 1));
        let a = platform.time();
        let b = platform.time();
        assert!(b >= a);
    }
}
