use anyhow::Result;
use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    KeyPressed(Key),
    Clicked(PointerButton),
    CloseRequested,
}

/// A borderless fullscreen drawing target the slideshow runs on.
pub trait Surface {
    fn set_position(&mut self, x: i32, y: i32);
    fn set_size(&mut self, width: u32, height: u32);
    fn set_fullscreen(&mut self, fullscreen: bool);
    fn set_opacity(&mut self, opacity: f32);
    /// Replaces the displayed frame. The frame is already sized to the surface.
    fn set_image(&mut self, frame: &RgbaImage) -> Result<()>;
    fn bind_key(&mut self, key: Key);
    fn bind_click(&mut self, button: PointerButton);
    /// Next pending input event that matters to the slideshow, if any.
    fn poll(&mut self) -> Option<SurfaceEvent>;
    /// Draws the current frame and waits for the next one.
    fn present(&mut self);
    fn close(&mut self);
}
