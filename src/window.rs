use std::ffi::CStr;

use anyhow::{Result, anyhow};
use image::RgbaImage;
use log::debug;
use raylib::ffi;
use raylib::prelude::*;

use crate::constants::FPS;
use crate::monitor::Monitor;
use crate::surface::{Key, PointerButton, Surface, SurfaceEvent};

/// raylib-backed fullscreen window.
pub struct Window {
    rl: RaylibHandle,
    thread: RaylibThread,
    texture: Option<Texture2D>,
    opacity: f32,
    keys: Vec<Key>,
    buttons: Vec<PointerButton>,
    closed: bool,
}

impl Window {
    /// Creates the window without showing it, so monitors can be queried
    /// and the window placed before anything appears on screen.
    pub fn open_hidden(title: &str) -> Self {
        // raylib ORs these into the flags set by the builder
        unsafe { ffi::SetConfigFlags(ffi::ConfigFlags::FLAG_WINDOW_HIDDEN as u32) };

        let (mut rl, thread) = raylib::init()
            .size(640, 360)
            .title(title)
            .undecorated()
            .vsync()
            .build();
        rl.set_target_fps(FPS);
        rl.set_trace_log(TraceLogLevel::LOG_ERROR);
        // Escape is handled as a bound quit key, not by raylib
        rl.set_exit_key(None);

        Self {
            rl,
            thread,
            texture: None,
            opacity: 1.0,
            keys: Vec::new(),
            buttons: Vec::new(),
            closed: false,
        }
    }

    /// Connected monitors. GLFW always reports the primary monitor first.
    pub fn monitors(&self) -> Vec<Monitor> {
        let count = unsafe { ffi::GetMonitorCount() };
        (0..count)
            .map(|i| unsafe {
                let position = ffi::GetMonitorPosition(i);
                let name_ptr = ffi::GetMonitorName(i);
                let name = if name_ptr.is_null() {
                    format!("Monitor {}", i)
                } else {
                    CStr::from_ptr(name_ptr).to_string_lossy().into_owned()
                };
                Monitor {
                    index: i as usize,
                    name,
                    x: position.x as i32,
                    y: position.y as i32,
                    width: ffi::GetMonitorWidth(i).max(0) as u32,
                    height: ffi::GetMonitorHeight(i).max(0) as u32,
                    is_primary: i == 0,
                }
            })
            .collect()
    }
}

impl Surface for Window {
    fn set_position(&mut self, x: i32, y: i32) {
        self.rl.set_window_position(x, y);
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.rl.set_window_size(width as i32, height as i32);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        let borderless = ffi::ConfigFlags::FLAG_BORDERLESS_WINDOWED_MODE as u32;
        let topmost = ffi::ConfigFlags::FLAG_WINDOW_TOPMOST as u32;
        unsafe {
            if fullscreen {
                ffi::ClearWindowState(ffi::ConfigFlags::FLAG_WINDOW_HIDDEN as u32);
                if !ffi::IsWindowState(borderless) {
                    ffi::ToggleBorderlessWindowed();
                }
                ffi::SetWindowState(topmost);
            } else {
                if ffi::IsWindowState(borderless) {
                    ffi::ToggleBorderlessWindowed();
                }
                ffi::ClearWindowState(topmost);
            }
        }

        if fullscreen {
            self.rl.hide_cursor();
        } else {
            self.rl.show_cursor();
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn set_image(&mut self, frame: &RgbaImage) -> Result<()> {
        let (width, height) = frame.dimensions();
        let mut image = Image::gen_image_color(width as i32, height as i32, Color::BLACK);

        // gen_image_color allocates R8G8B8A8, the same layout as RgbaImage
        let pixels = frame.as_raw();
        unsafe {
            let data = std::slice::from_raw_parts_mut(image.data() as *mut u8, pixels.len());
            data.copy_from_slice(pixels);
        }

        let texture = self
            .rl
            .load_texture_from_image(&self.thread, &image)
            .map_err(|e| anyhow!("Failed to create texture: {}", e))?;

        // Replacing the old texture unloads it from the GPU
        self.texture = Some(texture);
        debug!("Uploaded {}x{} frame", width, height);
        Ok(())
    }

    fn bind_key(&mut self, key: Key) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    fn bind_click(&mut self, button: PointerButton) {
        if !self.buttons.contains(&button) {
            self.buttons.push(button);
        }
    }

    fn poll(&mut self) -> Option<SurfaceEvent> {
        if self.closed {
            return None;
        }
        if self.rl.window_should_close() {
            return Some(SurfaceEvent::CloseRequested);
        }

        for &key in &self.keys {
            let pressed = match key {
                Key::Escape => self.rl.is_key_pressed(KeyboardKey::KEY_ESCAPE),
            };
            if pressed {
                return Some(SurfaceEvent::KeyPressed(key));
            }
        }

        for &button in &self.buttons {
            let clicked = match button {
                PointerButton::Primary => self.rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT),
            };
            if clicked {
                return Some(SurfaceEvent::Clicked(button));
            }
        }

        None
    }

    fn present(&mut self) {
        if self.closed {
            return;
        }

        let tint = Color::new(255, 255, 255, (self.opacity * 255.0).round() as u8);
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);

        if let Some(texture) = &self.texture {
            let sw = d.get_screen_width() as f32;
            let sh = d.get_screen_height() as f32;

            d.draw_texture_pro(
                texture,
                Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32),
                Rectangle::new(0.0, 0.0, sw, sh),
                Vector2::new(0.0, 0.0),
                0.0,
                tint,
            );
        }
    }

    fn close(&mut self) {
        // The GL context itself goes away when the handle is dropped
        self.closed = true;
        self.texture = None;
    }
}
