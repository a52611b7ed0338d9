use std::time::Duration;

pub const FPS: u32 = 60;                                          // Frames per second of the display loop

pub const VIEW_TIME: Duration = Duration::from_secs(5);           // How long each image is held at full opacity
pub const FADE_DURATION: Duration = Duration::from_secs(2);       // Duration of one fade (out or in)
pub const FADE_STEPS: u32 = 90;                                   // Opacity updates per fade
pub const RETRY_DELAY: Duration = Duration::from_millis(100);     // Delay before trying the next image after a bad one
pub const MAX_TICKS_PER_FRAME: usize = 16;                        // Upper bound on timer callbacks fired in one frame

pub const LOCAL_CACHE: &str = "./local_cache";                    // Where downloaded images are stored
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";         // Playlist server base URL
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);       // Global timeout for a single request

pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];
