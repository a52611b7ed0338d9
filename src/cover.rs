use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use rand::Rng;

/// Geometry of a "cover" fit: the image is scaled until it fills the target on
/// both axes, and the overflow on one axis is cropped away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverFit {
    pub target_width: u32,
    pub target_height: u32,
    pub scaled_width: u32,
    pub scaled_height: u32,
}

impl CoverFit {
    pub fn compute(image_size: (u32, u32), target_size: (u32, u32)) -> Self {
        let (img_w, img_h) = image_size;
        let (target_w, target_h) = target_size;

        let (scaled_width, scaled_height) = if img_w == 0 || img_h == 0 || target_h == 0 {
            (target_w, target_h)
        } else {
            let img_aspect = img_w as f64 / img_h as f64;
            let screen_aspect = target_w as f64 / target_h as f64;

            if img_aspect > screen_aspect {
                // Wider than the screen: match height, width overflows
                let width = (target_h as f64 * img_aspect).round() as u32;
                (width.max(target_w), target_h)
            } else {
                // Taller or equal: match width, height overflows
                let height = (target_w as f64 / img_aspect).round() as u32;
                (target_w, height.max(target_h))
            }
        };

        Self {
            target_width: target_w,
            target_height: target_h,
            scaled_width,
            scaled_height,
        }
    }

    pub fn max_offset_x(&self) -> u32 {
        self.scaled_width - self.target_width
    }

    pub fn max_offset_y(&self) -> u32 {
        self.scaled_height - self.target_height
    }

    /// Uniformly random top-left corner of the crop window, bounds inclusive.
    pub fn random_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> (u32, u32) {
        (
            rng.random_range(0..=self.max_offset_x()),
            rng.random_range(0..=self.max_offset_y()),
        )
    }
}

/// Scales `image` to cover `width` x `height` and crops a randomly placed
/// window of exactly that size.
pub fn cover_fit<R: Rng + ?Sized>(image: &DynamicImage, width: u32, height: u32, rng: &mut R) -> RgbaImage {
    let fit = CoverFit::compute((image.width(), image.height()), (width, height));

    let resized = if (fit.scaled_width, fit.scaled_height) == (image.width(), image.height()) {
        image.clone()
    } else {
        image.resize_exact(fit.scaled_width, fit.scaled_height, FilterType::Lanczos3)
    };

    let (x, y) = fit.random_offset(rng);
    resized.crop_imm(x, y, width, height).to_rgba8()
}
