//! Slide canvas and region geometry in EMUs (914400 per inch).

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Convert hundredths of an inch to EMUs.
pub const fn centi_inches(value: i64) -> i64 {
    value * EMU_PER_INCH / 100
}

/// Canvas width: 16in.
pub const SLIDE_WIDTH: i64 = centi_inches(1600);
/// Canvas height: 9in.
pub const SLIDE_HEIGHT: i64 = centi_inches(900);

/// A positioned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Rect {
    pub const fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    /// The whole canvas.
    pub const fn full_slide() -> Self {
        Self::new(0, 0, SLIDE_WIDTH, SLIDE_HEIGHT)
    }

    /// Whether this rectangle covers the whole canvas.
    pub fn is_full_slide(&self) -> bool {
        *self == Self::full_slide()
    }
}

/// Title region shared by every layout.
pub const TITLE: Rect = Rect::new(
    centi_inches(50),
    centi_inches(40),
    centi_inches(1500),
    centi_inches(100),
);

/// Body region at full width.
pub const BODY_FULL: Rect = Rect::new(
    centi_inches(50),
    centi_inches(150),
    centi_inches(1500),
    centi_inches(700),
);

/// Body region narrowed to the left side when the slide carries an image.
pub const BODY_NARROW: Rect = Rect::new(
    centi_inches(50),
    centi_inches(150),
    centi_inches(750),
    centi_inches(700),
);

/// Left edge of a slide image.
pub const IMAGE_LEFT: i64 = centi_inches(825);
/// Top edge of a slide image.
pub const IMAGE_TOP: i64 = centi_inches(150);
/// Width of a slide image.
pub const IMAGE_WIDTH: i64 = centi_inches(725);

/// Body region for a slide with or without an image.
pub fn body_region(has_image: bool) -> Rect {
    if has_image {
        BODY_NARROW
    } else {
        BODY_FULL
    }
}

/// Place an image of the given pixel size on the right-hand side at the
/// fixed width, keeping its aspect ratio. Images too tall for the space
/// below the top offset are shrunk to fit.
pub fn image_region(px_width: u32, px_height: u32) -> Rect {
    let max_height = SLIDE_HEIGHT - IMAGE_TOP;
    if px_width == 0 || px_height == 0 {
        return Rect::new(IMAGE_LEFT, IMAGE_TOP, IMAGE_WIDTH, IMAGE_WIDTH.min(max_height));
    }

    let (w, h) = (px_width as i128, px_height as i128);
    let height = (IMAGE_WIDTH as i128 * h / w) as i64;
    if height <= max_height {
        Rect::new(IMAGE_LEFT, IMAGE_TOP, IMAGE_WIDTH, height)
    } else {
        let width = (max_height as i128 * w / h) as i64;
        Rect::new(IMAGE_LEFT, IMAGE_TOP, width, max_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_is_16_by_9() {
        assert_eq!(SLIDE_WIDTH, 14_630_400);
        assert_eq!(SLIDE_HEIGHT, 8_229_600);
        assert_eq!(SLIDE_WIDTH * 9, SLIDE_HEIGHT * 16);
    }

    #[test]
    fn test_narrow_body_is_left_side() {
        let narrow = body_region(true);
        assert_eq!(narrow.x, centi_inches(50));
        assert!(narrow.cx * 100 / SLIDE_WIDTH < 50);
        assert!(narrow.x + narrow.cx < IMAGE_LEFT);
        assert_eq!(body_region(false), BODY_FULL);
    }

    #[test]
    fn test_image_keeps_aspect_ratio() {
        let rect = image_region(400, 200);
        assert_eq!(rect.x, IMAGE_LEFT);
        assert_eq!(rect.y, IMAGE_TOP);
        assert_eq!(rect.cx, IMAGE_WIDTH);
        assert_eq!(rect.cy, IMAGE_WIDTH / 2);
        assert!(rect.x + rect.cx <= SLIDE_WIDTH);
    }

    #[test]
    fn test_tall_image_is_clamped() {
        let rect = image_region(100, 1000);
        assert_eq!(rect.cy, SLIDE_HEIGHT - IMAGE_TOP);
        assert!(rect.cx < IMAGE_WIDTH);
        assert_eq!(rect.y + rect.cy, SLIDE_HEIGHT);
    }

    #[test]
    fn test_full_slide() {
        assert!(Rect::full_slide().is_full_slide());
        assert!(!TITLE.is_full_slide());
    }
}
