//! Regions, display rectangles and source-to-display coordinate mapping.

/// A rectangle in source-pixel coordinates.
///
/// Coordinates are signed so that detector output hanging off the frame
/// edge can be represented before it is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Region covering a whole `width` x `height` buffer.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// True when the region has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Intersect with a `width` x `height` buffer.
    ///
    /// Returns an empty region (width and height 0) when nothing overlaps.
    pub fn clamp_to(&self, width: u32, height: u32) -> Region {
        if self.is_empty() {
            return Region::default();
        }
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(width as i32);
        let y1 = self.bottom().min(height as i32);
        if x1 <= x0 || y1 <= y0 {
            return Region::default();
        }
        Region::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Grow by `padding` pixels on every side.
    pub fn padded(&self, padding: i32) -> Region {
        Region::new(
            self.x - padding,
            self.y - padding,
            self.width + 2 * padding,
            self.height + 2 * padding,
        )
    }
}

/// A rectangle in display units (terminal cells for the terminal surface).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering a whole display of the given size.
    pub fn full(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Where a source region lands when the whole source frame is stretched
    /// over the whole display.
    pub fn from_source_region(
        region: Region,
        src_width: u32,
        src_height: u32,
        display_width: f32,
        display_height: f32,
    ) -> Self {
        if src_width == 0 || src_height == 0 {
            return DisplayRect::default();
        }
        let sx = display_width / src_width as f32;
        let sy = display_height / src_height as f32;
        Self::new(
            region.x as f32 * sx,
            region.y as f32 * sy,
            region.width as f32 * sx,
            region.height as f32 * sy,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Linear map from a source region onto a display rectangle.
///
/// X and Y scale independently: `display_width / source_width` and
/// `display_height / source_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMap {
    source: Region,
    target: DisplayRect,
    scale_x: f32,
    scale_y: f32,
}

impl CoordinateMap {
    /// Returns `None` when the source region is empty.
    pub fn new(source: Region, target: DisplayRect) -> Option<Self> {
        if source.is_empty() {
            return None;
        }
        Some(Self {
            source,
            target,
            scale_x: target.width / source.width as f32,
            scale_y: target.height / source.height as f32,
        })
    }

    pub fn scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    /// Map a source pixel coordinate to display space.
    #[inline]
    pub fn to_display(&self, x: i32, y: i32) -> (f32, f32) {
        (
            self.target.x + (x - self.source.x) as f32 * self.scale_x,
            self.target.y + (y - self.source.y) as f32 * self.scale_y,
        )
    }
}

/// Sampling stride that yields roughly one sample per display cell along
/// one axis.
///
/// Never returns 0.
pub fn fit_stride(src_len: u32, cells: u16) -> u32 {
    if cells == 0 {
        return src_len.max(1);
    }
    src_len.div_ceil(cells as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_is_identity() {
        let r = Region::new(2, 3, 4, 5);
        assert_eq!(r.clamp_to(100, 100), r);
    }

    #[test]
    fn test_clamp_partially_outside() {
        let r = Region::new(-5, -5, 10, 10);
        assert_eq!(r.clamp_to(8, 8), Region::new(0, 0, 5, 5));

        let r = Region::new(6, 6, 10, 10);
        assert_eq!(r.clamp_to(8, 8), Region::new(6, 6, 2, 2));
    }

    #[test]
    fn test_clamp_fully_outside_is_empty() {
        assert!(Region::new(20, 20, 5, 5).clamp_to(8, 8).is_empty());
        assert!(Region::new(-20, 0, 5, 5).clamp_to(8, 8).is_empty());
    }

    #[test]
    fn test_negative_size_is_empty() {
        assert!(Region::new(0, 0, -1, 4).is_empty());
        assert!(Region::new(0, 0, 4, 0).clamp_to(8, 8).is_empty());
    }

    #[test]
    fn test_padded() {
        assert_eq!(Region::new(10, 10, 4, 4).padded(2), Region::new(8, 8, 8, 8));
    }

    #[test]
    fn test_coordinate_map_independent_scales() {
        let map = CoordinateMap::new(Region::full(4, 4), DisplayRect::full(8.0, 2.0)).unwrap();
        assert_eq!(map.scale(), (2.0, 0.5));
        assert_eq!(map.to_display(0, 0), (0.0, 0.0));
        assert_eq!(map.to_display(3, 2), (6.0, 1.0));
    }

    #[test]
    fn test_coordinate_map_uses_region_origin() {
        let map = CoordinateMap::new(
            Region::new(100, 50, 10, 10),
            DisplayRect::new(20.0, 5.0, 10.0, 5.0),
        )
        .unwrap();
        assert_eq!(map.to_display(100, 50), (20.0, 5.0));
        assert_eq!(map.to_display(104, 54), (24.0, 7.0));
    }

    #[test]
    fn test_coordinate_map_empty_source() {
        assert!(CoordinateMap::new(Region::new(0, 0, 0, 5), DisplayRect::full(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_display_rect_from_source_region() {
        let rect = DisplayRect::from_source_region(Region::new(160, 120, 320, 240), 640, 480, 80.0, 24.0);
        assert_eq!(rect, DisplayRect::new(20.0, 6.0, 40.0, 12.0));
    }

    #[test]
    fn test_fit_stride() {
        assert_eq!(fit_stride(640, 80), 8);
        assert_eq!(fit_stride(641, 80), 9);
        assert_eq!(fit_stride(10, 80), 1);
        assert_eq!(fit_stride(10, 0), 10);
    }
}
