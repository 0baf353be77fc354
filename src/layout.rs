//! Panel geometry, hit regions and touch-to-fraction mapping.
//!
//! Coordinates are panel-local pixels with the origin at the top-left
//! corner. Regions never overlap: the primary panel has one media
//! slider plus the expand button below it; the secondary panel has
//! three sliders laid out right to left.

use crate::stream::Stream;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Map a vertical position to a fill fraction of this track.
    /// Positions above the top or below the bottom clamp to 1 and 0.
    pub fn fraction_at(&self, y: f32) -> f32 {
        if self.height() <= 0.0 {
            return 0.0;
        }
        ((self.bottom - y) / self.height()).clamp(0.0, 1.0)
    }
}

/// A touch-sensitive area of a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// Vertical slider bound to a stream.
    Slider(Stream),
    /// Primary-panel button that toggles the secondary panel.
    Expand,
}

/// Shared geometry of both panels.
#[derive(Debug, Clone)]
pub struct PanelGeometry {
    pub slider_width: f32,
    pub panel_height: f32,
    /// Distance from the slider top to the track top (icon area).
    pub track_top_inset: f32,
    /// Distance from the slider bottom to the track bottom.
    pub track_bottom_inset: f32,
    pub menu_gap: f32,
    pub menu_size: f32,
    pub slider_gap: f32,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            slider_width: 140.0,
            panel_height: 600.0,
            track_top_inset: 120.0,
            track_bottom_inset: 40.0,
            menu_gap: 30.0,
            menu_size: 140.0,
            slider_gap: 20.0,
        }
    }
}

impl PanelGeometry {
    /// Full height of either panel, expand button included (the
    /// secondary panel keeps the same height so the two align).
    pub fn total_height(&self) -> f32 {
        self.panel_height + self.menu_gap + self.menu_size
    }

    pub fn secondary_width(&self) -> f32 {
        self.slider_width * Stream::SECONDARY.len() as f32
            + self.slider_gap * (Stream::SECONDARY.len() - 1) as f32
    }

    pub fn primary(&self) -> PrimaryLayout<'_> {
        PrimaryLayout { geometry: self }
    }

    pub fn secondary(&self) -> SecondaryLayout<'_> {
        SecondaryLayout { geometry: self }
    }

    fn track_in(&self, slider: Rect) -> Rect {
        Rect::new(
            slider.left,
            slider.top + self.track_top_inset,
            slider.right,
            slider.bottom - self.track_bottom_inset,
        )
    }
}

/// Touch dispatch capability implemented per panel variant.
pub trait PanelLayout {
    /// First region containing the point, if any.
    fn hit_test(&self, x: f32, y: f32) -> Option<Region>;
    /// Track rectangle of the given stream's slider, when that stream is
    /// shown by this panel.
    fn track(&self, stream: Stream) -> Option<Rect>;
}

pub struct PrimaryLayout<'a> {
    geometry: &'a PanelGeometry,
}

impl PrimaryLayout<'_> {
    pub fn slider_rect(&self) -> Rect {
        let g = self.geometry;
        Rect::new(0.0, 0.0, g.slider_width, g.panel_height)
    }

    pub fn expand_rect(&self) -> Rect {
        let g = self.geometry;
        let top = g.panel_height + g.menu_gap;
        Rect::new(0.0, top, g.slider_width, top + g.menu_size)
    }
}

impl PanelLayout for PrimaryLayout<'_> {
    fn hit_test(&self, x: f32, y: f32) -> Option<Region> {
        if self.slider_rect().contains(x, y) {
            return Some(Region::Slider(Stream::Media));
        }
        if self.expand_rect().contains(x, y) {
            return Some(Region::Expand);
        }
        None
    }

    fn track(&self, stream: Stream) -> Option<Rect> {
        (stream == Stream::Media).then(|| self.geometry.track_in(self.slider_rect()))
    }
}

pub struct SecondaryLayout<'a> {
    geometry: &'a PanelGeometry,
}

impl SecondaryLayout<'_> {
    /// Slider rectangles in right-to-left order, matching
    /// [`Stream::SECONDARY`].
    pub fn slider_rect(&self, stream: Stream) -> Option<Rect> {
        let g = self.geometry;
        let index = Stream::SECONDARY.iter().position(|s| *s == stream)?;
        let right = g.secondary_width() - index as f32 * (g.slider_width + g.slider_gap);
        Some(Rect::new(right - g.slider_width, 0.0, right, g.panel_height))
    }
}

impl PanelLayout for SecondaryLayout<'_> {
    fn hit_test(&self, x: f32, y: f32) -> Option<Region> {
        for stream in Stream::SECONDARY {
            if let Some(rect) = self.slider_rect(stream) {
                if rect.contains(x, y) {
                    return Some(Region::Slider(stream));
                }
            }
        }
        None
    }

    fn track(&self, stream: Stream) -> Option<Rect> {
        self.slider_rect(stream)
            .map(|rect| self.geometry.track_in(rect))
    }
}
