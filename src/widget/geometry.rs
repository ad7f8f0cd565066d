//! Absolute geometry.
//!
//! A widget's absolute position is its relative position plus, for every
//! ancestor, that ancestor's relative position and left/top padding minus its
//! scroll offset. Percent values resolve against the parent's inner box (size
//! minus padding); top-level widgets resolve against the screen. Expanded
//! widgets cover the parent's inner box at (0, 0).
//!
//! With [`GuiConfig::position_cache`](crate::GuiConfig) enabled the resolved
//! values are stored per widget and recomputed top-down, for the widget and
//! all of its descendants, on every change that can affect them.

#[cfg_attr(test, allow(unused_imports))]
use micromath::F32Ext;

use super::{CachedGeometry, WidgetFlags, WidgetHandle};
use crate::Gui;
use crate::draw::Region;

/// Inner spacing between a widget's edge and its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Padding {
    pub const fn all(value: i32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

#[inline]
fn percent(
    value: f32,
    of: i32,
) -> i32 {
    (value * of as f32 / 100.0).round() as i32
}

// =============================================================================
// Getters
// =============================================================================

impl Gui {
    #[inline]
    fn cached(
        &self,
        h: WidgetHandle,
    ) -> Option<CachedGeometry> {
        if self.config.position_cache {
            self.widgets.get(h).map(|w| w.geometry)
        } else {
            None
        }
    }

    /// Width in pixels.
    pub fn width(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        match self.cached(h) {
            Some(g) => g.width,
            None => self.resolve_width(h),
        }
    }

    /// Height in pixels.
    pub fn height(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        match self.cached(h) {
            Some(g) => g.height,
            None => self.resolve_height(h),
        }
    }

    /// Absolute X position on screen.
    pub fn abs_x(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        match self.cached(h) {
            Some(g) => g.x,
            None => self.resolve_abs_x(h),
        }
    }

    /// Absolute Y position on screen.
    pub fn abs_y(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        match self.cached(h) {
            Some(g) => g.y,
            None => self.resolve_abs_y(h),
        }
    }

    /// Absolute rectangle clipped by every ancestor's inner box and the screen.
    pub fn visible_rect(
        &self,
        h: WidgetHandle,
    ) -> Region {
        match self.cached(h) {
            Some(g) => g.visible,
            None => self.resolve_visible(h),
        }
    }

    /// Width minus left and right padding.
    pub fn inner_width(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        let pad = self.padding(h);
        self.width(h) - pad.left - pad.right
    }

    pub fn inner_height(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        let pad = self.padding(h);
        self.height(h) - pad.top - pad.bottom
    }

    #[inline]
    pub fn padding(
        &self,
        h: WidgetHandle,
    ) -> super::Padding {
        self.widgets.get(h).map(|w| w.padding).unwrap_or_default()
    }

    #[inline]
    pub fn scroll(
        &self,
        h: WidgetHandle,
    ) -> (i32, i32) {
        self.widgets.get(h).map_or((0, 0), |w| (w.scroll_x, w.scroll_y))
    }

    /// Inner width of the parent, the screen width for top-level widgets.
    pub fn parent_inner_width(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        match self.parent(h) {
            Some(p) => self.inner_width(p),
            None => self.screen.width(),
        }
    }

    pub fn parent_inner_height(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        match self.parent(h) {
            Some(p) => self.inner_height(p),
            None => self.screen.height(),
        }
    }

    /// Absolute X of the parent's inner box.
    pub fn parent_abs_x(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        match self.parent(h) {
            Some(p) => self.abs_x(p) + self.padding(p).left,
            None => 0,
        }
    }

    pub fn parent_abs_y(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        match self.parent(h) {
            Some(p) => self.abs_y(p) + self.padding(p).top,
            None => 0,
        }
    }

    /// X relative to the parent's inner box, in pixels.
    pub fn relative_x(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        let Some(w) = self.widgets.get(h) else {
            return 0;
        };
        if w.flags.contains(WidgetFlags::EXPANDED) {
            0
        } else if w.flags.contains(WidgetFlags::XPOS_PERCENT) {
            percent(w.x, self.parent_inner_width(h))
        } else {
            w.x as i32
        }
    }

    pub fn relative_y(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        let Some(w) = self.widgets.get(h) else {
            return 0;
        };
        if w.flags.contains(WidgetFlags::EXPANDED) {
            0
        } else if w.flags.contains(WidgetFlags::YPOS_PERCENT) {
            percent(w.y, self.parent_inner_height(h))
        } else {
            w.y as i32
        }
    }

    #[inline]
    pub fn is_expanded(
        &self,
        h: WidgetHandle,
    ) -> bool {
        self.has_flag(h, WidgetFlags::EXPANDED)
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    fn resolve_width(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        let Some(w) = self.widgets.get(h) else {
            return 0;
        };
        if w.flags.contains(WidgetFlags::EXPANDED) {
            self.parent_inner_width(h)
        } else if w.flags.contains(WidgetFlags::WIDTH_FILL) {
            (self.parent_inner_width(h) - self.relative_x(h)).max(0)
        } else if w.flags.contains(WidgetFlags::WIDTH_PERCENT) {
            percent(w.width, self.parent_inner_width(h))
        } else {
            w.width as i32
        }
    }

    fn resolve_height(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        let Some(w) = self.widgets.get(h) else {
            return 0;
        };
        if w.flags.contains(WidgetFlags::EXPANDED) {
            self.parent_inner_height(h)
        } else if w.flags.contains(WidgetFlags::HEIGHT_FILL) {
            (self.parent_inner_height(h) - self.relative_y(h)).max(0)
        } else if w.flags.contains(WidgetFlags::HEIGHT_PERCENT) {
            percent(w.height, self.parent_inner_height(h))
        } else {
            w.height as i32
        }
    }

    fn resolve_abs_x(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        let x = self.relative_x(h);
        match self.parent(h) {
            Some(p) => x + self.abs_x(p) + self.padding(p).left - self.scroll(p).0,
            None => x,
        }
    }

    fn resolve_abs_y(
        &self,
        h: WidgetHandle,
    ) -> i32 {
        let y = self.relative_y(h);
        match self.parent(h) {
            Some(p) => y + self.abs_y(p) + self.padding(p).top - self.scroll(p).1,
            None => y,
        }
    }

    fn resolve_visible(
        &self,
        h: WidgetHandle,
    ) -> Region {
        let mut r = Region::new(self.abs_x(h), self.abs_y(h), self.width(h), self.height(h));
        let mut node = Some(h);
        while let Some(n) = node {
            let inner = Region::new(
                self.parent_abs_x(n),
                self.parent_abs_y(n),
                self.parent_inner_width(n),
                self.parent_inner_height(n),
            );
            r = r.intersect(&inner);
            node = self.parent(n);
        }
        r
    }

    /// Recompute the cached geometry of `h` and all of its descendants.
    pub(crate) fn refresh_geometry(
        &mut self,
        h: WidgetHandle,
    ) {
        if !self.config.position_cache || !self.contains(h) {
            return;
        }
        // Parent first: the cache of `h` must be current before its children read it
        let mut g = CachedGeometry {
            width: self.resolve_width(h),
            height: self.resolve_height(h),
            ..CachedGeometry::default()
        };
        if let Some(w) = self.widgets.get_mut(h) {
            w.geometry.width = g.width;
            w.geometry.height = g.height;
        }
        g.x = self.resolve_abs_x(h);
        g.y = self.resolve_abs_y(h);
        if let Some(w) = self.widgets.get_mut(h) {
            w.geometry.x = g.x;
            w.geometry.y = g.y;
        }
        g.visible = self.resolve_visible(h);
        if let Some(w) = self.widgets.get_mut(h) {
            w.geometry = g;
        }

        let mut child = self.list_root(Some(h)).first;
        while let Some(c) = child {
            self.refresh_geometry(c);
            child = self.next_sibling(c);
        }
    }

    /// Recompute cached geometry of the whole tree.
    pub(crate) fn refresh_all_geometry(&mut self) {
        let mut node = self.root.first;
        while let Some(n) = node {
            self.refresh_geometry(n);
            node = self.next_sibling(n);
        }
    }
}

// =============================================================================
// Setters
// =============================================================================

/// How a size or position value is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Pixels,
    Percent,
}

impl Gui {
    fn apply_size(
        &mut self,
        h: WidgetHandle,
        width: Option<(f32, Unit)>,
        height: Option<(f32, Unit)>,
    ) {
        let Some(w) = self.widgets.get(h) else {
            return;
        };
        let mut flags = w.flags;
        let (mut new_w, mut new_h) = (w.width, w.height);
        if let Some((value, unit)) = width {
            new_w = value;
            flags.set(WidgetFlags::WIDTH_PERCENT, unit == Unit::Percent);
            flags.remove(WidgetFlags::WIDTH_FILL);
        }
        if let Some((value, unit)) = height {
            new_h = value;
            flags.set(WidgetFlags::HEIGHT_PERCENT, unit == Unit::Percent);
            flags.remove(WidgetFlags::HEIGHT_FILL);
        }
        if new_w == w.width && new_h == w.height && flags == w.flags {
            return;
        }

        let expanded = w.flags.contains(WidgetFlags::EXPANDED);
        let (old_w, old_h) = (self.width(h), self.height(h));
        if !expanded {
            self.invalidate_with_parent(h);
        }
        if let Some(w) = self.widgets.get_mut(h) {
            w.width = new_w;
            w.height = new_h;
            w.flags = flags;
        }
        self.refresh_geometry(h);
        // Shrinking is fully covered by the old region
        if !expanded && (self.width(h) > old_w || self.height(h) > old_h) {
            self.invalidate_with_parent(h);
        }
    }

    fn apply_position(
        &mut self,
        h: WidgetHandle,
        x: Option<(f32, Unit)>,
        y: Option<(f32, Unit)>,
    ) {
        let Some(w) = self.widgets.get(h) else {
            return;
        };
        let mut flags = w.flags;
        let (mut new_x, mut new_y) = (w.x, w.y);
        if let Some((value, unit)) = x {
            new_x = value;
            flags.set(WidgetFlags::XPOS_PERCENT, unit == Unit::Percent);
        }
        if let Some((value, unit)) = y {
            new_y = value;
            flags.set(WidgetFlags::YPOS_PERCENT, unit == Unit::Percent);
        }
        if new_x == w.x && new_y == w.y && flags == w.flags {
            return;
        }

        let expanded = w.flags.contains(WidgetFlags::EXPANDED);
        if !expanded {
            self.invalidate_with_parent(h);
        }
        if let Some(w) = self.widgets.get_mut(h) {
            w.x = new_x;
            w.y = new_y;
            w.flags = flags;
        }
        self.refresh_geometry(h);
        if !expanded {
            self.invalidate_with_parent(h);
        }
    }

    /// Set width and height in pixels.
    pub fn set_size(
        &mut self,
        h: WidgetHandle,
        width: f32,
        height: f32,
    ) {
        self.apply_size(h, Some((width, Unit::Pixels)), Some((height, Unit::Pixels)));
    }

    /// Set width and height in percent of the parent's inner box.
    pub fn set_size_percent(
        &mut self,
        h: WidgetHandle,
        width: f32,
        height: f32,
    ) {
        self.apply_size(h, Some((width, Unit::Percent)), Some((height, Unit::Percent)));
    }

    pub fn set_width(
        &mut self,
        h: WidgetHandle,
        width: f32,
        unit: Unit,
    ) {
        self.apply_size(h, Some((width, unit)), None);
    }

    pub fn set_height(
        &mut self,
        h: WidgetHandle,
        height: f32,
        unit: Unit,
    ) {
        self.apply_size(h, None, Some((height, unit)));
    }

    /// Stretch the width to the parent's inner right edge.
    pub fn set_width_fill(
        &mut self,
        h: WidgetHandle,
        fill: bool,
    ) {
        if self.has_flag(h, WidgetFlags::WIDTH_FILL) == fill {
            return;
        }
        self.invalidate_with_parent(h);
        if let Some(w) = self.widgets.get_mut(h) {
            w.flags.set(WidgetFlags::WIDTH_FILL, fill);
        }
        self.refresh_geometry(h);
        self.invalidate_with_parent(h);
    }

    pub fn set_height_fill(
        &mut self,
        h: WidgetHandle,
        fill: bool,
    ) {
        if self.has_flag(h, WidgetFlags::HEIGHT_FILL) == fill {
            return;
        }
        self.invalidate_with_parent(h);
        if let Some(w) = self.widgets.get_mut(h) {
            w.flags.set(WidgetFlags::HEIGHT_FILL, fill);
        }
        self.refresh_geometry(h);
        self.invalidate_with_parent(h);
    }

    /// Set position in pixels relative to the parent's inner box.
    pub fn set_position(
        &mut self,
        h: WidgetHandle,
        x: f32,
        y: f32,
    ) {
        self.apply_position(h, Some((x, Unit::Pixels)), Some((y, Unit::Pixels)));
    }

    pub fn set_position_percent(
        &mut self,
        h: WidgetHandle,
        x: f32,
        y: f32,
    ) {
        self.apply_position(h, Some((x, Unit::Percent)), Some((y, Unit::Percent)));
    }

    pub fn set_x(
        &mut self,
        h: WidgetHandle,
        x: f32,
        unit: Unit,
    ) {
        self.apply_position(h, Some((x, unit)), None);
    }

    pub fn set_y(
        &mut self,
        h: WidgetHandle,
        y: f32,
        unit: Unit,
    ) {
        self.apply_position(h, None, Some((y, unit)));
    }

    /// Expand over the parent's inner box, or return to the own geometry.
    pub fn set_expanded(
        &mut self,
        h: WidgetHandle,
        expanded: bool,
    ) {
        let current = self.is_expanded(h);
        if current && !expanded {
            self.invalidate_with_parent(h);
            self.clear_flag(h, WidgetFlags::EXPANDED);
            self.refresh_geometry(h);
        } else if !current && expanded {
            self.set_flag(h, WidgetFlags::EXPANDED);
            self.refresh_geometry(h);
            // Covers the whole parent box; the widget alone repaints it
            self.invalidate(h);
        }
    }

    pub fn toggle_expanded(
        &mut self,
        h: WidgetHandle,
    ) {
        let expanded = self.is_expanded(h);
        self.set_expanded(h, !expanded);
    }

    /// Set all four paddings.
    pub fn set_padding(
        &mut self,
        h: WidgetHandle,
        padding: Padding,
    ) {
        let Some(w) = self.widgets.get_mut(h) else {
            return;
        };
        if w.padding == padding {
            return;
        }
        w.padding = padding;
        self.refresh_geometry(h);
        self.invalidate(h);
    }

    pub fn set_padding_top(
        &mut self,
        h: WidgetHandle,
        top: i32,
    ) {
        let pad = Padding { top, ..self.padding(h) };
        self.set_padding(h, pad);
    }

    pub fn set_padding_right(
        &mut self,
        h: WidgetHandle,
        right: i32,
    ) {
        let pad = Padding { right, ..self.padding(h) };
        self.set_padding(h, pad);
    }

    pub fn set_padding_bottom(
        &mut self,
        h: WidgetHandle,
        bottom: i32,
    ) {
        let pad = Padding { bottom, ..self.padding(h) };
        self.set_padding(h, pad);
    }

    pub fn set_padding_left(
        &mut self,
        h: WidgetHandle,
        left: i32,
    ) {
        let pad = Padding { left, ..self.padding(h) };
        self.set_padding(h, pad);
    }

    /// Set the children scroll offset. Only children-allowing widgets scroll.
    pub fn set_scroll(
        &mut self,
        h: WidgetHandle,
        x: i32,
        y: i32,
    ) -> crate::GuiResult<()> {
        if !self.contains(h) {
            return Err(crate::GuiError::InvalidHandle);
        }
        if !self.allows_children(h) {
            return Err(crate::GuiError::ChildrenNotAllowed);
        }
        if self.scroll(h) != (x, y) {
            if let Some(w) = self.widgets.get_mut(h) {
                w.scroll_x = x;
                w.scroll_y = y;
            }
            self.refresh_geometry(h);
            self.invalidate(h);
        }
        Ok(())
    }

    /// Add to the children scroll offset.
    pub fn inc_scroll(
        &mut self,
        h: WidgetHandle,
        dx: i32,
        dy: i32,
    ) -> crate::GuiResult<()> {
        let (x, y) = self.scroll(h);
        self.set_scroll(h, x + dx, y + dy)
    }
}
