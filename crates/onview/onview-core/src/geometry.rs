//! Viewport geometry for headless visibility evaluation.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Overlap with `other`; edge-adjacent rectangles yield a zero-area rect.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right >= x && bottom >= y {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }
}

/// One side of a root margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (number, ctor): (&str, fn(f64) -> Self) = if let Some(n) = token.strip_suffix("px") {
            (n, MarginLength::Px)
        } else if let Some(n) = token.strip_suffix('%') {
            (n, MarginLength::Percent)
        } else {
            (token, MarginLength::Px)
        };
        let value: f64 = number.parse().ok().filter(|v: &f64| v.is_finite())?;
        // Unitless lengths are only valid for zero.
        if number.len() == token.len() && value != 0.0 {
            return None;
        }
        Some(ctor(value))
    }

    /// Resolve against the root extent along the same axis.
    #[inline]
    pub fn resolve(&self, extent: f64) -> f64 {
        match *self {
            MarginLength::Px(px) => px,
            MarginLength::Percent(pct) => extent * pct / 100.0,
        }
    }
}

/// CSS-style four-side margin applied to the root before intersecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = MarginLength::Px(0.0);
        Self {
            top: zero,
            right: zero,
            bottom: zero,
            left: zero,
        }
    }
}

impl RootMargin {
    /// Parse the 1–4 value shorthand (`"10px"`, `"0px 0px -10% 0px"`).
    pub fn parse(s: &str) -> Option<Self> {
        let parts = s
            .split_whitespace()
            .map(MarginLength::parse)
            .collect::<Option<Vec<_>>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [a] => (*a, *a, *a, *a),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return None,
        };
        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Grow (or shrink, for negative lengths) `root` by this margin.
    pub fn apply(&self, root: &Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_margin_trims_bottom_tenth() {
        let margin = RootMargin::parse("0px 0px -10% 0px").unwrap();
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(margin.apply(&viewport), Rect::new(0.0, 0.0, 1000.0, 720.0));
    }

    #[test]
    fn shorthand_forms() {
        let two = RootMargin::parse("10px 5%").unwrap();
        assert_eq!(two.top, MarginLength::Px(10.0));
        assert_eq!(two.left, MarginLength::Percent(5.0));
        assert_eq!(RootMargin::parse("0").unwrap(), RootMargin::default());
        assert!(RootMargin::parse("10").is_none());
        assert!(RootMargin::parse("1px 2px 3px 4px 5px").is_none());
        assert!(RootMargin::parse("wide").is_none());
        assert!(RootMargin::parse("").is_none());
    }

    #[test]
    fn intersect_counts_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b).map(|r| r.area()), Some(0.0));
        assert!(a.intersect(&Rect::new(11.0, 0.0, 1.0, 1.0)).is_none());
    }
}
