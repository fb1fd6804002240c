//! Counter easing curves.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
}

impl Easing {
    /// Resolve an authored easing name (case-insensitive).
    ///
    /// Missing or unrecognized names resolve to `fallback`.
    pub fn from_name(name: Option<&str>, fallback: Easing) -> Easing {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return fallback;
        };
        match name.to_ascii_lowercase().as_str() {
            "linear" => Easing::Linear,
            "easeoutcubic" | "ease-out-cubic" => Easing::EaseOutCubic,
            _ => fallback,
        }
    }

    /// Map linear progress `t` (clamped to `[0, 1]`) onto the curve.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for e in [Easing::Linear, Easing::EaseOutCubic] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
            assert_eq!(e.apply(2.0), 1.0);
        }
        assert_eq!(Easing::EaseOutCubic.apply(0.5), 0.875);
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
    }

    #[test]
    fn names_resolve() {
        let d = Easing::EaseOutCubic;
        assert_eq!(Easing::from_name(Some("Linear"), d), Easing::Linear);
        assert_eq!(Easing::from_name(Some("ease-out-cubic"), Easing::Linear), d);
        assert_eq!(Easing::from_name(Some("easeOutCubic"), Easing::Linear), d);
        assert_eq!(Easing::from_name(Some("bounce"), d), d);
        assert_eq!(Easing::from_name(None, Easing::Linear), Easing::Linear);
    }
}
