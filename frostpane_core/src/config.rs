// Copyright 2026 the Frostpane Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effect configuration.
//!
//! [`EffectConfig`] carries the options read once at construction. All of
//! them remain mutable afterwards; each mutation takes effect on the next
//! cycle. [`ConfigOption`] is the typed form of the host's named-option
//! set, consumed by [`EffectConfig::from_options`].

use crate::color::Argb;

/// Tag value meaning "no explicit target".
pub const NO_TARGET_TAG: i32 = -1;

/// Configuration for a backdrop-blur effect.
#[derive(Clone, Copy, Debug)]
pub struct EffectConfig {
    /// Fraction of full resolution to rasterize at (0 < f ≤ 1).
    pub downscale_factor: f64,
    /// Radius passed opaquely to the blur stage.
    pub blur_radius: u32,
    /// Scheduler tick rate in frames per second; 0 disables the loop.
    pub fps: u32,
    /// Corner radius for clipping the presented output.
    pub corner_radius: f64,
    /// Parsed but currently applied nowhere in the pipeline.
    pub alpha: f64,
    /// Tint composited over the sampled content as a translucent veil.
    pub front_color: Argb,
    /// Tint the output buffer is filled with before sampling.
    pub back_color: Argb,
    /// Lookup key for the target surface; [`NO_TARGET_TAG`] when unset.
    pub target_tag: i32,
}

impl EffectConfig {
    /// The default configuration.
    pub const DEFAULT: Self = Self {
        downscale_factor: 0.3,
        blur_radius: 12,
        fps: 60,
        corner_radius: 0.0,
        alpha: f64::NAN,
        front_color: Argb::TRANSPARENT,
        back_color: Argb::TRANSPARENT,
        target_tag: NO_TARGET_TAG,
    };

    /// Builds a configuration from a set of named options, starting from
    /// the defaults. Later options override earlier ones.
    #[must_use]
    pub fn from_options(options: impl IntoIterator<Item = ConfigOption>) -> Self {
        let mut config = Self::DEFAULT;
        for option in options {
            config.apply(option);
        }
        config
    }

    /// Applies a single named option.
    pub fn apply(&mut self, option: ConfigOption) {
        match option {
            ConfigOption::DownscaleFactor(f) => self.downscale_factor = f,
            ConfigOption::BlurRadius(r) => self.blur_radius = r,
            ConfigOption::Fps(fps) => self.fps = fps,
            ConfigOption::CornerRadius(r) => self.corner_radius = r,
            ConfigOption::Alpha(a) => self.alpha = a,
            ConfigOption::FrontColor(c) => self.front_color = c,
            ConfigOption::BackColor(c) => self.back_color = c,
            ConfigOption::TargetTag(t) => self.target_tag = t,
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One recognized named option.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigOption {
    /// Rasterization scale.
    DownscaleFactor(f64),
    /// Passed opaquely to the blur stage.
    BlurRadius(u32),
    /// Scheduler tick rate; 0 disables.
    Fps(u32),
    /// Output clip radius.
    CornerRadius(f64),
    /// Currently inert (see [`EffectConfig::alpha`]).
    Alpha(f64),
    /// Front tint overlay color.
    FrontColor(Argb),
    /// Back tint overlay color.
    BackColor(Argb),
    /// Ancestor-subtree lookup key.
    TargetTag(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_attribute_table() {
        let c = EffectConfig::DEFAULT;
        assert!((c.downscale_factor - 0.3).abs() < 1e-12);
        assert_eq!(c.blur_radius, 12);
        assert_eq!(c.fps, 60);
        assert_eq!(c.corner_radius, 0.0);
        assert!(c.alpha.is_nan(), "alpha defaults to unset");
        assert_eq!(c.front_color, Argb::TRANSPARENT);
        assert_eq!(c.back_color, Argb::TRANSPARENT);
        assert_eq!(c.target_tag, NO_TARGET_TAG);
    }

    #[test]
    fn from_options_overrides_defaults() {
        let c = EffectConfig::from_options([
            ConfigOption::Fps(30),
            ConfigOption::BlurRadius(4),
            ConfigOption::FrontColor(Argb::new(64, 255, 255, 255)),
            ConfigOption::TargetTag(17),
        ]);
        assert_eq!(c.fps, 30);
        assert_eq!(c.blur_radius, 4);
        assert_eq!(c.front_color, Argb::new(64, 255, 255, 255));
        assert_eq!(c.target_tag, 17);
        // Untouched options keep their defaults.
        assert!((c.downscale_factor - 0.3).abs() < 1e-12);
    }

    #[test]
    fn later_options_win() {
        let c = EffectConfig::from_options([ConfigOption::Fps(30), ConfigOption::Fps(24)]);
        assert_eq!(c.fps, 24);
    }
}
