//! Per-session settings read by the dispatch on every connector.
//!
//! The settings panel owns these values; the engine receives a copy each
//! frame and never mutates it.

use crate::effects::CurveEffect;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationMode {
    /// Effects are drawn frozen at one fixed frame.
    Static,
    /// Every connector animates.
    #[default]
    Full,
    /// Only connectors touching a selected node animate.
    Selected,
}

impl AnimationMode {
    pub const ALL: [AnimationMode; 3] = [
        AnimationMode::Static,
        AnimationMode::Full,
        AnimationMode::Selected,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimationMode::Static => "static",
            AnimationMode::Full => "full",
            AnimationMode::Selected => "selected",
        }
    }
}

impl fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnimationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AnimationMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectConfig {
    pub effect: Option<CurveEffect>,
    pub mode: AnimationMode,
    pub gravity: bool,
}

impl EffectConfig {
    /// Selects an effect by its panel index; `None` turns effects off.
    pub fn set_effect_index(&mut self, index: Option<usize>) -> Result<(), ConfigError> {
        self.effect = match index {
            Some(i) => Some(CurveEffect::from_index(i).ok_or(ConfigError::EffectIndex(i))?),
            None => None,
        };
        Ok(())
    }

    /// Whether anything on screen changes without user input, i.e. whether the
    /// redraw scheduler has work to do.
    pub fn is_animating(&self) -> bool {
        (self.effect.is_some() && self.mode != AnimationMode::Static) || self.gravity
    }
}
