use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::stroke::{StrokeParams, DEFAULT_STEP_LENGTH, DEFAULT_STROKE_ALPHA};

#[derive(Debug, Clone, PartialEq, clap::Args, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Opacity (0-255) of every brush stroke. Speed never changes it.
    #[clap(long, default_value_t = DEFAULT_STROKE_ALPHA)]
    pub stroke_alpha: u8,

    /// Length of one stroke sub-segment, in canvas pixels. Smaller is smoother and slower.
    #[clap(long, default_value_t = DEFAULT_STEP_LENGTH)]
    pub step_length: f64,

    /// Number of random strokes laid down by `fill`.
    #[clap(long, default_value_t = 500)]
    pub fill_count: usize,

    /// Maximum per-axis distance between the two endpoints of a fill stroke.
    #[clap(long, default_value_t = 10)]
    pub fill_jitter: i32,

    /// Background color used when clearing, as `0xAARRGGBB` hex.
    #[clap(long, default_value = "ffffffff", value_parser = parse_argb)]
    pub background: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stroke_alpha: DEFAULT_STROKE_ALPHA,
            step_length: DEFAULT_STEP_LENGTH,
            fill_count: 500,
            fill_jitter: 10,
            background: Rgba::WHITE.to_argb(),
        }
    }
}

impl Config {
    pub fn stroke_params(&self) -> StrokeParams {
        StrokeParams {
            alpha: self.stroke_alpha,
            // Sub-segments shorter than a pixel only cost time.
            step_length: if self.step_length >= 1.0 {
                self.step_length
            } else {
                1.0
            },
        }
    }

    pub fn background(&self) -> Rgba {
        Rgba::from_argb(self.background).with_alpha(0xff)
    }
}

fn parse_argb(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() != 8 {
        return Err(format!("expected 8 hex digits, got {:?}", s));
    }
    let bytes = hex::decode(digits).map_err(|e| e.to_string())?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.stroke_params(), StrokeParams::default());
        assert_eq!(config.background(), Rgba::WHITE);
        assert_eq!(config.fill_count, 500);
        assert_eq!(config.fill_jitter, 10);
    }

    #[test]
    fn test_step_length_floor() {
        let config = Config {
            step_length: 0.0,
            ..Config::default()
        };
        assert_eq!(config.stroke_params().step_length, 1.0);
        let config = Config {
            step_length: f64::NAN,
            ..Config::default()
        };
        assert_eq!(config.stroke_params().step_length, 1.0);
    }

    #[test]
    fn test_partial_json() {
        let config: Config = serde_json::from_str(r#"{"strokeAlpha": 200, "fillCount": 3}"#).unwrap();
        assert_eq!(config.stroke_alpha, 200);
        assert_eq!(config.fill_count, 3);
        assert_eq!(config.step_length, DEFAULT_STEP_LENGTH);
    }

    #[test]
    fn test_parse_argb() {
        assert_eq!(parse_argb("ff102030"), Ok(0xff102030));
        assert_eq!(parse_argb("0x80ffffff"), Ok(0x80ffffff));
        assert!(parse_argb("fff").is_err());
        assert!(parse_argb("gggggggg").is_err());
    }
}
