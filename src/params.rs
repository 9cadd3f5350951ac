use crate::{
    error::{ScreentoneError, ScreentoneResult},
    palette::PaletteColor,
};

/// Inclusive band of acceptable Manhattan color distance.
///
/// A band, not a threshold: a pixel can fail a layer by being either too
/// similar (`d < min`) or too dissimilar (`d > max`). Distances over RGB8 fit
/// in `0..=765`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ToleranceBand {
    pub min: u16,
    pub max: u16,
}

impl Default for ToleranceBand {
    fn default() -> Self {
        Self { min: 0, max: 150 }
    }
}

impl ToleranceBand {
    pub fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Swap-on-violation normalization. Callers run this before the band ever
    /// reaches the separation loop; the loop assumes `min <= max`.
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            self
        }
    }

    pub fn contains(self, distance: u16) -> bool {
        self.min <= distance && distance <= self.max
    }
}

/// Dot geometry controls for one separation.
///
/// `dot_scale` is a spacing unit: the sampling grid steps by `2 * dot_scale`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HalftoneParams {
    pub dot_scale: f64,
    pub min_dot_size: f64,
    pub max_dot_size: f64,
    pub randomness_percent: u8,
}

impl Default for HalftoneParams {
    fn default() -> Self {
        Self {
            dot_scale: 5.0,
            min_dot_size: 2.0,
            max_dot_size: 8.0,
            randomness_percent: 0,
        }
    }
}

impl HalftoneParams {
    pub fn validate(&self) -> ScreentoneResult<()> {
        if !self.dot_scale.is_finite() || self.dot_scale <= 0.0 {
            return Err(ScreentoneError::validation("dot_scale must be > 0"));
        }
        if !self.min_dot_size.is_finite() || !self.max_dot_size.is_finite() {
            return Err(ScreentoneError::validation("dot sizes must be finite"));
        }
        if self.min_dot_size < 0.0 {
            return Err(ScreentoneError::validation("min_dot_size must be >= 0"));
        }
        if self.min_dot_size > self.max_dot_size {
            return Err(ScreentoneError::validation(
                "min_dot_size must be <= max_dot_size",
            ));
        }
        if self.randomness_percent > 100 {
            return Err(ScreentoneError::validation(
                "randomness_percent must be <= 100",
            ));
        }
        Ok(())
    }

    pub fn cell_size(&self) -> f64 {
        2.0 * self.dot_scale
    }
}

/// Session-wide settings a layer inherits unless it opts into its own.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SessionDefaults {
    pub halftone: HalftoneParams,
    pub tolerance: ToleranceBand,
}

/// One selected color plus its (possibly unused) per-layer settings.
///
/// The layer's own `tolerance`/`halftone` only take effect while
/// `custom_enabled` is set; otherwise the session defaults apply. This mirrors
/// a settings panel that keeps its slider state when toggled off.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub color: PaletteColor,
    #[serde(default)]
    pub tolerance: ToleranceBand,
    #[serde(default)]
    pub halftone: HalftoneParams,
    #[serde(default)]
    pub custom_enabled: bool,
}

impl Layer {
    pub fn new(color: PaletteColor) -> Self {
        Self {
            color,
            tolerance: ToleranceBand::default(),
            halftone: HalftoneParams::default(),
            custom_enabled: false,
        }
    }

    /// Flatten the two-level override into one effective parameter set.
    ///
    /// This is the only place the band is swap-normalized and the hex key is
    /// decoded; past this boundary the separation loop treats everything as
    /// already valid.
    pub fn resolve(&self, defaults: &SessionDefaults) -> ScreentoneResult<ResolvedLayer> {
        let (halftone, tolerance) = if self.custom_enabled {
            (self.halftone, self.tolerance)
        } else {
            (defaults.halftone, defaults.tolerance)
        };
        halftone.validate()?;
        Ok(ResolvedLayer {
            target_rgb: self.color.rgb()?,
            color: self.color.clone(),
            halftone,
            tolerance: tolerance.normalized(),
        })
    }
}

/// Effective per-layer parameters after override resolution.
#[derive(Clone, Debug)]
pub struct ResolvedLayer {
    pub color: PaletteColor,
    pub target_rgb: [u8; 3],
    pub halftone: HalftoneParams,
    pub tolerance: ToleranceBand,
}
