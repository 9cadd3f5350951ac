use crate::error::{ScreentoneError, ScreentoneResult};

/// Display language for color names and export file names.
///
/// French is the authoritative locale: English entries fall back to the French
/// name when absent, never the other way around.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Fr,
    En,
}

/// One catalog entry: a marker color with its print screen angle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaletteColor {
    /// Stable key, `#rrggbb` lowercase.
    pub hex: String,
    pub name_fr: String,
    pub name_en: String,
    /// Rotation of this color's sampling grid, in degrees.
    pub screen_angle_degrees: f64,
}

impl PaletteColor {
    pub fn display_name(&self, lang: Lang) -> &str {
        match lang {
            Lang::Fr => &self.name_fr,
            Lang::En => {
                if self.name_en.is_empty() {
                    &self.name_fr
                } else {
                    &self.name_en
                }
            }
        }
    }

    /// Decode the `#rrggbb` key into raw channels.
    pub fn rgb(&self) -> ScreentoneResult<[u8; 3]> {
        parse_hex_rgb(&self.hex)
    }
}

pub fn parse_hex_rgb(hex: &str) -> ScreentoneResult<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Err(ScreentoneError::validation(format!(
            "color '{hex}' is not a #rrggbb value"
        )));
    }
    let v = u32::from_str_radix(digits, 16).map_err(|_| {
        ScreentoneError::validation(format!("color '{hex}' is not a #rrggbb value"))
    })?;
    Ok([((v >> 16) & 255) as u8, ((v >> 8) & 255) as u8, (v & 255) as u8])
}

/// Screen angle for catalog entries without a design-table value.
pub fn fallback_screen_angle(catalog_index: usize) -> f64 {
    ((catalog_index * 3) % 90) as f64
}

/// The fixed marker palette.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<PaletteColor>,
}

// (hex, fr, en, design-table screen angle). Angles follow classic process
// separations: grays on 45, yellows near 0/90, warm tones in the 70-85 band,
// cool tones spread through the low range.
const CATALOG: &[(&str, &str, &str, Option<f64>)] = &[
    ("#000000", "noir", "black", Some(45.0)),
    ("#ffffff", "blanc", "white", Some(0.0)),
    ("#aaaeae", "gris", "gray", Some(45.0)),
    ("#540305", "marron foncé", "dark brown", Some(48.0)),
    ("#800000", "marron", "brown", Some(42.0)),
    ("#efe8a2", "ivoire", "ivory", Some(3.0)),
    ("#d9c488", "beige", "beige", Some(6.0)),
    ("#cce6f6", "bleu marine", "navy blue", Some(15.0)),
    ("#0d4e9f", "bleu foncé", "dark blue", Some(18.0)),
    ("#14aee5", "bleu clair", "light blue", Some(12.0)),
    ("#0fa2dd", "turquoise", "turquoise", Some(21.0)),
    ("#4fb4e7", "bleu ciel", "sky blue", Some(9.0)),
    ("#437696", "gris ardoise", "slate gray", Some(24.0)),
    ("#9993c4", "lilas", "lilac", Some(60.0)),
    ("#4d4e8d", "violet", "violet", Some(63.0)),
    ("#c71574", "rose fushia", "fuchsia", Some(75.0)),
    ("#e9138d", "rose", "pink", Some(72.0)),
    ("#f7a386", "corail", "coral", Some(78.0)),
    ("#ef85b3", "rose clair", "light pink", Some(69.0)),
    ("#ee1d26", "rouge", "red", Some(75.0)),
    ("#b91d3d", "rouge foncé", "dark red", Some(78.0)),
    ("#850e3d", "lie-de-vin", "burgundy", Some(81.0)),
    ("#f57420", "orange foncé", "dark orange", Some(84.0)),
    ("#fcce22", "orange", "orange", Some(87.0)),
    ("#f9bf70", "rose saumon", "salmon pink", Some(81.0)),
    ("#f2ed3a", "jaune", "yellow", Some(0.0)),
    ("#fae57c", "jaune paille", "straw yellow", Some(3.0)),
    ("#d0dd3a", "vert pomme", "apple green", Some(30.0)),
    ("#7ac9ac", "vert clair", "light green", Some(33.0)),
    ("#63c7c4", "vert d'eau", "aqua green", Some(27.0)),
    ("#19a252", "vert foncé", "dark green", Some(36.0)),
    ("#11b58d", "vert émeraude", "emerald green", Some(39.0)),
    ("#3f481d", "kaki", "khaki", Some(42.0)),
];

impl Palette {
    pub fn builtin() -> Self {
        let colors = CATALOG
            .iter()
            .enumerate()
            .map(|(i, &(hex, fr, en, angle))| PaletteColor {
                hex: hex.to_string(),
                name_fr: fr.to_string(),
                name_en: en.to_string(),
                screen_angle_degrees: angle.unwrap_or_else(|| fallback_screen_angle(i)),
            })
            .collect();
        Self { colors }
    }

    pub fn colors(&self) -> &[PaletteColor] {
        &self.colors
    }

    pub fn find(&self, hex: &str) -> Option<&PaletteColor> {
        self.colors.iter().find(|c| c.hex == hex)
    }
}
