//! Export naming contract: the file names a packaging collaborator expects,
//! derived from locale-aware display names.

use crate::palette::{Lang, PaletteColor};

/// Filename-safe slug of a display name: diacritics folded, anything outside
/// `[A-Za-z0-9-_]` collapsed to a single `_`, trimmed, lowercased.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().map(fold_diacritic) {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

// Covers the Latin-1 accents that occur in the palette's French names; other
// non-ASCII characters fall through to the `_` replacement.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' | 'À' | 'Â' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'î' | 'ï' | 'Î' | 'Ï' => 'i',
        'ô' | 'ö' | 'Ô' | 'Ö' => 'o',
        'ù' | 'û' | 'ü' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        _ => c,
    }
}

pub fn complete_raster_name(lang: Lang) -> &'static str {
    match lang {
        Lang::Fr => "halftone_complet.png",
        Lang::En => "halftone_complete.png",
    }
}

pub fn complete_vector_name(lang: Lang) -> &'static str {
    match lang {
        Lang::Fr => "halftone_complet.svg",
        Lang::En => "halftone_complete.svg",
    }
}

pub fn layer_raster_name(lang: Lang, color: &PaletteColor) -> String {
    format!("halftone_{}.png", slugify(color.display_name(lang)))
}

pub fn layer_vector_name(lang: Lang, color: &PaletteColor) -> String {
    format!("halftone_{}.svg", slugify(color.display_name(lang)))
}
