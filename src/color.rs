use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Tableau 20 qualitative palette
// ---------------------------------------------------------------------------

/// The "Tableau 20" colors as RGB.
const TABLEAU20: [Color32; 20] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(174, 199, 232),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(255, 187, 120),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(152, 223, 138),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(255, 152, 150),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(197, 176, 213),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(196, 156, 148),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(247, 182, 210),
    Color32::from_rgb(127, 127, 127),
    Color32::from_rgb(199, 199, 199),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(219, 219, 141),
    Color32::from_rgb(23, 190, 207),
    Color32::from_rgb(158, 218, 229),
];

/// Palette lookup, wrapping past the end.
pub fn tableau(i: usize) -> Color32 {
    TABLEAU20[i % TABLEAU20.len()]
}

// ---------------------------------------------------------------------------
// Element → color mapping for line labels
// ---------------------------------------------------------------------------

/// Palette slot of the grey fallback for elements without a dedicated color.
const NEUTRAL_IDX: usize = 14;

/// Color for a line label, keyed by element symbol (ionization already
/// stripped). Total: unknown symbols get the neutral grey.
pub fn element_color(elem: &str) -> Color32 {
    let idx = match elem {
        "Mg" => 0,  // dark blue
        "Fe" => 6,  // dark red
        "Ti" => 1,  // light blue
        "Na" => 16, // gold
        "O" => 4,   // dark green
        "Ni" => 6,  // dark red
        "C" => 2,   // dark orange
        "Cr" => 8,  // dark purple
        "Si" => 0,  // dark blue
        "Ca" => 18, // dark teal
        "Mn" => 2,  // dark orange
        _ => NEUTRAL_IDX,
    };
    tableau(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_elements_have_dedicated_colors() {
        assert_eq!(element_color("Fe"), tableau(6));
        assert_eq!(element_color("Mg"), tableau(0));
        assert_eq!(element_color("Ca"), tableau(18));
    }

    #[test]
    fn unknown_element_falls_back_to_grey() {
        assert_eq!(element_color("Xx"), tableau(NEUTRAL_IDX));
        assert_eq!(element_color(""), tableau(NEUTRAL_IDX));
        assert_eq!(element_color("C2"), tableau(NEUTRAL_IDX));
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(tableau(0), tableau(20));
    }
}
