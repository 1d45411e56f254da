//! Conversions between script text and model units: packed team colours,
//! start-box fractions, and unitsync checksums.

use crate::sections::ScriptValue;
use springscript_model::StartBox;

// ── Colour ───────────────────────────────────────────────────────────

/// A `0xRRGGBB` colour, written in scripts as three floats in 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn from_components(components: [f32; 3]) -> Rgb {
        let [r, g, b] = components.map(to_byte);
        Rgb(r << 16 | g << 8 | b)
    }

    pub fn components(self) -> [f32; 3] {
        [(self.0 >> 16) & 0xFF, (self.0 >> 8) & 0xFF, self.0 & 0xFF].map(|c| c as f32 / 255.0)
    }

    /// Script form, e.g. `"1 0 0.5019608"`.
    pub fn to_script(self) -> String {
        let [r, g, b] = self.components();
        format!("{} {} {}", r, g, b)
    }
}

fn to_byte(component: f32) -> u32 {
    (component * 255.0).round().clamp(0.0, 255.0) as u32
}

impl ScriptValue for Rgb {
    const TYPE_NAME: &'static str = "rgb color";

    fn parse_value(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(|p| p.parse::<f32>().ok());
        let r = parts.next()??;
        let g = parts.next()??;
        let b = parts.next()??;
        Some(Rgb::from_components([r, g, b]))
    }
}

// ── Start boxes ──────────────────────────────────────────────────────

/// Scale a 0-1 rectangle edge onto the 0-200 start-box axis. Edges outside
/// 0-1, NaN included, have no place on the axis.
pub fn fraction_to_box_axis(fraction: f32) -> Option<i32> {
    (0.0..=1.0)
        .contains(&fraction)
        .then(|| (fraction * StartBox::SCALE as f32).round() as i32)
}

/// Inverse of [`fraction_to_box_axis`].
pub fn box_axis_to_fraction(value: i32) -> f32 {
    value as f32 / StartBox::SCALE as f32
}

/// Build a start box from the four rectangle edges (0-1 fractions). `None`
/// when an edge is off the axis or the rectangle is inverted.
pub fn start_box_from_rect(left: f32, top: f32, right: f32, bottom: f32) -> Option<StartBox> {
    let x = fraction_to_box_axis(left)?;
    let y = fraction_to_box_axis(top)?;
    let width = fraction_to_box_axis(right)?.checked_sub(x)?;
    let height = fraction_to_box_axis(bottom)?.checked_sub(y)?;
    let start_box = StartBox::new(x, y, width, height);
    start_box.is_within_scale().then_some(start_box)
}

// ── Checksums ────────────────────────────────────────────────────────

/// A unitsync map/mod checksum.
///
/// Stored as `i32`; lobbies sometimes print the same bits unsigned, so values
/// in the `u32` range are accepted and reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum(pub i32);

impl ScriptValue for Checksum {
    const TYPE_NAME: &'static str = "32-bit checksum";

    fn parse_value(raw: &str) -> Option<Self> {
        let wide: i64 = raw.parse().ok()?;
        if let Ok(signed) = i32::try_from(wide) {
            return Some(Checksum(signed));
        }
        u32::try_from(wide).ok().map(|unsigned| Checksum(unsigned as i32))
    }
}
