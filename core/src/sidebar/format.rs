//! Text formatting for sidebar values: fixed unit suffixes and precisions.

use crate::profile::Coordinates;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Placeholder shown for missing optional values.
pub const NONE_TEXT: &str = "None";

/// Formats like a `{:.Ng}` general format: `precision` significant digits,
/// scientific notation only for very small or very large magnitudes, and no
/// trailing zeros.
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".into() } else { "0".into() };
    }

    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Shortest float text that still shows it is a float (`10.0`, `10.5`).
pub fn format_plain(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub fn format_timestamp(timestamp: Option<&NaiveDateTime>) -> String {
    timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NONE_TEXT.to_string())
}

pub fn format_recording_length(length_mm: f64, samples: usize) -> String {
    format!("{:.0} mm ({} Samples)", length_mm, samples)
}

/// Spatial resolution is stored in mm and shown in µm.
pub fn format_spatial_resolution(resolution_mm: f64) -> String {
    format!("{:.3} µm", resolution_mm * 1000.0)
}

pub fn format_overload(newton: f64) -> String {
    format!("{:.1} N", newton)
}

pub fn format_speed(mm_per_s: f64) -> String {
    format!("{:.1} mm/s", mm_per_s)
}

pub fn format_max_length(length_mm: u32) -> String {
    format!("{} mm", length_mm)
}

/// Tip diameter is stored in µm and shown in mm.
pub fn format_tip_diameter(diameter_um: f64) -> String {
    format!("{:.1} mm", diameter_um / 1000.0)
}

pub fn format_sensitivity(pc_per_n: f64) -> String {
    format!("{} pC/N", format_plain(pc_per_n))
}

pub fn format_marker_value(value: f64) -> String {
    format!("{:.3}", value)
}

/// Drift is N/mm; 1 N/mm is 10⁶ mN/m.
pub fn format_drift(drift: f64) -> String {
    format!("{} mN/m", format_general(drift * 1000.0 * 1000.0, 2))
}

/// Offset and noise are N, shown in mN.
pub fn format_millinewton(newton: f64) -> String {
    format!("{:.2} mN", newton * 1000.0)
}

/// Accepts only well-formed, finite decimal numbers such as `12`, `-0.5`,
/// `.25` or `1.5e2`.
pub fn parse_marker_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Coordinates text with an optional map link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatesCell {
    pub text: String,
    pub link: Option<String>,
}

impl CoordinatesCell {
    pub fn from_coordinates(coordinates: Option<&Coordinates>) -> Self {
        match coordinates {
            Some(c) => {
                let lat = format!("{:.6}", c.latitude);
                let long = format!("{:.6}", c.longitude);
                Self {
                    link: Some(format!(
                        "https://www.google.com/maps/search/?api=1&query={},{}",
                        lat, long
                    )),
                    text: format!("{}, {}", lat, long),
                }
            }
            None => Self::default(),
        }
    }
}

impl Default for CoordinatesCell {
    fn default() -> Self {
        Self {
            text: NONE_TEXT.to_string(),
            link: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_format_switches_notation_like_g() {
        assert_eq!(format_general(1.0, 2), "1");
        assert_eq!(format_general(0.001, 2), "0.001");
        assert_eq!(format_general(0.000123, 2), "0.00012");
        assert_eq!(format_general(0.0000123, 2), "1.2e-05");
        assert_eq!(format_general(12.34, 2), "12");
        assert_eq!(format_general(123.4, 2), "1.2e+02");
        assert_eq!(format_general(-2.5, 2), "-2.5");
        assert_eq!(format_general(0.0, 2), "0");
        assert_eq!(format_general(99.6, 2), "1e+02");
    }

    #[test]
    fn unit_formats_use_fixed_precision() {
        assert_eq!(format_recording_length(1234.4, 308_000), "1234 mm (308000 Samples)");
        assert_eq!(format_spatial_resolution(0.004), "4.000 µm");
        assert_eq!(format_overload(40.0), "40.0 N");
        assert_eq!(format_speed(20.0), "20.0 mm/s");
        assert_eq!(format_max_length(1000), "1000 mm");
        assert_eq!(format_tip_diameter(5000.0), "5.0 mm");
        assert_eq!(format_sensitivity(10.0), "10.0 pC/N");
        assert_eq!(format_sensitivity(9.12), "9.12 pC/N");
    }

    #[test]
    fn drift_offset_noise_conversions() {
        assert_eq!(format_drift(1e-6), "1 mN/m");
        assert_eq!(format_drift(2.345e-5), "23 mN/m");
        assert_eq!(format_millinewton(2e-3), "2.00 mN");
        assert_eq!(format_millinewton(3e-3), "3.00 mN");
        assert_eq!(format_millinewton(2e-6), "0.00 mN");
    }

    #[test]
    fn marker_text_parsing_rejects_malformed_input() {
        assert_eq!(parse_marker_text("12.5"), Some(12.5));
        assert_eq!(parse_marker_text(" -3 "), Some(-3.0));
        assert_eq!(parse_marker_text(".25"), Some(0.25));
        assert_eq!(parse_marker_text("1.5e2"), Some(150.0));
        for bad in ["abc", "", "  ", "1,5", "nan", "inf", "1e999", "12mm", "--1", "."] {
            assert_eq!(parse_marker_text(bad), None, "accepted {:?}", bad);
        }
    }

    #[test]
    fn coordinates_render_with_map_link() {
        let cell = CoordinatesCell::from_coordinates(Some(&Coordinates::new(47.123456, 8.987654)));
        assert_eq!(cell.text, "47.123456, 8.987654");
        assert_eq!(
            cell.link.as_deref(),
            Some("https://www.google.com/maps/search/?api=1&query=47.123456,8.987654")
        );

        let empty = CoordinatesCell::from_coordinates(None);
        assert_eq!(empty.text, "None");
        assert!(empty.link.is_none());
    }

    #[test]
    fn timestamp_placeholder_when_absent() {
        assert_eq!(format_timestamp(None), "None");
        let ts = NaiveDateTime::parse_from_str("2017-01-20 10:25:32", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(format_timestamp(Some(&ts)), "2017-01-20 10:25:32");
    }
}
