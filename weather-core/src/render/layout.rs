//! Fixed positions of the text fields on the 300x300 card.

use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;

use super::{
    compass::cardinal_name,
    scene::{Anchor, Canvas, FontSize},
};
use crate::model::{PlaceName, WeatherObservation};

const LABEL_X: f32 = 10.0;
const VALUE_X: f32 = 290.0;
const FOOTER_Y: f32 = 290.0;

/// Top-aligned (baseline one line below `y`).
const LABEL_ANCHOR: Anchor = Anchor::new(0.0, 1.0);
const VALUE_ANCHOR: Anchor = Anchor::new(1.0, 1.0);

#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    /// Left-anchored caption; the wind direction row has none.
    pub label: Option<&'static str>,
    /// Right-anchored value including its unit.
    pub value: String,
    pub y: f32,
}

/// Shortest decimal form with trailing zeros trimmed: `21.5`, `40`, `-0.3`.
///
/// Decimal exponents below -4 or from 6 up switch to scientific notation with
/// a signed, two-digit exponent (`1e-05`, `1.234567e+06`).
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exp)) = scientific.split_once('e') else {
        return format!("{value}");
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if (-4..6).contains(&exp) {
        format!("{value}")
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

/// RFC 3339 with seconds and a numeric offset, in `zone` when given.
pub fn format_timestamp(observed_at: &DateTime<Tz>, zone: Option<Tz>) -> String {
    match zone {
        Some(zone) => observed_at
            .with_timezone(&zone)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        None => observed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// The primary-font rows, top to bottom.
pub fn text_fields(observation: &WeatherObservation) -> Vec<TextField> {
    vec![
        TextField {
            label: Some("Temp:"),
            value: format!("{} °C", format_value(observation.temperature_c)),
            y: 10.0,
        },
        TextField {
            label: Some("Humd:"),
            value: format!("{} %", format_value(observation.relative_humidity_pct)),
            y: 40.0,
        },
        TextField {
            label: Some("Prep:"),
            value: format!(
                "{} %",
                format_value(observation.precipitation_probability_pct)
            ),
            y: 70.0,
        },
        TextField {
            label: Some("Wind:"),
            value: format!("{} km/h", format_value(observation.wind_speed_kmh)),
            y: 100.0,
        },
        TextField {
            label: None,
            value: cardinal_name(observation.wind_direction_deg).to_string(),
            y: 130.0,
        },
    ]
}

pub fn draw_text_fields(canvas: &mut Canvas, fields: &[TextField]) {
    canvas.set_font_size(FontSize::Primary);
    for field in fields {
        if let Some(label) = field.label {
            canvas.draw_text_anchored(label, LABEL_X, field.y, LABEL_ANCHOR);
        }
        canvas.draw_text_anchored(field.value.as_str(), VALUE_X, field.y, VALUE_ANCHOR);
    }
}

/// Place name bottom-left, timestamp bottom-right, in the secondary font.
pub fn draw_footer(canvas: &mut Canvas, place: &PlaceName, timestamp: &str) {
    canvas.set_font_size(FontSize::Secondary);
    canvas.draw_text_anchored(place.as_str(), LABEL_X, FOOTER_Y, Anchor::new(0.0, 0.0));
    canvas.draw_text_anchored(timestamp, VALUE_X, FOOTER_Y, Anchor::new(1.0, 0.0));
}
