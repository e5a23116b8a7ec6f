use chrono::Datelike;
use num_format::{Locale, ToFormattedString};

use crate::config::FormattingConfig;
use crate::types::DayKey;

#[derive(Clone)]
pub struct NumberFormatOptions {
    pub use_comma: bool,
    pub use_human: bool,
    pub locale: String,
    pub decimal_places: usize,
}

impl From<&FormattingConfig> for NumberFormatOptions {
    fn from(config: &FormattingConfig) -> Self {
        Self {
            use_comma: config.number_comma,
            use_human: config.number_human,
            locale: config.locale.clone(),
            decimal_places: config.decimal_places,
        }
    }
}

fn locale_for(name: &str) -> Locale {
    match name {
        "de" => Locale::de,
        "fr" => Locale::fr,
        "es" => Locale::es,
        "it" => Locale::it,
        "ja" => Locale::ja,
        "ko" => Locale::ko,
        "zh" => Locale::zh,
        _ => Locale::en,
    }
}

/// Format a number for display. Accepts both u32 and u64.
pub fn format_number(n: impl Into<u64>, options: &NumberFormatOptions) -> String {
    let n: u64 = n.into();
    let locale = locale_for(&options.locale);

    if options.use_human {
        if n >= 1_000_000_000_000 {
            format!(
                "{:.prec$}t",
                n as f64 / 1_000_000_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000_000_000 {
            format!(
                "{:.prec$}b",
                n as f64 / 1_000_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000_000 {
            format!(
                "{:.prec$}m",
                n as f64 / 1_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000 {
            format!(
                "{:.prec$}k",
                n as f64 / 1_000.0,
                prec = options.decimal_places
            )
        } else {
            n.to_string()
        }
    } else if options.use_comma {
        n.to_formatted_string(&locale)
    } else {
        n.to_string()
    }
}

/// Format an aggregate total with a fixed number of decimal places.
///
/// Whole values go through [`format_number`] when human or comma formatting
/// is on, so `1500` reads as `1.5k` or `1,500`.
pub fn format_total(value: f64, options: &NumberFormatOptions) -> String {
    let is_whole = value.fract() == 0.0 && value >= 0.0 && value < u64::MAX as f64;
    if is_whole && (options.use_human || options.use_comma) {
        return format_number(value as u64, options);
    }
    format!("{:.prec$}", value, prec = options.decimal_places)
}

/// Render a day as `M/D/YYYY`, starred when it is `today`.
pub fn format_date_for_display(day: DayKey, today: DayKey) -> String {
    let Some(date) = day.to_date() else {
        return day.to_string();
    };

    let formatted = format!("{}/{}/{}", date.month(), date.day(), date.year());
    if day == today {
        format!("{formatted}*")
    } else {
        formatted
    }
}

/// Today's calendar day in the local timezone.
pub fn today() -> DayKey {
    DayKey::from_date(chrono::Local::now().date_naive())
}
