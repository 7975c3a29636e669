//! Extracción de la fecha de salida a partir de texto libre.
//!
//! Se prueban varios patrones en orden; el primero que produce una fecha de
//! calendario válida gana. Si ninguno lo consigue se usa hoy + 7 días, de modo
//! que el resultado siempre es una fecha ISO válida.

use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Días que se suman a hoy cuando el texto no contiene ninguna fecha.
pub const DEFAULT_OFFSET_DAYS: u64 = 7;

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec";

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").expect("regex válida"));
static US_SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").expect("regex válida"));
static US_DASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})-(\d{1,2})-(\d{4})").expect("regex válida"));
static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b({MONTHS})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:\s+(\d{{4}}))?"
    ))
    .expect("regex válida")
});
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTHS})\b(?:\s+(\d{{4}}))?"
    ))
    .expect("regex válida")
});
static RELATIVE_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(today|tomorrow|yesterday)\b").expect("regex válida"));
static RELATIVE_WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(next|this)\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday|week|month)\b")
        .expect("regex válida")
});
static RELATIVE_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bin\s+(\d+)\s+(days?|weeks?|months?)\b").expect("regex válida")
});

/// Un paso de la cadena: `None` significa "no aplica, probar el siguiente".
type DateMatcher = fn(&str, NaiveDate) -> Option<NaiveDate>;

const MATCHERS: &[(&str, DateMatcher)] = &[
    ("yyyy-mm-dd", match_iso),
    ("mm/dd/yyyy", match_us_slash),
    ("mm-dd-yyyy", match_us_dash),
    ("mes día", match_month_day),
    ("día mes", match_day_month),
    ("relativa", match_relative_day),
    ("día de la semana", match_relative_weekday),
    ("dentro de N", match_relative_offset),
];

/// Interpreta la fecha usando el día local actual como referencia.
pub fn parse_date(text: &str) -> String {
    parse_date_on(text, Local::now().date_naive())
}

/// Interpreta la fecha tomando `today` como referencia.
pub fn parse_date_on(text: &str, today: NaiveDate) -> String {
    let lower = text.to_lowercase();

    for (name, matcher) in MATCHERS {
        if let Some(date) = matcher(&lower, today) {
            debug!("Fecha encontrada con el patrón {name}: {date}");
            return format_iso(date);
        }
    }

    let fallback = default_date(today);
    debug!("Sin fecha en el texto, se usa la fecha por defecto {fallback}");
    format_iso(fallback)
}

/// Hoy + 7 días.
pub fn default_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(DEFAULT_OFFSET_DAYS))
        .unwrap_or(today)
}

fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

fn match_iso(text: &str, _today: NaiveDate) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(text)?;
    NaiveDate::from_ymd_opt(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3)?)
}

fn match_us_slash(text: &str, _today: NaiveDate) -> Option<NaiveDate> {
    let caps = US_SLASH_DATE.captures(text)?;
    NaiveDate::from_ymd_opt(number(&caps, 3)?, number(&caps, 1)?, number(&caps, 2)?)
}

fn match_us_dash(text: &str, _today: NaiveDate) -> Option<NaiveDate> {
    let caps = US_DASH_DATE.captures(text)?;
    NaiveDate::from_ymd_opt(number(&caps, 3)?, number(&caps, 1)?, number(&caps, 2)?)
}

fn match_month_day(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = MONTH_DAY.captures(text)?;
    let month = month_number(caps.get(1)?.as_str())?;
    calendar_date(month, number(&caps, 2)?, number(&caps, 3), today)
}

fn match_day_month(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = DAY_MONTH.captures(text)?;
    let month = month_number(caps.get(2)?.as_str())?;
    calendar_date(month, number(&caps, 1)?, number(&caps, 3), today)
}

/// Fecha de mes + día. Sin año explícito, una fecha ya pasada se lleva al año
/// siguiente.
fn calendar_date(month: u32, day: u32, year: Option<i32>, today: NaiveDate) -> Option<NaiveDate> {
    if day == 0 || day > 31 {
        return None;
    }
    match year {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day),
        None => {
            let date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
            if date < today {
                NaiveDate::from_ymd_opt(today.year() + 1, month, day)
            } else {
                Some(date)
            }
        }
    }
}

fn match_relative_day(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = RELATIVE_DAY.captures(text)?;
    match caps.get(1)?.as_str() {
        "tomorrow" => today.succ_opt(),
        "yesterday" => today.pred_opt(),
        _ => Some(today),
    }
}

// Las dos expresiones siguientes se reconocen pero todavía no producen fecha:
// el texto cae a la fecha por defecto.

fn match_relative_weekday(text: &str, _today: NaiveDate) -> Option<NaiveDate> {
    let caps = RELATIVE_WEEKDAY.captures(text)?;
    debug!("Expresión relativa sin resolver: \"{}\"", &caps[0]);
    None
}

fn match_relative_offset(text: &str, _today: NaiveDate) -> Option<NaiveDate> {
    let caps = RELATIVE_OFFSET.captures(text)?;
    debug!("Desplazamiento relativo sin resolver: \"{}\"", &caps[0]);
    None
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_date_is_returned_verbatim() {
        assert_eq!(parse_date("2025-07-28 flight"), "2025-07-28");
        assert_eq!(parse_date_on("fly on 2025-7-4", day(2025, 1, 1)), "2025-07-04");
    }

    #[test]
    fn us_numeric_formats() {
        let today = day(2025, 1, 1);
        assert_eq!(parse_date_on("leaving 07/28/2025", today), "2025-07-28");
        assert_eq!(parse_date_on("leaving 7-4-2026", today), "2026-07-04");
    }

    #[test]
    fn month_name_then_day() {
        let today = day(2025, 6, 1);
        assert_eq!(parse_date_on("New York to Paris July 28", today), "2025-07-28");
        assert_eq!(parse_date_on("dec 3rd", today), "2025-12-03");
        assert_eq!(parse_date_on("march 5 2027", today), "2027-03-05");
    }

    #[test]
    fn day_then_month_name() {
        let today = day(2025, 6, 1);
        assert_eq!(parse_date_on("paris on 14th july", today), "2025-07-14");
        assert_eq!(parse_date_on("1 sep 2026", today), "2026-09-01");
    }

    #[test]
    fn past_month_day_rolls_into_next_year() {
        let today = day(2025, 8, 10);
        assert_eq!(parse_date_on("chicago to miami july 28", today), "2026-07-28");
        // Hoy mismo no se considera pasado.
        assert_eq!(parse_date_on("august 10", today), "2025-08-10");
        // Con año explícito no hay ajuste.
        assert_eq!(parse_date_on("july 28 2025", today), "2025-07-28");
    }

    #[test]
    fn relative_words() {
        let today = day(2025, 12, 31);
        assert_eq!(parse_date_on("today", today), "2025-12-31");
        assert_eq!(parse_date_on("Tomorrow please", today), "2026-01-01");
        assert_eq!(parse_date_on("like yesterday", today), "2025-12-30");
    }

    #[test]
    fn no_date_falls_back_to_a_week_from_today() {
        let today = day(2025, 2, 25);
        assert_eq!(parse_date_on("flights to Miami", today), "2025-03-04");
        assert_eq!(parse_date_on("", today), "2025-03-04");
    }

    #[test]
    fn recognized_but_unresolved_phrases_fall_through() {
        let today = day(2025, 2, 25);
        assert_eq!(parse_date_on("next tuesday to london", today), "2025-03-04");
        assert_eq!(parse_date_on("bali in 2 weeks", today), "2025-03-04");
    }

    #[test]
    fn invalid_calendar_dates_are_skipped() {
        let today = day(2025, 2, 25);
        // 30 de febrero no existe: se ignora y gana la fecha por defecto.
        assert_eq!(parse_date_on("2025-02-30", today), "2025-03-04");
        assert_eq!(parse_date_on("july 45", today), "2025-03-04");
        // Un patrón inválido no impide que otro posterior funcione.
        assert_eq!(parse_date_on("13/45/2025 or tomorrow", today), "2025-02-26");
    }

    #[test]
    fn default_path_uses_real_clock() {
        let expected = format_iso(default_date(Local::now().date_naive()));
        assert_eq!(parse_date("no dates here"), expected);
    }
}
