//! Fixed pt-BR labels for dates and title ordering. Only one locale is
//! supported.

use chrono::{Datelike, NaiveDate, Weekday};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const MONTHS: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

const MONTHS_SHORT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun",
    "jul", "ago", "set", "out", "nov", "dez",
];

/// Column headings, Sunday first
pub const WEEKDAYS_SHORT: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

pub fn month_short(date: NaiveDate) -> &'static str {
    MONTHS_SHORT[date.month0() as usize]
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "domingo",
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
    }
}

/// `março de 2024`
pub fn month_year(date: NaiveDate) -> String {
    format!("{} de {}", month_name(date), date.year())
}

/// `sexta-feira, 5 de março de 2024`
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} de {} de {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date),
        date.year()
    )
}

/// `sexta-feira, 05 de março de 2024`, the day drawer heading
pub fn long_date_padded(date: NaiveDate) -> String {
    format!(
        "{}, {:02} de {} de {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date),
        date.year()
    )
}

/// `05 de mar.`
pub fn day_month_short(date: NaiveDate) -> String {
    format!("{:02} de {}.", date.day(), month_short(date))
}

/// Accents and case stripped, so `Área` files next to `area`
fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Alphabetical order for pt-BR text: base letters first, then accents,
/// then case.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// `15/03/2024`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_labels() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(month_year(date), "março de 2024");
        assert_eq!(long_date(date), "sexta-feira, 15 de março de 2024");
        assert_eq!(short_date(date), "15/03/2024");

        let early = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(long_date(early), "terça-feira, 5 de março de 2024");
        assert_eq!(long_date_padded(early), "terça-feira, 05 de março de 2024");
        assert_eq!(day_month_short(early), "05 de mar.");
    }

    #[test]
    fn accented_capitals_sort_with_their_base_letter() {
        let mut titles = vec!["Zona", "Órgão", "Área técnica", "Balanço", "Índice", "area"];
        titles.sort_by(|a, b| compare_text(a, b));
        assert_eq!(titles, vec!["area", "Área técnica", "Balanço", "Índice", "Órgão", "Zona"]);
    }
}
