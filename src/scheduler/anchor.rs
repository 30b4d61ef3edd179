use super::types::SchedError;
use chrono::{Datelike, Days, NaiveDate};

/// Lundi de référence : la semaine qui a produit le planning publié d'origine.
pub const ANCHOR_MONDAY: NaiveDate = match NaiveDate::from_ymd_opt(2025, 9, 1) {
    Some(d) => d,
    None => panic!("invalid anchor date"),
};

/// Lundi (ISO) de la semaine contenant `date`. Le dimanche appartient à la
/// semaine du lundi précédent.
pub fn week_monday(date: NaiveDate) -> Result<NaiveDate, SchedError> {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back))
        .ok_or(SchedError::DateOverflow)
}

/// Nombre de semaines entre le lundi de référence et la semaine de `date`
/// (négatif avant l'ancre). L'ancre étant un lundi, la division entière par
/// défaut donne la même semaine que depuis le lundi de `date`.
pub fn weeks_since_anchor(date: NaiveDate) -> i64 {
    let days = date.signed_duration_since(ANCHOR_MONDAY).num_days();
    days.div_euclid(7)
}

/// Décalage de départ dans l'anneau, toujours dans `[0, roster_len)`.
pub fn week_offset(date: NaiveDate, roster_len: usize) -> usize {
    if roster_len == 0 {
        return 0;
    }
    let n = roster_len as i64;
    weeks_since_anchor(date).rem_euclid(n) as usize
}
