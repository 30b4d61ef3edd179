use super::anchor::{week_monday, week_offset};
use super::types::SchedError;
use crate::model::{ShiftAssignment, ShiftGroup, StaffMember};
use chrono::{Days, NaiveDate};

pub const DAYS_PER_WEEK: usize = 7;

/// Génère les 14 assignations de la semaine contenant `date` à partir de
/// l'anneau `ordered` (déjà trié, cf. [`crate::roster::RosterOrder`]).
///
/// Le jour `i`, le groupe A prend `ordered[start + i]` et le groupe B
/// `ordered[start + i - 1]` (modulo `n`) : chacun assure B un jour puis A
/// le lendemain. Sortie triée par date, A avant B. Aucune I/O.
pub fn generate_week(
    date: NaiveDate,
    ordered: &[StaffMember],
) -> Result<Vec<ShiftAssignment>, SchedError> {
    let n = ordered.len();
    if n < 2 {
        return Err(SchedError::InsufficientRoster { found: n });
    }

    let monday = week_monday(date)?;
    let start = week_offset(monday, n) as i64;
    let ring = n as i64;
    let mut out = Vec::with_capacity(DAYS_PER_WEEK * 2);

    for i in 0..DAYS_PER_WEEK as i64 {
        let day = monday
            .checked_add_days(Days::new(i as u64))
            .ok_or(SchedError::DateOverflow)?;
        let a = &ordered[(start + i).rem_euclid(ring) as usize];
        let b = &ordered[(start + i - 1).rem_euclid(ring) as usize];
        out.push(ShiftAssignment::new(day, ShiftGroup::GroupA, a));
        out.push(ShiftAssignment::new(day, ShiftGroup::GroupB, b));
    }

    Ok(out)
}
