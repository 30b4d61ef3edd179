use crate::model::ShiftGroup;
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};

/// Un poste concret d'une journée (numéroté à partir de 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSlot {
    pub number: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub group: ShiftGroup,
}

impl ShiftSlot {
    /// Vrai si le poste se termine le lendemain.
    pub fn overnight(&self) -> bool {
        self.end <= self.start
    }

    pub fn label(&self) -> String {
        let mut s = format!("{}–{}", self.start.format("%H:%M"), self.end.format("%H:%M"));
        if self.overnight() {
            s.push_str("(+1 day)");
        }
        s
    }
}

const fn hm(h: u32, m: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(h, m, 0) {
        Some(t) => t,
        None => panic!("invalid time"),
    }
}

const fn slot(number: u8, start: NaiveTime, end: NaiveTime, group: ShiftGroup) -> ShiftSlot {
    ShiftSlot {
        number,
        start,
        end,
        group,
    }
}

// Index pair -> groupe A, impair -> groupe B.
const WEEKDAY_SLOTS: [ShiftSlot; 4] = [
    slot(1, hm(7, 30), hm(10, 30), ShiftGroup::GroupA),
    slot(2, hm(10, 30), hm(14, 30), ShiftGroup::GroupB),
    slot(3, hm(14, 30), hm(17, 30), ShiftGroup::GroupA),
    slot(4, hm(17, 30), hm(7, 30), ShiftGroup::GroupB),
];

// Le week-end passe à 3 postes ; la nuit revient au groupe A.
const WEEKEND_SLOTS: [ShiftSlot; 3] = [
    slot(1, hm(7, 30), hm(11, 30), ShiftGroup::GroupA),
    slot(2, hm(11, 30), hm(17, 30), ShiftGroup::GroupB),
    slot(3, hm(17, 30), hm(7, 30), ShiftGroup::GroupA),
];

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Postes de la journée, dans l'ordre chronologique.
pub fn day_slots(date: NaiveDate) -> &'static [ShiftSlot] {
    if is_weekend(date) {
        &WEEKEND_SLOTS
    } else {
        &WEEKDAY_SLOTS
    }
}

/// Groupe responsable du poste `number` ce jour-là.
pub fn slot_group(date: NaiveDate, number: u8) -> Option<ShiftGroup> {
    day_slots(date)
        .iter()
        .find(|s| s.number == number)
        .map(|s| s.group)
}

/// Plages horaires d'un groupe pour un jour donné, ex.
/// `"07:30–10:30 and 14:30–17:30"`.
pub fn time_range_label(date: NaiveDate, group: ShiftGroup) -> String {
    day_slots(date)
        .iter()
        .filter(|s| s.group == group)
        .map(ShiftSlot::label)
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Poste suivant dans le temps : A -> B le même jour, B -> A le lendemain.
///
/// `None` seulement si le lendemain sort du calendrier (`NaiveDate::MAX`).
pub fn next_shift(date: NaiveDate, group: ShiftGroup) -> Option<(NaiveDate, ShiftGroup)> {
    match group {
        ShiftGroup::GroupA => Some((date, ShiftGroup::GroupB)),
        ShiftGroup::GroupB => date
            .checked_add_days(Days::new(1))
            .map(|next| (next, ShiftGroup::GroupA)),
    }
}
