use crate::model::{ShiftAssignment, ShiftGroup};
use crate::scheduler::time_range_label;
use crate::storage::{AssignmentStore, StoreError};
use chrono::NaiveDate;

/// Passation : qui est de permanence, et qui prend la relève.
#[derive(Debug, Clone)]
pub struct Handover {
    pub date: NaiveDate,
    pub group: ShiftGroup,
    pub hours: String,
    pub on_duty: Option<ShiftAssignment>,
    pub relief: Option<ShiftAssignment>,
}

/// Permet de customiser le rendu de la passation (texte, SMS, etc.).
pub trait HandoverRenderer {
    fn render(&self, handover: &Handover) -> String;
}

/// Gabarit texte simple.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextHandover;

fn display(a: &Option<ShiftAssignment>) -> String {
    match a {
        Some(a) => a
            .staff_name
            .clone()
            .unwrap_or_else(|| format!("#{}", a.staff_id)),
        None => "unassigned".to_string(),
    }
}

impl HandoverRenderer for TextHandover {
    fn render(&self, h: &Handover) -> String {
        let relief_at = h
            .relief
            .as_ref()
            .map(|r| format!(" ({} {})", r.date, r.group))
            .unwrap_or_default();
        format!(
            "{date} {group} [{hours}]\nOn duty: {on_duty}\nRelieved by: {relief}{relief_at}\n",
            date = h.date,
            group = h.group,
            hours = h.hours,
            on_duty = display(&h.on_duty),
            relief = display(&h.relief),
        )
    }
}

/// Rassemble la permanence d'un poste et sa relève.
pub fn prepare_handover<S: AssignmentStore + ?Sized>(
    store: &S,
    date: NaiveDate,
    group: ShiftGroup,
) -> Result<Handover, StoreError> {
    Ok(Handover {
        date,
        group,
        hours: time_range_label(date, group),
        on_duty: store.get_assignment(date, group)?,
        relief: store.relief_for(date, group)?,
    })
}
