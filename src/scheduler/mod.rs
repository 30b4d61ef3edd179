mod anchor;
mod rotation;
mod shifts;
mod types;

pub use anchor::{week_monday, week_offset, weeks_since_anchor, ANCHOR_MONDAY};
pub use rotation::{generate_week, DAYS_PER_WEEK};
pub use shifts::{day_slots, is_weekend, next_shift, slot_group, time_range_label, ShiftSlot};
pub use types::SchedError;

use crate::model::{week_rows, ShiftAssignment, ShiftGroup, StaffMember, WeekRow};
use crate::roster::RosterOrder;
use crate::storage::{AssignmentStore, StaffDirectory};
use chrono::NaiveDate;
use tracing::info;

/// Scheduler : relie l'annuaire, l'ordre de rotation et le store.
///
/// Toute date désignant une semaine est ramenée à son lundi.
#[derive(Debug)]
pub struct Scheduler<S> {
    store: S,
    order: RosterOrder,
}

impl<S> Scheduler<S>
where
    S: AssignmentStore + StaffDirectory,
{
    pub fn new(store: S) -> Self {
        Self::with_order(store, RosterOrder::default())
    }

    pub fn with_order(store: S, order: RosterOrder) -> Self {
        Self { store, order }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
    pub fn into_store(self) -> S {
        self.store
    }

    /// Anneau de rotation courant (membres actifs triés).
    pub fn ring(&self) -> Result<Vec<StaffMember>, SchedError> {
        Ok(self.order.order(self.store.list_active()?))
    }

    /// Calcule la semaine sans la persister.
    pub fn generate_week(&self, date: NaiveDate) -> Result<Vec<ShiftAssignment>, SchedError> {
        let ring = self.ring()?;
        generate_week(date, &ring)
    }

    /// Génère puis remplace la semaine en base ; retourne la semaine persistée.
    pub fn regenerate_week(&mut self, date: NaiveDate) -> Result<Vec<ShiftAssignment>, SchedError> {
        let monday = week_monday(date)?;
        let ring = self.ring()?;
        let generated = generate_week(monday, &ring)?;
        self.store.replace_week(monday, &generated)?;
        info!(%monday, offset = week_offset(monday, ring.len()), "week generated");
        Ok(self.store.get_week(monday)?)
    }

    pub fn week(&self, date: NaiveDate) -> Result<Vec<ShiftAssignment>, SchedError> {
        Ok(self.store.get_week(week_monday(date)?)?)
    }

    /// Sept lignes d'affichage, y compris pour une semaine non générée.
    pub fn week_rows(&self, date: NaiveDate) -> Result<Vec<WeekRow>, SchedError> {
        let monday = week_monday(date)?;
        let week = self.store.get_week(monday)?;
        Ok(week_rows(monday, &week))
    }

    pub fn on_duty(
        &self,
        date: NaiveDate,
        group: ShiftGroup,
    ) -> Result<Option<ShiftAssignment>, SchedError> {
        Ok(self.store.get_assignment(date, group)?)
    }

    pub fn relief_for(
        &self,
        date: NaiveDate,
        group: ShiftGroup,
    ) -> Result<Option<ShiftAssignment>, SchedError> {
        Ok(self.store.relief_for(date, group)?)
    }

    pub fn clear_week(&mut self, date: NaiveDate) -> Result<usize, SchedError> {
        Ok(self.store.clear_week(week_monday(date)?)?)
    }
}
