#![forbid(unsafe_code)]
//! Permanence — planning hebdomadaire de permanence à deux groupes.
//!
//! - Ordre de rotation stable (ordre de référence puis tri par nom).
//! - Décalage déterministe depuis un lundi de référence fixe.
//! - Rotation round-robin : 2 personnes par jour, groupes A et B.
//! - Stockage SQLite, remplacement atomique d'une semaine.
//! - Dates calendaires sans heure ni fuseau (`NaiveDate`).

pub mod handover;
pub mod io;
pub mod model;
pub mod roster;
pub mod scheduler;
pub mod storage;

pub use handover::{prepare_handover, Handover, HandoverRenderer, TextHandover};
pub use model::{
    week_rows, AssignmentId, NewStaff, ShiftAssignment, ShiftGroup, StaffId, StaffMember, WeekRow,
};
pub use roster::{RosterOrder, REFERENCE_ORDER};
pub use scheduler::{
    day_slots, generate_week, next_shift, time_range_label, week_monday, week_offset,
    SchedError, Scheduler, ShiftSlot, ANCHOR_MONDAY,
};
pub use storage::{AssignmentStore, SqliteStore, StaffDirectory, StoreError};
