use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifiant fort d'un membre du personnel (attribué par le store)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(i64);

impl StaffId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifiant d'une ligne d'assignation persistée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(i64);

impl AssignmentId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }
    pub fn get(self) -> i64 {
        self.0
    }
}

/// Membre du personnel, en lecture seule pour le planificateur
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub full_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn default_active() -> bool {
    true
}

impl StaffMember {
    pub fn new<N: Into<String>>(id: StaffId, full_name: N) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            active: true,
            position: None,
            unit: None,
            phone: None,
            email: None,
        }
    }
}

/// Données de création d'un membre (l'id vient du store).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaff {
    pub full_name: String,
    pub position: Option<String>,
    pub unit: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewStaff {
    pub fn named<N: Into<String>>(full_name: N) -> Self {
        Self {
            full_name: full_name.into(),
            ..Self::default()
        }
    }
}

/// Groupe de permanence : A couvre les postes 1 et 3, B les postes 2 et 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShiftGroup {
    GroupA,
    GroupB,
}

impl ShiftGroup {
    pub const ALL: [ShiftGroup; 2] = [ShiftGroup::GroupA, ShiftGroup::GroupB];

    /// Valeur stockée en base (`'GroupA' | 'GroupB'`).
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftGroup::GroupA => "GroupA",
            ShiftGroup::GroupB => "GroupB",
        }
    }

    pub fn other(self) -> Self {
        match self {
            ShiftGroup::GroupA => ShiftGroup::GroupB,
            ShiftGroup::GroupB => ShiftGroup::GroupA,
        }
    }
}

impl fmt::Display for ShiftGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown shift group: {0}")]
pub struct ParseGroupError(pub String);

impl FromStr for ShiftGroup {
    type Err = ParseGroupError;

    /// Accepte aussi les anciens libellés `Ca13` / `Ca24`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groupa" | "group-a" | "group_a" | "a" | "ca13" => Ok(ShiftGroup::GroupA),
            "groupb" | "group-b" | "group_b" | "b" | "ca24" => Ok(ShiftGroup::GroupB),
            _ => Err(ParseGroupError(s.to_string())),
        }
    }
}

/// Liaison (jour, groupe, personne). Au plus une par couple (jour, groupe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    /// `None` tant que l'assignation n'est pas persistée
    pub id: Option<AssignmentId>,
    pub date: NaiveDate,
    pub group: ShiftGroup,
    pub staff_id: StaffId,
    /// Projection du nom pour l'affichage
    pub staff_name: Option<String>,
}

impl ShiftAssignment {
    pub fn new(date: NaiveDate, group: ShiftGroup, staff: &StaffMember) -> Self {
        Self {
            id: None,
            date,
            group,
            staff_id: staff.id,
            staff_name: Some(staff.full_name.clone()),
        }
    }

    /// Clé métier, indépendante de l'id de stockage.
    pub fn slot(&self) -> (NaiveDate, ShiftGroup, StaffId) {
        (self.date, self.group, self.staff_id)
    }
}

/// Ligne d'affichage : un jour, le nom du groupe A et celui du groupe B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRow {
    pub date: NaiveDate,
    pub group_a: Option<String>,
    pub group_b: Option<String>,
}

impl WeekRow {
    pub fn name_for(&self, group: ShiftGroup) -> Option<&str> {
        match group {
            ShiftGroup::GroupA => self.group_a.as_deref(),
            ShiftGroup::GroupB => self.group_b.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group_a.is_none() && self.group_b.is_none()
    }
}

/// Projette les assignations d'une semaine en 7 lignes (jours vides inclus).
pub fn week_rows(start: NaiveDate, assignments: &[ShiftAssignment]) -> Vec<WeekRow> {
    start
        .iter_days()
        .take(7)
        .map(|date| {
            let name = |group: ShiftGroup| {
                assignments
                    .iter()
                    .find(|a| a.date == date && a.group == group)
                    .map(|a| {
                        a.staff_name
                            .clone()
                            .unwrap_or_else(|| format!("#{}", a.staff_id))
                    })
            };
            WeekRow {
                date,
                group_a: name(ShiftGroup::GroupA),
                group_b: name(ShiftGroup::GroupB),
            }
        })
        .collect()
}
