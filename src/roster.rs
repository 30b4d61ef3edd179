use crate::model::StaffMember;
use feruca::Collator;

/// Ordre historique de la rotation, négocié avec l'équipe.
///
/// Le rapprochement se fait sur le nom (insensible à la casse) : un
/// renommage sort la personne de l'ordre de référence et la renvoie en queue.
/// À remplacer par une table indexée sur `StaffId` dès que les ids sont stables.
pub const REFERENCE_ORDER: [&str; 7] = [
    "Nguyễn Tiến Phát",
    "Nguyễn Hồ Hoàng Hiệp",
    "Nguyễn Sinh Trung",
    "Lê Tự Minh Hoàng",
    "Nguyễn Hữu Ngọc Trung",
    "Hoàng Hồng Quân",
    "Trương Trọng Khang",
];

/// Ordre de référence servant à construire l'anneau de rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterOrder {
    reference: Vec<String>,
}

impl Default for RosterOrder {
    fn default() -> Self {
        Self::new(REFERENCE_ORDER)
    }
}

impl RosterOrder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            reference: names.into_iter().map(|n| n.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Position d'un nom dans l'ordre de référence.
    pub fn position(&self, name: &str) -> Option<usize> {
        let needle = name.to_lowercase();
        self.reference.iter().position(|r| *r == needle)
    }

    /// Trie les membres actifs : d'abord ceux de la référence (dans son
    /// ordre), puis les autres par collation Unicode (UCA) : casse et
    /// diacritiques ne départagent qu'en dernier, `Đ` suit `D`.
    /// Égalité finale : nom brut, puis id.
    pub fn order(&self, members: Vec<StaffMember>) -> Vec<StaffMember> {
        let mut collator = Collator::default();
        let mut ranked: Vec<_> = members
            .into_iter()
            .filter(|m| m.active)
            .map(|m| {
                let rank = self.position(&m.full_name).unwrap_or(self.reference.len());
                (rank, m)
            })
            .collect();

        ranked.sort_by(|(ra, a), (rb, b)| {
            ra.cmp(rb)
                .then_with(|| collator.collate(a.full_name.as_str(), b.full_name.as_str()))
                .then_with(|| a.full_name.cmp(&b.full_name))
                .then_with(|| a.id.cmp(&b.id))
        });

        ranked.into_iter().map(|(_, m)| m).collect()
    }
}
