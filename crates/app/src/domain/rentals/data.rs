//! Rental query data

use crate::ids::NationalId;

/// Selects which rentals to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceFilter {
    /// Every rental, open or closed.
    All,

    /// Open rentals only.
    Active,

    /// Open rentals owned by the user.
    ActiveOwnedBy(NationalId),

    /// Open rentals the user may unlock but does not own.
    SharedWith(NationalId),
}

/// Relations to load alongside an active rental.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceRelations {
    pub grants: bool,
    pub usages: bool,
    pub invitations: bool,
}

impl InstanceRelations {
    /// Load nothing but the rental itself.
    pub const NONE: Self = Self {
        grants: false,
        usages: false,
        invitations: false,
    };

    /// Load every relation.
    pub const ALL: Self = Self {
        grants: true,
        usages: true,
        invitations: true,
    };
}
