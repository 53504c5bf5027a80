//! User Data

use crate::ids::NationalId;

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub national_id: NationalId,
    pub display_name: String,
}
