//! User Records

use jiff::Timestamp;

use crate::ids::NationalId;

/// User Record
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub national_id: NationalId,
    pub display_name: String,
    pub created_at: Timestamp,
}
