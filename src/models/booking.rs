use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One bookable doctor/date/time combination. Fields are free text and are
/// compared exactly as the model supplied them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Slot {
    #[serde(rename = "doctorName")]
    pub doctor_name: String,
    pub date: String,
    pub time: String,
}

impl Slot {
    pub fn new(
        doctor_name: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            doctor_name: doctor_name.into(),
            date: date.into(),
            time: time.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub slot: Slot,
    pub booked_at: NaiveDateTime,
}
