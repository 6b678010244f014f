use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::AgentError;
use crate::models::Slot;

pub const CHECK_AVAILABILITY: &str = "checkAvailability";
pub const STORE_APPOINTMENT: &str = "storeAppointment";

/// A function call chosen by the model, with its arguments already decoded
/// from the JSON-encoded string the API returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invocation {
    pub name: String,
    pub arguments: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Invocation(Invocation),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClinicFunction {
    CheckAvailability(Slot),
    StoreAppointment(Slot),
}

impl ClinicFunction {
    pub fn name(&self) -> &'static str {
        match self {
            ClinicFunction::CheckAvailability(_) => CHECK_AVAILABILITY,
            ClinicFunction::StoreAppointment(_) => STORE_APPOINTMENT,
        }
    }
}

impl TryFrom<&Invocation> for ClinicFunction {
    type Error = AgentError;

    fn try_from(invocation: &Invocation) -> Result<Self, Self::Error> {
        match invocation.name.as_str() {
            CHECK_AVAILABILITY => Ok(ClinicFunction::CheckAvailability(slot_from(invocation)?)),
            STORE_APPOINTMENT => Ok(ClinicFunction::StoreAppointment(slot_from(invocation)?)),
            other => Err(AgentError::UnknownFunction(other.to_string())),
        }
    }
}

fn slot_from(invocation: &Invocation) -> Result<Slot, AgentError> {
    let arg = |key: &str| {
        invocation.arguments.get(key).cloned().ok_or_else(|| {
            AgentError::Decode(format!("missing argument `{key}` for {}", invocation.name))
        })
    };
    Ok(Slot::new(arg("doctorName")?, arg("date")?, arg("time")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(name: &str, args: &[(&str, &str)]) -> Invocation {
        Invocation {
            name: name.to_string(),
            arguments: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_check_availability_maps_to_slot() {
        let inv = invocation(
            CHECK_AVAILABILITY,
            &[("doctorName", "Dr. Smith"), ("date", "2024-06-02"), ("time", "15:00")],
        );
        let func = ClinicFunction::try_from(&inv).unwrap();
        assert_eq!(
            func,
            ClinicFunction::CheckAvailability(Slot::new("Dr. Smith", "2024-06-02", "15:00"))
        );
        assert_eq!(func.name(), CHECK_AVAILABILITY);
    }

    #[test]
    fn test_missing_argument_is_decode_error() {
        let inv = invocation(STORE_APPOINTMENT, &[("doctorName", "Dr. Smith"), ("date", "2024-06-02")]);
        let err = ClinicFunction::try_from(&inv).unwrap_err();
        assert!(matches!(err, AgentError::Decode(ref m) if m.contains("time")));
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let inv = invocation("cancelAppointment", &[]);
        let err = ClinicFunction::try_from(&inv).unwrap_err();
        assert!(matches!(err, AgentError::UnknownFunction(ref n) if n == "cancelAppointment"));
    }
}
