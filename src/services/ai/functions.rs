use chrono::NaiveDate;
use serde_json::json;

use super::FunctionSpec;
use crate::models::invocation::{CHECK_AVAILABILITY, STORE_APPOINTMENT};

pub fn system_prompt(clinic_name: &str, today: NaiveDate) -> String {
    format!(
        "You are a helpful assistant for {clinic_name}'s appointment booking system. \
         Parse relative dates like 'today' and 'tomorrow'. Use ISO Date format. \
         Today's date is {}.",
        today.format("%Y-%m-%d")
    )
}

pub fn clinic_functions() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec {
            name: CHECK_AVAILABILITY.to_string(),
            description: "Checks if the doctor is available for a given time slot.".to_string(),
            parameters: slot_parameters(),
        },
        FunctionSpec {
            name: STORE_APPOINTMENT.to_string(),
            description: "Stores an appointment with the specified doctor, date, and time."
                .to_string(),
            parameters: slot_parameters(),
        },
    ]
}

fn slot_parameters() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "doctorName": {
                "type": "string",
                "description": "The name of the doctor.",
            },
            "date": {
                "type": "string",
                "description": "The date for the appointment (YYYY-MM-DD). Use ISO Date format",
            },
            "time": {
                "type": "string",
                "description": "The time for the appointment (HH:MM).",
            },
        },
        "required": ["doctorName", "date", "time"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declares_exactly_two_functions() {
        let names: Vec<String> = clinic_functions().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["checkAvailability", "storeAppointment"]);
    }

    #[test]
    fn test_all_slot_fields_required_strings() {
        for func in clinic_functions() {
            let params = &func.parameters;
            assert_eq!(params["required"], json!(["doctorName", "date", "time"]));
            for field in ["doctorName", "date", "time"] {
                assert_eq!(params["properties"][field]["type"], "string");
            }
        }
    }

    #[test]
    fn test_system_prompt_names_clinic_and_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let prompt = system_prompt("Super Clinic", today);
        assert!(prompt.starts_with("You are a helpful assistant for Super Clinic's"));
        assert!(prompt.contains("2024-06-01"));
    }
}
