pub mod record;
pub mod schema;

pub use record::{
    Gender, PatientRecord, RecordError, ResidenceType, SmokingStatus, WorkType, parse_yes_no,
    yes_no,
};
pub use schema::patient_schema;
