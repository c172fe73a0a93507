pub mod incident_fields;
pub mod lazy_message;
pub mod lazy_stack;
