pub mod csv_input;
pub mod csv_output;
pub mod json_output;
