pub mod capability;
pub mod reducer;
pub mod source_input;
pub mod time_format;
pub mod transitions;
