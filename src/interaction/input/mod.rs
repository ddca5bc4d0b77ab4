pub mod host_input;
