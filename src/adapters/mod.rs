//! Concrete adapter implementations of the port traits.

pub mod csv_data_adapter;
pub mod csv_result_adapter;
pub mod file_config_adapter;
pub mod yaml_rules_adapter;
