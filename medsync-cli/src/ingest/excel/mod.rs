//! Workbook reading

mod reader;

pub use reader::{cell_from_data, excel_serial_to_datetime, read_grid, read_grid_from_bytes};
