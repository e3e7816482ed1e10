pub mod charts;
pub mod table_controls;
pub mod toast;
