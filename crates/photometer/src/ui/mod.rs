pub mod spinner;
pub mod table;
