pub mod sheet_read;
pub mod table_csv;
pub mod workbook_write;
