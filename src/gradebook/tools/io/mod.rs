pub mod discover;
pub mod excel_read;
pub mod excel_write;
