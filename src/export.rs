pub mod plain_text;
pub mod raster;
pub mod standalone;
