pub mod tesseract;
pub mod tesseract_sys;
