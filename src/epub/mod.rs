//! EPUB reading and chapter text extraction

pub mod html;
pub mod reader;
