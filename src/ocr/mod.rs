pub mod card_image_ocr;
pub mod text_parser;
