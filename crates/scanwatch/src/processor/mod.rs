pub mod ocr;

pub use ocr::{split_args, OcrOutput, OcrRunner};
