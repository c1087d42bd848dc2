//! OCR text cleanup.
//!
//! Tesseract misreads list markers and decorations in predictable ways.
//! The rules below run in order, each as one left-to-right pass over the
//! output of the previous rule, so later rules see earlier rewrites.

/// `(pattern, replacement)` pairs, applied top to bottom.
const CLEANUP_RULES: &[(&str, &str)] = &[
    // Numbered list markers read as letters
    ("L ", "1. "),
    ("\nl. ", "\n1. "),
    // Keep list items on their own paragraph
    ("\n1.", "\n\n1."),
    // Bullets and bracket noise
    ("*", " "),
    ("[", " "),
    ("]", " "),
    ("»", "."),
    // Collapse
    ("\n\n", "\n"),
    ("  ", " "),
];

/// Apply every cleanup rule to raw OCR output, then trim the ends.
pub fn clean_ocr_text(raw: &str) -> String {
    let cleaned = CLEANUP_RULES
        .iter()
        .fold(raw.to_string(), |text, (pattern, replacement)| {
            text.replace(pattern, replacement)
        });

    cleaned.trim().to_string()
}
