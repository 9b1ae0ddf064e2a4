// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Delimited-text tokenization

mod tokenizer;

pub use tokenizer::CsvTokenizer;
