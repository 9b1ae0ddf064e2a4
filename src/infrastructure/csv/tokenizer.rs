// ============================================================
// CSV TOKENIZER
// ============================================================
// Character-level state machine for delimited text.
// Never raises on malformed input: anomalies surface as parse errors
// and parsing continues with best-effort data.

use crate::domain::import::{ParseIssue, ParseResult};

/// Scanner position within the current field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    FieldStart,
    UnquotedField,
    QuotedField,
    QuoteInQuotedField,
}

/// Delimited-text tokenizer with configurable options
#[derive(Debug, Clone)]
pub struct CsvTokenizer {
    /// Field separator (default: comma)
    delimiter: char,

    /// Whether the first emitted row is a header row
    has_headers: bool,

    /// Optional cap on returned rows; the unbounded total is still reported
    max_rows: Option<usize>,

    /// Whether to trim whitespace from unquoted values. Quoted content is
    /// never trimmed, so embedded spaces inside quotes stay significant.
    trim_values: bool,
}

impl Default for CsvTokenizer {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: true,
            max_rows: None,
            trim_values: true,
        }
    }
}

impl CsvTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom field separator
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first row carries headers
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Cap the number of returned rows
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Set whether unquoted values are trimmed
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim_values = trim;
        self
    }

    /// Tokenize delimited text into headers, data rows and anomalies.
    ///
    /// Pure function of its inputs; all malformed input degrades to
    /// parse errors plus whatever content could be recovered.
    pub fn parse(&self, text: &str) -> ParseResult {
        let mut emitted: Vec<Vec<String>> = Vec::new();
        let mut parse_errors: Vec<ParseIssue> = Vec::new();

        let mut state = ScanState::FieldStart;
        let mut field = String::new();
        let mut field_quoted = false;
        let mut row: Vec<String> = Vec::new();

        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match state {
                ScanState::FieldStart => {
                    if c == '"' {
                        // Quoted fields are exempt from trimming
                        field_quoted = true;
                        state = ScanState::QuotedField;
                    } else if c == self.delimiter {
                        self.end_field(&mut row, &mut field, &mut field_quoted);
                    } else if c == '\r' || c == '\n' {
                        if c == '\r' && chars.peek() == Some(&'\n') {
                            chars.next();
                        }
                        self.end_field(&mut row, &mut field, &mut field_quoted);
                        Self::end_row(&mut emitted, &mut row);
                    } else {
                        field.push(c);
                        state = ScanState::UnquotedField;
                    }
                }
                ScanState::UnquotedField => {
                    if c == self.delimiter {
                        self.end_field(&mut row, &mut field, &mut field_quoted);
                        state = ScanState::FieldStart;
                    } else if c == '\r' || c == '\n' {
                        if c == '\r' && chars.peek() == Some(&'\n') {
                            chars.next();
                        }
                        self.end_field(&mut row, &mut field, &mut field_quoted);
                        Self::end_row(&mut emitted, &mut row);
                        state = ScanState::FieldStart;
                    } else {
                        field.push(c);
                    }
                }
                ScanState::QuotedField => {
                    if c == '"' {
                        // Tentative close; the next character decides
                        state = ScanState::QuoteInQuotedField;
                    } else {
                        // Delimiters and line breaks are literal in quotes
                        field.push(c);
                    }
                }
                ScanState::QuoteInQuotedField => {
                    if c == '"' {
                        // Doubled quote: one literal quote character
                        field.push('"');
                        state = ScanState::QuotedField;
                    } else if c == self.delimiter {
                        self.end_field(&mut row, &mut field, &mut field_quoted);
                        state = ScanState::FieldStart;
                    } else if c == '\r' || c == '\n' {
                        if c == '\r' && chars.peek() == Some(&'\n') {
                            chars.next();
                        }
                        self.end_field(&mut row, &mut field, &mut field_quoted);
                        Self::end_row(&mut emitted, &mut row);
                        state = ScanState::FieldStart;
                    } else {
                        // Trailing data after a closing quote: keep it and
                        // recover as an unquoted continuation
                        field.push(c);
                        state = ScanState::UnquotedField;
                    }
                }
            }
        }

        // End of input: flush whatever is pending
        if state == ScanState::QuotedField {
            parse_errors.push(ParseIssue {
                row_number: emitted.len() + 1,
                message: "Unclosed quoted field".to_string(),
            });
        }
        if state != ScanState::FieldStart || !row.is_empty() {
            self.end_field(&mut row, &mut field, &mut field_quoted);
            Self::end_row(&mut emitted, &mut row);
        }

        // Split headers from data
        let (headers, data_rows) = if self.has_headers {
            let mut rows = emitted.into_iter();
            let headers = rows.next().unwrap_or_default();
            (headers, rows.collect::<Vec<_>>())
        } else {
            let width = emitted.first().map_or(0, Vec::len);
            let headers = (1..=width).map(|n| format!("Column {}", n)).collect();
            (headers, emitted)
        };

        let total_rows = data_rows.len();
        let rows = match self.max_rows {
            Some(cap) => data_rows.into_iter().take(cap).collect(),
            None => data_rows,
        };

        ParseResult {
            headers,
            rows,
            total_rows,
            parse_errors,
        }
    }

    /// Close the current field and append it to the row under assembly
    fn end_field(&self, row: &mut Vec<String>, field: &mut String, quoted: &mut bool) {
        let value = std::mem::take(field);
        let value = if self.trim_values && !*quoted {
            value.trim().to_string()
        } else {
            value
        };
        row.push(value);
        *quoted = false;
    }

    /// Emit the row under assembly. A row that is exactly one empty field
    /// is a blank line: dropped silently, uncounted.
    fn end_row(emitted: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
        let finished = std::mem::take(row);
        if finished.len() == 1 && finished[0].is_empty() {
            return;
        }
        emitted.push(finished);
    }

    /// Detect the most plausible delimiter from a content sample.
    /// Scores each candidate by per-line frequency and consistency.
    pub fn detect_delimiter(content: &str) -> char {
        let candidates = [',', ';', '\t', '|'];
        let sample_lines: Vec<&str> = content.lines().take(10).collect();

        let mut best_delimiter = ',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.chars().filter(|&c| c == delimiter).count())
                .collect();

            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let result = CsvTokenizer::new().parse("name,email\nAlice,a@x.com\nBob,b@x.com");

        assert_eq!(result.headers, vec!["name", "email"]);
        assert_eq!(
            result.rows,
            vec![vec!["Alice", "a@x.com"], vec!["Bob", "b@x.com"]]
        );
        assert_eq!(result.total_rows, 2);
        assert!(result.parse_errors.is_empty());
    }

    #[test]
    fn test_quoted_field_with_delimiter_and_escaped_quotes() {
        let result = CsvTokenizer::new().parse("name,note\nAlice,\"hello, \"\"world\"\"\"");

        assert_eq!(result.rows, vec![vec!["Alice", "hello, \"world\""]]);
        assert!(result.parse_errors.is_empty());
    }

    #[test]
    fn test_quoted_field_with_embedded_newline() {
        let result = CsvTokenizer::new().parse("id,text\n1,\"line1\nline2\"");

        assert_eq!(result.total_rows, 1);
        assert_eq!(result.rows[0][1], "line1\nline2");
    }

    #[test]
    fn test_mixed_line_endings() {
        let result = CsvTokenizer::new()
            .with_headers(false)
            .parse("1\r\n2\n3\r4");

        assert_eq!(result.total_rows, 4);
        assert_eq!(
            result.rows,
            vec![vec!["1"], vec!["2"], vec!["3"], vec!["4"]]
        );
    }

    #[test]
    fn test_blank_lines_dropped_everywhere() {
        let result = CsvTokenizer::new().parse("\nname,email\n\nAlice,a@x.com\n\n");

        assert_eq!(result.headers, vec!["name", "email"]);
        assert_eq!(result.rows, vec![vec!["Alice", "a@x.com"]]);
        assert_eq!(result.total_rows, 1);
    }

    #[test]
    fn test_max_rows_caps_rows_but_not_total() {
        let result = CsvTokenizer::new()
            .with_max_rows(Some(2))
            .parse("h\n1\n2\n3\n4");

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.total_rows, 4);
    }

    #[test]
    fn test_unquoted_values_trimmed_quoted_kept() {
        let result = CsvTokenizer::new().parse("a,b\n  x  ,\"  y  \"");

        assert_eq!(result.rows[0][0], "x");
        assert_eq!(result.rows[0][1], "  y  ");
    }

    #[test]
    fn test_trim_disabled_keeps_whitespace() {
        let result = CsvTokenizer::new().with_trim(false).parse("a\n  x  ");

        assert_eq!(result.rows[0][0], "  x  ");
    }

    #[test]
    fn test_unclosed_quote_recovers_partial_content() {
        let result = CsvTokenizer::new().parse("a,b\n1,\"oops");

        assert_eq!(result.rows, vec![vec!["1", "oops"]]);
        assert_eq!(result.parse_errors.len(), 1);
        assert_eq!(result.parse_errors[0].message, "Unclosed quoted field");
        assert_eq!(result.parse_errors[0].row_number, 2);
    }

    #[test]
    fn test_trailing_data_after_closing_quote_recovered() {
        // Malformed but tolerated: content after the closing quote is kept
        let result = CsvTokenizer::new().parse("a\n\"x\"tail");

        assert_eq!(result.rows, vec![vec!["xtail"]]);
        assert!(result.parse_errors.is_empty());
    }

    #[test]
    fn test_synthesized_headers_without_header_row() {
        let result = CsvTokenizer::new().with_headers(false).parse("1,2,3\n4,5,6");

        assert_eq!(result.headers, vec!["Column 1", "Column 2", "Column 3"]);
        assert_eq!(result.total_rows, 2);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let result = CsvTokenizer::new().parse("");

        assert!(result.headers.is_empty());
        assert!(result.rows.is_empty());
        assert_eq!(result.total_rows, 0);
        assert!(result.parse_errors.is_empty());
    }

    #[test]
    fn test_trailing_delimiter_emits_empty_field() {
        let result = CsvTokenizer::new().parse("a,b\n1,");

        assert_eq!(result.rows, vec![vec!["1", ""]]);
    }

    #[test]
    fn test_custom_delimiter() {
        let result = CsvTokenizer::new()
            .with_delimiter(';')
            .parse("a;b\n1;2");

        assert_eq!(result.headers, vec!["a", "b"]);
        assert_eq!(result.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn test_quoted_round_trip_preserves_literal() {
        // A value with delimiter, quote and newline survives wrapping
        let literal = "a,\"b\"\nc";
        let encoded = format!("v\n\"{}\"", literal.replace('"', "\"\""));
        let result = CsvTokenizer::new().parse(&encoded);

        assert_eq!(result.rows[0][0], literal);
        assert!(result.parse_errors.is_empty());
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvTokenizer::detect_delimiter("a,b,c\nd,e,f"), ',');
        assert_eq!(CsvTokenizer::detect_delimiter("a;b;c\nd;e;f"), ';');
        assert_eq!(CsvTokenizer::detect_delimiter("a\tb\nc\td"), '\t');
        assert_eq!(CsvTokenizer::detect_delimiter("a|b\nc|d"), '|');
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "a,b\n1,\"x,y\"\nbad,\"row";
        let first = CsvTokenizer::new().parse(text);
        let second = CsvTokenizer::new().parse(text);

        assert_eq!(first.rows, second.rows);
        assert_eq!(first.parse_errors, second.parse_errors);
    }
}
