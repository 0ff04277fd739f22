//! Condition tokenizer
//!
//! Splits a free-text filter such as `= 'A AND B' OR = 'C'` into text and
//! logical operator tokens. `AND`/`OR` are only recognized outside single
//! quoted literals and `{Name}` sub-query references, and only as whole
//! words.

/// Logical operators for combining conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Operator(LogicalOperator),
}

impl Token {
    pub fn text(value: impl Into<String>) -> Self {
        Token::Text(value.into())
    }
}

/// Tokenize a raw filter string
pub fn tokenize(raw: &str) -> Vec<Token> {
    ConditionTokenizer::new(raw).tokenize()
}

struct ConditionTokenizer {
    text_v: Vec<char>,
    position: usize,
    length: usize,
    in_quote: bool,
    /// Open `{` of a sub-query reference
    brace_depth: usize,
    /// A BETWEEN was seen and its AND has not been consumed yet
    between_pending: bool,
    buffer: String,
    tokens: Vec<Token>,
}

impl ConditionTokenizer {
    fn new(raw: &str) -> Self {
        let text_v: Vec<char> = raw.chars().collect();
        Self {
            length: text_v.len(),
            text_v,
            position: 0,
            in_quote: false,
            brace_depth: 0,
            between_pending: false,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    fn eof(&self) -> bool {
        self.position >= self.length
    }

    fn current(&self) -> char {
        self.text_v[self.position]
    }

    fn char_at(&self, position: usize) -> Option<char> {
        self.text_v.get(position).copied()
    }

    fn is_left_boundary(ch: Option<char>) -> bool {
        match ch {
            None => true,
            Some(ch) => ch.is_whitespace() || ch == ')',
        }
    }

    fn is_right_boundary(ch: Option<char>) -> bool {
        match ch {
            None => true,
            Some(ch) => ch.is_whitespace() || ch == '(',
        }
    }

    /// Case-insensitive whole-word match of `word` at the current position
    fn word_at(&self, word: &str) -> bool {
        let previous = self
            .position
            .checked_sub(1)
            .and_then(|position| self.char_at(position));
        if !Self::is_left_boundary(previous) {
            return false;
        }

        let mut offset = 0;
        for expected in word.chars() {
            match self.char_at(self.position + offset) {
                Some(ch) if ch.to_ascii_uppercase() == expected => offset += 1,
                _ => return false,
            }
        }

        Self::is_right_boundary(self.char_at(self.position + offset))
    }

    fn operator_at(&self) -> Option<LogicalOperator> {
        if self.word_at("AND") {
            Some(LogicalOperator::And)
        } else if self.word_at("OR") {
            Some(LogicalOperator::Or)
        } else {
            None
        }
    }

    /// Copy `count` characters into the text buffer
    fn take(&mut self, count: usize) {
        for _ in 0..count {
            if self.eof() {
                break;
            }
            self.buffer.push(self.current());
            self.position += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.eof() && self.current().is_whitespace() {
            self.position += 1;
        }
    }

    fn flush_text(&mut self) {
        let text = self.buffer.trim();
        if !text.is_empty() {
            self.tokens.push(Token::Text(text.to_string()));
        }
        self.buffer.clear();
    }

    fn tokenize(mut self) -> Vec<Token> {
        while !self.eof() {
            let ch = self.current();

            if !self.in_quote {
                match ch {
                    '{' => self.brace_depth += 1,
                    '}' => self.brace_depth = self.brace_depth.saturating_sub(1),
                    _ => {}
                }
            }

            if self.brace_depth > 0 {
                self.take(1);
                continue;
            }

            if ch == '\'' {
                self.in_quote = !self.in_quote;
                self.take(1);
                continue;
            }

            if !self.in_quote {
                if self.word_at("BETWEEN") {
                    self.between_pending = true;
                    self.take("BETWEEN".len());
                    continue;
                }

                if let Some(operator) = self.operator_at() {
                    let word_length = operator.to_sql().len();

                    if operator == LogicalOperator::And && self.between_pending {
                        self.between_pending = false;
                        self.take(word_length);
                        continue;
                    }

                    trace_log!(position = self.position, operator = operator.to_sql(), "operator token");
                    self.flush_text();
                    self.tokens.push(Token::Operator(operator));
                    self.position += word_length;
                    self.skip_whitespace();
                    continue;
                }
            }

            self.take(1);
        }

        self.flush_text();
        self.tokens
    }
}
