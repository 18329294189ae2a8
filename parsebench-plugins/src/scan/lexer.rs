//! ECMAScript Tokenizer
//!
//! Single-pass scanner producing [`Token`]s lazily. It understands enough of
//! the lexical grammar to benchmark realistic sources: comments, string and
//! template literals (with nested substitutions), numeric literals including
//! hex/octal/binary and BigInt suffixes, regular expression literals and the
//! full punctuator set.
//!
//! Division versus regular expression is decided from the previous
//! significant token, which is what hand-written JS scanners do in practice.
//! The first lexical error ends the token stream.

use std::fmt;

/// Token classes counted by the histogram options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    String,
    Template,
    RegExp,
    Punctuator,
    Comment,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::Template => "Template",
            TokenKind::RegExp => "RegExp",
            TokenKind::Punctuator => "Punctuator",
            TokenKind::Comment => "Comment",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lexical token with its 1-based start position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: u32,
    pub column: u32,
}

/// A lexical or structural error at a 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

const KEYWORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "let", "new", "null", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Keywords after which a `/` is division, not a regular expression
const VALUE_KEYWORDS: &[&str] = &["this", "super", "null", "true", "false"];

/// Longest first so the first prefix match wins
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", "**", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@", "#",
];

fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Lazy tokenizer over a source string
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    /// One entry per open `{`; `true` marks a template substitution `${`
    braces: Vec<bool>,
    regex_allowed: bool,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut lexer = Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            braces: Vec::new(),
            regex_allowed: true,
            failed: false,
        };
        if src.starts_with("#!") {
            lexer.eat_while(|c| !is_line_terminator(c));
        }
        lexer
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        // \r\n counts as a single line break
        if c == '\n' && self.src[..self.pos - 1].ends_with('\r') {
            return Some(c);
        }
        if is_line_terminator(c) {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn error(&mut self, line: u32, column: u32, message: impl Into<String>) -> SyntaxError {
        self.failed = true;
        SyntaxError {
            line,
            column,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        self.eat_while(|c| c.is_whitespace() || c == '\u{feff}');
    }

    fn next_token(&mut self) -> Option<Result<Token<'a>, SyntaxError>> {
        self.skip_whitespace();
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        let c = self.peek()?;

        let kind = match c {
            '/' if self.peek_second() == Some('/') => {
                self.eat_while(|c| !is_line_terminator(c));
                Ok(TokenKind::Comment)
            }
            '/' if self.peek_second() == Some('*') => self.block_comment(line, column),
            '/' if self.regex_allowed => self.regexp(line, column),
            '"' | '\'' => self.string(c, line, column),
            '`' => {
                self.bump();
                self.template(line, column)
            }
            '}' if self.braces.last() == Some(&true) => {
                self.braces.pop();
                self.bump();
                self.template(line, column)
            }
            '0'..='9' => self.number(line, column),
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.number(line, column)
            }
            c if is_id_start(c) => {
                self.eat_while(is_id_continue);
                if KEYWORDS.contains(&&self.src[start..self.pos]) {
                    Ok(TokenKind::Keyword)
                } else {
                    Ok(TokenKind::Identifier)
                }
            }
            _ => self.punctuator(line, column),
        };

        let kind = match kind {
            Ok(kind) => kind,
            Err(e) => return Some(Err(e)),
        };
        let text = &self.src[start..self.pos];
        self.regex_allowed = match kind {
            TokenKind::Comment => self.regex_allowed,
            TokenKind::Keyword => !VALUE_KEYWORDS.contains(&text),
            TokenKind::Punctuator => !matches!(text, ")" | "]" | "}"),
            TokenKind::Template => text.ends_with("${"),
            _ => false,
        };

        Some(Ok(Token {
            kind,
            text,
            line,
            column,
        }))
    }

    fn block_comment(&mut self, line: u32, column: u32) -> Result<TokenKind, SyntaxError> {
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(TokenKind::Comment);
                }
                Some(_) => {}
                None => return Err(self.error(line, column, "unterminated comment")),
            }
        }
    }

    fn string(&mut self, quote: char, line: u32, column: u32) -> Result<TokenKind, SyntaxError> {
        self.bump();
        loop {
            match self.bump() {
                Some('\\') => {
                    // Escaped line terminators are line continuations
                    if self.peek() == Some('\r') {
                        self.bump();
                    }
                    self.bump();
                }
                Some(c) if c == quote => return Ok(TokenKind::String),
                Some(c) if c == '\n' || c == '\r' => {
                    return Err(self.error(line, column, "unterminated string literal"));
                }
                Some(_) => {}
                None => return Err(self.error(line, column, "unterminated string literal")),
            }
        }
    }

    /// Scan template characters after an opening backtick or closing `}`
    fn template(&mut self, line: u32, column: u32) -> Result<TokenKind, SyntaxError> {
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('`') => return Ok(TokenKind::Template),
                Some('$') if self.peek() == Some('{') => {
                    self.bump();
                    self.braces.push(true);
                    return Ok(TokenKind::Template);
                }
                Some(_) => {}
                None => return Err(self.error(line, column, "unterminated template literal")),
            }
        }
    }

    fn regexp(&mut self, line: u32, column: u32) -> Result<TokenKind, SyntaxError> {
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                Some('\\') => match self.peek() {
                    Some(c) if !is_line_terminator(c) => {
                        self.bump();
                    }
                    _ => {
                        return Err(self.error(line, column, "unterminated regular expression"));
                    }
                },
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error(line, column, "unterminated regular expression"));
                }
                Some(_) => {}
                None => return Err(self.error(line, column, "unterminated regular expression")),
            }
        }
        // Flags
        self.eat_while(is_id_continue);
        Ok(TokenKind::RegExp)
    }

    fn number(&mut self, line: u32, column: u32) -> Result<TokenKind, SyntaxError> {
        let radix_prefix = self.peek() == Some('0')
            && matches!(
                self.peek_second(),
                Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')
            );
        if radix_prefix {
            self.bump();
            self.bump();
            let digits_start = self.pos;
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            if self.pos == digits_start {
                return Err(self.error(line, column, "missing digits after radix prefix"));
            }
        } else {
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
            if self.peek() == Some('.') {
                self.bump();
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.error(line, column, "missing exponent"));
                }
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
        }
        if self.peek() == Some('n') {
            self.bump();
        }
        if self.peek().is_some_and(is_id_start) {
            let (l, c) = (self.line, self.column);
            return Err(self.error(l, c, "identifier starts immediately after numeric literal"));
        }
        Ok(TokenKind::Number)
    }

    fn punctuator(&mut self, line: u32, column: u32) -> Result<TokenKind, SyntaxError> {
        let rest = self.rest();
        let Some(p) = PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) else {
            let c = self.peek().unwrap_or_default();
            return Err(self.error(line, column, format!("unexpected character {:?}", c)));
        };
        for _ in 0..p.len() {
            self.bump();
        }
        match *p {
            "{" => self.braces.push(false),
            "}" => {
                self.braces.pop();
            }
            _ => {}
        }
        Ok(TokenKind::Punctuator)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.next_token()
    }
}

/// Tracks `()[]{}` nesting over punctuator tokens
#[derive(Debug, Default)]
pub struct DelimiterBalance {
    open: Vec<(char, u32, u32)>,
}

impl DelimiterBalance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one token, failing on a closer that does not match
    pub fn feed(&mut self, token: &Token<'_>) -> Result<(), SyntaxError> {
        if token.kind != TokenKind::Punctuator {
            return Ok(());
        }
        let expected_opener = match token.text {
            "(" | "[" | "{" => {
                let c = token.text.chars().next().unwrap_or_default();
                self.open.push((c, token.line, token.column));
                return Ok(());
            }
            ")" => '(',
            "]" => '[',
            "}" => '{',
            _ => return Ok(()),
        };
        match self.open.pop() {
            Some((c, _, _)) if c == expected_opener => Ok(()),
            Some((c, line, column)) => Err(SyntaxError {
                line: token.line,
                column: token.column,
                message: format!(
                    "'{}' does not close '{}' opened at {}:{}",
                    token.text, c, line, column
                ),
            }),
            None => Err(SyntaxError {
                line: token.line,
                column: token.column,
                message: format!("unmatched '{}'", token.text),
            }),
        }
    }

    /// Fail if any delimiter is still open at end of input
    pub fn finish(self) -> Result<(), SyntaxError> {
        match self.open.last() {
            Some(&(c, line, column)) => Err(SyntaxError {
                line,
                column,
                message: format!("unclosed '{}'", c),
            }),
            None => Ok(()),
        }
    }
}
