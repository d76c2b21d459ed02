use crate::token::{Position, Token, TokenKind};

/// On-demand tokenizer over the source text.
///
/// The scanner owns the source lines and a `(row, column)` cursor into them.
/// It never fails: lexical problems are reported as `Error` tokens whose
/// lexeme carries the message, and the parser decides what is fatal. Past the
/// end of input every call returns an `Eof` token with a stable position.
pub struct Scanner {
    lines: Vec<String>,
    row: usize,
    column: usize,
    in_block_comment: bool,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.lines().map(str::to_string).collect(),
            row: 0,
            column: 0,
            in_block_comment: false,
        }
    }

    pub fn scan_next_token(&mut self) -> Token {
        loop {
            if self.row >= self.lines.len() {
                return self.eof_token();
            }

            if self.in_block_comment {
                // Consume across lines until the first `*/` closes the block.
                if let Some(offset) = self.rest_of_line().find("*/") {
                    self.column += offset + 2;
                    self.in_block_comment = false;
                } else {
                    self.next_line();
                }
                continue;
            }

            let Some(c) = self.current_char() else {
                self.next_line();
                continue;
            };

            if c == ' ' || c == '\t' {
                self.column += 1;
                continue;
            }

            if c == '/' {
                match self.peek_char() {
                    Some('/') => {
                        self.next_line();
                        continue;
                    }
                    Some('*') => {
                        self.column += 2;
                        self.in_block_comment = true;
                        continue;
                    }
                    _ => {}
                }
            }

            let position = self.position();

            if let Some(kind) = Self::single_char_kind(c) {
                self.column += 1;
                return Token::new(kind, c.to_string(), position);
            }

            return match c {
                ':' => {
                    self.column += 1;
                    if self.current_char() == Some('=') {
                        self.column += 1;
                        Token::new(TokenKind::Assign, ":=", position)
                    } else {
                        Token::new(TokenKind::Colon, ":", position)
                    }
                }
                '.' => {
                    self.column += 1;
                    if self.current_char() == Some('.') {
                        self.column += 1;
                        Token::new(TokenKind::Range, "..", position)
                    } else {
                        Token::new(TokenKind::Error, "expected '..', found bare '.'", position)
                    }
                }
                '"' => self.read_string(position),
                c if c.is_ascii_digit() => self.read_integer(position),
                c if c.is_ascii_alphabetic() => self.read_identifier(position),
                c => {
                    self.column += 1;
                    Token::new(
                        TokenKind::Error,
                        format!("illegal character '{c}'"),
                        position,
                    )
                }
            };
        }
    }

    fn single_char_kind(c: char) -> Option<TokenKind> {
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Less,
            '&' => TokenKind::And,
            '!' => TokenKind::Not,
            ';' => TokenKind::Semicolon,
            '=' => TokenKind::Equal,
            _ => return None,
        };
        Some(kind)
    }

    fn read_string(&mut self, position: Position) -> Token {
        self.column += 1; // opening quote
        let mut value = String::new();
        loop {
            let Some(c) = self.current_char() else {
                // The closing quote must appear on the same line.
                return Token::new(TokenKind::Error, "unterminated string literal", position);
            };
            self.column += 1;
            match c {
                '"' => return Token::new(TokenKind::String, value, position),
                '\\' => match self.current_char() {
                    Some('n') => {
                        value.push('\n');
                        self.column += 1;
                    }
                    Some('"') => {
                        value.push('"');
                        self.column += 1;
                    }
                    Some(other) => {
                        // Unknown escapes pass through literally.
                        value.push('\\');
                        value.push(other);
                        self.column += 1;
                    }
                    None => {
                        return Token::new(
                            TokenKind::Error,
                            "unterminated string literal",
                            position,
                        );
                    }
                },
                c => value.push(c),
            }
        }
    }

    fn read_integer(&mut self, position: Position) -> Token {
        let start = self.column;
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
            self.column += 1;
        }
        let lexeme = self.lines[self.row][start..self.column].to_string();
        Token::new(TokenKind::Integer, lexeme, position)
    }

    fn read_identifier(&mut self, position: Position) -> Token {
        let start = self.column;
        while matches!(self.current_char(), Some(c) if c.is_ascii_alphanumeric()) {
            self.column += 1;
        }
        let lexeme = &self.lines[self.row][start..self.column];
        let kind = match lexeme {
            "var" => TokenKind::Var,
            "for" => TokenKind::For,
            "end" => TokenKind::End,
            "in" => TokenKind::In,
            "do" => TokenKind::Do,
            "read" => TokenKind::Read,
            "print" => TokenKind::Print,
            "assert" => TokenKind::Assert,
            "int" => TokenKind::TypeInt,
            "string" => TokenKind::TypeString,
            "bool" => TokenKind::TypeBool,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, lexeme.to_string(), position)
    }

    fn current_char(&self) -> Option<char> {
        self.lines[self.row]
            .as_bytes()
            .get(self.column)
            .map(|&b| b as char)
    }

    fn peek_char(&self) -> Option<char> {
        self.lines[self.row]
            .as_bytes()
            .get(self.column + 1)
            .map(|&b| b as char)
    }

    fn rest_of_line(&self) -> &str {
        &self.lines[self.row][self.column..]
    }

    fn next_line(&mut self) {
        self.row += 1;
        self.column = 0;
    }

    fn position(&self) -> Position {
        Position::new(self.row + 1, self.column + 1)
    }

    fn eof_token(&self) -> Token {
        let row = self.lines.len().max(1);
        let column = self.lines.last().map_or(0, |line| line.len()) + 1;
        Token::new(TokenKind::Eof, "EOF", Position::new(row, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn scan_all(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.scan_next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan_all(source).into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn scans_a_declaration_statement() {
        let tokens = scan_all("var x : int := 4 + 2;");
        let expected = vec![
            (TokenKind::Var, "var"),
            (TokenKind::Identifier, "x"),
            (TokenKind::Colon, ":"),
            (TokenKind::TypeInt, "int"),
            (TokenKind::Assign, ":="),
            (TokenKind::Integer, "4"),
            (TokenKind::Plus, "+"),
            (TokenKind::Integer, "2"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::Eof, "EOF"),
        ];
        let actual = tokens
            .iter()
            .map(|token| (token.kind, token.lexeme.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(actual, expected);
    }

    #[test]
    fn scans_a_for_loop_with_range() {
        let source = indoc! {r#"
            for x in 0..nTimes do
                print x;
            end for;
        "#};
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::For,
                TokenKind::Identifier,
                TokenKind::In,
                TokenKind::Integer,
                TokenKind::Range,
                TokenKind::Identifier,
                TokenKind::Do,
                TokenKind::Print,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::End,
                TokenKind::For,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn positions_are_one_indexed_and_monotonic() {
        let source = indoc! {r#"
            var x : int;
            print x;
        "#};
        let tokens = scan_all(source);
        assert_eq!(tokens[0].position, Position::new(1, 1));
        assert_eq!(tokens[1].position, Position::new(1, 5));
        assert_eq!(tokens[5].position, Position::new(2, 1));

        let positions = tokens
            .iter()
            .map(|token| (token.position.row, token.position.column))
            .collect::<Vec<_>>();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn distinguishes_colon_from_assignment() {
        assert_eq!(
            kinds("x : := :"),
            vec![
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Assign,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bare_dot_is_a_lexical_error() {
        let tokens = scan_all("0.5");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].lexeme, "expected '..', found bare '.'");
        assert_eq!(tokens[2].kind, TokenKind::Integer);
    }

    #[test]
    fn unescapes_string_literals() {
        let tokens = scan_all(r#"print "a\nb\"c\d";"#);
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].lexeme, "a\nb\"c\\d");
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let tokens = scan_all("print \"oops;");
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(tokens[1].lexeme, "unterminated string literal");
        assert_eq!(tokens[1].position, Position::new(1, 7));
    }

    #[test]
    fn skips_line_comments() {
        let source = indoc! {r#"
            // leading comment
            print 1; // trailing comment
        "#};
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Print,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_block_comments_across_lines() {
        let source = indoc! {r#"
            print /* one
            two
            three */ 1;
        "#};
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Print,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn first_terminator_closes_a_block_comment() {
        assert_eq!(
            kinds("/* /* inner */ print 1;"),
            vec![
                TokenKind::Print,
                TokenKind::Integer,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bare_slash_is_division() {
        assert_eq!(
            kinds("6 / 2"),
            vec![
                TokenKind::Integer,
                TokenKind::Slash,
                TokenKind::Integer,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn reports_illegal_characters() {
        let tokens = scan_all("print 1 @ 2;");
        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[2].lexeme, "illegal character '@'");
    }

    #[test]
    fn keywords_are_reserved_but_prefixes_are_not() {
        assert_eq!(
            kinds("var variable print printed"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Print,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn identifiers_may_contain_digits_after_the_first_letter() {
        let tokens = scan_all("nTimes2 4x");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "nTimes2");
        // A digit ends the integer and starts a new token.
        assert_eq!(tokens[1].kind, TokenKind::Integer);
        assert_eq!(tokens[1].lexeme, "4");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].lexeme, "x");
    }

    #[test]
    fn leading_zeros_are_not_rejected() {
        let tokens = scan_all("007");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].lexeme, "007");
    }

    #[test]
    fn eof_token_is_stable_across_calls() {
        let mut scanner = Scanner::new("print 1;\n");
        while scanner.scan_next_token().kind != TokenKind::Eof {}
        let first = scanner.scan_next_token();
        let second = scanner.scan_next_token();
        assert_eq!(first, second);
        assert_eq!(first.lexeme, "EOF");
        assert_eq!(first.position, Position::new(1, 9));
    }

    #[test]
    fn empty_source_scans_to_eof() {
        let tokens = scan_all("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].position, Position::new(1, 1));
    }
}
