//! Character stream -> token stream, with explicit line/column tracking,
//! keyword recognition, FIN_INSTR (statement-terminator) synthesis, and
//! error-token reporting. The lexer never aborts: every malformed construct
//! becomes both an error token in the stream and a message in the returned
//! diagnostics list, and the stream always ends with exactly one EOF token.

mod keywords;
mod token;

pub use token::{Position, Token, TokenKind};

use unescape::unescape;

use crate::diagnostics::Diagnostic;

/// Bytes (here, chars) at or above this boundary are accepted as identifier
/// characters so that accented French keywords ("Répéter", "Caractère",
/// "Booléen") lex the same as their ASCII-only aliases.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_identifier_continuation(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit() || c == '\'' || c == '-'
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    paren_depth: u32,
    bracket_depth: u32,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            paren_depth: 0,
            bracket_depth: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Runs the lexer to completion and returns the token stream (always
    /// terminated by exactly one EOF token) plus any diagnostics gathered
    /// along the way. An empty diagnostics list means lexing succeeded.
    pub fn lex(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        while !self.at_end() {
            let c = self.current();
            if is_whitespace(c) {
                self.skip_whitespace();
            } else if is_digit(c) {
                self.lex_number();
            } else if is_identifier_start(c) {
                self.lex_identifier();
            } else {
                self.lex_symbol();
            }
        }
        let eof_position = Position::new(self.line, self.column);
        self.tokens.push(Token::new(TokenKind::Eof, "", eof_position));
        (self.tokens, self.diagnostics)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn current(&self) -> char {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or('\0')
    }

    fn previous(&self) -> char {
        if self.pos == 0 {
            '\0'
        } else {
            self.chars[self.pos - 1]
        }
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.at_end() {
                break;
            }
            if self.current() == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, position: Position) {
        self.tokens.push(Token::new(kind, lexeme, position));
    }

    fn push_error(
        &mut self,
        kind: TokenKind,
        lexeme: impl Into<String>,
        position: Position,
        message: impl Into<String>,
    ) {
        let lexeme = lexeme.into();
        self.tokens.push(Token::new(kind, lexeme, position));
        self.diagnostics.push(Diagnostic::new(position, message));
    }

    fn should_emit_fin_instr(&self) -> bool {
        if self.tokens.is_empty() {
            return false;
        }
        if self.paren_depth > 0 || self.bracket_depth > 0 {
            return false;
        }
        !matches!(self.tokens.last().unwrap().kind, TokenKind::FinInstr)
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && is_whitespace(self.current()) {
            if self.current() == '\n' && self.should_emit_fin_instr() {
                let position = Position::new(self.line, self.column);
                self.push(TokenKind::FinInstr, "", position);
            }
            self.advance(1);
        }
    }

    /// Skips inline whitespace only (not newlines); used for the "Quitter
    /// Pour" two-word lookahead, which must not cross a line boundary into a
    /// synthesized FIN_INSTR.
    fn skip_inline_whitespace(&mut self) {
        while !self.at_end() && matches!(self.current(), ' ' | '\t' | '\r') {
            self.advance(1);
        }
    }

    fn lex_identifier(&mut self) {
        let position = Position::new(self.line, self.column);
        let start = self.pos;
        while !self.at_end() && is_identifier_continuation(self.current()) {
            self.advance(1);
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        match keywords::lookup(&word) {
            Some(TokenKind::QuitterPour) => self.lex_quitter_pour(&word, position),
            Some(kind) => self.push(kind, word, position),
            None => self.push(TokenKind::Id, word, position),
        }
    }

    /// "Quitter"/"quitter" is followed by a lookahead for the word "Pour"/
    /// "pour" (skipping inline spaces only). If found, both words are
    /// combined into one token. If not, the lexer rewinds and still emits a
    /// `QuitterPour` token carrying only the first word as its lexeme — the
    /// original implementation's quirky-but-observable behavior, preserved
    /// rather than tightened (see DESIGN.md).
    fn lex_quitter_pour(&mut self, first_word: &str, position: Position) {
        let saved_pos = self.pos;
        let saved_line = self.line;
        let saved_column = self.column;

        self.skip_inline_whitespace();

        let word_start = self.pos;
        while !self.at_end()
            && (is_identifier_start(self.current()) || matches!(self.current(), '\'' | '-'))
        {
            self.advance(1);
        }
        let next_word: String = self.chars[word_start..self.pos].iter().collect();

        if next_word == "Pour" || next_word == "pour" {
            let combined = format!("{first_word} {next_word}");
            self.push(TokenKind::QuitterPour, combined, position);
        } else {
            self.pos = saved_pos;
            self.line = saved_line;
            self.column = saved_column;
            self.push(TokenKind::QuitterPour, first_word, position);
        }
    }

    /// Digit run; if followed by `,` or `.` and then a digit, consumes a
    /// decimal run and emits a real literal, otherwise an integer literal.
    fn lex_number(&mut self) {
        let position = Position::new(self.line, self.column);
        let start = self.pos;
        let mut is_real = false;

        while !self.at_end() && is_digit(self.current()) {
            self.advance(1);
        }

        let sep = self.current();
        let after_sep = self.peek_at(1);
        if (sep == ',' || sep == '.') && is_digit(after_sep) {
            is_real = true;
            self.advance(1);
            while !self.at_end() && is_digit(self.current()) {
                self.advance(1);
            }
        }

        let lexeme: String = self.chars[start..self.pos].iter().collect();
        if is_real {
            self.push(TokenKind::ConstReelle, lexeme, position);
        } else {
            self.push(TokenKind::ConstEntiere, lexeme, position);
        }
    }

    /// A leading-point real literal: `.` followed by a digit, not preceded by
    /// a digit (otherwise it would have already been consumed by
    /// `lex_number`'s decimal-run logic).
    fn lex_leading_point_number(&mut self) {
        let position = Position::new(self.line, self.column);
        let start = self.pos;
        self.advance(1); // the leading '.'
        while !self.at_end() && is_digit(self.current()) {
            self.advance(1);
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::ConstReelle, lexeme, position);
    }

    fn lex_string(&mut self) {
        let position = Position::new(self.line, self.column);
        let delimiter = self.current();
        self.advance(1);

        let start = self.pos;
        let mut escape = false;
        while !self.at_end() {
            let c = self.current();
            if escape {
                escape = false;
                self.advance(1);
                continue;
            }
            if c == '\\' {
                escape = true;
                self.advance(1);
                continue;
            }
            if c == delimiter || c == '\n' {
                break;
            }
            self.advance(1);
        }

        let content: String = self.chars[start..self.pos].iter().collect();
        if self.at_end() || self.current() != delimiter {
            self.push_error(
                TokenKind::ConstChaineErr,
                content,
                position,
                "chaine non terminee",
            );
            return;
        }

        // The raw content still carries backslash escapes verbatim; resolve
        // them here so the token's lexeme is the literal's actual value
        // (e.g. a real newline byte for `\n`), leaving target-specific
        // re-escaping entirely to the emitters.
        match unescape(&content) {
            Some(unescaped) => self.push(TokenKind::ConstChaine, unescaped, position),
            None => self.push_error(
                TokenKind::ConstChaineErr,
                content,
                position,
                "sequence d'echappement invalide dans la chaine",
            ),
        }
        self.advance(1); // closing delimiter
    }

    fn lex_line_comment(&mut self) {
        self.advance(2); // "//"
        let start = self.pos;
        while !self.at_end() && self.current() != '\n' {
            self.advance(1);
        }
        // Stripped: comments never reach the token stream the parser consumes.
        let _ = &self.chars[start..self.pos];
    }

    fn lex_block_comment(&mut self) {
        let position = Position::new(self.line, self.column);
        self.advance(2); // "/*"
        while !self.at_end() && !(self.current() == '*' && self.peek_at(1) == '/') {
            self.advance(1);
        }
        if self.at_end() {
            self.push_error(
                TokenKind::CommentaireBlocErr,
                "",
                position,
                "commentaire bloc non termine",
            );
            return;
        }
        self.advance(2); // "*/"
    }

    fn lex_symbol(&mut self) {
        let position = Position::new(self.line, self.column);
        let c = self.current();

        if c == '"' || c == '\'' {
            self.lex_string();
            return;
        }

        let next = self.peek_at(1);
        match c {
            '<' => match next {
                '-' => {
                    self.advance(2);
                    self.push(TokenKind::Affectation, "<-", position);
                }
                '=' => {
                    self.advance(2);
                    self.push(TokenKind::InferieurEgal, "<=", position);
                }
                '>' => {
                    self.advance(2);
                    self.push(TokenKind::Different, "<>", position);
                }
                _ => {
                    self.advance(1);
                    self.push(TokenKind::Inferieur, "<", position);
                }
            },
            '>' => {
                if next == '=' {
                    self.advance(2);
                    self.push(TokenKind::SuperieurEgal, ">=", position);
                } else {
                    self.advance(1);
                    self.push(TokenKind::Superieur, ">", position);
                }
            }
            '=' => {
                self.advance(1);
                self.push(TokenKind::Egal, "=", position);
            }
            '+' => {
                self.advance(1);
                self.push(TokenKind::Plus, "+", position);
            }
            '-' => {
                self.advance(1);
                self.push(TokenKind::Moins, "-", position);
            }
            '*' => {
                self.advance(1);
                self.push(TokenKind::Fois, "*", position);
            }
            '/' => {
                if next == '/' {
                    self.lex_line_comment();
                } else if next == '*' {
                    self.lex_block_comment();
                } else {
                    self.advance(1);
                    self.push(TokenKind::Divise, "/", position);
                }
            }
            '^' => {
                self.advance(1);
                self.push(TokenKind::Puissance, "^", position);
            }
            ':' => {
                self.advance(1);
                self.push(TokenKind::DeuxPoints, ":", position);
            }
            ',' => {
                self.advance(1);
                self.push(TokenKind::Virgule, ",", position);
            }
            '(' => {
                self.advance(1);
                self.paren_depth += 1;
                self.push(TokenKind::ParenOuvrante, "(", position);
            }
            ')' => {
                self.advance(1);
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.push(TokenKind::ParenFermante, ")", position);
            }
            '[' => {
                self.advance(1);
                self.bracket_depth += 1;
                self.push(TokenKind::CrochetOuvrant, "[", position);
            }
            ']' => {
                self.advance(1);
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                self.push(TokenKind::CrochetFermant, "]", position);
            }
            '.' => {
                if is_digit(next) && !is_digit(self.previous()) {
                    self.lex_leading_point_number();
                } else {
                    self.advance(1);
                    self.push(TokenKind::Point, ".", position);
                }
            }
            other => {
                let message = format!("caractere inconnu: {other:?} (0x{:02x})", other as u32);
                self.push_error(TokenKind::IdErr, other.to_string(), position, message);
                self.advance(1);
            }
        }
    }
}

pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(source).lex()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn comments_and_whitespace_only_tokenize_to_eof() {
        assert_eq!(kinds("  // nothing here\n/* block */\n  \n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn keyword_case_insensitivity() {
        assert_eq!(
            kinds("si SI Si"),
            vec![TokenKind::Si, TokenKind::Id, TokenKind::Si, TokenKind::Eof]
        );
    }

    #[test]
    fn integer_and_real_literals() {
        let (tokens, diags) = lex("42 3,14 2.5 .5");
        assert!(diags.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ConstEntiere,
                TokenKind::ConstReelle,
                TokenKind::ConstReelle,
                TokenKind::ConstReelle,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newline_synthesizes_fin_instr_outside_brackets() {
        assert_eq!(
            kinds("x\ny"),
            vec![
                TokenKind::Id,
                TokenKind::FinInstr,
                TokenKind::Id,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn no_fin_instr_synthesis_inside_parens_or_brackets() {
        assert_eq!(
            kinds("f(a,\nb)"),
            vec![
                TokenKind::Id,
                TokenKind::ParenOuvrante,
                TokenKind::Id,
                TokenKind::Virgule,
                TokenKind::Id,
                TokenKind::ParenFermante,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("t[1,\n2]"),
            vec![
                TokenKind::Id,
                TokenKind::CrochetOuvrant,
                TokenKind::ConstEntiere,
                TokenKind::Virgule,
                TokenKind::ConstEntiere,
                TokenKind::CrochetFermant,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn quitter_pour_combines_into_one_token() {
        let (tokens, _) = lex("Quitter Pour");
        assert_eq!(tokens[0].kind, TokenKind::QuitterPour);
        assert_eq!(tokens[0].lexeme, "Quitter Pour");
    }

    #[test]
    fn quitter_alone_still_emits_quitter_pour_kind() {
        let (tokens, _) = lex("Quitter x");
        assert_eq!(tokens[0].kind, TokenKind::QuitterPour);
        assert_eq!(tokens[0].lexeme, "Quitter");
        assert_eq!(tokens[1].kind, TokenKind::Id);
    }

    #[test]
    fn unterminated_string_is_error_token_plus_diagnostic() {
        let (tokens, diags) = lex("\"abc");
        assert_eq!(tokens[0].kind, TokenKind::ConstChaineErr);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn string_escape_sequences_resolve_to_real_characters() {
        let (tokens, diags) = lex(r#""a\nb\tc""#);
        assert!(diags.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::ConstChaine);
        assert_eq!(tokens[0].lexeme, "a\nb\tc");
    }

    #[test]
    fn invalid_escape_sequence_is_error_token_plus_diagnostic() {
        let (tokens, diags) = lex(r#""a\qb""#);
        assert_eq!(tokens[0].kind, TokenKind::ConstChaineErr);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn unterminated_block_comment_is_error() {
        let (_, diags) = lex("/* never closes");
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn unclassifiable_byte_is_error_token_with_message() {
        let (tokens, diags) = lex("@");
        assert_eq!(tokens[0].kind, TokenKind::IdErr);
        assert_eq!(diags.len(), 1);
        assert!(!diags[0].message.is_empty());
    }

    #[test]
    fn operator_lookahead() {
        assert_eq!(
            kinds("<- <= <> >= ="),
            vec![
                TokenKind::Affectation,
                TokenKind::InferieurEgal,
                TokenKind::Different,
                TokenKind::SuperieurEgal,
                TokenKind::Egal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn accented_keyword_matches_ascii_alias() {
        assert_eq!(kinds("Répéter"), vec![TokenKind::Repeter, TokenKind::Eof]);
        assert_eq!(kinds("repeter"), vec![TokenKind::Repeter, TokenKind::Eof]);
    }

    #[test]
    fn positions_are_monotonic_and_eof_is_single() {
        let (tokens, diags) = lex("x <- 1 + 2\ny <- 3");
        assert!(diags.is_empty());
        let mut last = (0, 0);
        for t in &tokens {
            let pos = (t.position.line, t.position.column);
            assert!(pos >= last);
            last = pos;
        }
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }
}
