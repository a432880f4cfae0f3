//! Recursive-descent parser with a separate precedence-climbing chain for
//! expressions. Never aborts on a malformed construct: `parse_statement` and
//! friends record a diagnostic, skip one token, and keep going, so a single
//! syntax error doesn't prevent the rest of the file from being checked.

use crate::ast::{
    BinaryOp, Case, Declaration, Definition, Expression, Field, Param, Position, PrimitiveType,
    Program, Statement, TypeExpr, UnaryOp,
};
use crate::diagnostics::Diagnostic;
use crate::lexer::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

/// Parses a full token stream into a [`Program`]. Always returns a program
/// (best-effort) alongside whatever diagnostics were accumulated; callers
/// should treat a non-empty diagnostics list as "do not trust this tree".
pub fn parse(tokens: Vec<Token>) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.diagnostics)
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    // --- token-stream primitives -------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &Token {
        let i = self.pos.saturating_sub(1);
        &self.tokens[i]
    }

    fn position(&self) -> Position {
        self.current().position
    }

    fn is_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_eof() {
            self.pos += 1;
        }
        self.previous()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.matches(kind) {
            true
        } else {
            self.error(message);
            false
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(self.position(), message.into()));
    }

    /// `Objets:` blocks, and the gap between statements, may be separated by
    /// any number of FIN_INSTR tokens; comments never reach the token stream.
    fn skip_terminators(&mut self) {
        while self.at(TokenKind::FinInstr) {
            self.advance();
        }
    }

    fn is_start_of_definition(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Structure | TokenKind::Fonction | TokenKind::Procedure
        )
    }

    fn is_start_of_statement(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Id
                | TokenKind::Si
                | TokenKind::Pour
                | TokenKind::TantQue
                | TokenKind::Repeter
                | TokenKind::Ecrire
                | TokenKind::Lire
                | TokenKind::Retour
                | TokenKind::Retourner
                | TokenKind::Sortir
                | TokenKind::QuitterPour
                | TokenKind::Selon
        )
    }

    /// `Retourner` always takes a value; bare `Retour` accepts an absent one
    /// only when immediately followed by a block terminator.
    fn is_return_terminator(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::FinInstr
                | TokenKind::Fin
                | TokenKind::FinProc
                | TokenKind::FinFonct
                | TokenKind::FinSi
                | TokenKind::Sinon
                | TokenKind::SinonSi
                | TokenKind::FinTantQue
                | TokenKind::FinPour
                | TokenKind::FinSelon
                | TokenKind::Cas
                | TokenKind::Defaut
                | TokenKind::Eof
        )
    }

    // --- program ---------------------------------------------------------

    fn parse_program(&mut self) -> Program {
        let start = self.position();
        self.expect(TokenKind::Algorithme, "mot-cle 'Algorithme' attendu");

        let name_token = self.current().clone();
        let name = if self.expect(TokenKind::Id, "nom d'algorithme (identifiant) attendu") {
            name_token.lexeme
        } else {
            String::new()
        };
        self.skip_terminators();

        let mut declarations = Vec::new();
        if self.matches(TokenKind::Objets) {
            self.expect(TokenKind::DeuxPoints, "':' attendu apres 'Objets'");
            self.skip_terminators();
            while !self.is_eof() && !self.at(TokenKind::Debut) {
                self.skip_terminators();
                if self.at(TokenKind::Debut) || self.is_eof() {
                    break;
                }
                if let Some(decl) = self.parse_declaration() {
                    declarations.push(decl);
                }
                self.skip_terminators();
            }
        }

        self.expect(TokenKind::Debut, "'Debut' attendu");
        self.skip_terminators();

        let mut definitions = Vec::new();
        while !self.is_eof() && self.is_start_of_definition() {
            if let Some(def) = self.parse_definition() {
                definitions.push(def);
            }
            self.skip_terminators();
        }

        let main_block = self.parse_block_until(&[TokenKind::Fin]);

        self.expect(TokenKind::Fin, "'Fin' attendu");
        self.skip_terminators();
        self.expect(TokenKind::Eof, "fin de fichier attendue");

        Program {
            name,
            declarations,
            definitions,
            main_block,
            position: start,
        }
    }

    // --- declarations ------------------------------------------------

    fn parse_declaration(&mut self) -> Option<Declaration> {
        let name_token = self.current().clone();
        if !self.expect(TokenKind::Id, "nom (identifiant) attendu dans une declaration") {
            return None;
        }
        let name = name_token.lexeme;
        let position = name_token.position;

        if !self.expect(TokenKind::DeuxPoints, "':' attendu apres le nom declare") {
            return None;
        }

        if self.matches(TokenKind::Variable) {
            let type_expr = self.parse_type();
            return Some(Declaration::Variable {
                name,
                type_expr,
                position,
            });
        }

        if self.matches(TokenKind::Constante) {
            let type_expr = self.parse_type();
            self.expect(TokenKind::Egal, "'=' attendu dans une declaration de constante");
            let value = self.parse_expression();
            return Some(Declaration::Constant {
                name,
                type_expr,
                value,
                position,
            });
        }

        if self.matches(TokenKind::Tableau) {
            let element_type = self.parse_type();
            let mut dimensions = Vec::new();
            while self.matches(TokenKind::CrochetOuvrant) {
                dimensions.push(self.parse_expression());
                self.expect(TokenKind::CrochetFermant, "']' attendu");
            }
            if dimensions.is_empty() {
                self.error("tableau: au moins une dimension [taille] est requise");
            }
            return Some(Declaration::Array {
                name,
                element_type,
                dimensions,
                position,
            });
        }

        self.error("apres ':', attendu: Variable, Constante ou Tableau");
        None
    }

    /// Parses an optional `Objets:` block local to a function/procedure body,
    /// returning the declarations found (empty if the block is absent).
    fn parse_optional_local_objets(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        if !self.matches(TokenKind::Objets) {
            return declarations;
        }
        self.expect(TokenKind::DeuxPoints, "':' attendu apres 'Objets'");
        self.skip_terminators();
        while !self.is_eof() && !self.at(TokenKind::Debut) {
            self.skip_terminators();
            if self.at(TokenKind::Debut) || self.is_eof() {
                break;
            }
            if let Some(decl) = self.parse_declaration() {
                declarations.push(decl);
            }
            self.skip_terminators();
        }
        declarations
    }

    fn prepend_declarations(declarations: Vec<Declaration>, body: Vec<Statement>) -> Vec<Statement> {
        if declarations.is_empty() {
            return body;
        }
        declarations
            .into_iter()
            .map(Statement::Declaration)
            .chain(body)
            .collect()
    }

    fn parse_type(&mut self) -> TypeExpr {
        let token = self.current().clone();
        let position = token.position;

        if self.matches(TokenKind::Entier) {
            return TypeExpr::Primitive {
                kind: PrimitiveType::Integer,
                position,
            };
        }
        if self.matches(TokenKind::Reel) {
            return TypeExpr::Primitive {
                kind: PrimitiveType::Real,
                position,
            };
        }
        if self.matches(TokenKind::Caractere) {
            return TypeExpr::Primitive {
                kind: PrimitiveType::Character,
                position,
            };
        }
        if self.matches(TokenKind::Chaine) {
            return TypeExpr::Primitive {
                kind: PrimitiveType::String,
                position,
            };
        }
        if self.matches(TokenKind::Booleen) {
            return TypeExpr::Primitive {
                kind: PrimitiveType::Boolean,
                position,
            };
        }

        if self.matches(TokenKind::Tableau) {
            let element = Box::new(self.parse_type());
            let mut dimensions = Vec::new();
            while self.matches(TokenKind::CrochetOuvrant) {
                if self.matches(TokenKind::CrochetFermant) {
                    dimensions.push(None);
                    continue;
                }
                dimensions.push(Some(self.parse_expression()));
                self.expect(TokenKind::CrochetFermant, "']' attendu");
            }
            if dimensions.is_empty() {
                self.error("type tableau: utiliser au moins une dimension [] ou [taille]");
            }
            return TypeExpr::ArrayOf {
                element,
                dimensions,
                position,
            };
        }

        if self.matches(TokenKind::Id) {
            return TypeExpr::Named {
                name: token.lexeme,
                position,
            };
        }

        self.error("type attendu (entier/reel/caractere/chaine/booleen ou nom de structure)");
        TypeExpr::Named {
            name: "<?>".to_string(),
            position,
        }
    }

    // --- definitions -------------------------------------------------

    fn parse_definition(&mut self) -> Option<Definition> {
        match self.current().kind {
            TokenKind::Structure => Some(self.parse_struct_definition()),
            TokenKind::Fonction => Some(self.parse_function_definition()),
            TokenKind::Procedure => Some(self.parse_procedure_definition()),
            _ => None,
        }
    }

    fn parse_struct_definition(&mut self) -> Definition {
        let position = self.position();
        self.expect(TokenKind::Structure, "'Structure' attendu");

        let name_token = self.current().clone();
        self.expect(TokenKind::Id, "nom de structure (identifiant) attendu");
        let name = name_token.lexeme;
        self.skip_terminators();

        let mut fields = Vec::new();
        while !self.is_eof() && !self.at(TokenKind::FinStruct) {
            self.skip_terminators();
            if self.at(TokenKind::FinStruct) || self.is_eof() {
                break;
            }
            let field_token = self.current().clone();
            if !self.expect(TokenKind::Id, "nom de champ (identifiant) attendu") {
                break;
            }
            self.expect(TokenKind::DeuxPoints, "':' attendu apres le nom du champ");
            let type_expr = self.parse_type();
            fields.push(Field {
                name: field_token.lexeme,
                type_expr,
                position: field_token.position,
            });
            self.skip_terminators();
        }

        self.expect(TokenKind::FinStruct, "'FinStruct' attendu");
        Definition::Struct {
            name,
            fields,
            position,
        }
    }

    fn parse_param(&mut self) -> Param {
        let token = self.current().clone();
        self.expect(TokenKind::Id, "nom de parametre (identifiant) attendu");
        self.expect(TokenKind::DeuxPoints, "':' attendu dans un parametre");
        let type_expr = self.parse_type();
        Param {
            name: token.lexeme,
            type_expr,
            position: token.position,
        }
    }

    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        self.expect(TokenKind::ParenOuvrante, "'(' attendu");
        if !self.at(TokenKind::ParenFermante) {
            params.push(self.parse_param());
            while self.matches(TokenKind::Virgule) {
                params.push(self.parse_param());
            }
        }
        self.expect(TokenKind::ParenFermante, "')' attendu");
        params
    }

    fn parse_function_definition(&mut self) -> Definition {
        let position = self.position();
        self.expect(TokenKind::Fonction, "'Fonction' attendu");

        let name_token = self.current().clone();
        self.expect(TokenKind::Id, "nom de fonction (identifiant) attendu");
        let name = name_token.lexeme;

        let params = self.parse_params();

        self.expect(TokenKind::DeuxPoints, "':' attendu avant le type de retour");
        let return_type = self.parse_type();
        self.skip_terminators();

        let local_declarations = self.parse_optional_local_objets();
        self.expect(TokenKind::Debut, "'Debut' attendu dans une fonction");
        self.skip_terminators();

        let body = self.parse_block_until(&[TokenKind::FinFonct]);
        let body = Self::prepend_declarations(local_declarations, body);

        self.expect(TokenKind::FinFonct, "'FinFonct' attendu");
        Definition::Function {
            name,
            params,
            return_type,
            body,
            position,
        }
    }

    fn parse_procedure_definition(&mut self) -> Definition {
        let position = self.position();
        self.expect(TokenKind::Procedure, "'Procedure' attendu");

        let name_token = self.current().clone();
        self.expect(TokenKind::Id, "nom de procedure (identifiant) attendu");
        let name = name_token.lexeme;

        let params = self.parse_params();
        self.skip_terminators();

        let local_declarations = self.parse_optional_local_objets();
        self.expect(TokenKind::Debut, "'Debut' attendu dans une procedure");
        self.skip_terminators();

        let body = self.parse_block_until(&[TokenKind::FinProc]);
        let body = Self::prepend_declarations(local_declarations, body);

        self.expect(TokenKind::FinProc, "'FinProc' attendu");
        Definition::Procedure {
            name,
            params,
            body,
            position,
        }
    }

    // --- statements --------------------------------------------------

    fn parse_block_until(&mut self, stop: &[TokenKind]) -> Vec<Statement> {
        let mut statements = Vec::new();
        while !self.is_eof() && !stop.contains(&self.current().kind) {
            self.skip_terminators();
            if self.is_eof() || stop.contains(&self.current().kind) {
                break;
            }
            if !self.is_start_of_statement() {
                self.error("instruction attendue");
                self.advance();
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.skip_terminators();
        }
        statements
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current().kind {
            TokenKind::Si => Some(self.parse_if_statement()),
            TokenKind::TantQue => Some(self.parse_while_statement()),
            TokenKind::Pour => Some(self.parse_for_statement()),
            TokenKind::Repeter => Some(self.parse_repeat_statement()),
            TokenKind::Ecrire => Some(self.parse_write_statement()),
            TokenKind::Lire => Some(self.parse_read_statement()),
            TokenKind::Retour | TokenKind::Retourner => Some(self.parse_return_statement()),
            TokenKind::Sortir => {
                let position = self.advance().position;
                Some(Statement::Break(position))
            }
            TokenKind::QuitterPour => {
                let position = self.advance().position;
                Some(Statement::QuitLoop(position))
            }
            TokenKind::Selon => Some(self.parse_switch_statement()),
            TokenKind::Id => Some(self.parse_statement_starting_with_id()),
            _ => {
                self.error("instruction inconnue");
                self.advance();
                None
            }
        }
    }

    /// An identifier starts either an assignment (`cible <- expr`) or a
    /// call-statement (`f(...)`); anything else after the lvalue is invalid.
    fn parse_statement_starting_with_id(&mut self) -> Statement {
        let position = self.position();
        let expr = self.parse_postfix_expression();

        if self.matches(TokenKind::Affectation) {
            if !expr.is_lvalue() {
                self.error("cible d'affectation invalide");
            }
            let value = self.parse_expression();
            return Statement::Assign {
                target: expr,
                value,
                position,
            };
        }

        if matches!(expr, Expression::Call { .. }) {
            return Statement::CallStatement(expr);
        }

        self.error("instruction invalide: affectation '<-' ou appel attendu apres un identifiant");
        Statement::CallStatement(expr)
    }

    fn parse_write_statement(&mut self) -> Statement {
        let position = self.advance().position;
        let mut args = Vec::new();
        self.expect(TokenKind::ParenOuvrante, "'(' attendu apres Ecrire");
        if !self.at(TokenKind::ParenFermante) {
            args.push(self.parse_expression());
            while self.matches(TokenKind::Virgule) {
                args.push(self.parse_expression());
            }
        }
        self.expect(TokenKind::ParenFermante, "')' attendu apres Ecrire(...)");
        Statement::Write { args, position }
    }

    fn parse_read_statement(&mut self) -> Statement {
        let position = self.advance().position;
        let mut targets = Vec::new();
        self.expect(TokenKind::ParenOuvrante, "'(' attendu apres Lire");
        if !self.at(TokenKind::ParenFermante) {
            targets.push(self.parse_lvalue());
            while self.matches(TokenKind::Virgule) {
                targets.push(self.parse_lvalue());
            }
        }
        self.expect(TokenKind::ParenFermante, "')' attendu apres Lire(...)");
        Statement::Read { targets, position }
    }

    fn parse_return_statement(&mut self) -> Statement {
        let position = self.position();
        if self.matches(TokenKind::Retourner) {
            let value = self.parse_expression();
            return Statement::Return {
                value: Some(value),
                position,
            };
        }

        self.expect(TokenKind::Retour, "'Retour' ou 'Retourner' attendu");
        if self.is_return_terminator() {
            return Statement::Return {
                value: None,
                position,
            };
        }
        let value = self.parse_expression();
        Statement::Return {
            value: Some(value),
            position,
        }
    }

    fn parse_if_statement(&mut self) -> Statement {
        let position = self.advance().position;
        let condition = self.parse_expression();
        self.expect(TokenKind::Alors, "'Alors' attendu");
        self.skip_terminators();

        let then_block =
            self.parse_block_until(&[TokenKind::SinonSi, TokenKind::Sinon, TokenKind::FinSi]);

        let mut elif_conditions = Vec::new();
        let mut elif_blocks = Vec::new();
        while self.matches(TokenKind::SinonSi) {
            elif_conditions.push(self.parse_expression());
            self.expect(TokenKind::Alors, "'Alors' attendu apres SinonSi");
            self.skip_terminators();
            elif_blocks
                .push(self.parse_block_until(&[TokenKind::SinonSi, TokenKind::Sinon, TokenKind::FinSi]));
        }

        let else_block = if self.matches(TokenKind::Sinon) {
            self.skip_terminators();
            Some(self.parse_block_until(&[TokenKind::FinSi]))
        } else {
            None
        };

        self.expect(TokenKind::FinSi, "'FinSi' attendu");
        Statement::If {
            condition,
            then_block,
            elif_conditions,
            elif_blocks,
            else_block,
            position,
        }
    }

    fn parse_while_statement(&mut self) -> Statement {
        let position = self.advance().position;
        let condition = self.parse_expression();
        self.skip_terminators();
        let body = self.parse_block_until(&[TokenKind::FinTantQue]);
        self.expect(TokenKind::FinTantQue, "'FinTantQue' attendu");
        Statement::While {
            condition,
            body,
            position,
        }
    }

    fn parse_for_statement(&mut self) -> Statement {
        let position = self.advance().position;

        let var_token = self.current().clone();
        self.expect(TokenKind::Id, "variable de boucle attendue (identifiant)");
        let variable = var_token.lexeme;

        self.expect(TokenKind::Affectation, "'<-' attendu dans Pour");
        let start = self.parse_expression();

        self.expect(TokenKind::Jusqua, "'jusqu-a' attendu");
        let end = self.parse_expression();

        let step = if self.matches(TokenKind::Pas) {
            Some(self.parse_expression())
        } else {
            None
        };
        self.skip_terminators();

        let body = self.parse_block_until(&[TokenKind::FinPour]);
        self.expect(TokenKind::FinPour, "'FinPour' attendu");

        Statement::For {
            variable,
            start,
            end,
            step,
            body,
            position,
        }
    }

    fn parse_repeat_statement(&mut self) -> Statement {
        let position = self.advance().position;
        self.skip_terminators();
        let body = self.parse_block_until(&[TokenKind::TantQue]);
        let until = if self.matches(TokenKind::TantQue) {
            Some(self.parse_expression())
        } else {
            None
        };
        Statement::Repeat {
            body,
            until,
            position,
        }
    }

    fn parse_switch_statement(&mut self) -> Statement {
        let position = self.advance().position;
        let scrutinee = self.parse_expression();
        self.skip_terminators();

        let mut cases = Vec::new();
        let mut default = None;
        let mut saw_case_or_default = false;

        while !self.is_eof() && !self.at(TokenKind::FinSelon) {
            self.skip_terminators();
            if self.at(TokenKind::FinSelon) || self.is_eof() {
                break;
            }

            if self.matches(TokenKind::Cas) {
                saw_case_or_default = true;
                let case_position = self.previous().position;

                let mut values = vec![self.parse_expression()];
                while self.matches(TokenKind::Virgule) {
                    values.push(self.parse_expression());
                }
                self.expect(TokenKind::DeuxPoints, "':' attendu apres 'Cas ...'");
                self.skip_terminators();

                let body =
                    self.parse_block_until(&[TokenKind::Cas, TokenKind::Defaut, TokenKind::FinSelon]);
                cases.push(Case {
                    values,
                    body,
                    position: case_position,
                });
                continue;
            }

            if self.matches(TokenKind::Defaut) {
                saw_case_or_default = true;
                self.expect(TokenKind::DeuxPoints, "':' attendu apres 'Defaut'");
                self.skip_terminators();
                default = Some(self.parse_block_until(&[TokenKind::FinSelon]));
                continue;
            }

            self.error("dans Selon: attendu 'Cas', 'Defaut' ou 'FinSelon'");
            self.advance();
        }

        if !saw_case_or_default {
            self.error("Selon: au moins un Cas ou Defaut est attendu");
        }
        self.expect(TokenKind::FinSelon, "'FinSelon' attendu");

        Statement::Switch {
            scrutinee,
            cases,
            default,
            position,
        }
    }

    // --- lvalues and expressions --------------------------------------

    fn parse_lvalue(&mut self) -> Expression {
        let token = self.current().clone();
        self.expect(TokenKind::Id, "identifiant attendu");
        let mut base = Expression::Identifier {
            name: token.lexeme,
            position: token.position,
        };

        loop {
            if self.matches(TokenKind::CrochetOuvrant) {
                let index = self.parse_expression();
                self.expect(TokenKind::CrochetFermant, "']' attendu");
                base = Expression::Index {
                    base: Box::new(base),
                    index: Box::new(index),
                    position: token.position,
                };
                continue;
            }
            if self.matches(TokenKind::Point) {
                let field_token = self.current().clone();
                self.expect(TokenKind::Id, "nom de champ attendu apres '.'");
                base = Expression::Field {
                    base: Box::new(base),
                    field: field_token.lexeme,
                    position: field_token.position,
                };
                continue;
            }
            break;
        }

        base
    }

    fn parse_expression(&mut self) -> Expression {
        self.parse_or_expression()
    }

    fn parse_or_expression(&mut self) -> Expression {
        let mut left = self.parse_and_expression();
        while self.matches(TokenKind::Ou) {
            let position = self.previous().position;
            let right = self.parse_and_expression();
            left = Expression::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        left
    }

    fn parse_and_expression(&mut self) -> Expression {
        let mut left = self.parse_comparison_expression();
        while self.matches(TokenKind::Et) {
            let position = self.previous().position;
            let right = self.parse_comparison_expression();
            left = Expression::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        left
    }

    fn comparison_op(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Egal => Some(BinaryOp::Eq),
            TokenKind::Different => Some(BinaryOp::Ne),
            TokenKind::Inferieur => Some(BinaryOp::Lt),
            TokenKind::InferieurEgal => Some(BinaryOp::Le),
            TokenKind::Superieur => Some(BinaryOp::Gt),
            TokenKind::SuperieurEgal => Some(BinaryOp::Ge),
            _ => None,
        }
    }

    fn parse_comparison_expression(&mut self) -> Expression {
        let mut left = self.parse_additive_expression();
        while let Some(op) = Self::comparison_op(self.current().kind) {
            let position = self.advance().position;
            let right = self.parse_additive_expression();
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        left
    }

    fn parse_additive_expression(&mut self) -> Expression {
        let mut left = self.parse_multiplicative_expression();
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Moins => BinaryOp::Sub,
                _ => break,
            };
            let position = self.advance().position;
            let right = self.parse_multiplicative_expression();
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        left
    }

    fn parse_multiplicative_expression(&mut self) -> Expression {
        let mut left = self.parse_power_expression();
        loop {
            let op = match self.current().kind {
                TokenKind::Fois => BinaryOp::Mul,
                TokenKind::Divise => BinaryOp::Div,
                TokenKind::DivEntier => BinaryOp::IntDiv,
                TokenKind::Modulo => BinaryOp::Mod,
                _ => break,
            };
            let position = self.advance().position;
            let right = self.parse_power_expression();
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        left
    }

    fn parse_power_expression(&mut self) -> Expression {
        let mut left = self.parse_unary_expression();
        while self.matches(TokenKind::Puissance) {
            let position = self.previous().position;
            let right = self.parse_unary_expression();
            left = Expression::Binary {
                op: BinaryOp::Pow,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        left
    }

    fn parse_unary_expression(&mut self) -> Expression {
        if self.matches(TokenKind::Non) {
            let position = self.previous().position;
            let operand = self.parse_unary_expression();
            return Expression::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                position,
            };
        }
        if self.matches(TokenKind::Moins) {
            let position = self.previous().position;
            let operand = self.parse_unary_expression();
            return Expression::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                position,
            };
        }
        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> Expression {
        let mut base = self.parse_primary_expression();

        loop {
            if self.matches(TokenKind::CrochetOuvrant) {
                let position = self.previous().position;
                let index = self.parse_expression();
                self.expect(TokenKind::CrochetFermant, "']' attendu");
                base = Expression::Index {
                    base: Box::new(base),
                    index: Box::new(index),
                    position,
                };
                continue;
            }
            if self.matches(TokenKind::Point) {
                let field_token = self.current().clone();
                self.expect(TokenKind::Id, "nom de champ attendu apres '.'");
                base = Expression::Field {
                    base: Box::new(base),
                    field: field_token.lexeme,
                    position: field_token.position,
                };
                continue;
            }
            if self.matches(TokenKind::ParenOuvrante) {
                let position = self.previous().position;
                let mut args = Vec::new();
                if !self.at(TokenKind::ParenFermante) {
                    args.push(self.parse_expression());
                    while self.matches(TokenKind::Virgule) {
                        args.push(self.parse_expression());
                    }
                }
                self.expect(TokenKind::ParenFermante, "')' attendu");
                base = Expression::Call {
                    callee: Box::new(base),
                    args,
                    position,
                };
                continue;
            }
            break;
        }

        base
    }

    fn parse_primary_expression(&mut self) -> Expression {
        let token = self.current().clone();

        if self.matches(TokenKind::ConstEntiere) {
            let value = token.lexeme.parse::<i64>().unwrap_or(0);
            return Expression::IntegerLiteral {
                value,
                position: token.position,
            };
        }
        if self.matches(TokenKind::ConstReelle) {
            return Expression::RealLiteral {
                text: token.lexeme,
                position: token.position,
            };
        }
        if self.matches(TokenKind::ConstChaine) {
            return Expression::StringLiteral {
                value: token.lexeme,
                position: token.position,
            };
        }
        if self.matches(TokenKind::Vrai) {
            return Expression::BooleanLiteral {
                value: true,
                position: token.position,
            };
        }
        if self.matches(TokenKind::Faux) {
            return Expression::BooleanLiteral {
                value: false,
                position: token.position,
            };
        }
        if self.matches(TokenKind::Id) {
            return Expression::Identifier {
                name: token.lexeme,
                position: token.position,
            };
        }
        if self.matches(TokenKind::ParenOuvrante) {
            let inner = self.parse_expression();
            self.expect(TokenKind::ParenFermante, "')' attendu");
            return inner;
        }

        self.error("expression attendue");
        self.advance();
        Expression::Identifier {
            name: "<?>".to_string(),
            position: token.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
        let (tokens, lex_diagnostics) = lex(source);
        assert!(lex_diagnostics.is_empty(), "lexing failed: {lex_diagnostics:?}");
        parse(tokens)
    }

    #[test]
    fn parses_minimal_program() {
        let (program, diagnostics) = parse_source("Algorithme Vide\nDebut\nFin\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(program.name, "Vide");
        assert!(program.main_block.is_empty());
    }

    #[test]
    fn parses_global_declarations() {
        let source = "Algorithme A\nObjets:\nx: Variable entier\nDebut\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(program.declarations.len(), 1);
        assert_eq!(program.declarations[0].name(), "x");
    }

    #[test]
    fn parses_array_declaration_with_dimensions() {
        let source = "Algorithme A\nObjets:\nt: Tableau entier[10]\nDebut\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        match &program.declarations[0] {
            Declaration::Array { dimensions, .. } => assert_eq!(dimensions.len(), 1),
            other => panic!("expected array declaration, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_elif_else() {
        let source = "Algorithme A\nDebut\nSi Vrai Alors\nEcrire(1)\nSinonSi Faux Alors\nEcrire(2)\nSinon\nEcrire(3)\nFinSi\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        match &program.main_block[0] {
            Statement::If {
                elif_conditions,
                elif_blocks,
                else_block,
                ..
            } => {
                assert_eq!(elif_conditions.len(), 1);
                assert_eq!(elif_blocks.len(), 1);
                assert!(else_block.is_some());
            }
            other => panic!("expected if statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_for_with_step() {
        let source = "Algorithme A\nDebut\nPour i <- 1 jusqu'a 10 Pas 2\nEcrire(i)\nFinPour\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        match &program.main_block[0] {
            Statement::For { step, .. } => assert!(step.is_some()),
            other => panic!("expected for statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_definition_with_params_and_return() {
        let source =
            "Algorithme A\nDebut\nFonction Carre(x: entier): entier\nDebut\nRetourner x * x\nFinFonct\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        match &program.definitions[0] {
            Definition::Function { params, body, .. } => {
                assert_eq!(params.len(), 1);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected function definition, got {other:?}"),
        }
    }

    #[test]
    fn parses_switch_with_default() {
        let source =
            "Algorithme A\nDebut\nSelon x\nCas 1, 2:\nEcrire(1)\nDefaut:\nEcrire(2)\nFinSelon\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        match &program.main_block[0] {
            Statement::Switch { cases, default, .. } => {
                assert_eq!(cases.len(), 1);
                assert_eq!(cases[0].values.len(), 2);
                assert!(default.is_some());
            }
            other => panic!("expected switch statement, got {other:?}"),
        }
    }

    #[test]
    fn assigns_indexed_and_field_targets() {
        let source = "Algorithme A\nDebut\nt[1] <- 2\np.x <- 3\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(matches!(
            program.main_block[0],
            Statement::Assign {
                target: Expression::Index { .. },
                ..
            }
        ));
        assert!(matches!(
            program.main_block[1],
            Statement::Assign {
                target: Expression::Field { .. },
                ..
            }
        ));
    }

    #[test]
    fn reports_diagnostic_on_missing_fin_si_and_keeps_parsing() {
        let source = "Algorithme A\nDebut\nSi Vrai Alors\nEcrire(1)\nFin\n";
        let (_, diagnostics) = parse_source(source);
        assert!(!diagnostics.is_empty());
    }

    #[test]
    fn respects_arithmetic_precedence() {
        let source = "Algorithme A\nDebut\nx <- 1 + 2 * 3\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        match &program.main_block[0] {
            Statement::Assign { value, .. } => match value {
                Expression::Binary { op: BinaryOp::Add, right, .. } => {
                    assert!(matches!(**right, Expression::Binary { op: BinaryOp::Mul, .. }));
                }
                other => panic!("expected addition at the top, got {other:?}"),
            },
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn call_statement_parses_call_expression() {
        let source = "Algorithme A\nDebut\nAfficherTout(1, 2)\nFin\n";
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        match &program.main_block[0] {
            Statement::CallStatement(Expression::Call { args, .. }) => assert_eq!(args.len(), 2),
            other => panic!("expected call statement, got {other:?}"),
        }
    }
}
