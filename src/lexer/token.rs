//! The token catalog: an exhaustive enumeration of lexical categories. Every
//! category comes in a valid/error pair (the parity convention from the
//! original implementation: error variants are always the odd-valued sibling
//! of their category, expressed here as two named variants instead of a numeric
//! parity trick).

use std::fmt;

/// 1-based line and column. Column points at the first character of the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // 1. Structure keywords
    Algorithme,
    AlgorithmeErr,
    Debut,
    DebutErr,
    Fin,
    FinErr,

    // 2. Declarations, types, constants
    Objets,
    ObjetsErr,
    Variable,
    VariableErr,
    Constante,
    ConstanteErr,
    Entier,
    EntierErr,
    Reel,
    ReelErr,
    Caractere,
    CaractereErr,
    Chaine,
    ChaineErr,
    Booleen,
    BooleenErr,
    ConstEntiere,
    ConstEntiereErr,
    ConstReelle,
    ConstReelleErr,
    ConstChaine,
    ConstChaineErr,
    Id,
    IdErr,
    Tableau,
    TableauErr,
    De,
    DeErr,
    Structure,
    StructureErr,
    FinStruct,
    FinStructErr,

    // 3. I/O
    Ecrire,
    EcrireErr,
    Lire,
    LireErr,
    Retour,
    RetourErr,

    // 4. Logical constants / operators
    Vrai,
    VraiErr,
    Faux,
    FauxErr,
    Et,
    EtErr,
    Ou,
    OuErr,
    Non,
    NonErr,

    // 5. Comparators
    Inferieur,
    InferieurErr,
    InferieurEgal,
    InferieurEgalErr,
    Superieur,
    SuperieurErr,
    SuperieurEgal,
    SuperieurEgalErr,
    Egal,
    EgalErr,
    Different,
    DifferentErr,

    // 6. Assignment, separators, punctuation
    Affectation,
    AffectationErr,
    DeuxPoints,
    DeuxPointsErr,
    Virgule,
    VirguleErr,
    ParenOuvrante,
    ParenOuvranteErr,
    ParenFermante,
    ParenFermanteErr,
    CrochetOuvrant,
    CrochetOuvrantErr,
    CrochetFermant,
    CrochetFermantErr,
    Guillemet,
    GuillemetErr,
    Point,
    PointErr,
    FinInstr,
    FinInstrErr,

    // 7. Arithmetic operators
    Plus,
    PlusErr,
    Moins,
    MoinsErr,
    Fois,
    FoisErr,
    Divise,
    DiviseErr,
    DivEntier,
    DivEntierErr,
    Modulo,
    ModuloErr,
    Puissance,
    PuissanceErr,

    // 8. Control-flow structures
    Si,
    SiErr,
    SinonSi,
    SinonSiErr,
    Alors,
    AlorsErr,
    Sinon,
    SinonErr,
    FinSi,
    FinSiErr,
    Selon,
    SelonErr,
    Cas,
    CasErr,
    Defaut,
    DefautErr,
    FinSelon,
    FinSelonErr,
    Sortir,
    SortirErr,
    Pour,
    PourErr,
    Jusqua,
    JusquaErr,
    Repeter,
    RepeterErr,
    Pas,
    PasErr,
    FinPour,
    FinPourErr,
    QuitterPour,
    QuitterPourErr,
    TantQue,
    TantQueErr,
    FinTantQue,
    FinTantQueErr,

    // 9. Procedures and functions
    Procedure,
    ProcedureErr,
    FinProc,
    FinProcErr,
    Fonction,
    FonctionErr,
    FinFonct,
    FinFonctErr,
    Retourner,
    RetournerErr,

    // 10. Other special tokens
    Eof,
    EofErr,
    Commentaire,
    CommentaireErr,
    CommentaireBloc,
    CommentaireBlocErr,
}

impl TokenKind {
    /// True for the error-variant sibling of any category.
    pub fn is_error(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            AlgorithmeErr
                | DebutErr
                | FinErr
                | ObjetsErr
                | VariableErr
                | ConstanteErr
                | EntierErr
                | ReelErr
                | CaractereErr
                | ChaineErr
                | BooleenErr
                | ConstEntiereErr
                | ConstReelleErr
                | ConstChaineErr
                | IdErr
                | TableauErr
                | DeErr
                | StructureErr
                | FinStructErr
                | EcrireErr
                | LireErr
                | RetourErr
                | VraiErr
                | FauxErr
                | EtErr
                | OuErr
                | NonErr
                | InferieurErr
                | InferieurEgalErr
                | SuperieurErr
                | SuperieurEgalErr
                | EgalErr
                | DifferentErr
                | AffectationErr
                | DeuxPointsErr
                | VirguleErr
                | ParenOuvranteErr
                | ParenFermanteErr
                | CrochetOuvrantErr
                | CrochetFermantErr
                | GuillemetErr
                | PointErr
                | FinInstrErr
                | PlusErr
                | MoinsErr
                | FoisErr
                | DiviseErr
                | DivEntierErr
                | ModuloErr
                | PuissanceErr
                | SiErr
                | SinonSiErr
                | AlorsErr
                | SinonErr
                | FinSiErr
                | SelonErr
                | CasErr
                | DefautErr
                | FinSelonErr
                | SortirErr
                | PourErr
                | JusquaErr
                | RepeterErr
                | PasErr
                | FinPourErr
                | QuitterPourErr
                | TantQueErr
                | FinTantQueErr
                | ProcedureErr
                | FinProcErr
                | FonctionErr
                | FinFonctErr
                | RetournerErr
                | EofErr
                | CommentaireErr
                | CommentaireBlocErr
        )
    }
}

/// A lexed token: category, raw lexeme text (always present, possibly empty for
/// punctuation-less synthesized tokens), and source position of its first
/// character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} {:?}", self.position, self.kind, self.lexeme)
    }
}
