//! Keyword table: maps a lexeme spelling to its token kind. Entries are
//! case-sensitive but the table carries both the canonical cased spelling and
//! the all-lowercase spelling for every keyword, so "Si" and "si" both lex as
//! `TokenKind::Si`. A handful of keywords also carry ASCII-safe diacritic-free
//! aliases (mirroring the distilled original implementation), e.g. "réel" and
//! "reel" both lex as `TokenKind::Reel`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::token::TokenKind;

macro_rules! keywords {
    ($($spelling:literal => $kind:ident),+ $(,)?) => {
        static ENTRIES: &[(&str, TokenKind)] = &[
            $(($spelling, TokenKind::$kind)),+
        ];
    };
}

keywords! {
    // 1. Structure
    "Algorithme" => Algorithme,
    "algorithme" => Algorithme,
    "Début" => Debut,
    "Debut" => Debut,
    "debut" => Debut,
    "Fin" => Fin,
    "fin" => Fin,

    // 2. Declarations / types
    "Objets" => Objets,
    "objets" => Objets,
    "Variable" => Variable,
    "variable" => Variable,
    "Constante" => Constante,
    "constante" => Constante,
    "entier" => Entier,
    "Entier" => Entier,
    "réel" => Reel,
    "reel" => Reel,
    "caractère" => Caractere,
    "caractere" => Caractere,
    "chaine" => Chaine,
    "chaîne" => Chaine,
    "booléen" => Booleen,
    "booleen" => Booleen,
    "tableau" => Tableau,
    "Tableau" => Tableau,
    "de" => De,

    "Structure" => Structure,
    "structure" => Structure,
    "Fin-struct" => FinStruct,
    "fin-struct" => FinStruct,
    "finstruct" => FinStruct,

    // 3. I/O
    "Ecrire" => Ecrire,
    "Écrire" => Ecrire,
    "ecrire" => Ecrire,
    "Lire" => Lire,
    "lire" => Lire,
    "Retour" => Retour,
    "retour" => Retour,

    // 4. Logic
    "Vrai" => Vrai,
    "vrai" => Vrai,
    "Faux" => Faux,
    "faux" => Faux,
    "Et" => Et,
    "et" => Et,
    "Ou" => Ou,
    "ou" => Ou,
    "Non" => Non,
    "non" => Non,

    // 7. Arithmetic keyword-operators
    "Div" => DivEntier,
    "div" => DivEntier,
    "Mod" => Modulo,
    "mod" => Modulo,

    // 8. Control flow
    "Si" => Si,
    "si" => Si,
    "SinonSi" => SinonSi,
    "sinonsi" => SinonSi,
    "sinon-si" => SinonSi,
    "Sinon" => Sinon,
    "sinon" => Sinon,
    "Alors" => Alors,
    "alors" => Alors,
    "FinSi" => FinSi,
    "finsi" => FinSi,

    "Selon" => Selon,
    "selon" => Selon,
    "Cas" => Cas,
    "cas" => Cas,

    "Défaut" => Defaut,
    "défaut" => Defaut,
    "defaut" => Defaut,
    "Defaut" => Defaut,

    "FinSelon" => FinSelon,
    "finselon" => FinSelon,

    "Sortir" => Sortir,
    "sortir" => Sortir,

    "Pour" => Pour,
    "pour" => Pour,

    "jusqu'à" => Jusqua,
    "jusqu'a" => Jusqua,
    "jusqua" => Jusqua,
    "Jusqua" => Jusqua,
    "JusquA" => Jusqua,
    "JUSQUA" => Jusqua,

    "Répéter" => Repeter,
    "repeter" => Repeter,
    "répéter" => Repeter,

    "pas" => Pas,

    "FinPour" => FinPour,
    "finpour" => FinPour,

    "Quitter" => QuitterPour,
    "quitter" => QuitterPour,

    "TantQue" => TantQue,
    "tantque" => TantQue,
    "FinTantQue" => FinTantQue,
    "fintantque" => FinTantQue,

    // 9. Procedures / functions
    "Procédure" => Procedure,
    "procedure" => Procedure,
    "FinProc" => FinProc,
    "finproc" => FinProc,
    "Fonction" => Fonction,
    "fonction" => Fonction,
    "FinFonct" => FinFonct,
    "finfonct" => FinFonct,
    "Retourner" => Retourner,
    "retourner" => Retourner,
}

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> =
    Lazy::new(|| ENTRIES.iter().copied().collect());

/// Looks up a lexeme's keyword kind, if any; identifiers that don't match any
/// entry are the caller's responsibility to emit as `TokenKind::Id`.
pub fn lookup(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}
