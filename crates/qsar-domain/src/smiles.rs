//! Lector de SMILES propio, suficiente para validar la entrada del pipeline,
//! derivar la fórmula de átomos pesados y alimentar la depicción 2D.
//!
//! No pretende ser una implementación completa de la gramática: cubre el
//! subconjunto orgánico, átomos entre corchetes, enlaces explícitos, ramas y
//! cierres de anillo. Todo lo que no reconoce se rechaza con
//! `DomainError::InvalidSmiles`, que es exactamente el contrato que el
//! pipeline necesita antes de invocar la herramienta externa de descriptores.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Valencias por defecto del subconjunto orgánico, para estimar hidrógenos
/// implícitos en la fórmula.
pub(crate) static DEFAULT_VALENCE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    HashMap::from([("B", 3), ("C", 4), ("N", 3), ("O", 2), ("P", 3), ("S", 2),
                   ("F", 1), ("Cl", 1), ("Br", 1), ("I", 1)])
});

/// Símbolos aceptados dentro de corchetes (incluye los del subconjunto
/// orgánico más los metales/halógenos habituales en sales).
const BRACKET_ELEMENTS: &[&str] = &["H", "B", "C", "N", "O", "F", "Na", "Mg", "Al", "Si", "P", "S", "Cl", "K",
                                    "Ca", "Fe", "Cu", "Zn", "Se", "Br", "Ag", "Sn", "I", "Pt", "Au", "Hg"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    pub aromatic: bool,
    pub charge: i8,
    /// Hidrógenos declarados explícitamente en un átomo entre corchetes.
    pub explicit_h: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contribución del enlace a la valencia ocupada. La aromática cuenta
    /// como simple; el ajuste aromático se hace por átomo.
    pub fn valence_units(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

pub(crate) struct ParsedSmiles {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

/// Parsea una cadena SMILES al grafo molecular.
pub(crate) fn parse(smiles: &str) -> Result<ParsedSmiles, DomainError> {
    let trimmed = smiles.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidSmiles("empty SMILES string".into()));
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut atoms: Vec<Atom> = Vec::new();
    let mut bonds: Vec<Bond> = Vec::new();
    // Átomo previo al que se enlaza el siguiente; None tras un '.'.
    let mut prev: Option<usize> = None;
    // Pila de ramas abiertas con '('.
    let mut branch_stack: Vec<Option<usize>> = Vec::new();
    // Cierres de anillo abiertos: etiqueta -> (átomo, orden pendiente).
    let mut ring_open: HashMap<u16, (usize, Option<BondOrder>)> = HashMap::new();
    // Orden de enlace pendiente declarado antes de un átomo o cierre.
    let mut pending_bond: Option<BondOrder> = None;

    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '-' => { pending_bond = Some(BondOrder::Single); i += 1; }
            '=' => { pending_bond = Some(BondOrder::Double); i += 1; }
            '#' => { pending_bond = Some(BondOrder::Triple); i += 1; }
            ':' => { pending_bond = Some(BondOrder::Aromatic); i += 1; }
            // Direccionalidad de enlace (estereoquímica): se acepta como simple.
            '/' | '\\' => { pending_bond = Some(BondOrder::Single); i += 1; }
            '.' => {
                if pending_bond.is_some() {
                    return Err(DomainError::InvalidSmiles("bond before component separator".into()));
                }
                prev = None;
                i += 1;
            }
            '(' => {
                branch_stack.push(prev);
                i += 1;
            }
            ')' => {
                match branch_stack.pop() {
                    Some(p) => prev = p,
                    None => return Err(DomainError::InvalidSmiles("unmatched ')'".into())),
                }
                i += 1;
            }
            '[' => {
                let end = chars[i + 1..].iter()
                                        .position(|&c| c == ']')
                                        .map(|off| i + 1 + off)
                                        .ok_or_else(|| DomainError::InvalidSmiles("unclosed bracket atom".into()))?;
                let body: String = chars[i + 1..end].iter().collect();
                let atom = parse_bracket_atom(&body)?;
                let idx = push_atom(&mut atoms, &mut bonds, atom, &mut prev, &mut pending_bond);
                prev = Some(idx);
                i = end + 1;
            }
            '0'..='9' | '%' => {
                let (label, consumed) = if c == '%' {
                    if i + 2 >= chars.len() || !chars[i + 1].is_ascii_digit() || !chars[i + 2].is_ascii_digit() {
                        return Err(DomainError::InvalidSmiles("malformed %nn ring label".into()));
                    }
                    let label = (chars[i + 1].to_digit(10).unwrap() * 10 + chars[i + 2].to_digit(10).unwrap()) as u16;
                    (label, 3)
                } else {
                    (c.to_digit(10).unwrap() as u16, 1)
                };
                let current = prev.ok_or_else(|| DomainError::InvalidSmiles("ring label before any atom".into()))?;
                match ring_open.remove(&label) {
                    Some((other, opened_order)) => {
                        if other == current {
                            return Err(DomainError::InvalidSmiles(format!("ring bond {label} closes on itself")));
                        }
                        let order = pending_bond.take()
                                                .or(opened_order)
                                                .unwrap_or(default_order(&atoms[current], &atoms[other]));
                        bonds.push(Bond { a: other, b: current, order });
                    }
                    None => {
                        ring_open.insert(label, (current, pending_bond.take()));
                    }
                }
                i += consumed;
            }
            _ => {
                // Subconjunto orgánico, con Cl/Br de dos caracteres.
                let (atom, consumed) = parse_organic_atom(&chars[i..])
                    .ok_or_else(|| DomainError::InvalidSmiles(format!("unexpected character '{c}' at position {i}")))?;
                let idx = push_atom(&mut atoms, &mut bonds, atom, &mut prev, &mut pending_bond);
                prev = Some(idx);
                i += consumed;
            }
        }
    }

    if !branch_stack.is_empty() {
        return Err(DomainError::InvalidSmiles("unclosed '('".into()));
    }
    if let Some(label) = ring_open.keys().next() {
        return Err(DomainError::InvalidSmiles(format!("unclosed ring bond {label}")));
    }
    if pending_bond.is_some() {
        return Err(DomainError::InvalidSmiles("dangling bond symbol at end of input".into()));
    }
    if atoms.is_empty() {
        return Err(DomainError::InvalidSmiles("no atoms found".into()));
    }

    Ok(ParsedSmiles { atoms, bonds })
}

fn push_atom(atoms: &mut Vec<Atom>,
             bonds: &mut Vec<Bond>,
             atom: Atom,
             prev: &mut Option<usize>,
             pending_bond: &mut Option<BondOrder>)
             -> usize {
    let idx = atoms.len();
    atoms.push(atom);
    if let Some(p) = *prev {
        let order = pending_bond.take().unwrap_or(default_order(&atoms[p], &atoms[idx]));
        bonds.push(Bond { a: p, b: idx, order });
    } else {
        *pending_bond = None;
    }
    idx
}

/// Entre dos átomos aromáticos el enlace implícito es aromático; en el resto
/// de los casos, simple.
fn default_order(a: &Atom, b: &Atom) -> BondOrder {
    if a.aromatic && b.aromatic {
        BondOrder::Aromatic
    } else {
        BondOrder::Single
    }
}

fn parse_organic_atom(rest: &[char]) -> Option<(Atom, usize)> {
    // Dos caracteres primero.
    if rest.len() >= 2 {
        let two: String = rest[..2].iter().collect();
        if two == "Cl" || two == "Br" {
            return Some((Atom { element: two, aromatic: false, charge: 0, explicit_h: None }, 2));
        }
    }
    let c = rest[0];
    match c {
        'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' => {
            Some((Atom { element: c.to_string(), aromatic: false, charge: 0, explicit_h: None }, 1))
        }
        'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
            Some((Atom { element: c.to_ascii_uppercase().to_string(), aromatic: true, charge: 0, explicit_h: None }, 1))
        }
        _ => None,
    }
}

/// Parsea el cuerpo de un átomo entre corchetes: `isotopo? simbolo quiralidad?
/// H<n>? carga?`. La quiralidad se acepta y descarta.
fn parse_bracket_atom(body: &str) -> Result<Atom, DomainError> {
    let chars: Vec<char> = body.chars().collect();
    let mut i = 0usize;

    // Isótopo (se descarta).
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i >= chars.len() {
        return Err(DomainError::InvalidSmiles(format!("bracket atom '[{body}]' has no element symbol")));
    }

    // Símbolo del elemento (aromático en minúscula o capitalizado).
    let (element, aromatic) = if chars[i].is_ascii_lowercase() {
        let sym = chars[i].to_ascii_uppercase().to_string();
        i += 1;
        (sym, true)
    } else if chars[i].is_ascii_uppercase() {
        let mut sym = chars[i].to_string();
        i += 1;
        if i < chars.len() && chars[i].is_ascii_lowercase() && chars[i] != 'h' {
            // 'h' nunca es parte de un símbolo aquí (sería el conteo de H).
            let two = format!("{sym}{}", chars[i]);
            if BRACKET_ELEMENTS.contains(&two.as_str()) {
                sym = two;
                i += 1;
            }
        }
        (sym, false)
    } else {
        return Err(DomainError::InvalidSmiles(format!("bracket atom '[{body}]' has no element symbol")));
    };

    if !BRACKET_ELEMENTS.contains(&element.as_str()) {
        return Err(DomainError::InvalidSmiles(format!("unknown element '{element}' in bracket atom")));
    }

    // Quiralidad: '@' o '@@'.
    while i < chars.len() && chars[i] == '@' {
        i += 1;
    }

    // Conteo de hidrógenos explícitos.
    let mut explicit_h: Option<u8> = None;
    if i < chars.len() && chars[i] == 'H' {
        i += 1;
        let mut n = 1u8;
        if i < chars.len() && chars[i].is_ascii_digit() {
            n = chars[i].to_digit(10).unwrap() as u8;
            i += 1;
        }
        explicit_h = Some(n);
    }

    // Carga: '+'/'-' repetidos o con dígito.
    let mut charge: i8 = 0;
    while i < chars.len() {
        let sign = match chars[i] {
            '+' => 1i8,
            '-' => -1i8,
            other => {
                return Err(DomainError::InvalidSmiles(format!("unexpected '{other}' in bracket atom '[{body}]'")));
            }
        };
        i += 1;
        if i < chars.len() && chars[i].is_ascii_digit() {
            charge = sign * chars[i].to_digit(10).unwrap() as i8;
            i += 1;
        } else {
            charge += sign;
        }
    }

    Ok(Atom { element, aromatic, charge, explicit_h })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsea_etanol() {
        let p = parse("CCO").unwrap();
        assert_eq!(p.atoms.len(), 3);
        assert_eq!(p.bonds.len(), 2);
        assert!(p.bonds.iter().all(|b| b.order == BondOrder::Single));
    }

    #[test]
    fn parsea_benceno_aromatico() {
        let p = parse("c1ccccc1").unwrap();
        assert_eq!(p.atoms.len(), 6);
        assert_eq!(p.bonds.len(), 6); // 5 de cadena + 1 de cierre
        assert!(p.atoms.iter().all(|a| a.aromatic));
        assert!(p.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn parsea_atomos_entre_corchetes() {
        let p = parse("[NH4+]").unwrap();
        assert_eq!(p.atoms[0].element, "N");
        assert_eq!(p.atoms[0].charge, 1);
        assert_eq!(p.atoms[0].explicit_h, Some(4));

        let p = parse("C[N+](C)(C)C").unwrap();
        assert_eq!(p.atoms.len(), 5);
    }

    #[test]
    fn rechaza_basura() {
        assert!(parse("not_a_smiles").is_err());
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
        assert!(parse("C(C").is_err());
        assert!(parse("C1CC").is_err()); // anillo sin cerrar
        assert!(parse("C=").is_err());
        assert!(parse("[Xx]").is_err());
        assert!(parse("[]").is_err());
    }

    #[test]
    fn parsea_el_smiles_de_ejemplo_parp1() {
        let smi = "C1CC1C(=O)N2CCN(CC2)C(=O)C3=C(C=CC(=C3)CC4=NNC(=O)C5=CC=CC=C54)F";
        let p = parse(smi).unwrap();
        assert!(p.atoms.len() > 25);
        // Hay exactamente un flúor y cuatro nitrógenos en la estructura.
        assert_eq!(p.atoms.iter().filter(|a| a.element == "F").count(), 1);
        assert_eq!(p.atoms.iter().filter(|a| a.element == "N").count(), 4);
    }
}
