//! Depicción 2D esquemática en SVG.
//!
//! No es un layout químico de calidad de publicación: los átomos pesados se
//! distribuyen determinísticamente sobre una circunferencia en orden de
//! parseo y los enlaces se trazan entre ellos (líneas paralelas para dobles y
//! triples). Lo que el pipeline exige de esta etapa es un artefacto de imagen
//! no vacío, reproducible y suficiente para inspección visual.

use std::fmt::Write as _;

use crate::molecule::Molecule;
use crate::smiles::BondOrder;
use crate::DomainError;

const CANVAS: f64 = 400.0;
const MARGIN: f64 = 40.0;

/// Renderiza la molécula a un documento SVG autocontenido.
pub fn render_svg(molecule: &Molecule) -> Result<String, DomainError> {
    let n = molecule.atoms().len();
    if n == 0 {
        return Err(DomainError::Depiction("molecule has no atoms".into()));
    }

    let center = CANVAS / 2.0;
    let radius = center - MARGIN;

    // Posiciones deterministas: polígono regular en orden de átomos.
    let positions: Vec<(f64, f64)> = (0..n).map(|i| {
                                               let theta = std::f64::consts::TAU * (i as f64) / (n as f64)
                                                           - std::f64::consts::FRAC_PI_2;
                                               (center + radius * theta.cos(), center + radius * theta.sin())
                                           })
                                           .collect();

    let mut svg = String::new();
    let _ = writeln!(svg,
                     r#"<svg xmlns="http://www.w3.org/2000/svg" width="{c}" height="{c}" viewBox="0 0 {c} {c}">"#,
                     c = CANVAS as u32);
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);

    for bond in molecule.bonds() {
        let (x1, y1) = positions[bond.a];
        let (x2, y2) = positions[bond.b];
        let lines = match bond.order {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        };
        // Offset perpendicular para enlaces múltiples.
        let (dx, dy) = (x2 - x1, y2 - y1);
        let len = (dx * dx + dy * dy).sqrt().max(1e-6);
        let (px, py) = (-dy / len * 3.0, dx / len * 3.0);
        let dash = if bond.order == BondOrder::Aromatic { r#" stroke-dasharray="6,3""# } else { "" };
        for k in 0..lines {
            let off = k as f64 - (lines as f64 - 1.0) / 2.0;
            let _ = writeln!(svg,
                             r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black" stroke-width="1.5"{dash}/>"#,
                             x1 + px * off, y1 + py * off, x2 + px * off, y2 + py * off);
        }
    }

    for (atom, &(x, y)) in molecule.atoms().iter().zip(&positions) {
        // El carbono sin carga no se etiqueta, convención de depicción.
        if atom.element == "C" && atom.charge == 0 {
            continue;
        }
        let label = if atom.charge > 0 {
            format!("{}+", atom.element)
        } else if atom.charge < 0 {
            format!("{}-", atom.element)
        } else {
            atom.element.clone()
        };
        let _ = writeln!(svg, r#"  <circle cx="{x:.1}" cy="{y:.1}" r="9" fill="white"/>"#);
        let _ = writeln!(svg,
                         r#"  <text x="{x:.1}" y="{y:.1}" font-family="sans-serif" font-size="12" text-anchor="middle" dominant-baseline="central" fill="firebrick">{label}</text>"#);
    }

    let _ = writeln!(svg, "</svg>");
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depiccion_no_vacia_para_smiles_valido() {
        let m = Molecule::from_smiles("CCO").unwrap();
        let svg = render_svg(&m).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("<line"));
        // El oxígeno se etiqueta; los carbonos no.
        assert!(svg.contains(">O</text>"));
    }

    #[test]
    fn depiccion_determinista() {
        let m = Molecule::from_smiles("c1ccccc1").unwrap();
        assert_eq!(render_svg(&m).unwrap(), render_svg(&m).unwrap());
    }
}
