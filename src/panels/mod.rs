pub mod defs;
pub mod mapping;

use serde::Serialize;

use mapping::{build_symbol_map, map_symbol, normalize_symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub genes: Vec<usize>,
    pub symbols: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelAudit {
    pub panel_size_defined: usize,
    pub panel_size_mappable: usize,
    pub missing_genes: Vec<String>,
}

impl Panel {
    pub fn resolve(markers: &[String], columns: &[String]) -> Panel {
        let symbol_map = build_symbol_map(columns);
        let mut genes = Vec::new();
        let mut symbols = Vec::new();
        let mut missing = Vec::new();

        for marker in markers {
            let sym = normalize_symbol(marker);
            if sym.is_empty() || symbols.contains(&sym) || missing.contains(&sym) {
                continue;
            }
            match map_symbol(&sym, &symbol_map) {
                Some(idx) => {
                    genes.push(idx);
                    symbols.push(sym);
                }
                None => missing.push(sym),
            }
        }

        Panel {
            genes,
            symbols,
            missing,
        }
    }

    pub fn audit(&self) -> PanelAudit {
        PanelAudit {
            panel_size_defined: self.symbols.len() + self.missing.len(),
            panel_size_mappable: self.symbols.len(),
            missing_genes: self.missing.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/panels/tests.rs"]
mod tests;
