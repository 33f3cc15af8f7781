use std::collections::BTreeMap;

pub fn normalize_symbol(s: &str) -> String {
    s.trim().to_ascii_uppercase()
}

pub fn build_symbol_map(columns: &[String]) -> BTreeMap<String, usize> {
    let mut map = BTreeMap::new();
    for (idx, symbol) in columns.iter().enumerate() {
        map.entry(normalize_symbol(symbol)).or_insert(idx);
    }
    map
}

pub fn map_symbol(symbol: &str, symbol_map: &BTreeMap<String, usize>) -> Option<usize> {
    symbol_map.get(&normalize_symbol(symbol)).copied()
}
