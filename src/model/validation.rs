use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRecord {
    pub gene: String,
    pub memberships: Vec<bool>,
}

impl ValidationRecord {
    pub fn matched_any(&self) -> bool {
        self.memberships.iter().any(|&m| m)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceMatch {
    pub reference: String,
    pub checked: usize,
    pub matched: Vec<String>,
    pub unmatched: Vec<String>,
}

impl ReferenceMatch {
    pub fn n_matched(&self) -> usize {
        self.matched.len()
    }

    pub fn n_unmatched(&self) -> usize {
        self.unmatched.len()
    }
}
