const IMMUNE_MARKERS: &[&str] = &[
    "CD274", "CXCL9", "CXCL10", "STAT1", "IRF1", "HLA-A", "HLA-B", "B2M", "TAP1", "TGFB1",
];

pub fn builtin_immune_markers() -> &'static [&'static str] {
    IMMUNE_MARKERS
}
