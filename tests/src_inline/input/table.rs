use std::fs;

use tempfile::TempDir;

use super::*;

fn table(rows: &[&str], cols: &[&str], values: &[f64]) -> NumericTable {
    NumericTable::new(
        rows.iter().map(|s| s.to_string()).collect(),
        cols.iter().map(|s| s.to_string()).collect(),
        values.to_vec(),
    )
    .unwrap()
}

#[test]
fn test_parse_cell_missing_and_invalid() {
    assert_eq!(parse_cell(" 1.5 "), Some(1.5));
    assert!(parse_cell("").unwrap().is_nan());
    assert!(parse_cell("NA").unwrap().is_nan());
    assert!(parse_cell("nan").unwrap().is_nan());
    assert_eq!(parse_cell("Skin"), None);
}

#[test]
fn test_clean_gene_label() {
    assert_eq!(clean_gene_label("TP53 (7157)"), "TP53");
    assert_eq!(clean_gene_label(" HLA-A (3105) "), "HLA-A");
    assert_eq!(clean_gene_label("STAT1"), "STAT1");
}

#[test]
fn test_new_rejects_bad_shape() {
    let res = NumericTable::new(vec!["a".into()], vec!["x".into(), "y".into()], vec![1.0]);
    assert!(res.is_err());
}

#[test]
fn test_transpose_and_select() {
    let t = table(&["s1", "s2"], &["g1", "g2", "g3"], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let tt = t.transpose();
    assert_eq!(tt.row_ids, vec!["g1", "g2", "g3"]);
    assert_eq!(tt.columns, vec!["s1", "s2"]);
    assert_eq!(tt.get(2, 1), 6.0);

    let rows = t.select_rows(&[1]);
    assert_eq!(rows.row(0), &[4.0, 5.0, 6.0]);
    let cols = t.select_columns(&[2, 0]);
    assert_eq!(cols.columns, vec!["g3", "g1"]);
    assert_eq!(cols.row(1), &[6.0, 4.0]);
    assert_eq!(t.column_at(1, &[1, 0]), vec![5.0, 2.0]);
}

#[test]
fn test_with_clean_gene_columns_keeps_first_duplicate() {
    let t = table(&["s1"], &["TP53 (7157)", "TP53 (999)", "MYC (4609)"], &[1.0, 2.0, 3.0]);
    let clean = t.with_clean_gene_columns();
    assert_eq!(clean.columns, vec!["TP53", "MYC"]);
    assert_eq!(clean.row(0), &[1.0, 3.0]);
}

#[test]
fn test_read_numeric_table_drops_annotation_columns_and_duplicate_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("expr.csv");
    fs::write(
        &path,
        "SequencingID,ModelID,Lineage,STAT1 (6772),CD274 (29126)\n\
         CDS-1,ACH-1,Skin,1.0,NA\n\
         CDS-2,ACH-2,Lung,2.0,3.0\n\
         CDS-3,ACH-1,Skin,9.0,9.0\n",
    )
    .unwrap();

    let t = read_numeric_table(&path, Some("ModelID")).unwrap();
    assert_eq!(t.row_ids, vec!["ACH-1", "ACH-2"]);
    assert_eq!(t.columns, vec!["STAT1 (6772)", "CD274 (29126)"]);
    assert_eq!(t.get(0, 0), 1.0);
    assert!(t.get(0, 1).is_nan());
    assert_eq!(t.get(1, 1), 3.0);
}

#[test]
fn test_read_numeric_table_defaults_to_first_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("effect.csv");
    fs::write(&path, ",A1BG (1),A2M (2)\nACH-1,-0.1,0.2\nACH-2,0.3,-0.4\n").unwrap();

    let t = read_numeric_table(&path, None).unwrap();
    assert_eq!(t.row_ids, vec!["ACH-1", "ACH-2"]);
    assert_eq!(t.n_cols(), 2);
    assert_eq!(t.get(1, 1), -0.4);
}

#[test]
fn test_read_numeric_table_requires_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "id,g1\n").unwrap();
    assert!(matches!(
        read_numeric_table(&path, None),
        Err(InputError::Parse(_))
    ));
}
