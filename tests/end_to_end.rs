use std::io::Write;

use faldisco::engine::TableLabels;
use faldisco::io::reader;
use faldisco::FaldiscoConfig;

fn labels() -> TableLabels {
    TableLabels {
        reference_table_namespace: "public".to_string(),
        reference_table_name: "ref_table".to_string(),
        target_table_namespace: "public".to_string(),
        target_table_name: "target_table".to_string(),
    }
}

fn write_sample(header: &str, rows: &[String]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "{}", header).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn identity_columns_produce_exact_match() {
    let rows: Vec<String> = (0..30).map(|i| format!("{i},ID{i},ID{i}")).collect();
    let file = write_sample("r_j__key,r__id,t__id", &rows);

    let sample = reader::load_sample(file.path(), 2000).unwrap();
    let output = faldisco::find_field_alignment(&sample, &labels(), &FaldiscoConfig::default());

    let m = output
        .field_alignments
        .iter()
        .find(|r| r.reference_field_name == "id" && r.target_field_name == "id")
        .expect("expected an id<->id match");
    assert_eq!(m.alignment_type, "exact_match");
    assert!(m.alignment_strength > 0.99);
}

#[test]
fn renamed_constant_fields_are_excluded() {
    let rows: Vec<String> = (0..20).map(|i| format!("{i},ACTIVE,ENABLED")).collect();
    let file = write_sample("r_j__key,r__status,t__state", &rows);

    let sample = reader::load_sample(file.path(), 2000).unwrap();
    let output = faldisco::find_field_alignment(&sample, &labels(), &FaldiscoConfig::default());

    assert!(output.field_alignments.is_empty());
}

#[test]
fn sparse_mfv_field_finds_non_mfv_alignment() {
    let mut rows = Vec::new();
    for i in 0..95 {
        rows.push(format!("{i},NORMAL,COMMON"));
    }
    let specials = [("A", "X"), ("B", "Y"), ("C", "Z"), ("D", "W"), ("E", "V")];
    for (i, (rv, tv)) in specials.iter().enumerate() {
        rows.push(format!("{},{},{}", 95 + i, rv, tv));
    }
    let file = write_sample("r_j__key,r__flag,t__flag", &rows);

    let sample = reader::load_sample(file.path(), 2000).unwrap();
    let output = faldisco::find_field_alignment(&sample, &labels(), &FaldiscoConfig::default());

    let m = output
        .field_alignments
        .iter()
        .find(|r| r.reference_field_name == "flag" && r.target_field_name == "flag")
        .expect("expected a sparse flag<->flag match");
    assert_eq!(m.alignment_type, "sparse_alignment");
    assert!(m.alignment_strength > 0.9);
}

#[test]
fn permuted_codes_produce_alignment_not_exact_match() {
    let mapping = [("C0", "X0"), ("C1", "X1"), ("C2", "X2"), ("C3", "X3"), ("C4", "X4")];
    let mut rows = Vec::new();
    let mut i = 0;
    for (rv, tv) in mapping.iter() {
        for _ in 0..10 {
            rows.push(format!("{i},{rv},{tv}"));
            i += 1;
        }
    }
    let file = write_sample("r_j__key,r__code,t__code", &rows);

    let sample = reader::load_sample(file.path(), 2000).unwrap();
    let output = faldisco::find_field_alignment(&sample, &labels(), &FaldiscoConfig::default());

    let m = output
        .field_alignments
        .iter()
        .find(|r| r.reference_field_name == "code" && r.target_field_name == "code")
        .expect("expected a code<->code alignment");
    assert_eq!(m.alignment_type, "alignment");
    assert!(m.alignment_strength > 0.9);
}

#[test]
fn uncorrelated_noise_fields_produce_no_match() {
    let mut rows = Vec::new();
    let mut i = 0;
    for r in 0..5 {
        for t in 0..5 {
            for _ in 0..5 {
                rows.push(format!("{i},R{r},T{t}"));
                i += 1;
            }
        }
    }
    let file = write_sample("r_j__key,r__noise,t__noise", &rows);

    let sample = reader::load_sample(file.path(), 2000).unwrap();
    let output = faldisco::find_field_alignment(&sample, &labels(), &FaldiscoConfig::default());

    assert!(output
        .field_alignments
        .iter()
        .find(|r| r.reference_field_name == "noise" && r.target_field_name == "noise")
        .is_none());
}

#[test]
fn constant_fields_with_equal_values_are_not_a_false_exact_match() {
    let rows: Vec<String> = (0..50).map(|i| format!("{i},GOLD,GOLD")).collect();
    let file = write_sample("r_j__key,r__tier,t__level", &rows);

    let sample = reader::load_sample(file.path(), 2000).unwrap();
    let output = faldisco::find_field_alignment(&sample, &labels(), &FaldiscoConfig::default());

    assert!(output.field_alignments.is_empty());
}

#[test]
fn empty_sample_is_a_logged_non_fatal_empty_result() {
    let file = write_sample("r_j__key,r__id,t__id", &[]);
    let sample = reader::load_sample(file.path(), 2000).unwrap();
    let output = faldisco::find_field_alignment(&sample, &labels(), &FaldiscoConfig::default());

    assert!(output.field_alignments.is_empty());
    assert!(output.value_alignments.is_empty());
    assert!(output.profiles.is_empty());
}
