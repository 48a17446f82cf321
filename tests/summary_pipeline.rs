use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use vcfsumm::config::Config;
use vcfsumm::error::SummError;
use vcfsumm::pipelines::{RunSummary, SummarizePipeline};

// --- Helpers ---

struct SyntheticVcfBuilder {
    samples: Vec<String>,
    format: String,
    rows: Vec<String>,
}

impl SyntheticVcfBuilder {
    fn new(samples: &[&str]) -> Self {
        Self {
            samples: samples.iter().map(|s| s.to_string()).collect(),
            format: "GT:DP:GQ".to_string(),
            rows: Vec::new(),
        }
    }

    fn format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    /// One data row: fixed metadata up to INFO, then one token per sample.
    fn row(mut self, chrom_to_info: &str, sample_tokens: &[&str]) -> Self {
        let mut line = format!("{chrom_to_info}\t{}", self.format);
        for token in sample_tokens {
            line.push('\t');
            line.push_str(token);
        }
        self.rows.push(line);
        self
    }

    /// Row with an explicit FORMAT text differing from the default.
    fn row_with_format(mut self, chrom_to_info: &str, format: &str, sample_tokens: &[&str]) -> Self {
        let mut line = format!("{chrom_to_info}\t{format}");
        for token in sample_tokens {
            line.push('\t');
            line.push_str(token);
        }
        self.rows.push(line);
        self
    }

    fn write_to(&self, path: &Path) {
        let mut file = fs::File::create(path).expect("create synthetic VCF");
        writeln!(file, "##fileformat=VCFv4.2").unwrap();
        writeln!(file, "##source=synthetic").unwrap();
        write!(file, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT").unwrap();
        for sample in &self.samples {
            write!(file, "\t{sample}").unwrap();
        }
        writeln!(file).unwrap();
        for row in &self.rows {
            writeln!(file, "{row}").unwrap();
        }
    }
}

/// Two meta lines + header line; first data record is physical line 4.
const FIRST_DATA_LINE: u64 = 4;

fn write_pop_file(dir: &Path, pairs: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("populations.txt");
    let mut file = fs::File::create(&path).unwrap();
    for (sample, pop) in pairs {
        writeln!(file, "{sample} {pop}").unwrap();
    }
    path
}

fn config(vcf: PathBuf, pop_file: PathBuf) -> Config {
    Config {
        vcf,
        pop_file,
        pop_file_header: false,
        num_formats: Some(1),
        format_delim: ':',
        max_format_subfields: 30,
        min_depth: 2.0,
        verbose: false,
    }
}

fn run(config: Config) -> vcfsumm::Result<RunSummary> {
    SummarizePipeline::new(config).run()
}

fn standard_pop_file(dir: &Path) -> PathBuf {
    write_pop_file(dir, &[("s1", "A"), ("s2", "A"), ("s3", "B"), ("s4", "B")])
}

// --- Tests ---

#[test]
fn two_population_scenario_counts_and_frequencies() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .row(
            "chr1\t100\trs1\tA\tT\t50\tPASS\tDP=20",
            &["0/0:7:99", "0/1:9:88", "1/1:12:77", "0/1:8:66"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let summary = run(config(vcf, pop)).unwrap();
    assert_eq!(summary.records, 1);
    assert_eq!(summary.kept, 1);
    assert_eq!(summary.discarded, 0);

    let table = fs::read_to_string(&summary.summary_path).unwrap();
    let mut lines = table.lines();
    assert_eq!(
        lines.next().unwrap(),
        "VCFlineNum\tCHROM\tPOS\tID\tREF\tALT\tQUAL\tmedianDP\tmedianGQ\t\
         homoRefCount\thetCount\thomoAltCount\t\
         ALT_SNP_freq_A\trawAlleleCount_A\tALT_SNP_freq_B\trawAlleleCount_B"
    );
    let row: Vec<&str> = lines.next().unwrap().split('\t').collect();
    assert_eq!(row[0], FIRST_DATA_LINE.to_string());
    assert_eq!(&row[1..7], ["chr1", "100", "rs1", "A", "T", "50"]);
    // depths sorted [7,8,9,12] -> spot 2 -> 9; qualities [66,77,88,99] -> 88
    assert_eq!(row[7], "9");
    assert_eq!(row[8], "88");
    // homoRef=1 het=2 homoAlt=1
    assert_eq!(&row[9..12], ["1", "2", "1"]);
    // A: alt 1 of 4; B: alt 3 of 4
    assert_eq!(&row[12..16], ["0.25", "4", "0.75", "4"]);
}

#[test]
fn non_snp_records_are_discarded_and_audited() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .format("GT")
        // length-2 REF: discarded regardless of ALT
        .row(
            "chr1\t100\t.\tAG\tT\t50\tPASS\tDP=20",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        // leading-N ALT: discarded
        .row(
            "chr1\t200\t.\tA\tN\t50\tPASS\tDP=20",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        // multi-allelic ALT: discarded
        .row(
            "chr1\t250\t.\tA\tT,C\t50\tPASS\tDP=20",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        // kept
        .row(
            "chr1\t300\t.\tA\tT\t50\tPASS\tDP=20",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let summary = run(config(vcf, pop)).unwrap();
    assert_eq!(summary.kept, 1);
    assert_eq!(summary.discarded, 3);

    let audit = fs::read_to_string(&summary.audit_path).unwrap();
    assert_eq!(audit, "VCFfileLinesNotUsed\n4\n5\n6\n");

    let table = fs::read_to_string(&summary.summary_path).unwrap();
    assert_eq!(table.lines().count(), 2); // header + the one kept row
    assert!(table.lines().nth(1).unwrap().starts_with("7\tchr1\t300"));
}

#[test]
fn info_depth_threshold_discards_shallow_records() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .format("GT")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tDP=1",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        .row(
            "chr1\t200\t.\tA\tT\t50\tPASS\tDP=2",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let summary = run(config(vcf, pop)).unwrap();
    assert_eq!(summary.kept, 1);
    assert_eq!(summary.discarded, 1);

    let audit = fs::read_to_string(&summary.audit_path).unwrap();
    assert_eq!(audit, "VCFfileLinesNotUsed\n4\n");
}

#[test]
fn missing_info_dp_key_skips_the_depth_check() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .format("GT")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tAC=3",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        // DP below threshold, but the check latched off after the first record
        .row(
            "chr1\t200\t.\tA\tT\t50\tPASS\tDP=1",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let summary = run(config(vcf, pop)).unwrap();
    assert_eq!(summary.kept, 2);
    assert_eq!(summary.discarded, 0);
}

#[test]
fn format_without_dp_emits_na_for_every_row() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .format("GT:GQ")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20",
            &["0/0:10", "0/1:20", "1/1:30", "0/1:40"],
        )
        .row(
            "chr1\t200\t.\tC\tG\t50\tPASS\tDP=20",
            &["0/0:10", "0/1:20", "1/1:30", "0/1:40"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let summary = run(config(vcf, pop)).unwrap();
    let table = fs::read_to_string(&summary.summary_path).unwrap();
    for line in table.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        assert_eq!(cols[7], "NA", "medianDP must be NA: {line}");
        // GQ sorted [10,20,30,40], spot 2 -> 30 (upper-middle, no averaging)
        assert_eq!(cols[8], "30", "medianGQ still computed: {line}");
    }
}

#[test]
fn median_worked_example_with_no_call_sentinel() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    // depths 5, 7, 3, ., 9 -> sorted with sentinel [-1,3,5,7,9], spot 3 -> 7
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4", "s5"])
        .format("GT:DP")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20",
            &["0/0:5", "0/1:7", "1/1:3", "0/1:.", "0/0:9"],
        )
        .write_to(&vcf);
    let pop = write_pop_file(
        dir.path(),
        &[("s1", "A"), ("s2", "A"), ("s3", "B"), ("s4", "B"), ("s5", "B")],
    );

    let summary = run(config(vcf, pop)).unwrap();
    let table = fs::read_to_string(&summary.summary_path).unwrap();
    let row: Vec<&str> = table.lines().nth(1).unwrap().split('\t').collect();
    assert_eq!(row[7], "7");
}

#[test]
fn runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .row(
            "chr1\t100\trs1\tA\tT\t50\tPASS\tDP=20",
            &["0/0:7:99", "0/1:9:88", "1/1:12:77", "./.:.:."],
        )
        .row(
            "chr2\t900\trs2\tG\tC\t31\tPASS\tDP=5",
            &["1/1:4:50", "0/1:6:60", "0/0:2:70", "1/.:3:80"],
        )
        .write_to(&vcf);
    // shuffled designation order must not affect column order
    let pop = write_pop_file(
        dir.path(),
        &[("s4", "B"), ("s1", "A"), ("s3", "B"), ("s2", "A")],
    );

    let first = run(config(vcf.clone(), pop.clone())).unwrap();
    let table1 = fs::read_to_string(&first.summary_path).unwrap();
    let audit1 = fs::read_to_string(&first.audit_path).unwrap();

    let second = run(config(vcf, pop)).unwrap();
    let table2 = fs::read_to_string(&second.summary_path).unwrap();
    let audit2 = fs::read_to_string(&second.audit_path).unwrap();

    assert_eq!(table1, table2);
    assert_eq!(audit1, audit2);
    assert!(table1.lines().next().unwrap().contains("ALT_SNP_freq_A\trawAlleleCount_A"));
}

#[test]
fn gzip_compressed_vcf_streams_through() {
    let dir = TempDir::new().unwrap();
    let plain = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .format("GT")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        .write_to(&plain);

    let gz = dir.path().join("input.vcf.gz");
    {
        let mut enc = flate2::write::GzEncoder::new(
            fs::File::create(&gz).unwrap(),
            flate2::Compression::default(),
        );
        enc.write_all(&fs::read(&plain).unwrap()).unwrap();
        enc.finish().unwrap();
    }
    let pop = standard_pop_file(dir.path());

    let summary = run(config(gz, pop)).unwrap();
    assert_eq!(summary.kept, 1);

    let table = fs::read_to_string(&summary.summary_path).unwrap();
    assert!(table.lines().nth(1).unwrap().starts_with("4\tchr1\t100"));
}

#[test]
fn multiple_format_patterns_are_rechecked_per_record() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .format("GT:DP")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20",
            &["0/0:5", "0/1:5", "1/1:5", "0/1:5"],
        )
        .row_with_format(
            "chr1\t200\t.\tC\tG\t50\tPASS\tDP=20",
            "GT",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let mut cfg = config(vcf, pop);
    cfg.num_formats = Some(2);
    let summary = run(cfg).unwrap();
    assert_eq!(summary.kept, 2);

    let table = fs::read_to_string(&summary.summary_path).unwrap();
    let rows: Vec<Vec<&str>> = table
        .lines()
        .skip(1)
        .map(|l| l.split('\t').collect())
        .collect();
    assert_eq!(rows[0][7], "5"); // GT:DP row has a median
    assert_eq!(rows[1][7], "NA"); // GT-only row degrades
}

#[test]
fn unknown_vcf_sample_aborts_with_mapping_error() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "intruder", "s4"])
        .format("GT")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20",
            &["0/0", "0/1", "1/1", "0/1"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let err = run(config(vcf, pop)).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(matches!(err, SummError::UnknownSample { sample } if sample == "intruder"));
}

#[test]
fn uneven_sample_columns_abort() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .format("GT")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20",
            &["0/0", "0/1", "1/1"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let err = run(config(vcf, pop)).unwrap_err();
    assert!(matches!(
        err,
        SummError::SampleCountMismatch {
            expected: 4,
            found: 3,
            ..
        }
    ));
}

#[test]
fn malformed_genotype_aborts() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    SyntheticVcfBuilder::new(&["s1", "s2", "s3", "s4"])
        .format("GT")
        .row(
            "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20",
            &["0/0", "0_1", "1/1", "0/1"],
        )
        .write_to(&vcf);
    let pop = standard_pop_file(dir.path());

    let err = run(config(vcf, pop)).unwrap_err();
    assert!(matches!(err, SummError::MalformedGenotype { line: 4, .. }));
}

#[test]
fn vcf_without_header_row_aborts() {
    let dir = TempDir::new().unwrap();
    let vcf = dir.path().join("input.vcf");
    let mut file = fs::File::create(&vcf).unwrap();
    writeln!(file, "##fileformat=VCFv4.2").unwrap();
    writeln!(file, "chr1\t100\t.\tA\tT\t50\tPASS\tDP=20\tGT\t0/0").unwrap();
    drop(file);
    let pop = standard_pop_file(dir.path());

    let err = run(config(vcf, pop)).unwrap_err();
    assert!(matches!(err, SummError::MissingHeader));
    assert_eq!(err.exit_code(), 2);
}
