//! # Population Registry
//!
//! Builds the population-label → index and sample-ID → population-index
//! mappings from the whitespace-delimited designation file.
//!
//! Population indices are assigned in ascending alphabetical order of label,
//! independent of order of appearance, so output columns are stable across
//! runs and across shuffled input files.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SummError};

/// Dense, 0-based population index
pub type PopIdx = usize;

/// Ordered sequence of population indices, one per VCF sample column.
///
/// Established once from the VCF header row and consumed read-only
/// thereafter.
#[derive(Debug, Clone)]
pub struct SampleColumnMap {
    columns: Vec<PopIdx>,
}

impl SampleColumnMap {
    pub fn new(columns: Vec<PopIdx>) -> Self {
        Self { columns }
    }

    /// Number of sample columns (== number of declared samples).
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Population index owning the given sample column.
    #[inline]
    pub fn pop_of(&self, column: usize) -> PopIdx {
        self.columns[column]
    }
}

/// Sample/population cross-reference built from the designation file
#[derive(Debug, Clone)]
pub struct PopulationRegistry {
    /// Population label → index, ordered alphabetically by label
    populations: BTreeMap<String, PopIdx>,
    /// Sample ID → owning population index
    samples: HashMap<String, PopIdx>,
    /// Samples per population, indexed by `PopIdx` (diagnostics only)
    samples_per_population: Vec<usize>,
}

impl PopulationRegistry {
    /// Read `(sampleID, populationLabel)` pairs from the designation file.
    ///
    /// `skip_header` drops the first line. Duplicate sample IDs and fewer
    /// than two distinct populations are fatal.
    pub fn from_path(path: &Path, skip_header: bool) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), skip_header)
    }

    /// Same as [`from_path`](Self::from_path) for any buffered source.
    pub fn from_reader<R: BufRead>(reader: R, skip_header: bool) -> Result<Self> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut labels: BTreeMap<String, PopIdx> = BTreeMap::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if i == 0 && skip_header {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (sample, label) = match (fields.next(), fields.next()) {
                (Some(s), Some(p)) => (s.to_string(), p.to_string()),
                (None, _) => continue, // blank line
                (Some(s), None) => {
                    return Err(SummError::parse(
                        (i + 1) as u64,
                        format!("population file entry '{s}' has no population label"),
                    ));
                }
            };
            if !seen.insert(sample.clone()) {
                return Err(SummError::DuplicateSample { sample });
            }
            labels.insert(label.clone(), 0);
            pairs.push((sample, label));
        }

        if labels.len() < 2 {
            return Err(SummError::InsufficientPopulations {
                found: labels.len(),
            });
        }

        // BTreeMap iteration is alphabetical; indices become dense over [0, N)
        for (idx, (_, slot)) in labels.iter_mut().enumerate() {
            *slot = idx;
        }

        let mut samples = HashMap::with_capacity(pairs.len());
        let mut samples_per_population = vec![0usize; labels.len()];
        for (sample, label) in pairs {
            let idx = labels[&label];
            samples_per_population[idx] += 1;
            samples.insert(sample, idx);
        }

        for (label, idx) in &labels {
            debug!(
                population = %label,
                index = idx,
                samples = samples_per_population[*idx],
                "registered population"
            );
        }

        Ok(Self {
            populations: labels,
            samples,
            samples_per_population,
        })
    }

    /// Number of distinct populations.
    pub fn num_populations(&self) -> usize {
        self.populations.len()
    }

    /// Number of declared samples.
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Population index for a sample ID, if the sample was declared.
    pub fn pop_of_sample(&self, sample: &str) -> Option<PopIdx> {
        self.samples.get(sample).copied()
    }

    /// Population labels in canonical (alphabetical index) order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.populations.keys().map(String::as_str)
    }

    /// Samples per population, indexed by population index.
    pub fn samples_per_population(&self) -> &[usize] {
        &self.samples_per_population
    }
}
