//! Reader for OMNeT++ vector (`.vec`) result files.
//!
//! A vector is declared once and its samples follow on lines starting with
//! the vector id:
//!
//! ```text
//! vector 3 phySim.node[1].nic.phy "snr" ETV
//! 3	120	0.5021	12.7
//! ```
//!
//! The column layout is `ETV` (event, time, value) unless the declaration
//! says `TV`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::results::scalar::read_lines;

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub event: Option<u64>,
    pub time: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorSeries {
    pub id: u32,
    pub module: String,
    pub name: String,
    with_events: bool,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl VectorSeries {
    /// `None` for a declared vector without samples.
    pub fn summary(&self) -> Option<VectorSummary> {
        let first = self.samples.first()?.value;
        let (sum, min, max) = self.samples.iter().fold((0.0, first, first), |(s, lo, hi), x| {
            (s + x.value, lo.min(x.value), hi.max(x.value))
        });
        Some(VectorSummary {
            count: self.samples.len(),
            mean: sum / self.samples.len() as f64,
            min,
            max,
        })
    }
}

/// All vectors of one file, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct VectorFile {
    pub vectors: BTreeMap<u32, VectorSeries>,
}

/// Split on whitespace, keeping double-quoted names together.
fn tokens(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

impl VectorFile {
    pub fn read(path: &Path) -> Result<Self> {
        Self::parse(read_lines(path)?, &path.display().to_string())
    }

    pub fn parse<I>(lines: I, source: &str) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut file = VectorFile::default();
        for (idx, line) in lines.into_iter().enumerate() {
            let malformed = |message: String| Error::MalformedVector {
                file: source.to_string(),
                line: idx + 1,
                message,
            };
            let fields = tokens(&line);
            let Some(first) = fields.first() else {
                continue;
            };

            if first == "vector" {
                if fields.len() < 4 {
                    return Err(malformed("incomplete vector declaration".into()));
                }
                let id = fields[1]
                    .parse()
                    .map_err(|_| malformed(format!("invalid vector id `{}`", fields[1])))?;
                let with_events = fields.get(4).map_or(true, |cols| cols.contains('E'));
                file.vectors.insert(
                    id,
                    VectorSeries {
                        id,
                        module: fields[2].clone(),
                        name: fields[3].clone(),
                        with_events,
                        samples: Vec::new(),
                    },
                );
                continue;
            }

            // version, run, attr, param, file and other header lines
            let Ok(id) = first.parse::<u32>() else {
                continue;
            };
            let Some(series) = file.vectors.get_mut(&id) else {
                return Err(malformed(format!("sample for undeclared vector {}", id)));
            };
            let number = |i: usize| -> Result<f64> {
                let text = fields
                    .get(i)
                    .ok_or_else(|| malformed("missing column".into()))?;
                text.parse()
                    .map_err(|_| malformed(format!("invalid number `{}`", text)))
            };
            let sample = if series.with_events {
                let text = fields
                    .get(1)
                    .ok_or_else(|| malformed("missing column".into()))?;
                let event = text
                    .parse()
                    .map_err(|_| malformed(format!("invalid event number `{}`", text)))?;
                Sample {
                    event: Some(event),
                    time: number(2)?,
                    value: number(3)?,
                }
            } else {
                Sample {
                    event: None,
                    time: number(1)?,
                    value: number(2)?,
                }
            };
            series.samples.push(sample);
        }
        Ok(file)
    }
}
