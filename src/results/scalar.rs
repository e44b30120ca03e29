//! Line-oriented scraping of OMNeT++ scalar (`.sca`) result files.
//!
//! Only two statistics are of interest, both emitted by the UWB-IR decider:
//!
//! ```text
//! scalar phySim.node[0].nic.phy  Erroneous bits  42
//! scalar phySim.node[0].nic.phy  Total received bits  1000
//! ```
//!
//! Run metadata comes from the `iterationvars2` attribute line, e.g.
//!
//! ```text
//! attr iterationvars2 "$distance=50, $Channel=CM1, $Receiver=3dB, $repetition=2"
//! ```

use regex::Regex;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use crate::analysis::ber::BitCounts;
use crate::error::{Error, Result};

static ERRONEOUS_BITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Erroneous\sbits[^\d]+(\d+)").expect("Invalid erroneous bits regex"));
static RECEIVED_BITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total\sreceived\sbits[^\d]+(\d+)").expect("Invalid received bits regex")
});
static RUN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^run\s(\d+)").expect("Invalid run regex"));

const ITERATION_VARS: &str = "iterationvars2";

/// Iteration variables an experiment can require in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationVar {
    Distance,
    Channel,
    Receiver,
    Repetition,
    NbNodes,
    Range,
}

impl IterationVar {
    pub fn name(self) -> &'static str {
        match self {
            IterationVar::Distance => "distance",
            IterationVar::Channel => "Channel",
            IterationVar::Receiver => "Receiver",
            IterationVar::Repetition => "repetition",
            IterationVar::NbNodes => "NbNodes",
            IterationVar::Range => "R",
        }
    }

    fn pattern(self) -> &'static Regex {
        static DISTANCE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$distance=\s*(\d+)").expect("Invalid distance regex"));
        static CHANNEL: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$Channel=([\w-]+)").expect("Invalid channel regex"));
        static RECEIVER: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$Receiver=([\w-]+)").expect("Invalid receiver regex"));
        static REPETITION: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$repetition=(\d+)").expect("Invalid repetition regex"));
        static NB_NODES: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$NbNodes=(\d+)").expect("Invalid NbNodes regex"));
        static RANGE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$R=(\d+)").expect("Invalid R regex"));

        match self {
            IterationVar::Distance => &*DISTANCE,
            IterationVar::Channel => &*CHANNEL,
            IterationVar::Receiver => &*RECEIVER,
            IterationVar::Repetition => &*REPETITION,
            IterationVar::NbNodes => &*NB_NODES,
            IterationVar::Range => &*RANGE,
        }
    }

    fn capture<'a>(self, line: &'a str) -> Option<&'a str> {
        self.pattern()
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

pub fn erroneous_bits(line: &str) -> Option<u64> {
    capture_u64(&ERRONEOUS_BITS, line)
}

pub fn received_bits(line: &str) -> Option<u64> {
    capture_u64(&RECEIVED_BITS, line)
}

fn capture_u64(re: &Regex, line: &str) -> Option<u64> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

/// Run parameters taken from the `iterationvars2` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunHeader {
    pub distance: Option<u32>,
    pub channel: Option<String>,
    pub receiver: Option<String>,
    pub repetition: Option<u32>,
    pub nb_nodes: Option<u32>,
    pub range: Option<u32>,
}

impl RunHeader {
    pub fn from_line(line: &str) -> Self {
        let number = |var: IterationVar| var.capture(line).and_then(|s| s.parse().ok());
        let text = |var: IterationVar| var.capture(line).map(str::to_string);
        RunHeader {
            distance: number(IterationVar::Distance),
            channel: text(IterationVar::Channel),
            receiver: text(IterationVar::Receiver),
            repetition: number(IterationVar::Repetition),
            nb_nodes: number(IterationVar::NbNodes),
            range: number(IterationVar::Range),
        }
    }

    pub fn has(&self, var: IterationVar) -> bool {
        match var {
            IterationVar::Distance => self.distance.is_some(),
            IterationVar::Channel => self.channel.is_some(),
            IterationVar::Receiver => self.receiver.is_some(),
            IterationVar::Repetition => self.repetition.is_some(),
            IterationVar::NbNodes => self.nb_nodes.is_some(),
            IterationVar::Range => self.range.is_some(),
        }
    }
}

/// Consume lines up to and including the `iterationvars2` line.
pub fn parse_header<I>(lines: &mut I, required: &[IterationVar], source: &str) -> Result<RunHeader>
where
    I: Iterator<Item = String>,
{
    for line in lines.by_ref() {
        if !line.contains(ITERATION_VARS) {
            continue;
        }
        let header = RunHeader::from_line(&line);
        if let Some(missing) = required.iter().find(|v| !header.has(**v)) {
            return Err(Error::MissingIterationVariable {
                file: source.to_string(),
                variable: missing.name().to_string(),
            });
        }
        return Ok(header);
    }
    Err(Error::HeaderNotFound(source.to_string()))
}

/// First received/erroneous pair in the remaining lines.
pub fn parse_bit_counts<I>(lines: &mut I, source: &str) -> Result<BitCounts>
where
    I: Iterator<Item = String>,
{
    let mut received = None;
    let mut erroneous = None;
    for line in lines.by_ref() {
        if received.is_none() {
            if let Some(bits) = received_bits(&line) {
                received = Some(bits);
                continue;
            }
        }
        if erroneous.is_none() {
            erroneous = erroneous_bits(&line);
        }
        if let (Some(received), Some(erroneous)) = (received, erroneous) {
            return Ok(BitCounts::new(erroneous, received));
        }
    }
    match (received, erroneous) {
        (Some(received), Some(erroneous)) => Ok(BitCounts::new(erroneous, received)),
        _ => Err(Error::BitCountsNotFound(source.to_string())),
    }
}

/// Sum of every counter in the remaining lines, one pair per node.
pub fn parse_bit_count_sum<I>(lines: &mut I, source: &str) -> Result<BitCounts>
where
    I: Iterator<Item = String>,
{
    let mut total = BitCounts::default();
    let (mut received_seen, mut erroneous_seen) = (false, false);
    for line in lines.by_ref() {
        if let Some(bits) = received_bits(&line) {
            total.received += bits;
            received_seen = true;
        } else if let Some(bits) = erroneous_bits(&line) {
            total.erroneous += bits;
            erroneous_seen = true;
        }
    }
    if received_seen && erroneous_seen {
        Ok(total)
    } else {
        Err(Error::BitCountsNotFound(source.to_string()))
    }
}

/// Sum of every counter occurrence.
pub fn sum_bit_counts<I>(lines: I) -> BitCounts
where
    I: IntoIterator<Item = String>,
{
    let mut total = BitCounts::default();
    for line in lines {
        if let Some(bits) = received_bits(&line) {
            total.received += bits;
        } else if let Some(bits) = erroneous_bits(&line) {
            total.erroneous += bits;
        }
    }
    total
}

/// Counts of one file holding many runs, grouped into consecutive
/// configurations of `runs_per_config` runs. A run is complete once its
/// erroneous bits counter has been seen; a trailing partial group is dropped.
pub fn split_runs<I>(lines: I, runs_per_config: usize) -> Vec<BitCounts>
where
    I: IntoIterator<Item = String>,
{
    let mut configs = Vec::new();
    let mut current = BitCounts::default();
    let mut completed = 0;

    for line in lines {
        if let Some(run) = RUN_NUMBER.captures(&line).and_then(|c| c.get(1)) {
            log::debug!("Entering run {}", run.as_str());
        } else if let Some(bits) = received_bits(&line) {
            current.received += bits;
        } else if let Some(bits) = erroneous_bits(&line) {
            current.erroneous += bits;
            completed += 1;
            if completed == runs_per_config.max(1) {
                configs.push(current);
                current = BitCounts::default();
                completed = 0;
            }
        }
    }
    configs
}

/// Header and counters of one scalar file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarFile {
    pub header: RunHeader,
    pub counts: BitCounts,
}

/// How the counters following the header are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitCountMode {
    /// The first received/erroneous pair only
    FirstPair,
    /// Every pair, summed over the nodes of the run
    Sum,
}

impl ScalarFile {
    pub fn read(path: &Path, required: &[IterationVar], mode: BitCountMode) -> Result<Self> {
        let source = path.display().to_string();
        let mut lines = read_lines(path)?.into_iter();
        let header = parse_header(&mut lines, required, &source)?;
        let counts = match mode {
            BitCountMode::FirstPair => parse_bit_counts(&mut lines, &source)?,
            BitCountMode::Sum => parse_bit_count_sum(&mut lines, &source)?,
        };
        Ok(ScalarFile { header, counts })
    }
}

/// Every line of `path`. Bytes that are not UTF-8 are replaced, so the
/// counters around them are still read.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(|e| Error::io(path, e))?;
        if n == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Cow::Owned(_) = line {
            log::warn!("{}: line {} is not valid UTF-8", path.display(), lines.len() + 1);
        }
        lines.push(line.trim_end_matches(['\n', '\r']).to_string());
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> impl Iterator<Item = String> + '_ {
        text.lines().map(str::to_string)
    }

    const SAMPLE: &str = r#"version 2
run BERDistance-3-20081204-10:33:45-1234
attr configname BERDistance
attr iterationvars "$distance=50, $Channel=CM1"
attr iterationvars2 "$distance=50, $Channel=CM1, $Receiver=3dB, $repetition=2"
attr network phySim

scalar phySim.node[0].nic.phy 	Total received bits 	1000
scalar phySim.node[0].nic.phy 	Erroneous bits 	42
scalar phySim.node[1].nic.phy 	Total received bits 	7
"#;

    #[test]
    fn extracts_counter_values() {
        assert_eq!(erroneous_bits("Erroneous bits ... 42"), Some(42));
        assert_eq!(received_bits("Total received bits ... 1000"), Some(1000));
        assert_eq!(erroneous_bits("Total received bits 1000"), None);
        assert_eq!(received_bits("scalar x Total\treceived\tbits\t12"), Some(12));
    }

    #[test]
    fn header_line_yields_iteration_variables() {
        let header = RunHeader::from_line(
            r#"attr iterationvars2 "$NbNodes=5, $R=30, $Channel=CM-2, $Receiver=10dB, $repetition=0""#,
        );
        assert_eq!(header.nb_nodes, Some(5));
        assert_eq!(header.range, Some(30));
        assert_eq!(header.channel.as_deref(), Some("CM-2"));
        assert_eq!(header.receiver.as_deref(), Some("10dB"));
        assert_eq!(header.repetition, Some(0));
        assert_eq!(header.distance, None);
    }

    #[test]
    fn distance_may_be_padded() {
        let header = RunHeader::from_line(r#"attr iterationvars2 "$distance= 7""#);
        assert_eq!(header.distance, Some(7));
    }

    #[test]
    fn parses_header_then_first_counter_pair() {
        let mut it = lines(SAMPLE);
        let required = [IterationVar::Distance, IterationVar::Channel];
        let header = parse_header(&mut it, &required, "sample").unwrap();
        assert_eq!(header.distance, Some(50));
        let counts = parse_bit_counts(&mut it, "sample").unwrap();
        assert_eq!(counts, BitCounts::new(42, 1000));
        assert_eq!(counts.ber(), Some(0.042));
    }

    #[test]
    fn missing_required_variable_is_reported() {
        let mut it = lines(SAMPLE);
        let err = parse_header(&mut it, &[IterationVar::NbNodes], "sample").unwrap_err();
        assert!(matches!(err, Error::MissingIterationVariable { ref variable, .. } if variable == "NbNodes"));
    }

    #[test]
    fn missing_header_is_reported() {
        let mut it = lines("version 2\nscalar x Erroneous bits 1\n");
        let err = parse_header(&mut it, &[], "x.sca").unwrap_err();
        assert!(matches!(err, Error::HeaderNotFound(_)));
    }

    #[test]
    fn truncated_file_is_reported() {
        let mut it = lines("scalar x Total received bits 10\n");
        let err = parse_bit_counts(&mut it, "x.sca").unwrap_err();
        assert!(matches!(err, Error::BitCountsNotFound(_)));
    }

    #[test]
    fn sums_every_occurrence() {
        let counts = sum_bit_counts(lines(SAMPLE));
        assert_eq!(counts, BitCounts::new(42, 1007));
    }

    #[test]
    fn splits_runs_into_configurations() {
        let text = "run 1\nTotal received bits 100\nErroneous bits 1\n\
                    run 2\nTotal received bits 100\nErroneous bits 3\n\
                    run 3\nTotal received bits 200\nErroneous bits 10\n\
                    run 4\nTotal received bits 200\nErroneous bits 30\n\
                    run 5\nTotal received bits 50\nErroneous bits 5\n";
        let configs = split_runs(lines(text), 2);
        assert_eq!(configs, vec![BitCounts::new(4, 200), BitCounts::new(40, 400)]);
    }

    #[test]
    fn reads_scalar_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BERDistance-0.sca");
        std::fs::write(&path, SAMPLE).unwrap();
        let file = ScalarFile::read(&path, &[IterationVar::Receiver], BitCountMode::FirstPair).unwrap();
        assert_eq!(file.header.receiver.as_deref(), Some("3dB"));
        assert_eq!(file.counts.received, 1000);
    }

    #[test]
    fn sum_mode_adds_the_counters_of_every_node() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BERDistance-0.sca");
        std::fs::write(
            &path,
            "attr iterationvars2 \"$distance=50, $Receiver=3dB\"\n\
             scalar phySim.node[0].nic.phy Total received bits 1000\n\
             scalar phySim.node[0].nic.phy Erroneous bits 10\n\
             scalar phySim.node[1].nic.phy Total received bits 1000\n\
             scalar phySim.node[1].nic.phy Erroneous bits 30\n",
        )
        .unwrap();
        let first = ScalarFile::read(&path, &[], BitCountMode::FirstPair).unwrap();
        assert_eq!(first.counts, BitCounts::new(10, 1000));
        let summed = ScalarFile::read(&path, &[], BitCountMode::Sum).unwrap();
        assert_eq!(summed.counts, BitCounts::new(40, 2000));
    }

    #[test]
    fn sum_mode_without_counters_is_reported() {
        let mut it = lines("scalar x Total received bits 10\n");
        let err = parse_bit_count_sum(&mut it, "x.sca").unwrap_err();
        assert!(matches!(err, Error::BitCountsNotFound(_)));
    }

    #[test]
    fn invalid_utf8_line_does_not_hide_later_counters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("omnetpp-1.sca");
        let mut bytes = b"Total received bits 100\nErroneous bits 1\n".to_vec();
        bytes.extend_from_slice(b"attr note \xff\xfe\n");
        bytes.extend_from_slice(b"Total received bits 900\r\nErroneous bits 99\n");
        std::fs::write(&path, bytes).unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "Total received bits 900");
        assert_eq!(sum_bit_counts(lines), BitCounts::new(100, 1000));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_lines(&dir.path().join("absent.sca")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
