// analysis/mod.rs

pub mod aggregation;
pub mod ber;
pub mod experiment;
pub mod export;
pub mod plot;

use std::path::{Path, PathBuf};

pub use aggregation::{BerPoint, BerTable};
pub use ber::BitCounts;
pub use experiment::{Experiment, PlotStyle, Scale};

use crate::error::{Error, Result};
use crate::results::scalar::{read_lines, split_runs, sum_bit_counts, ScalarFile};
use crate::settings::Settings;

/// Scalar file name used by the channel sweep and multi-user campaigns.
pub const DATA_FILE_PREFIX: &str = "omnetpp";
const MUI_SERIES: &str = "MUI";

pub fn channel_data_dir(results_dir: &Path, id: u32) -> PathBuf {
    results_dir.join(format!("CM{}", id))
}

pub fn mui_data_dir(results_dir: &Path) -> PathBuf {
    results_dir.join(Experiment::Mui.name())
}

fn run_file(dir: &Path, run: u32) -> PathBuf {
    dir.join(format!("{}-{}.sca", DATA_FILE_PREFIX, run))
}

/// Read every `<experiment>-*.sca` file below `results_dir`.
pub fn collect_run_files(experiment: Experiment, results_dir: &Path) -> Result<BerTable> {
    let pattern = experiment.results_pattern(results_dir);
    log::info!("Looking for files like {}", pattern);

    let mut table = BerTable::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| Error::io(e.path().to_path_buf(), e.into()))?;
        let file = ScalarFile::read(&path, experiment.required_vars(), experiment.bit_count_mode())?;
        let Some(x) = experiment.x_of(&file.header) else {
            return Err(Error::HeaderNotFound(path.display().to_string()));
        };
        log::debug!("{}: x={} {:?}", path.display(), x, file.counts);
        table.add(&experiment.series_of(&file.header), x, file.counts);
    }
    Ok(table)
}

/// One data directory per channel model; run `d * runs_per_config + k + 1`
/// is repetition `k` at the `d`-th configured distance.
pub fn collect_channel_dirs(settings: &Settings) -> Result<BerTable> {
    let rpc = settings.runs_per_config;
    let mut table = BerTable::new();
    for channel in &settings.channels {
        let dir = channel_data_dir(&settings.results_dir, channel.id);
        log::info!("Reading {} from {}", channel.label, dir.display());
        for (d, &distance) in settings.distances.iter().enumerate() {
            for local in 0..rpc {
                let path = run_file(&dir, d as u32 * rpc + local + 1);
                table.add(&channel.label, distance, sum_bit_counts(read_lines(&path)?));
            }
        }
    }
    Ok(table)
}

/// Multi-user runs: either one `omnetpp.sca` holding every run, or one
/// file per run as written by the campaign runner.
pub fn collect_mui(settings: &Settings) -> Result<BerTable> {
    let dir = mui_data_dir(&settings.results_dir);
    let rpc = settings.runs_per_config;
    let single = dir.join(format!("{}.sca", DATA_FILE_PREFIX));

    let configs = if single.exists() {
        split_runs(read_lines(&single)?, rpc as usize)
    } else {
        let mut configs = Vec::new();
        for source in 0..settings.nb_sources {
            let mut counts = BitCounts::default();
            for local in 0..rpc {
                counts += sum_bit_counts(read_lines(&run_file(&dir, source * rpc + local + 1))?);
            }
            configs.push(counts);
        }
        configs
    };

    let mut table = BerTable::new();
    for (idx, counts) in configs.into_iter().enumerate() {
        table.add(MUI_SERIES, idx as u32 + 1, counts);
    }
    Ok(table)
}

pub fn collect(experiment: Experiment, settings: &Settings) -> Result<BerTable> {
    match experiment {
        Experiment::BerChannels => collect_channel_dirs(settings),
        Experiment::Mui => collect_mui(settings),
        _ => collect_run_files(experiment, &settings.results_dir),
    }
}

/// Outputs of one analysis pass.
#[derive(Debug)]
pub struct AnalysisReport {
    pub table: BerTable,
    pub csv: PathBuf,
    pub figures: Vec<PathBuf>,
}

pub fn print_table(experiment: Experiment, table: &BerTable) {
    println!("{} ({})", experiment, experiment.plot_style().x_label);
    for label in table.labels() {
        println!("  {}", label);
        for p in table.points(label) {
            println!(
                "    x={:<6} errors={:<10} received={:<10} BER={:.6e} runs={}",
                p.x, p.counts.erroneous, p.counts.received, p.ber, p.runs
            );
        }
        if experiment == Experiment::Sensitivity {
            if let Some(reach) = table.max_reach(label) {
                println!("    maximum range: {}", reach);
            }
        }
    }
}

/// Aggregate the results of `experiment`, print them, and write the CSV
/// table and the figures with and without legend.
pub fn analyze(experiment: Experiment, settings: &Settings) -> Result<AnalysisReport> {
    let table = collect(experiment, settings)?;
    if !table.has_received_bits() {
        return Err(Error::NoResults(settings.results_dir.display().to_string()));
    }
    print_table(experiment, &table);

    let dir = experiment.figure_dir(&settings.figures_dir);
    let csv = dir.join("ber.csv");
    export::write_csv(&table, &csv)?;

    let style = experiment.plot_style();
    let size = (settings.plot_width, settings.plot_height);
    let mut figures = Vec::new();
    for (name, legend) in [("ber-overview.png", true), ("ber-overview-nolegend.png", false)] {
        let path = dir.join(name);
        // The table is already saved; a figure that cannot be drawn is not fatal.
        match plot::render_ber_plot(&table, &style, &path, size, legend) {
            Ok(()) => figures.push(path),
            Err(e) => log::warn!("Could not render {}: {}", path.display(), e),
        }
    }

    Ok(AnalysisReport {
        table,
        csv,
        figures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scalar(vars: &str, received: u64, erroneous: u64) -> String {
        format!(
            "version 2\nrun x\nattr iterationvars2 \"{}\"\n\
             scalar phySim.node[1].nic.phy \tTotal received bits \t{}\n\
             scalar phySim.node[1].nic.phy \tErroneous bits \t{}\n",
            vars, received, erroneous
        )
    }

    fn settings(root: &Path) -> Settings {
        Settings {
            results_dir: root.join("results"),
            figures_dir: root.join("figures"),
            ..Settings::default()
        }
    }

    #[test]
    fn run_files_are_grouped_by_series_and_distance() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");
        fs::create_dir_all(&results).unwrap();
        let files = [
            ("BERDistance-0.sca", "$distance=7, $Channel=CM1, $repetition=0", 1000, 1),
            ("BERDistance-1.sca", "$distance=7, $Channel=CM1, $repetition=1", 1000, 3),
            ("BERDistance-2.sca", "$distance=50, $Channel=CM1, $repetition=0", 1000, 40),
            ("Sensitivity-0.sca", "$distance=7, $Channel=CM1, $repetition=0", 1000, 40),
        ];
        for (name, vars, rx, err) in files {
            fs::write(results.join(name), scalar(vars, rx, err)).unwrap();
        }

        let table = collect_run_files(Experiment::BerDistance, &results).unwrap();
        assert_eq!(table.labels(), vec!["3dB CM1"]);
        let points = table.points("3dB CM1");
        assert_eq!(points[0].counts, BitCounts::new(4, 2000));
        assert_eq!(points[1].x, 50);
    }

    #[test]
    fn distance_sweep_counts_every_node_of_a_run() {
        let dir = tempfile::tempdir().unwrap();
        let two_nodes = scalar("$distance=7, $Channel=CM1, $repetition=0", 1000, 10)
            + "scalar phySim.node[2].nic.phy \tTotal received bits \t1000\n\
               scalar phySim.node[2].nic.phy \tErroneous bits \t30\n";
        fs::write(dir.path().join("BERDistance-0.sca"), &two_nodes).unwrap();
        fs::write(dir.path().join("MAICircleR-0.sca"), two_nodes.replace(
            "$distance=7, $Channel=CM1, $repetition=0",
            "$NbNodes=4, $R=20, $Channel=CM1, $Receiver=3dB, $repetition=0",
        ))
        .unwrap();

        let distance = collect_run_files(Experiment::BerDistance, dir.path()).unwrap();
        assert_eq!(distance.points("3dB CM1")[0].counts, BitCounts::new(40, 2000));
        let circle = collect_run_files(Experiment::MaiCircleR, dir.path()).unwrap();
        assert_eq!(circle.points("3dB CM1")[0].counts, BitCounts::new(10, 1000));
    }

    #[test]
    fn missing_variable_aborts_collection() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Sensitivity-0.sca"), scalar("$distance=7, $Channel=CM1", 10, 1))
            .unwrap();
        let err = collect_run_files(Experiment::Sensitivity, dir.path()).unwrap_err();
        assert!(matches!(err, Error::MissingIterationVariable { .. }));
    }

    #[test]
    fn channel_directories_map_runs_to_distances() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path());
        settings.channels.truncate(1);
        settings.distances = vec![7, 50];
        let data = channel_data_dir(&settings.results_dir, 1);
        fs::create_dir_all(&data).unwrap();
        for run in 1..=4u64 {
            let text = format!("Total received bits {}\nErroneous bits {}\n", 100, run);
            fs::write(run_file(&data, run as u32), text).unwrap();
        }

        let table = collect_channel_dirs(&settings).unwrap();
        let points = table.points("CM1 Residential LOS");
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].x, points[0].counts), (7, BitCounts::new(3, 200)));
        assert_eq!((points[1].x, points[1].counts), (50, BitCounts::new(7, 200)));
    }

    #[test]
    fn missing_channel_run_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_channel_dirs(&settings(dir.path())).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn single_mui_file_is_split_by_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let data = mui_data_dir(&settings.results_dir);
        fs::create_dir_all(&data).unwrap();
        let text = "run 1\nTotal received bits 100\nErroneous bits 0\n\
                    run 2\nTotal received bits 100\nErroneous bits 2\n\
                    run 3\nTotal received bits 100\nErroneous bits 10\n\
                    run 4\nTotal received bits 100\nErroneous bits 10\n";
        fs::write(data.join("omnetpp.sca"), text).unwrap();

        let table = collect_mui(&settings).unwrap();
        let points = table.points("MUI");
        assert_eq!(points.iter().map(|p| p.x).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(points[1].ber, 0.1);
    }

    #[test]
    fn per_run_mui_files_are_grouped() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path());
        settings.nb_sources = 2;
        let data = mui_data_dir(&settings.results_dir);
        fs::create_dir_all(&data).unwrap();
        for run in 1..=4 {
            fs::write(run_file(&data, run), "Total received bits 50\nErroneous bits 5\n").unwrap();
        }
        let table = collect_mui(&settings).unwrap();
        assert_eq!(table.points("MUI")[1].counts, BitCounts::new(10, 100));
    }

    #[test]
    fn analyze_writes_table_next_to_figures() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        fs::create_dir_all(&settings.results_dir).unwrap();
        fs::write(
            settings.results_dir.join("MAICircleR-0.sca"),
            scalar("$NbNodes=4, $R=20, $Channel=CM1, $Receiver=3dB, $repetition=0", 1000, 5),
        )
        .unwrap();

        let report = analyze(Experiment::MaiCircleR, &settings).unwrap();
        assert_eq!(report.csv, dir.path().join("figures/MAICircleR/ber.csv"));
        let rows = export::read_csv(&report.csv).unwrap();
        assert_eq!(rows[0].x, 20);
        assert_eq!(rows[0].series, "3dB CM1");
    }

    #[test]
    fn analyze_without_results_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze(Experiment::BerDistance, &settings(dir.path())).unwrap_err();
        assert!(matches!(err, Error::NoResults(_)));
    }

    #[test]
    fn results_without_received_bits_are_not_analyzed() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        fs::create_dir_all(&settings.results_dir).unwrap();
        fs::write(
            settings.results_dir.join("MAICircleR-0.sca"),
            scalar("$NbNodes=4, $R=20, $Channel=CM1, $Receiver=3dB, $repetition=0", 0, 0),
        )
        .unwrap();
        let err = analyze(Experiment::MaiCircleR, &settings).unwrap_err();
        assert!(matches!(err, Error::NoResults(_)));
        assert!(!dir.path().join("figures/MAICircleR/ber.csv").exists());
    }
}
