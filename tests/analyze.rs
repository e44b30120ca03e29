mod common;

use predicates::str::contains;
use std::fs;

use common::{scalar_file, write, Workspace};

#[test]
fn missing_config_is_a_usage_error() {
    let ws = Workspace::new();
    ws.cmd("veins_analyze")
        .arg("-a")
        .assert()
        .code(2)
        .stderr(contains("--config"));
}

#[test]
fn unknown_experiment_is_rejected() {
    let ws = Workspace::new();
    ws.cmd("veins_analyze")
        .args(["-a", "-c", "cmpPCM1D"])
        .assert()
        .code(1)
        .stderr(contains("unknown experiment"));
}

#[test]
fn analyze_is_the_default_step() {
    let ws = Workspace::new();
    let results = ws.veins.join("results");
    write(
        &results.join("BERDistance-0.sca"),
        &scalar_file("$distance=7, $Channel=CM1, $repetition=0", 1000, 42),
    );
    write(
        &results.join("BERDistance-1.sca"),
        &scalar_file("$distance=50, $Channel=CM1, $repetition=0", 1000, 100),
    );

    ws.cmd("veins_analyze")
        .args(["-c", "BERDistance"])
        .assert()
        .success()
        .stdout(contains("3dB CM1"))
        .stdout(contains("BER=4.200000e-2"))
        .stdout(contains("Table saved to"));

    let csv = fs::read_to_string(ws.veins.join("figures/BERDistance/ber.csv")).unwrap();
    assert!(csv.lines().any(|l| l == "3dB CM1,7,42,1000,0.042,1"));
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn malformed_results_abort_analysis() {
    let ws = Workspace::new();
    write(
        &ws.veins.join("results/Sensitivity-0.sca"),
        "version 2\nscalar x Erroneous bits 3\n",
    );
    ws.cmd("veins_analyze")
        .args(["-a", "-c", "Sensitivity"])
        .assert()
        .code(1)
        .stderr(contains("could not parse header information"));
}

#[test]
fn settings_file_redirects_results() {
    let ws = Workspace::new();
    write(
        &ws.veins.join("sim/out/MAIUnif-3.sca"),
        &scalar_file("$NbNodes=6, $Channel=CM1, $Receiver=10dB, $repetition=0", 500, 5),
    );
    write(
        &ws.veins.join("custom.toml"),
        "results-dir = \"sim/out\"\nfigures-dir = \"sim/fig\"\n",
    );

    ws.cmd("veins_analyze")
        .args(["-a", "-c", "MAIUnif", "--settings", "custom.toml"])
        .assert()
        .success()
        .stdout(contains("x=5"));
    assert!(ws.veins.join("sim/fig/MAIUnif/ber.csv").exists());
}

#[test]
fn generate_writes_positions_for_circle_experiment() {
    let ws = Workspace::new();
    ws.cmd("veins_analyze")
        .args(["-g", "-c", "MAICircleR", "-n", "6", "-m", "10", "-M", "50", "-s", "20"])
        .assert()
        .success()
        .stdout(contains("MAICircleR_positions.ini"));

    let ini = fs::read_to_string(ws.veins.join("MAICircleR_positions.ini")).unwrap();
    assert!(ini.contains("${R=10..50 step 20}"));
    assert!(ini.contains("phySim.node[5].mobility.x"));
}

#[test]
fn generate_channel_sweep_files() {
    let ws = Workspace::new();
    ws.cmd("veins_analyze")
        .args(["-g", "-c", "BERChannels", "--output-dir", "ini"])
        .assert()
        .success();
    let runs = fs::read_to_string(ws.veins.join("ini/omnetpp_runs.ini")).unwrap();
    assert_eq!(runs.matches("[Run ").count(), 6);
    assert!(ws.veins.join("ini/omnetpp_rng.ini").exists());
}

#[test]
fn vector_summary_does_not_need_a_configuration() {
    let ws = Workspace::new();
    write(
        &ws.veins.join("results/MUI-0.vec"),
        "version 2\nvector 0 phySim.node[0].nic.phy snr ETV\n0\t1\t0.1\t2\n0\t2\t0.2\t4\n",
    );
    ws.cmd("veins_analyze")
        .args(["--vectors", "results/MUI-0.vec"])
        .assert()
        .success()
        .stdout(contains("count=2 mean=3.000000"));
}
