// generate/runs.rs

use crate::settings::Settings;

/// Two nodes, the source moved away from the receiver by each configured
/// distance; `runs_per_config` consecutive runs share a distance.
pub fn distance_runs_ini(settings: &Settings) -> String {
    let net = &settings.network;
    let mut out = String::from("\n\n");
    out.push_str(&format!("{}.numHosts = 2\n\n\n", net));

    out.push_str(&format!("{}.node[0].app.nbPackets = 0\n", net));
    out.push_str(&format!("{}.node[1].app.nbPackets = {}\n", net, settings.nb_packets));
    out.push_str(&format!("{}.node[*].app.flood = true\n", net));
    out.push_str(&format!("{}.node[*].app.stats = true\n", net));
    out.push_str(&format!("{}.node[*].app.payloadSize = {}\n", net, settings.payload_size));
    out.push('\n');

    out.push_str("################ Mobility parameters #####################\n");
    for axis in ["x", "y", "z"] {
        out.push_str(&format!("{}.node[0].mobility.{} = 100\n", net, axis));
    }
    out.push_str(&format!("{}.node[1].mobility.y = 100\n", net));
    out.push_str(&format!("{}.node[1].mobility.z = 100\n", net));
    out.push_str("\n\n");

    let rpc = settings.runs_per_config;
    for (d, distance) in settings.distances.iter().enumerate() {
        for local in 0..rpc {
            out.push_str(&format!("[Run {}]\n", d as u32 * rpc + local + 1));
            out.push_str(&format!("{}.node[1].mobility.x = {}\n\n", net, 100 + distance));
        }
    }
    out
}

/// Configuration `s` (0-based) enables the first `s + 1` sources.
pub fn mui_runs_ini(settings: &Settings) -> String {
    let net = &settings.network;
    let mut out = String::from("\n\n");
    out.push_str(&format!("{}.numHosts = {}\n", net, settings.mui_hosts));
    out.push_str("include omnetpp_positions.ini\n\n\n");

    out.push_str(&format!("{}.node[0].app.nbPackets = 0\n", net));
    out.push_str(&format!("{}.node[*].app.flood = true\n", net));
    for flag in ["stats", "trace", "debug"] {
        out.push_str(&format!("{}.node[*].app.{} = false\n", net, flag));
    }
    out.push_str(&format!("{}.node[*].app.payloadSize = {}\n", net, settings.payload_size));
    out.push_str("\n\n");

    let rpc = settings.runs_per_config;
    for source in 0..settings.nb_sources {
        for local in 0..rpc {
            out.push_str(&format!("[Run {}]\n", source * rpc + local + 1));
            for node in 1..=source + 1 {
                out.push_str(&format!(
                    "{}.node[{}].app.nbPackets = {}\n",
                    net, node, settings.nb_packets
                ));
            }
            out.push_str(&format!("{}.node[*].app.nbPackets = 0\n\n", net));
        }
    }
    out
}

/// Number of runs the generated runs file describes.
pub fn distance_run_count(settings: &Settings) -> u32 {
    settings.distances.len() as u32 * settings.runs_per_config
}

pub fn mui_run_count(settings: &Settings) -> u32 {
    settings.nb_sources * settings.runs_per_config
}
