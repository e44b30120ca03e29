// generate/positions.rs

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Margin left around the placed nodes on each side of the playground.
const MARGIN: u32 = 100;
/// Distance between the receiver and its source.
const SOURCE_OFFSET: u32 = 5;

/// Parameters of the node placement, as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionParams {
    pub nb_nodes: u32,
    pub rmin: u32,
    pub rmax: u32,
    pub step: u32,
}

fn invalid(message: &str) -> Error {
    Error::InvalidParameter(message.to_string())
}

/// Playground side holding `extent` meters of nodes plus the margins.
fn playground(extent: Option<u32>) -> Result<u32> {
    extent
        .and_then(|e| e.checked_add(2 * MARGIN))
        .ok_or_else(|| invalid("playground does not fit in 32 bits, lower --rmax"))
}

fn header(config: &str, network: &str, hosts: u32) -> String {
    format!(
        "\n\n[Config {}]\n\n{}.numHosts = ${{NbNodes={}}}\n\n\n",
        config, network, hosts
    )
}

fn addresses(network: &str, node: u32) -> String {
    format!(
        "{net}.node[{n}].app.nodeAddr = {n}\n{net}.node[{n}].nic.mac.MACAddr = {n}\n\n",
        net = network,
        n = node
    )
}

/// Receiver in the middle of the playground, the source next to it, and
/// every other node an interferer on a circle of radius `${R}` swept from
/// `rmin` to `rmax`.
pub fn mai_circle_r(config: &str, network: &str, p: &PositionParams) -> Result<String> {
    if p.nb_nodes < 3 {
        return Err(invalid("circle layout needs at least 3 nodes (--nb-nodes)"));
    }
    if p.step == 0 || p.rmin > p.rmax {
        return Err(invalid("circle layout needs rmin <= rmax and a non-zero step"));
    }

    let size = playground(p.rmax.checked_mul(2))?;
    let net = network;
    let mut out = header(config, net, p.nb_nodes);
    out.push_str(&format!("{}.playgroundSizeX = {}\n", net, size));
    out.push_str(&format!("{}.playgroundSizeY = {}\n", net, size));

    out.push_str("# receiver at the center\n");
    out.push_str(&format!("{}.node[0].mobility.x = ${{O={}}}\n", net, size / 2));
    out.push_str(&format!("{}.node[0].mobility.y = this.x\n", net));
    out.push_str(&addresses(net, 0));
    out.push_str(&format!("{}.node[*].mobility.z = 0\n\n", net));

    out.push_str(&format!("{}.node[1].mobility.x = ${{O}} + {}\n", net, SOURCE_OFFSET));
    out.push_str(&format!("{}.node[1].mobility.y = ${{O}}\n", net));
    out.push_str(&addresses(net, 1));

    // the first interferer defines the iteration variable R
    out.push_str(&format!(
        "{}.node[2].mobility.x = ${{O}} + ${{R={}..{} step {}}}*uniform(-1,1)\n",
        net, p.rmin, p.rmax, p.step
    ));
    out.push_str(&format!(
        "{}.node[2].mobility.y = ${{O}} + sqrt( (this.x-${{O}})*(this.x-${{O}}) - 1 )\n",
        net
    ));
    out.push_str(&addresses(net, 2));

    for node in 3..p.nb_nodes {
        out.push_str(&format!(
            "{}.node[{}].mobility.x = ${{O}} + ${{R}}*uniform(-1,1)\n",
            net, node
        ));
        out.push_str(&format!(
            "{}.node[{}].mobility.y = ${{O}} + sqrt( 1-(this.x-${{O}})*(this.x-${{O}}) )\n",
            net, node
        ));
        out.push_str(&addresses(net, node));
    }
    Ok(out)
}

/// One node every `step` meters on a line from `rmin` (inclusive) to
/// `rmax` (exclusive), starting at node index 2.
pub fn pcm_1d(config: &str, network: &str, p: &PositionParams) -> Result<String> {
    if p.step == 0 || p.rmin >= p.rmax {
        return Err(invalid("line layout needs rmin < rmax and a non-zero step"));
    }
    let size = playground(Some(p.rmax))?;
    let xs: Vec<u32> = (p.rmin..p.rmax).step_by(p.step as usize).collect();
    let hosts = xs.len() as u32 + 2;

    let net = network;
    let mut out = header(config, net, hosts);
    out.push_str(&format!("{}.playgroundSizeX = {}\n\n", net, size));
    for (i, x) in xs.iter().enumerate() {
        let node = i as u32 + 2;
        out.push_str(&format!("{}.node[{}].mobility.x = {}\n", net, node, x));
        out.push_str(&format!("{}.node[{}].app.nodeAddr = {}\n", net, node, node));
        out.push_str(&format!("{}.node[{}].nic.mac.MACAddr = {}\n", net, node, node));
    }
    Ok(out)
}

/// Receiver and source as in the circle layout, interferers drawn
/// uniformly over the disc of radius `rmax`. The same seed gives the
/// same placement.
pub fn uniform_disc(config: &str, network: &str, p: &PositionParams, seed: u64) -> Result<String> {
    if p.nb_nodes < 2 {
        return Err(invalid("disc layout needs at least 2 nodes (--nb-nodes)"));
    }
    if p.rmax == 0 {
        return Err(invalid("disc layout needs a non-zero radius (--rmax)"));
    }

    let size = playground(p.rmax.checked_mul(2))?;
    let center = f64::from(size / 2);
    let net = network;
    let mut out = header(config, net, p.nb_nodes);
    out.push_str(&format!("{}.playgroundSizeX = {}\n", net, size));
    out.push_str(&format!("{}.playgroundSizeY = {}\n", net, size));
    out.push_str(&format!("{}.node[*].mobility.z = 0\n\n", net));

    let place = |out: &mut String, node: u32, x: f64, y: f64| {
        out.push_str(&format!("{}.node[{}].mobility.x = {:.2}\n", net, node, x));
        out.push_str(&format!("{}.node[{}].mobility.y = {:.2}\n", net, node, y));
        out.push_str(&addresses(net, node));
    };
    place(&mut out, 0, center, center);
    place(&mut out, 1, center + f64::from(SOURCE_OFFSET), center);

    let mut rng = SmallRng::seed_from_u64(seed);
    let radius = f64::from(p.rmax);
    for node in 2..p.nb_nodes {
        // sqrt keeps the density uniform over the area
        let r = radius * rng.random::<f64>().sqrt();
        let theta = rng.random_range(0.0..2.0 * PI);
        place(&mut out, node, center + r * theta.cos(), center + r * theta.sin());
    }
    Ok(out)
}
