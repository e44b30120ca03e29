// generate/rng.rs

/// Random number generators used by each layer of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngLayout {
    pub phy: u32,
    pub mac: u32,
    pub app: u32,
}

impl RngLayout {
    pub fn per_node(&self) -> u32 {
        self.phy + self.mac + self.app
    }
}

/// Give every generator of every node its own stream: node `i` owns
/// streams `i * per_node .. (i + 1) * per_node`, phy first, then mac, then app.
pub fn rng_ini(network: &str, nodes: u32, layout: RngLayout) -> String {
    let per_node = layout.per_node();
    let mut out = String::from("\n\n");
    out.push_str(&format!("num-rngs = {}\n\n", nodes * per_node));
    out.push_str("\n\n## RNG Configuration ##\n\n");

    for node in 0..nodes {
        let base = node * per_node;
        let prefix = format!("{}.node[{}]", network, node);
        for k in 0..layout.phy {
            out.push_str(&format!("{}.nic.phy.rng-{} = {}\n", prefix, k, base + k));
        }
        for k in 0..layout.mac {
            out.push_str(&format!("{}.nic.mac.rng-{} = {}\n", prefix, k, base + layout.phy + k));
        }
        for k in 0..layout.app {
            out.push_str(&format!(
                "{}.app.rng-{} = {}\n",
                prefix,
                k,
                base + layout.phy + layout.mac + k
            ));
        }
        out.push('\n');
    }
    out
}
