mod build {
    pub mod config;
}

use build::config::Cfgs;

fn main() {
    Cfgs::new().apply();
}
