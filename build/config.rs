/*!
Converts environment variables into Cargo cfgs that can then be used in code.
*/

use std::{collections::HashSet, env};

#[derive(Debug)]
pub struct Cfgs {
    enabled: HashSet<String>,
}

pub struct Cfg(&'static str);

impl Cfgs {
    /**
    Perform a checked build.

    These builds do extra checking and are suitable for testing and fuzzing.
    */
    pub const ACORNJSON_CHECKED: Cfg = Cfg("checked");

    /**
    Create a build configuration and read the default variables.
    */
    pub fn new() -> Self {
        let mut enabled = HashSet::new();

        cfg_from_env_value("release", "PROFILE", "release", &mut enabled);
        cfg_from_env_value("debug", "PROFILE", "debug", &mut enabled);

        cfg_from_env_present(Self::ACORNJSON_CHECKED.0, &mut enabled);

        Cfgs { enabled }
    }

    pub fn apply(self) {
        for cfg in &self.enabled {
            println!("cargo:rustc-cfg={}", cfg);
        }

        println!("cargo:rustc-check-cfg=cfg(checked)");
        println!("cargo:rustc-check-cfg=cfg(debug)");
        println!("cargo:rustc-check-cfg=cfg(release)");

        println!("cargo:rerun-if-changed=build.rs")
    }
}

fn cfg_from_env_present(cfg: impl AsRef<str>, enabled: &mut HashSet<String>) {
    let cfg = cfg.as_ref();

    let var = format!("ACORNJSON_{}", cfg.to_uppercase());
    println!("cargo:rerun-if-env-changed={}", var);

    if let Ok(env_cfg) = env::var(var) {
        if env_cfg != "0" {
            enabled.insert(cfg.into());
        } else {
            enabled.remove(cfg);
        }
    }
}

fn cfg_from_env_value(
    cfg: impl AsRef<str>,
    key: impl AsRef<str>,
    value: impl AsRef<str>,
    enabled: &mut HashSet<String>,
) {
    println!("cargo:rerun-if-env-changed={}", key.as_ref());

    if let Ok(cargo_cfg) = env::var(key.as_ref()) {
        if cargo_cfg == value.as_ref() {
            enabled.insert(cfg.as_ref().into());
        }
    }
}
