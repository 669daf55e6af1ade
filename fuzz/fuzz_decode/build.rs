fn main() {
    println!("cargo:rustc-check-cfg=cfg(checked)");

    if std::env::var_os("ACORNJSON_CHECKED").is_some() {
        println!("cargo:rustc-cfg=checked");
    }
}
