fn check_dirent_has_field(cfg_name: &str) {
    // Tell cargo about the cfg we intend to use so `check-cfg` won't warn.
    println!("cargo:rustc-check-cfg=cfg({cfg_name})");

    // Only POSIX targets have a `struct dirent` to probe.
    if std::env::var_os("CARGO_CFG_UNIX").is_none() {
        return;
    }

    let Some(out) = std::env::var_os("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set, skipping {cfg_name} probe");
        return;
    };

    let c_file = format!("check_{cfg_name}.c");
    let src = std::path::PathBuf::from(out).join(&c_file);

    // This C source fails to compile if the struct field is not present.
    // We derive the field name from the `cfg_name`, which is of the form `has_<field>`.
    let field_name = cfg_name.strip_prefix("has_").unwrap_or(cfg_name);
    assert!(
        field_name.starts_with("d_"),
        "Field name must start with d_"
    );

    let code = format!(
        // use stddef.h to get offsetof
        "#include <dirent.h>\n#include <stddef.h>\nstatic const size_t off = offsetof(struct dirent, {field_name});\nint main(void) {{ (void)off; return 0; }}\n",
    );
    if let Err(e) = std::fs::write(&src, code) {
        println!("cargo:warning=failed to write {c_file}: {e}");
        return;
    }

    let mut build = cc::Build::new();
    build.file(&src).cargo_warnings(false).cargo_output(true);

    if build.try_compile(&c_file).is_ok() {
        // Enable the flag
        println!("cargo:rustc-cfg={cfg_name}");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Without d_type every entry starts out as `FileType::Unknown` and is
    // resolved with lstat on first query.
    check_dirent_has_field("has_d_type");
}
