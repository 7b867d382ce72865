/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::Write;
use std::path::PathBuf;

fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is not set");
    let path: PathBuf = [out_dir.as_str(), "built.rs"].iter().collect();
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .expect("Cannot open built.rs");
    writeln!(
        file,
        "pub const BUILD_DATE: &str = \"{}\";",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .expect("Cannot write to built.rs");
}
