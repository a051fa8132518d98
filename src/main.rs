// Copyright 2026 os-detect contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use os_detect::detector::Detector;
use os_detect::logging;
use os_detect::provider::{StdFileSystem, StdSystemProperties, SystemPropertyProvider};
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(name = "os-detect")]
#[command(
    author,
    version,
    about = "Detect the operating system and CPU architecture and print the platform classifier",
    long_about = None
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Extra classifier qualifiers appended after the OS and architecture
    #[arg(value_name = "QUALIFIER")]
    qualifiers: Vec<String>,

    /// Output the classification as JSON
    #[arg(long)]
    json: bool,

    /// Continue with name "unknown" instead of failing on an unrecognized OS
    #[arg(long)]
    no_fail_on_unknown_os: bool,

    /// Do not mirror detected name/arch/bitness into the property store
    #[arg(long)]
    no_mirror: bool,
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    let properties = StdSystemProperties;
    let files = StdFileSystem;
    if cli.no_fail_on_unknown_os {
        properties.set_property("failOnUnknownOS", "false");
    }

    let detector = Detector::new(&properties, &files).mirror_properties(!cli.no_mirror);
    let mut output = BTreeMap::new();
    let classification = detector
        .detect(&mut output, &cli.qualifiers)
        .unwrap_or_else(|e| fail(e));

    if cli.json {
        let json = serde_json::to_string_pretty(&classification).unwrap_or_else(|e| fail(e));
        println!("{json}");
    } else {
        for (key, value) in &output {
            println!("{key}={value}");
        }
    }
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("Error: {error}");
    std::process::exit(1);
}
