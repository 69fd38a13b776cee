//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use clap::Parser;
use prep::error::GetExitCode;

fn main() {
    env_logger::init();
    let args = prep::Args::parse();

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let result = prep::run(stdout, stderr, args);
    std::process::exit(result.get_exit_code())
}
