// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{str::FromStr, time::SystemTime};

use anyhow::Context;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

pub fn init_logger(level: &str) -> anyhow::Result<()> {
    let level = LevelFilter::from_str(level).with_context(|| format!("Invalid log level '{}'", level))?;
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .debug(Color::Cyan)
        .warn(Color::Yellow)
        .error(Color::Red);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {} {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .level(level)
        // Transport crates are noisy at debug
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
