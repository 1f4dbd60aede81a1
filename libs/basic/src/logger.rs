// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! Loggers behind the `log` facade: console (stderr) and append-only file.
use log::LevelFilter;
use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    os::unix::prelude::OpenOptionsExt,
    path::Path,
    sync::Mutex,
};

/// default log file of the "file" target
pub const LOG_FILE_PATH: &str = "/var/log/unitgraph.log";

fn write_msg_common(writer: &mut impl Write, level: log::Level, module: &str, msg: String) {
    let now_str = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S ")
        .to_string();

    /* 1. Write time */
    if let Err(e) = writer.write(now_str.as_bytes()) {
        eprintln!("Failed to log time message: {}", e);
        return;
    }

    /* 2. Write level and module */
    if let Err(e) = writer.write(format!("{} {} ", level, module).as_bytes()) {
        eprintln!("Failed to log module message: {}", e);
        return;
    }

    /* 3. Write message */
    if let Err(e) = writer.write((msg + "\n").as_bytes()) {
        eprintln!("Failed to log message: {}", e);
    }
}

/* Log lines go to stderr, stdout is left to the program's own output. */
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let mut stderr = std::io::stderr();
        let module_path = match record.module_path() {
            None => "unknown",
            Some(v) => v,
        };
        write_msg_common(
            &mut stderr,
            record.level(),
            module_path,
            record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

struct FileLogger {
    file: Mutex<File>,
}

impl FileLogger {
    fn file_open(file_path: &Path, file_mode: u32) -> std::io::Result<File> {
        if let Some(dir) = file_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        OpenOptions::new()
            .write(true)
            .create(true)
            .append(true)
            .mode(file_mode)
            .open(file_path)
    }

    fn new(file_path: &Path, file_mode: u32) -> std::io::Result<Self> {
        let file = Self::file_open(file_path, file_mode)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl log::Log for FileLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let mut file = match self.file.lock() {
            Err(_) => return,
            Ok(v) => v,
        };
        let module_path = match record.module_path() {
            None => "unknown",
            Some(v) => v,
        };
        write_msg_common(
            &mut *file,
            record.level(),
            module_path,
            record.args().to_string(),
        );
    }

    fn flush(&self) {
        let mut file = match self.file.lock() {
            Err(_) => return,
            Ok(v) => v,
        };
        if let Err(e) = file.flush() {
            eprintln!("Failed to flush log file: {}", e);
        }
    }
}

/// Parse a configured level name, unknown names fall back to "info".
pub fn parse_level(level: &str) -> LevelFilter {
    match level.parse::<LevelFilter>() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Unknown log level {}, using info.", level);
            LevelFilter::Info
        }
    }
}

/// Init and set the log target to console
///
/// [`app_name`]: which app output the log
///
/// level: maximum log level
pub fn init_log_to_console(app_name: &str, level: LevelFilter) {
    init_log(app_name, level, "console", "");
}

/// Init and set the logger
///
/// [`app_name`]: which app output the log
///
/// level:  maximum log level
///
/// target: "console" or "file"
///
/// file_path: the log file (valid when target == "file", LOG_FILE_PATH if empty)
pub fn init_log(_app_name: &str, level: LevelFilter, target: &str, file_path: &str) {
    let mut target = target;
    if target == "file" {
        let path = match file_path {
            "" => LOG_FILE_PATH,
            v => v,
        };
        match FileLogger::new(Path::new(path), 0o600) {
            Ok(l) => {
                /* A logger may already be installed, e.g. by another test. */
                let _ = log::set_boxed_logger(Box::new(l));
                log::set_max_level(level);
                return;
            }
            Err(e) => {
                eprintln!(
                    "Failed to open log file {}: {}, changing the LogTarget to `console`",
                    path, e
                );
                target = "console";
            }
        }
    }

    if target != "console" {
        eprintln!("Unknown LogTarget {}, using `console`", target);
    }
    let _ = log::set_boxed_logger(Box::new(ConsoleLogger));
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_log_to_console() {
        init_log_to_console("test", LevelFilter::Debug);
        log::info!("test for logger info");
        log::error!("test for logger error");
        log::warn!("test for logger warn");
        log::debug!("test for logger debug");
        log::trace!("test for logger trace");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("nonsense"), LevelFilter::Info);
    }

    #[test]
    fn test_write_msg_common() {
        let mut buf: Vec<u8> = Vec::new();
        write_msg_common(&mut buf, log::Level::Warn, "unitcore::unit", "hello".to_string());
        let line = String::from_utf8(buf).unwrap();
        assert!(line.ends_with("WARN unitcore::unit hello\n"));
    }

    #[test]
    fn test_file_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log").join("unitgraph.log");
        let logger = FileLogger::new(&path, 0o600).unwrap();
        log::Log::log(
            &logger,
            &log::Record::builder()
                .args(format_args!("resolved {}", "foo.service"))
                .level(log::Level::Info)
                .module_path(Some("unitcore"))
                .build(),
        );
        log::Log::flush(&logger);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("INFO unitcore resolved foo.service\n"));
    }
}
