use crate::symbolic::equations_error::EquationsError;
use chrono::Local;
use log::info;
use simplelog::*;
use std::fs::File;

/// "off"/"none" switch logging off (None); unknown names are a configuration error
pub fn loglevel_filter(loglevel: Option<&str>) -> Result<Option<LevelFilter>, EquationsError> {
    let level = match loglevel {
        None => LevelFilter::Info,
        Some(level) => match level.trim().to_lowercase().as_str() {
            "off" | "none" => return Ok(None),
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            other => {
                return Err(EquationsError::Configuration(format!(
                    "loglevel must be debug, info, warn, error, off or none, got '{}'",
                    other
                )));
            }
        },
    };
    Ok(Some(level))
}

/// Terminal logger plus, if `log_to_file`, a copy in log_<date_time>.txt.
/// A logger installed earlier stays in place.
pub fn init_logger(loglevel: Option<&str>, log_to_file: bool) -> Result<(), EquationsError> {
    let Some(log_option) = loglevel_filter(loglevel)? else {
        return Ok(());
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(
            log_option,
            Config::default(),
            File::create(name)?,
        ));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            info!("logging started with loglevel: {}", log_option);
            Ok(())
        }
        Err(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loglevel_filter() {
        assert_eq!(loglevel_filter(None).unwrap(), Some(LevelFilter::Info));
        assert_eq!(loglevel_filter(Some("debug")).unwrap(), Some(LevelFilter::Debug));
        assert_eq!(loglevel_filter(Some(" WARN ")).unwrap(), Some(LevelFilter::Warn));
        assert_eq!(loglevel_filter(Some("off")).unwrap(), None);
        assert_eq!(loglevel_filter(Some("none")).unwrap(), None);
        assert!(matches!(
            loglevel_filter(Some("verbose")),
            Err(EquationsError::Configuration(_))
        ));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        assert!(init_logger(Some("error"), false).is_ok());
        assert!(init_logger(Some("error"), false).is_ok());
        assert!(init_logger(Some("off"), false).is_ok());
    }
}
